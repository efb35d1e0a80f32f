//! VTK XML ImageData (`.vti`) with inline ASCII arrays.
//!
//! Output layout:
//!
//! ```text
//! <VTKFile type="ImageData" version="0.1" byte_order="LittleEndian">
//!   <ImageData WholeExtent="0 H 0 W 0 0" Origin="0 0 0" Spacing="1 1 1">
//!     <Piece Extent="0 H 0 W 0 0">
//!       <PointData/>
//!       <CellData Scalars="Spin">
//!         <DataArray type="Int32" Name="Spin" format="ascii">...</DataArray>
//!       </CellData>
//!     </Piece>
//!   </ImageData>
//! </VTKFile>
//! ```

use std::borrow::Cow;
use std::io::Write;

use frame_common::GridGeometry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{GridFileError, Result};
use crate::model::{ArrayValues, DataArray, GridFile};

const VALUES_PER_LINE: usize = 6;

/// Serialize `grid` as ASCII ImageData into `out`.
pub fn write_image_data<W: Write>(grid: &GridFile, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    let geometry = &grid.geometry;
    let extent = join(&geometry.whole_extent());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    writer.write_event(Event::Start(BytesStart::new("VTKFile").with_attributes([
        ("type", "ImageData"),
        ("version", "0.1"),
        ("byte_order", "LittleEndian"),
    ])))?;

    let origin = join(&geometry.origin);
    let spacing = join(&geometry.spacing);
    writer.write_event(Event::Start(BytesStart::new("ImageData").with_attributes([
        ("WholeExtent", extent.as_str()),
        ("Origin", origin.as_str()),
        ("Spacing", spacing.as_str()),
    ])))?;
    writer.write_event(Event::Start(
        BytesStart::new("Piece").with_attributes([("Extent", extent.as_str())]),
    ))?;

    write_section(&mut writer, "PointData", &grid.point_data)?;
    write_section(&mut writer, "CellData", &grid.cell_data)?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("ImageData")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;
    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn write_section<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    arrays: &[DataArray],
) -> Result<()> {
    let Some(active) = arrays.first() else {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    };

    writer.write_event(Event::Start(
        BytesStart::new(tag).with_attributes([("Scalars", active.name.as_str())]),
    ))?;
    for array in arrays {
        writer.write_event(Event::Start(BytesStart::new("DataArray").with_attributes([
            ("type", array.values.vtk_type()),
            ("Name", array.name.as_str()),
            ("format", "ascii"),
        ])))?;
        let body = format_values(&array.values);
        writer.write_event(Event::Text(BytesText::new(&body)))?;
        writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn format_values(values: &ArrayValues) -> String {
    let tokens: Vec<String> = match values {
        ArrayValues::Int32(v) => v.iter().map(|x| x.to_string()).collect(),
        ArrayValues::Float64(v) => v.iter().map(|x| x.to_string()).collect(),
    };
    tokens
        .chunks(VALUES_PER_LINE)
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Point,
    Cell,
}

struct PendingArray {
    name: String,
    vtk_type: String,
    body: String,
}

/// Parse an ASCII ImageData document.
pub fn read_image_data(content: &str) -> Result<GridFile> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut geometry: Option<GridGeometry> = None;
    let mut section = Section::None;
    let mut active = [None::<String>, None::<String>];
    let mut pending: Option<PendingArray> = None;
    let mut point_data = Vec::new();
    let mut cell_data = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"VTKFile" => {
                if let Some(kind) = attr(&e, "type")? {
                    if kind != "ImageData" {
                        return Err(GridFileError::UnsupportedFormat(format!(
                            "VTKFile type '{}'",
                            kind
                        )));
                    }
                }
            }
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"ImageData" => {
                geometry = Some(parse_geometry(&e)?);
            }
            Event::Start(e) => match e.name().as_ref() {
                b"PointData" => {
                    section = Section::Point;
                    active[0] = attr(&e, "Scalars")?;
                }
                b"CellData" => {
                    section = Section::Cell;
                    active[1] = attr(&e, "Scalars")?;
                }
                b"DataArray" => pending = Some(start_array(&e)?),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"DataArray" => {
                let array = finish_array(start_array(&e)?)?;
                push(section, array, &mut point_data, &mut cell_data);
            }
            Event::Text(t) => {
                if let Some(array) = pending.as_mut() {
                    array.body.push_str(&t.unescape()?);
                    array.body.push(' ');
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"DataArray" => {
                    if let Some(array) = pending.take() {
                        let array = finish_array(array)?;
                        push(section, array, &mut point_data, &mut cell_data);
                    }
                }
                b"PointData" | b"CellData" => section = Section::None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let geometry =
        geometry.ok_or_else(|| GridFileError::parse("document has no ImageData element"))?;
    let mut grid = GridFile::new(geometry);
    grid.point_data = point_data;
    grid.cell_data = cell_data;
    promote_active(&mut grid.point_data, active[0].as_deref());
    promote_active(&mut grid.cell_data, active[1].as_deref());
    grid.validate()?;
    Ok(grid)
}

fn push(section: Section, array: DataArray, points: &mut Vec<DataArray>, cells: &mut Vec<DataArray>) {
    match section {
        Section::Point => points.push(array),
        Section::Cell => cells.push(array),
        // FieldData and other stray arrays
        Section::None => {}
    }
}

fn promote_active(arrays: &mut [DataArray], active: Option<&str>) {
    if let Some(pos) = active.and_then(|name| arrays.iter().position(|a| a.name == name)) {
        arrays[..=pos].rotate_right(1);
    }
}

fn attr(element: &BytesStart, key: &str) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == key.as_bytes() {
            let value: Cow<str> = attribute.unescape_value()?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(element: &BytesStart, key: &str) -> Result<String> {
    attr(element, key)?.ok_or_else(|| {
        GridFileError::parse(format!(
            "<{}> is missing the {} attribute",
            String::from_utf8_lossy(element.name().as_ref()),
            key
        ))
    })
}

fn parse_numbers<T: std::str::FromStr, const N: usize>(text: &str, what: &str) -> Result<[T; N]> {
    let parsed: Vec<T> = text
        .split_whitespace()
        .map(|tok| tok.parse::<T>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| GridFileError::parse(format!("invalid {}: '{}'", what, text)))?;
    parsed
        .try_into()
        .map_err(|_| GridFileError::parse(format!("{} needs {} values: '{}'", what, N, text)))
}

fn parse_geometry(element: &BytesStart) -> Result<GridGeometry> {
    let extent: [usize; 6] = parse_numbers(&required_attr(element, "WholeExtent")?, "WholeExtent")?;
    let origin = match attr(element, "Origin")? {
        Some(text) => parse_numbers(&text, "Origin")?,
        None => [0.0; 3],
    };
    let spacing = match attr(element, "Spacing")? {
        Some(text) => parse_numbers(&text, "Spacing")?,
        None => [1.0; 3],
    };

    let mut dimensions = [0usize; 3];
    for axis in 0..3 {
        let (lo, hi) = (extent[2 * axis], extent[2 * axis + 1]);
        dimensions[axis] = hi
            .checked_sub(lo)
            .and_then(|span| span.checked_add(1))
            .ok_or_else(|| GridFileError::parse(format!("invalid extent {:?}", extent)))?;
    }
    Ok(GridGeometry::new(dimensions, origin, spacing))
}

fn start_array(element: &BytesStart) -> Result<PendingArray> {
    let format = attr(element, "format")?.unwrap_or_else(|| "ascii".to_string());
    if format != "ascii" {
        return Err(GridFileError::UnsupportedFormat(format!(
            "DataArray format '{}'",
            format
        )));
    }
    if let Some(components) = attr(element, "NumberOfComponents")? {
        if components.trim() != "1" {
            return Err(GridFileError::UnsupportedFormat(format!(
                "{}-component DataArray",
                components
            )));
        }
    }
    Ok(PendingArray {
        name: required_attr(element, "Name")?,
        vtk_type: required_attr(element, "type")?,
        body: String::new(),
    })
}

fn finish_array(array: PendingArray) -> Result<DataArray> {
    let values = parse_values(&array.vtk_type, &array.body, &array.name)?;
    Ok(DataArray::new(array.name, values))
}

/// Parse whitespace-separated values of a VTK scalar type. Integer types
/// become `Int32`, floating types `Float64`.
pub(crate) fn parse_values(vtk_type: &str, body: &str, name: &str) -> Result<ArrayValues> {
    let bad = |tok: &str| GridFileError::parse(format!("array '{}': invalid value '{}'", name, tok));
    match vtk_type {
        "Int8" | "UInt8" | "Int16" | "UInt16" | "Int32" | "UInt32" | "Int64" | "UInt64" => body
            .split_whitespace()
            .map(|tok| tok.parse::<i32>().map_err(|_| bad(tok)))
            .collect::<Result<Vec<_>>>()
            .map(ArrayValues::Int32),
        "Float32" | "Float64" => body
            .split_whitespace()
            .map(|tok| tok.parse::<f64>().map_err(|_| bad(tok)))
            .collect::<Result<Vec<_>>>()
            .map(ArrayValues::Float64),
        other => Err(GridFileError::UnsupportedFormat(format!(
            "DataArray type '{}'",
            other
        ))),
    }
}
