//! Legacy VTK `STRUCTURED_POINTS` files in ASCII mode (`.vtk`).

use std::io::Write;

use frame_common::GridGeometry;

use crate::error::{GridFileError, Result};
use crate::model::{ArrayValues, DataArray, GridFile};

const HEADER: &str = "# vtk DataFile Version 3.0";
const VALUES_PER_LINE: usize = 9;

/// Serialize `grid` in the legacy ASCII layout. `title` becomes the single
/// free-text header line.
pub fn write_structured_points<W: Write>(grid: &GridFile, title: &str, mut out: W) -> Result<()> {
    let g = &grid.geometry;
    writeln!(out, "{}", HEADER)?;
    writeln!(out, "{}", title.lines().next().unwrap_or(""))?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET STRUCTURED_POINTS")?;
    writeln!(out, "DIMENSIONS {} {} {}", g.dimensions[0], g.dimensions[1], g.dimensions[2])?;
    writeln!(out, "SPACING {} {} {}", g.spacing[0], g.spacing[1], g.spacing[2])?;
    writeln!(out, "ORIGIN {} {} {}", g.origin[0], g.origin[1], g.origin[2])?;

    if !grid.cell_data.is_empty() {
        writeln!(out, "CELL_DATA {}", g.num_cells())?;
        for array in &grid.cell_data {
            write_scalars(&mut out, array)?;
        }
    }
    if !grid.point_data.is_empty() {
        writeln!(out, "POINT_DATA {}", g.num_points())?;
        for array in &grid.point_data {
            write_scalars(&mut out, array)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_scalars<W: Write>(out: &mut W, array: &DataArray) -> Result<()> {
    let vtk_type = match array.values {
        ArrayValues::Int32(_) => "int",
        ArrayValues::Float64(_) => "double",
    };
    writeln!(out, "SCALARS {} {} 1", array.name, vtk_type)?;
    writeln!(out, "LOOKUP_TABLE default")?;

    let tokens: Vec<String> = match &array.values {
        ArrayValues::Int32(v) => v.iter().map(|x| x.to_string()).collect(),
        ArrayValues::Float64(v) => v.iter().map(|x| x.to_string()).collect(),
    };
    for line in tokens.chunks(VALUES_PER_LINE) {
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| GridFileError::parse(format!("unexpected end of file, expected {}", what)))
    }

    fn expect(&mut self, keyword: &str) -> Result<()> {
        let tok = self.next(keyword)?;
        if tok.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(GridFileError::parse(format!("expected {}, found '{}'", keyword, tok)))
        }
    }

    fn number<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let tok = self.next(what)?;
        tok.parse()
            .map_err(|_| GridFileError::parse(format!("invalid {}: '{}'", what, tok)))
    }

    fn triple<T: std::str::FromStr>(&mut self, what: &str) -> Result<[T; 3]> {
        Ok([self.number(what)?, self.number(what)?, self.number(what)?])
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Attach {
    Cell,
    Point,
}

/// Parse a legacy ASCII `STRUCTURED_POINTS` document.
pub fn read_structured_points(content: &str) -> Result<GridFile> {
    let mut lines = content.splitn(3, '\n');
    let header = lines.next().unwrap_or("").trim();
    if !header.starts_with("# vtk DataFile") {
        return Err(GridFileError::parse("missing '# vtk DataFile' header"));
    }
    // Title line is free text
    let _title = lines.next();
    let mut tokens = Tokens {
        inner: lines.next().unwrap_or("").split_whitespace(),
    };

    let encoding = tokens.next("file type")?;
    if !encoding.eq_ignore_ascii_case("ASCII") {
        return Err(GridFileError::UnsupportedFormat(format!(
            "legacy file type '{}'",
            encoding
        )));
    }
    tokens.expect("DATASET")?;
    let dataset = tokens.next("dataset type")?;
    if !dataset.eq_ignore_ascii_case("STRUCTURED_POINTS") {
        return Err(GridFileError::UnsupportedFormat(format!(
            "legacy dataset '{}'",
            dataset
        )));
    }

    let mut dimensions = None;
    let mut spacing = [1.0; 3];
    let mut origin = [0.0; 3];
    let mut attach = None;
    let mut count = 0usize;
    let mut cell_data = Vec::new();
    let mut point_data = Vec::new();

    while let Some(keyword) = tokens.inner.next() {
        match keyword.to_ascii_uppercase().as_str() {
            "DIMENSIONS" => dimensions = Some(tokens.triple::<usize>("DIMENSIONS")?),
            "SPACING" | "ASPECT_RATIO" => spacing = tokens.triple("SPACING")?,
            "ORIGIN" => origin = tokens.triple("ORIGIN")?,
            "CELL_DATA" => {
                attach = Some(Attach::Cell);
                count = tokens.number("CELL_DATA count")?;
            }
            "POINT_DATA" => {
                attach = Some(Attach::Point);
                count = tokens.number("POINT_DATA count")?;
            }
            "SCALARS" => {
                let section = attach
                    .ok_or_else(|| GridFileError::parse("SCALARS before CELL_DATA or POINT_DATA"))?;
                let array = read_scalars(&mut tokens, count)?;
                match section {
                    Attach::Cell => cell_data.push(array),
                    Attach::Point => point_data.push(array),
                }
            }
            other => {
                return Err(GridFileError::UnsupportedFormat(format!(
                    "legacy keyword '{}'",
                    other
                )))
            }
        }
    }

    let dimensions = dimensions.ok_or_else(|| GridFileError::parse("missing DIMENSIONS"))?;
    let mut grid = GridFile::new(GridGeometry::new(dimensions, origin, spacing));
    grid.cell_data = cell_data;
    grid.point_data = point_data;
    grid.validate()?;
    Ok(grid)
}

fn read_scalars(tokens: &mut Tokens<'_>, count: usize) -> Result<DataArray> {
    let name = tokens.next("SCALARS name")?.to_string();
    let data_type = tokens.next("SCALARS type")?.to_ascii_lowercase();

    // Optional component count precedes LOOKUP_TABLE
    let mut next = tokens.next("LOOKUP_TABLE")?;
    if next.parse::<usize>().is_ok() {
        if next != "1" {
            return Err(GridFileError::UnsupportedFormat(format!(
                "{}-component SCALARS '{}'",
                next, name
            )));
        }
        next = tokens.next("LOOKUP_TABLE")?;
    }
    if !next.eq_ignore_ascii_case("LOOKUP_TABLE") {
        return Err(GridFileError::parse(format!(
            "expected LOOKUP_TABLE after SCALARS {}, found '{}'",
            name, next
        )));
    }
    tokens.next("lookup table name")?;

    let body = (0..count)
        .map(|_| tokens.next("scalar value"))
        .collect::<Result<Vec<_>>>()?
        .join(" ");
    let vtk_type = match data_type.as_str() {
        "bit" | "char" | "unsigned_char" | "short" | "unsigned_short" | "int" | "unsigned_int"
        | "long" | "unsigned_long" | "vtkidtype" => "Int32",
        "float" | "double" => "Float64",
        other => {
            return Err(GridFileError::UnsupportedFormat(format!(
                "legacy scalar type '{}'",
                other
            )))
        }
    };
    let values = crate::xml::parse_values(vtk_type, &body, &name)?;
    Ok(DataArray::new(name, values))
}
