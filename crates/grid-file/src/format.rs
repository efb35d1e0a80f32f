//! Grid file formats and extension mapping.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridFileError, Result};

/// Supported on-disk encodings. Both are uncompressed ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridFileFormat {
    /// VTK XML ImageData (`.vti`) with inline `format="ascii"` arrays.
    #[default]
    ImageDataXml,
    /// Legacy VTK `STRUCTURED_POINTS` (`.vtk`) in ASCII mode.
    LegacyStructuredPoints,
}

impl GridFileFormat {
    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("vti") => Ok(Self::ImageDataXml),
            Some("vtk") => Ok(Self::LegacyStructuredPoints),
            _ => Err(GridFileError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse a format name (case-insensitive): `vti`, `xml`, `vtk`, `legacy`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "vti" | "xml" | "image_data_xml" => Some(Self::ImageDataXml),
            "vtk" | "legacy" | "legacy_structured_points" => Some(Self::LegacyStructuredPoints),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::ImageDataXml => "vti",
            Self::LegacyStructuredPoints => "vtk",
        }
    }
}
