//! JSON map files describing the grid size and its blocks.
//!
//! ```json
//! { "width": 10, "high": 6, "blocks": [[2, 0, 2, 3], [5, 2, 7, 2]] }
//! ```
//!
//! Each block lists `x0, y0, x1, y1` with inclusive bounds. `height` is
//! accepted in place of `high`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gridstar_core::BlockRect;
use gridstar_grid::{Grid, GridError};
use serde::Deserialize;
use thiserror::Error;

/// Decoded map file contents.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct MapDocument {
    /// Number of columns.
    pub(crate) width: u32,
    /// Number of rows.
    #[serde(rename = "high", alias = "height")]
    pub(crate) height: u32,
    /// Impassable rectangles.
    #[serde(default)]
    pub(crate) blocks: Vec<BlockRect>,
}

impl MapDocument {
    /// Decodes a map document from JSON text.
    pub(crate) fn parse(contents: &str) -> Result<Self, MapFileError> {
        serde_json::from_str(contents).map_err(MapFileError::InvalidJson)
    }

    /// Builds the grid described by the document.
    pub(crate) fn into_grid(self) -> Result<Grid, MapFileError> {
        Grid::new(self.width, self.height, self.blocks).map_err(MapFileError::InvalidGrid)
    }
}

/// Reads and decodes the map file at `path`.
pub(crate) fn load_grid(path: &Path) -> Result<Grid, MapFileError> {
    let contents = fs::read_to_string(path).map_err(|source| MapFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    MapDocument::parse(&contents)?.into_grid()
}

/// Errors that can occur while loading a map file.
#[derive(Debug, Error)]
pub(crate) enum MapFileError {
    /// The file could not be read.
    #[error("could not read map file {}", .path.display())]
    Read {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The contents were not a valid map document.
    #[error("could not parse map data")]
    InvalidJson(#[source] serde_json::Error),
    /// The document described an invalid grid.
    #[error("map describes an invalid grid")]
    InvalidGrid(#[source] GridError),
}
