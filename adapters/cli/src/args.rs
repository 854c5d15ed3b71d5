//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::coordinates::{parse_route, Route};

/// Finds the cheapest eight-way route between two cells of a blocked grid.
#[derive(Debug, Parser)]
#[command(name = "gridstar", version, about, long_about = None)]
pub(crate) struct Args {
    /// JSON map file with `width`, `high` and `blocks`.
    #[arg(short, long, value_name = "FILE")]
    pub(crate) map: PathBuf,

    /// Route to search, given as `startX,startY,endX,endY`.
    #[arg(short, long, value_name = "startX,startY,endX,endY", value_parser = parse_route, allow_hyphen_values = true)]
    pub(crate) path: Route,

    /// Optional TOML file with `[render]` and `[search]` settings.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Disable ANSI colours in the grid view.
    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,

    /// Stop searching after this many expansions.
    #[arg(long, value_name = "N")]
    pub(crate) max_expansions: Option<u32>,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}
