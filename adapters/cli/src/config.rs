//! Optional TOML configuration layered under the command-line flags.
//!
//! ```toml
//! [render]
//! color = false
//! cell_width = 7
//!
//! [search]
//! max_expansions = 5000
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use gridstar_rendering::RenderStyle;
use gridstar_system_search::SearchOptions;
use serde::Deserialize;

use crate::args::Args;

/// Settings resolved from the config file and command-line overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Terminal output settings.
    pub(crate) render: RenderConfig,
    /// Search tuning.
    pub(crate) search: SearchConfig,
}

/// `[render]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderConfig {
    /// Emit ANSI colours.
    pub(crate) color: bool,
    /// Width of each cell's interior.
    pub(crate) cell_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            color: style.color(),
            cell_width: style.cell_width(),
        }
    }
}

/// `[search]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SearchConfig {
    /// Give up after this many expansions.
    pub(crate) max_expansions: Option<u32>,
}

impl Config {
    /// Reads the config file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parses config file contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Resolves the config for a run: file settings first, then flags.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if args.no_color {
            config.render.color = false;
        }
        if let Some(limit) = args.max_expansions {
            config.search.max_expansions = Some(limit);
        }

        Ok(config)
    }

    /// Rendering style described by the `[render]` table.
    pub(crate) fn render_style(&self) -> Result<RenderStyle> {
        RenderStyle::new(self.render.color, self.render.cell_width)
            .context("invalid [render] settings")
    }

    /// Search options described by the `[search]` table.
    pub(crate) fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_expansions: self.search.max_expansions,
        }
    }
}
