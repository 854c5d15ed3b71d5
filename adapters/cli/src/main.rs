#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a map, searches a route and draws it.

mod args;
mod config;
mod coordinates;
mod map_file;

use std::{io, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use gridstar_grid::Endpoint;
use gridstar_rendering::{RenderingBackend, Scene, Summary, TerminalRenderer};
use gridstar_system_search::{find_path_with, SearchStatus};
use log::{info, warn, LevelFilter};

use self::{args::Args, config::Config};

/// Entry point for the gridstar command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::resolve(&args)?;
    run(&args, &config)
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let style = config.render_style()?;
    let grid = map_file::load_grid(&args.map)
        .with_context(|| format!("failed to load map from {}", args.map.display()))?;
    info!(
        "loaded {}x{} map with {} blocked cells",
        grid.width(),
        grid.height(),
        grid.blocked_count()
    );

    let route = args.path;
    grid.validate_endpoint(route.start, Endpoint::Start)?;
    grid.validate_endpoint(route.goal, Endpoint::Goal)?;

    let started = Instant::now();
    let state = find_path_with(&grid, route.start, route.goal, config.search_options());
    let elapsed = started.elapsed();

    match state.status() {
        SearchStatus::Found => info!(
            "route from {} to {} costs {}",
            route.start,
            route.goal,
            state.path().map_or(0, |path| path.cost())
        ),
        SearchStatus::Unreachable => warn!("no path from {} to {}", route.start, route.goal),
        SearchStatus::Interrupted => warn!(
            "search stopped after {} expansions without reaching {}",
            state.expansion_count(),
            route.goal
        ),
    }

    let mut renderer = TerminalRenderer::new(io::stdout().lock(), style);
    renderer.present(
        &Summary::from_search(&state, elapsed),
        &Scene::from_search(&grid, &state),
    )
}

fn init_logging(verbosity: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    let level = match verbosity {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        let _ = builder.filter_level(level);
    }

    builder.format_timestamp(None).init();
}
