#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering for finished searches.
//!
//! A [`Scene`] is a plain snapshot of what each cell should show, built from
//! the grid and a finished [`SearchState`]. Backends implementing
//! [`RenderingBackend`] turn scenes into output; [`TerminalRenderer`] draws
//! the boxed text grid with optional ANSI colours.

use std::{
    error::Error,
    fmt::{self, Write as _},
    io::Write,
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use gridstar_core::CellCoord;
use gridstar_grid::Grid;
use gridstar_system_search::SearchState;

const FRAME_COLOR: &str = "\x1b[32m";
const HIGHLIGHT_COLOR: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// What a single cell shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellPresentation {
    /// Impassable cell.
    Blocked,
    /// Cell the search started from.
    Start,
    /// Cell the search tried to reach.
    Goal,
    /// Cell on the reconstructed route, labelled with its priority.
    Path {
        /// Final `f` cost of the node.
        f_cost: u32,
    },
    /// Finalized cell off the route, labelled with its priority.
    Visited {
        /// Final `f` cost of the node.
        f_cost: u32,
    },
    /// Cell the search never finalized.
    Empty,
}

/// Snapshot of a grid and the search results drawn on top of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    columns: u32,
    rows: u32,
    cells: Vec<CellPresentation>,
}

impl Scene {
    /// Captures the presentation of every cell after a search.
    #[must_use]
    pub fn from_search(grid: &Grid, state: &SearchState) -> Self {
        let path = state.path();
        let cells = (0..grid.cell_count())
            .map(|index| {
                if grid.is_blocked(index) {
                    CellPresentation::Blocked
                } else if index == state.start_index() {
                    CellPresentation::Start
                } else if index == state.goal_index() {
                    CellPresentation::Goal
                } else if let Some(node) = path.as_ref().and_then(|path| path.get(index)) {
                    CellPresentation::Path {
                        f_cost: node.f_cost(),
                    }
                } else if let Some(node) = state.closed_node(index) {
                    CellPresentation::Visited {
                        f_cost: node.f_cost(),
                    }
                } else {
                    CellPresentation::Empty
                }
            })
            .collect();

        Self {
            columns: grid.width(),
            rows: grid.height(),
            cells,
        }
    }

    /// Number of columns in the scene.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the scene.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Presentation of the provided cell, if it lies inside the scene.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellPresentation> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }

        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.cells.get(index).copied()
    }
}

/// One-line diagnostic summary printed above the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
    /// Number of cells on the route, zero when no route exists.
    pub steps: usize,
    /// Number of expanded nodes.
    pub expansions: u32,
}

impl Summary {
    /// Builds the summary of a finished search.
    #[must_use]
    pub fn from_search(state: &SearchState, elapsed: Duration) -> Self {
        Self {
            elapsed,
            steps: state.path().map_or(0, |path| path.len()),
            expansions: state.expansion_count(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost:{:?},step:{},selectCount({})",
            self.elapsed, self.steps, self.expansions
        )
    }
}

/// Visual settings for the text grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStyle {
    color: bool,
    cell_width: usize,
}

impl RenderStyle {
    /// Narrowest cell that still fits the `Start` label.
    pub const MIN_CELL_WIDTH: usize = 5;

    /// Creates a style, rejecting cells too narrow for the labels.
    pub fn new(color: bool, cell_width: usize) -> Result<Self, RenderingError> {
        if cell_width < Self::MIN_CELL_WIDTH {
            return Err(RenderingError::CellTooNarrow { cell_width });
        }

        Ok(Self { color, cell_width })
    }

    /// Whether ANSI colour codes are emitted.
    #[must_use]
    pub const fn color(&self) -> bool {
        self.color
    }

    /// Width of a cell's interior in characters.
    #[must_use]
    pub const fn cell_width(&self) -> usize {
        self.cell_width
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: true,
            cell_width: Self::MIN_CELL_WIDTH,
        }
    }
}

/// Draws the scene as a boxed text grid framed by column numbers.
#[must_use]
pub fn render_to_string(scene: &Scene, style: RenderStyle) -> String {
    let mut canvas = Canvas {
        out: String::new(),
        style,
    };
    canvas.draw(scene);
    canvas.out
}

struct Canvas {
    out: String,
    style: RenderStyle,
}

impl Canvas {
    fn draw(&mut self, scene: &Scene) {
        self.column_numbers(scene.columns);
        for row in 0..scene.rows {
            self.separator(scene.columns);
            for column in 0..scene.columns {
                let presentation = scene
                    .cell(CellCoord::new(column, row))
                    .unwrap_or(CellPresentation::Empty);
                self.frame("|");
                self.cell(presentation);
            }
            self.frame("|");
            self.line(format_args!("{row}\n"));
        }
        self.separator(scene.columns);
        self.column_numbers(scene.columns);
    }

    fn cell(&mut self, presentation: CellPresentation) {
        let width = self.style.cell_width;
        match presentation {
            CellPresentation::Blocked => self.line(format_args!("{}", "/".repeat(width))),
            CellPresentation::Start => self.highlight(format_args!("{:^width$}", "Start")),
            CellPresentation::Goal => self.highlight(format_args!("{:^width$}", "End")),
            CellPresentation::Path { f_cost } => self.highlight(format_args!("{f_cost:<width$}")),
            CellPresentation::Visited { f_cost } => self.line(format_args!("{f_cost:<width$}")),
            CellPresentation::Empty => self.line(format_args!("{:width$}", "")),
        }
    }

    fn column_numbers(&mut self, columns: u32) {
        let width = self.style.cell_width;
        self.out.push(' ');
        for column in 0..columns {
            self.line(format_args!("{column:<width$} "));
        }
        self.out.push('\n');
    }

    fn separator(&mut self, columns: u32) {
        let segment = format!("|{}", "-".repeat(self.style.cell_width));
        for _ in 0..columns {
            self.frame(&segment);
        }
        self.frame("|");
        self.out.push('\n');
    }

    fn frame(&mut self, text: &str) {
        self.colored(FRAME_COLOR, format_args!("{text}"));
    }

    fn highlight(&mut self, args: fmt::Arguments<'_>) {
        self.colored(HIGHLIGHT_COLOR, args);
    }

    fn colored(&mut self, color: &str, args: fmt::Arguments<'_>) {
        if self.style.color {
            self.out.push_str(color);
            self.line(args);
            self.out.push_str(RESET);
        } else {
            self.line(args);
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
    }
}

/// Output target able to present a search result.
pub trait RenderingBackend {
    /// Presents the summary and the scene.
    fn present(&mut self, summary: &Summary, scene: &Scene) -> AnyResult<()>;
}

/// Backend that writes the text grid to any byte sink, usually stdout.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
    style: RenderStyle,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `out`.
    #[must_use]
    pub fn new(out: W, style: RenderStyle) -> Self {
        Self { out, style }
    }

    /// Consumes the renderer and hands back the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TerminalRenderer<W> {
    fn present(&mut self, summary: &Summary, scene: &Scene) -> AnyResult<()> {
        writeln!(self.out, "{summary}").context("failed to write search summary")?;
        self.out
            .write_all(render_to_string(scene, self.style).as_bytes())
            .context("failed to write grid view")?;
        self.out.flush().context("failed to flush terminal output")
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Cells must be wide enough for the `Start` label.
    CellTooNarrow {
        /// Provided width that failed validation.
        cell_width: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellTooNarrow { cell_width } => {
                write!(
                    f,
                    "cell_width must be at least {} (received {cell_width})",
                    RenderStyle::MIN_CELL_WIDTH
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use gridstar_core::BlockRect;
    use gridstar_system_search::find_path;

    use super::*;

    fn plain() -> RenderStyle {
        RenderStyle::new(false, RenderStyle::MIN_CELL_WIDTH).expect("valid style")
    }

    #[test]
    fn style_rejects_narrow_cells() {
        assert_eq!(
            RenderStyle::new(true, 4),
            Err(RenderingError::CellTooNarrow { cell_width: 4 })
        );
        assert!(RenderStyle::new(true, 7).is_ok());
    }

    #[test]
    fn corridor_renders_route_between_endpoints() {
        let grid = Grid::open(3, 1).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0));
        let scene = Scene::from_search(&grid, &state);

        let expected = concat!(
            " 0     1     2     \n",
            "|-----|-----|-----|\n",
            "|Start|20   | End |0\n",
            "|-----|-----|-----|\n",
            " 0     1     2     \n",
        );
        assert_eq!(render_to_string(&scene, plain()), expected);
    }

    #[test]
    fn scene_distinguishes_visited_cells_from_route() {
        let grid = Grid::new(3, 2, [BlockRect::single(CellCoord::new(1, 0))]).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0));
        let scene = Scene::from_search(&grid, &state);

        assert_eq!(
            scene.cell(CellCoord::new(1, 0)),
            Some(CellPresentation::Blocked)
        );
        assert_eq!(
            scene.cell(CellCoord::new(0, 0)),
            Some(CellPresentation::Start)
        );
        assert_eq!(
            scene.cell(CellCoord::new(2, 0)),
            Some(CellPresentation::Goal)
        );
        assert!(matches!(
            scene.cell(CellCoord::new(1, 1)),
            Some(CellPresentation::Path { .. })
        ));
        assert_eq!(scene.cell(CellCoord::new(3, 0)), None);
    }

    #[test]
    fn colored_output_wraps_frame_and_highlights() {
        let grid = Grid::open(1, 1).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(0, 0));
        let scene = Scene::from_search(&grid, &state);
        let rendered = render_to_string(&scene, RenderStyle::default());

        assert!(rendered.contains("\x1b[32m|-----\x1b[0m"));
        assert!(rendered.contains("\x1b[31mStart\x1b[0m"));
    }

    #[test]
    fn wider_cells_pad_every_segment() {
        let grid = Grid::new(2, 1, [BlockRect::single(CellCoord::new(1, 0))]).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(0, 0));
        let scene = Scene::from_search(&grid, &state);
        let style = RenderStyle::new(false, 7).expect("valid style");

        let rendered = render_to_string(&scene, style);
        assert!(rendered.contains("| Start |///////|0\n"));
        assert!(rendered.contains("|-------|-------|\n"));
    }

    #[test]
    fn summary_reports_steps_and_expansions() {
        let grid = Grid::open(3, 1).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0));
        let summary = Summary::from_search(&state, Duration::from_micros(15));

        assert_eq!(summary.to_string(), "cost:15µs,step:3,selectCount(2)");
    }

    #[test]
    fn terminal_renderer_writes_summary_then_grid() {
        let grid = Grid::open(1, 1).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(0, 0));
        let scene = Scene::from_search(&grid, &state);
        let summary = Summary::from_search(&state, Duration::ZERO);
        let mut renderer = TerminalRenderer::new(Vec::new(), plain());

        renderer
            .present(&summary, &scene)
            .expect("writing to memory succeeds");

        let output = String::from_utf8(renderer.into_inner()).expect("utf-8 output");
        assert!(output.starts_with("cost:0ns,step:1,selectCount(0)\n 0     \n"));
        assert!(output.contains("|Start|0\n"));
    }
}
