//! Shared pieces of the `gridwalk` demo: command-line configuration, grid
//! construction and the headless text report.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gridwalk_core::{Cell, Grid};
use gridwalk_crossterm::TerminalSinkConfig;
use gridwalk_paths::{Outcome, RunSummary, Strategy};

/// Default grid size, matching the classic 20x20 visualizer board.
pub const ROWS: i32 = 20;
pub const COLS: i32 = 20;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "gridwalk", about = "Watch BFS, DFS and Dijkstra explore an obstacle grid")]
pub struct Args {
    /// Search strategy: BFS, DFS or Dijkstra.
    #[arg(short, long, default_value = "BFS")]
    pub strategy: Strategy,

    /// Text layout to load (`.` empty, `#` obstacle, `S` start, `E` end).
    #[arg(short, long)]
    pub map: Option<PathBuf>,

    /// Rows of a generated grid.
    #[arg(long, default_value_t = ROWS)]
    pub rows: i32,

    /// Columns of a generated grid.
    #[arg(long, default_value_t = COLS)]
    pub cols: i32,

    /// Chance that a generated cell is an obstacle.
    #[arg(long, default_value_t = 0.25)]
    pub density: f64,

    /// Seed for obstacle generation; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after each visited cell, in milliseconds.
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Print glyphs instead of colored blocks.
    #[arg(long)]
    pub no_color: bool,

    /// Skip the terminal animation and print a text report.
    #[arg(long)]
    pub headless: bool,

    /// Headless: run every strategy on the same grid and compare.
    #[arg(long, requires = "headless")]
    pub compare: bool,
}

/// Where the grid comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GridSource {
    File(PathBuf),
    Random {
        rows: i32,
        cols: i32,
        density: f64,
        seed: u64,
    },
}

/// Everything a demo run needs, resolved from [`Args`].
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub source: GridSource,
    pub strategy: Strategy,
    pub sink: TerminalSinkConfig,
    pub headless: bool,
    pub compare: bool,
}

impl DemoConfig {
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&args.density) {
            anyhow::bail!("density must be between 0 and 1, got {}", args.density);
        }
        let source = match args.map {
            Some(path) => GridSource::File(path),
            None => GridSource::Random {
                rows: args.rows,
                cols: args.cols,
                density: args.density,
                seed: args.seed.unwrap_or_else(rand::random),
            },
        };
        Ok(Self {
            source,
            strategy: args.strategy,
            sink: TerminalSinkConfig {
                delay: Duration::from_millis(args.delay_ms),
                color: !args.no_color,
                origin: (0, 0),
                listen_keys: true,
            },
            headless: args.headless,
            compare: args.compare,
        })
    }

    /// Load or generate the grid.
    pub fn build_grid(&self) -> anyhow::Result<Grid> {
        match &self.source {
            GridSource::File(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let grid = text
                    .parse::<Grid>()
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(grid)
            }
            &GridSource::Random {
                rows,
                cols,
                density,
                seed,
            } => {
                log::debug!("generating {rows}x{cols} grid, density {density}, seed {seed}");
                let mut rng = StdRng::seed_from_u64(seed);
                random_grid(rows, cols, density, &mut rng)
            }
        }
    }
}

/// A grid with the start in the top-left corner, the end in the bottom-right
/// corner, and every other cell blocked with probability `density`.
pub fn random_grid<R: Rng>(
    rows: i32,
    cols: i32,
    density: f64,
    rng: &mut R,
) -> anyhow::Result<Grid> {
    let mut grid = Grid::new(rows, cols)?;
    for i in 0..grid.len() {
        let r: f64 = rng.random();
        if r < density {
            grid.set_obstacle(grid.cell_at(i))?;
        }
    }
    grid.set_start(Cell::ORIGIN)?;
    grid.set_end(Cell::new(rows - 1, cols - 1))?;
    Ok(grid)
}

/// The grid as text with the run drawn over it: `o` for visited cells, `*`
/// for the path. Start and end keep their letters.
pub fn overlay(grid: &Grid, visited: &[Cell], path: Option<&[Cell]>) -> String {
    let mut chars: Vec<char> = grid.iter().map(|(_, st)| st.symbol()).collect();
    let keep = |c: Cell| Some(c) == grid.start() || Some(c) == grid.end();
    let marks = visited
        .iter()
        .map(|&c| (c, 'o'))
        .chain(path.unwrap_or_default().iter().map(|&c| (c, '*')));
    for (c, mark) in marks {
        if keep(c) {
            continue;
        }
        if let Ok(i) = grid.index(c) {
            chars[i] = mark;
        }
    }
    let mut out = String::with_capacity(chars.len() + grid.rows() as usize);
    for row in chars.chunks(grid.cols() as usize) {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// One line per run: strategy, outcome, visits, path length, frontier peak.
pub fn summary_line(summary: &RunSummary) -> String {
    let outcome = match &summary.outcome {
        Outcome::Found(p) => format!("path {:>4}", p.len()),
        Outcome::NoPath => "no path  ".to_string(),
        Outcome::Cancelled => "cancelled".to_string(),
    };
    format!(
        "{:<9} {}  visited {:>5}  peak frontier {:>5}",
        summary.strategy.name(),
        outcome,
        summary.visited,
        summary.peak_frontier
    )
}
