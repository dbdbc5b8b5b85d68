//! Terminal path search visualizer.
//!
//! Run: cargo run --bin gridwalk -- --strategy dijkstra --seed 42
//! Headless: cargo run --bin gridwalk -- --headless --compare

use std::io;

use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use gridwalk_core::Grid;
use gridwalk_crossterm::{TerminalGuard, TerminalSink};
use gridwalk_demos::{Args, DemoConfig, overlay, summary_line};
use gridwalk_paths::{CancelToken, Engine, Recorder, RunSummary, Strategy};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cfg = DemoConfig::from_args(args)?;
    let grid = cfg.build_grid()?;
    log::info!(
        "{}x{} grid, {} obstacles, strategy {}",
        grid.rows(),
        grid.cols(),
        grid.obstacle_count(),
        cfg.strategy
    );

    if cfg.headless {
        let strategies: &[Strategy] = if cfg.compare {
            &Strategy::ALL
        } else {
            std::slice::from_ref(&cfg.strategy)
        };
        return headless(&grid, strategies);
    }
    animate(&grid, &cfg)
}

fn headless(grid: &Grid, strategies: &[Strategy]) -> anyhow::Result<()> {
    let mut engine = Engine::new();
    let cancel = CancelToken::new();
    let mut lines = Vec::with_capacity(strategies.len());
    for &strategy in strategies {
        let mut rec = Recorder::new();
        let summary = engine.run(grid, strategy, &cancel, &mut rec)?;
        println!("{}:", strategy.name());
        print!("{}", overlay(grid, &rec.visited(), rec.path()));
        println!();
        lines.push(summary_line(&summary));
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn animate(grid: &Grid, cfg: &DemoConfig) -> anyhow::Result<()> {
    let summary: RunSummary = {
        let _guard = TerminalGuard::enter().context("entering raw mode")?;
        let cancel = CancelToken::new();
        let mut sink =
            TerminalSink::new(io::stdout(), grid, cfg.sink.clone()).with_cancel(cancel.clone());
        sink.draw_grid().context("drawing grid")?;
        let summary = Engine::new().run(grid, cfg.strategy, &cancel, &mut sink)?;
        if let Some(e) = sink.take_error() {
            return Err(e).context("drawing search");
        }
        if !cancel.is_cancelled() {
            wait_for_key()?;
        }
        summary
    };
    println!("{}", summary_line(&summary));
    Ok(())
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
