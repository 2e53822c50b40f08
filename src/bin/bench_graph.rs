//! bench-graph: plot `bench-results.csv` as a 3D surface.
//!
//! Reads the benchmark table from the working directory and opens the chart
//! in the default browser. Built with `--features terminal`, it shows the
//! chart in the terminal instead, where it can be rotated and zoomed.
//!
//! Run: `bench-graph` (set `BENCH_SURFACE_DEBUG=1` for timing logs)

use anyhow::{Context, Result};
use bench_surface::chart::{BenchChart, DEFAULT_INPUT};
use bench_surface::debug;
use clap::Parser;

#[cfg(not(feature = "terminal"))]
type ChartViewer = bench_surface::viewer::BrowserViewer;

#[cfg(feature = "terminal")]
type ChartViewer = bench_surface::viewer::TerminalViewer;

/// Plot bench-results.csv as an interactive 3D surface
#[derive(Parser, Debug)]
#[command(name = "bench-graph")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Plot sprite tweening benchmark results as a 3D surface", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    debug::enable_from_env();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    let chart =
        BenchChart::from_csv(DEFAULT_INPUT).with_context(|| format!("cannot load {DEFAULT_INPUT}"))?;
    chart.show(&ChartViewer::new()).context("cannot display chart")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_takes_no_arguments() {
        assert!(Cli::try_parse_from(["bench-graph"]).is_ok());
        assert!(Cli::try_parse_from(["bench-graph", "other.csv"]).is_err());
        assert!(Cli::try_parse_from(["bench-graph", "--refresh", "5"]).is_err());
    }

    #[test]
    fn test_viewer_follows_terminal_feature() {
        let name = std::any::type_name::<ChartViewer>();
        if cfg!(feature = "terminal") {
            assert!(name.ends_with("TerminalViewer"), "{name}");
        } else {
            assert!(name.ends_with("BrowserViewer"), "{name}");
        }
    }
}
