//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the selection pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io::Write;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{CandidatesArgs, Cli, Command, DemoArgs, PlotArgs, SearchArgs, SelectArgs};
use crate::domain::{CvConfig, DataSource, SelectConfig, SyntheticConfig};
use crate::error::AppError;
use crate::fit::candidates::candidate_families;
use crate::io::curve::{read_curve_json, write_curve_json};
use crate::io::export::write_selection_json;
use crate::io::families::write_families_json;
use crate::plot::{PR_TITLE, render_pr_ascii, write_pr_svg};
use crate::report::format::{format_candidates, format_grid_scores, format_selection_summary};

pub mod pipeline;

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "MSEL_LOG";

const SVG_SIZE: (u32, u32) = (800, 600);

/// Entry point for the `msel` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; it only supplies defaults such as `MSEL_LOG`.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Select(args) => handle_select(config_from_select(&args)),
        Command::Demo(args) => handle_select(config_from_demo(&args)),
        Command::Candidates(args) => handle_candidates(&args),
        Command::Plot(args) => handle_plot(&args),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // `try_init` so repeated calls (tests, embedding) don't panic.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_select(config: SelectConfig) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let run = pipeline::run_selection(&config, &mut out)?;
    let best = run.selection.best();
    info!(family = %best.name, params = %best.best_params, "selected classifier");

    if config.show_grid_scores {
        for search in &run.selection.searches {
            writeln!(out, "\n{}", format_grid_scores(search)).map_err(AppError::output)?;
        }
    }
    writeln!(out, "\n{}", format_selection_summary(&run.selection)).map_err(AppError::output)?;

    if let Some(curve) = &run.pr_curve {
        if config.plot_pr {
            let plot = render_pr_ascii(curve, PR_TITLE, config.plot_width, config.plot_height);
            writeln!(out, "{plot}").map_err(AppError::output)?;
        }
        if let Some(path) = &config.pr_svg {
            write_pr_svg(path, curve, SVG_SIZE.0, SVG_SIZE.1)?;
            info!(path = %path.display(), "wrote precision-recall SVG");
        }
        if let Some(path) = &config.export_pr {
            write_curve_json(path, &best.name, config.cv.positive, curve)?;
            info!(path = %path.display(), "wrote precision-recall curve JSON");
        }
    }

    if let Some(path) = &config.export {
        write_selection_json(path, &run.selection, &config.cv)?;
        info!(path = %path.display(), "wrote selection JSON");
    }

    Ok(())
}

fn handle_candidates(args: &CandidatesArgs) -> Result<(), AppError> {
    let families = candidate_families();
    print!("{}", format_candidates(&families));
    if let Some(path) = &args.write {
        write_families_json(path, &families)?;
        info!(path = %path.display(), "wrote families JSON");
    }
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let file = read_curve_json(&args.curve)?;
    println!("Classifier: {} (positive label {})", file.classifier, file.positive_label);
    println!("{}", render_pr_ascii(&file.curve, PR_TITLE, args.width, args.height));

    if let Some(path) = &args.svg {
        write_pr_svg(path, &file.curve, SVG_SIZE.0, SVG_SIZE.1)?;
    }
    Ok(())
}

fn cv_config(args: &SearchArgs) -> CvConfig {
    CvConfig {
        folds: args.folds,
        shuffle: !args.no_shuffle,
        scoring: args.scoring,
        positive: args.positive,
        seed: args.seed,
    }
}

fn config_with_source(source: DataSource, args: &SearchArgs) -> SelectConfig {
    SelectConfig {
        source,
        families_path: args.families.clone(),
        cv: cv_config(args),
        seed: args.seed,
        show_grid_scores: args.grid_scores,
        plot_pr: args.plot_pr,
        plot_width: args.width,
        plot_height: args.height,
        pr_svg: args.pr_svg.clone(),
        export: args.export.clone(),
        export_pr: args.export_pr.clone(),
    }
}

pub fn config_from_select(args: &SelectArgs) -> SelectConfig {
    let source = DataSource::Csv {
        train: args.train.clone(),
        dev: args.dev.clone(),
        dev_fraction: args.dev_fraction,
        label_column: args.label.clone(),
        features: args.features.clone(),
    };
    config_with_source(source, &args.search)
}

pub fn config_from_demo(args: &DemoArgs) -> SelectConfig {
    let source = DataSource::Synthetic(SyntheticConfig {
        samples: args.samples,
        features: args.n_features,
        positive_rate: args.positive_rate,
        separation: args.separation,
        dev_fraction: args.dev_fraction,
    });
    config_with_source(source, &args.search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scoring;

    #[test]
    fn select_args_map_onto_config() {
        let cli = Cli::parse_from([
            "msel",
            "select",
            "--train",
            "t.csv",
            "--dev",
            "d.csv",
            "--no-shuffle",
            "--folds",
            "5",
            "--scoring",
            "accuracy",
            "--plot-pr",
        ]);
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        let config = config_from_select(&args);
        assert_eq!(config.cv.folds, 5);
        assert!(!config.cv.shuffle);
        assert_eq!(config.cv.scoring, Scoring::Accuracy);
        assert!(config.plot_pr);
        assert!(matches!(config.source, DataSource::Csv { dev: Some(_), .. }));
    }

    #[test]
    fn demo_args_build_a_synthetic_source() {
        let cli = Cli::parse_from(["msel", "demo", "-n", "120", "--seed", "9"]);
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        let config = config_from_demo(&args);
        assert_eq!(config.seed, 9);
        assert_eq!(config.cv.seed, 9);
        let DataSource::Synthetic(synthetic) = config.source else {
            panic!("expected synthetic source");
        };
        assert_eq!(synthetic.samples, 120);
    }
}
