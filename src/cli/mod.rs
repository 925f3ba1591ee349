//! Command-line parsing for the model selection tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search/selection code; `app` turns these structs into a `SelectConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::Scoring;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "msel",
    version,
    about = "Grid-search classifier families with cross-validation and pick the best on a dev set"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Without it, `MSEL_LOG` applies.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select the best classifier for a labelled CSV.
    Select(SelectArgs),
    /// Run the selection on a seeded synthetic two-class dataset.
    Demo(DemoArgs),
    /// Print the default candidate families and their grids.
    Candidates(CandidatesArgs),
    /// Plot a previously exported precision-recall curve JSON.
    Plot(PlotArgs),
}

/// Options shared by `select` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Number of cross-validation folds per grid search.
    #[arg(long, default_value_t = 10)]
    pub folds: usize,

    /// Score used to rank grid points during cross-validation.
    #[arg(long, value_enum, default_value_t = Scoring::F1)]
    pub scoring: Scoring,

    /// Label treated as positive by the `f1` scorer and the precision-recall curve.
    #[arg(long, default_value_t = 1)]
    pub positive: u32,

    /// JSON file replacing the default candidate families.
    #[arg(long, value_name = "JSON")]
    pub families: Option<PathBuf>,

    /// Keep file order when assigning cross-validation folds.
    #[arg(long)]
    pub no_shuffle: bool,

    /// Seed for fold shuffling, the dev split and randomized estimators.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the mean CV score of every grid point.
    #[arg(long)]
    pub grid_scores: bool,

    /// Render the best classifier's precision-recall curve in the terminal.
    #[arg(long)]
    pub plot_pr: bool,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Terminal plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Draw the precision-recall curve to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub pr_svg: Option<PathBuf>,

    /// Export the selection report (per-family scores and best params) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export the precision-recall curve to JSON (re-plot with `msel plot`).
    #[arg(long = "export-pr", value_name = "JSON")]
    pub export_pr: Option<PathBuf>,
}

/// Options for `msel select`.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    /// Training CSV (header row required).
    #[arg(long, value_name = "CSV")]
    pub train: PathBuf,

    /// Dev CSV with the same columns. Without it, part of `--train` is held out.
    #[arg(long, value_name = "CSV")]
    pub dev: Option<PathBuf>,

    /// Fraction of `--train` held out as the dev set when `--dev` is absent.
    #[arg(long, default_value_t = 0.2, conflicts_with = "dev")]
    pub dev_fraction: f64,

    /// Name of the label column.
    #[arg(long, default_value = "label")]
    pub label: String,

    /// Comma-separated feature columns (default: every column except the label).
    #[arg(long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    #[command(flatten)]
    pub search: SearchArgs,
}

/// Options for `msel demo`.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Number of synthetic samples.
    #[arg(short = 'n', long, default_value_t = 400)]
    pub samples: usize,

    /// Number of synthetic features.
    #[arg(long = "n-features", default_value_t = 4)]
    pub n_features: usize,

    /// Fraction of samples in the positive class.
    #[arg(long, default_value_t = 0.35)]
    pub positive_rate: f64,

    /// Distance between the class means along each feature.
    #[arg(long, default_value_t = 1.5)]
    pub separation: f64,

    /// Fraction of samples held out as the dev set.
    #[arg(long, default_value_t = 0.25)]
    pub dev_fraction: f64,

    #[command(flatten)]
    pub search: SearchArgs,
}

/// Options for `msel candidates`.
#[derive(Debug, Args, Clone)]
pub struct CandidatesArgs {
    /// Also write the defaults to a families JSON file (a template for `--families`).
    #[arg(long, value_name = "JSON")]
    pub write: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `--export-pr`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Also draw the curve to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Plot width (terminal columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (terminal rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_defaults() {
        let cli = Cli::parse_from(["msel", "select", "--train", "train.csv"]);
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        assert_eq!(args.label, "label");
        assert_eq!(args.search.folds, 10);
        assert_eq!(args.search.scoring, Scoring::F1);
        assert_eq!(args.search.positive, 1);
        assert!(args.dev.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_verbosity_and_feature_list() {
        let cli = Cli::parse_from([
            "msel",
            "select",
            "-vv",
            "--train",
            "t.csv",
            "--features",
            "a,b",
            "--scoring",
            "f1-weighted",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        assert_eq!(args.features, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(args.search.scoring, Scoring::F1Weighted);
    }

    #[test]
    fn dev_file_and_fraction_conflict() {
        let parsed = Cli::try_parse_from([
            "msel",
            "select",
            "--train",
            "t.csv",
            "--dev",
            "d.csv",
            "--dev-fraction",
            "0.3",
        ]);
        assert!(parsed.is_err());
    }
}
