//! This module contains the main entrypoint to the multilabel cli.

use self::{
	config::{load_config, SearchMetric},
	input::load_input,
	report::{evaluate, write_report},
};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod input;
mod report;

#[derive(Parser)]
#[clap(
	about = "Score a multi-label classifier's predictions and search for the best decision threshold.",
	disable_help_subcommand = true,
)]
enum Options {
	#[clap(name = "evaluate")]
	Evaluate(EvaluateOptions),
}

/// evaluate predictions against labels
#[derive(Parser, Debug)]
#[clap(
	long_about = "compute hamming and zero-one accuracy for the predictions and labels in a .json file"
)]
struct EvaluateOptions {
	/// the path to a .json file with `predictions` and `labels`
	#[clap(short, long)]
	file: PathBuf,
	/// the path to a .yaml config file
	#[clap(short, long)]
	config: Option<PathBuf>,
	/// the path to write the .json report to, defaults to stdout
	#[clap(short, long)]
	output: Option<PathBuf>,
}

fn main() {
	let env_filter = format!("{}=info", env!("CARGO_CRATE_NAME"));
	let env = env_logger::Env::default().default_filter_or(env_filter);
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let options = Options::parse();
	let result = match options {
		Options::Evaluate(options) => cli_evaluate(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_evaluate(options: EvaluateOptions) -> Result<()> {
	let config = load_config(options.config.as_deref())?;
	let input = load_input(&options.file)?;
	log::info!(
		"loaded {} examples with {} labels from {}",
		input.predictions.nrows(),
		input.predictions.ncols(),
		options.file.display(),
	);
	let report = evaluate(&config, &input)?;
	let search_metric = match report.search.metric {
		SearchMetric::Hamming => "hamming accuracy",
		SearchMetric::ZeroOne => "zero-one accuracy",
	};
	log::info!(
		"the best threshold for {} is {}",
		search_metric,
		report.search.threshold
	);
	write_report(&report, options.output.as_deref(), std::io::stdout())
}
