use crate::{
	config::{Config, SearchMetric},
	input::Input,
};
use anyhow::{Context, Result};
use multilabel_metrics::{
	best_threshold, hamming_accuracy, sigmoid, threshold_sweep, zero_one_accuracy, Decisions,
	ThresholdScore,
};
use ndarray::prelude::*;
use std::{io::Write, path::Path};

#[derive(Debug, serde::Serialize)]
pub struct Report {
	pub n_examples: usize,
	pub n_labels: usize,
	pub threshold: f32,
	pub sigmoid: bool,
	pub hamming_accuracy: f32,
	pub zero_one_accuracy: f32,
	pub search: SearchReport,
	pub examples: Vec<ExampleReport>,
}

/// The result of searching for the threshold that maximizes `metric`. When the sigmoid is enabled, the search runs on the predictions after the sigmoid is applied, so the thresholds are probabilities.
#[derive(Debug, serde::Serialize)]
pub struct SearchReport {
	pub metric: SearchMetric,
	pub threshold: f32,
	pub hamming_accuracy: f32,
	pub zero_one_accuracy: f32,
	pub thresholds: Vec<ThresholdScore>,
}

/// The labels predicted present for a single example at the searched threshold.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct ExampleReport {
	pub labels: Vec<String>,
}

pub fn evaluate(config: &Config, input: &Input) -> Result<Report> {
	let predictions = input.predictions.view();
	let labels = input.labels.view();
	let threshold = config.threshold();
	let sigmoid_enabled = config.sigmoid();
	let hamming = hamming_accuracy(predictions, labels, threshold, sigmoid_enabled)?;
	let zero_one = zero_one_accuracy(predictions, labels, threshold, sigmoid_enabled)?;

	// The search never applies the sigmoid itself, so match the predictions to the threshold domain here.
	let search_predictions = if sigmoid_enabled {
		predictions.mapv(sigmoid)
	} else {
		predictions.to_owned()
	};
	let search_predictions = search_predictions.view();
	let metric = config.search_metric();
	let thresholds = config.search_thresholds()?;
	let (sweep, best_threshold) = match metric {
		SearchMetric::Hamming => {
			run_search(hamming_accuracy, search_predictions, labels, &thresholds)?
		}
		SearchMetric::ZeroOne => {
			run_search(zero_one_accuracy, search_predictions, labels, &thresholds)?
		}
	};
	log::debug!("searched {} thresholds", sweep.len());

	let decisions = Decisions::new(search_predictions, labels, best_threshold, false)?;
	let examples = decisions
		.predicted_label_indexes()
		.into_iter()
		.map(|indexes| ExampleReport {
			labels: indexes
				.into_iter()
				.map(|index| label_name(input.label_names.as_deref(), index))
				.collect(),
		})
		.collect();
	let search = SearchReport {
		metric,
		threshold: best_threshold,
		hamming_accuracy: hamming_accuracy(search_predictions, labels, best_threshold, false)?,
		zero_one_accuracy: zero_one_accuracy(search_predictions, labels, best_threshold, false)?,
		thresholds: sweep,
	};
	Ok(Report {
		n_examples: decisions.n_examples(),
		n_labels: decisions.n_labels(),
		threshold,
		sigmoid: sigmoid_enabled,
		hamming_accuracy: hamming,
		zero_one_accuracy: zero_one,
		search,
		examples,
	})
}

fn run_search<F>(
	metric: F,
	predictions: ArrayView2<f32>,
	labels: ArrayView2<u8>,
	thresholds: &[f32],
) -> Result<(Vec<ThresholdScore>, f32)>
where
	F: Fn(ArrayView2<f32>, ArrayView2<u8>, f32, bool) -> multilabel_metrics::Result<f32>,
{
	let sweep = threshold_sweep(metric, predictions, labels, thresholds)?;
	let best = best_threshold(&sweep).context("no thresholds were searched")?;
	Ok((sweep, best.threshold))
}

/// Write `report` as pretty printed json to the file at `output_path`, or to `stdout` if there is none.
pub fn write_report(
	report: &Report,
	output_path: Option<&Path>,
	mut stdout: impl Write,
) -> Result<()> {
	let report = serde_json::to_string_pretty(report)?;
	match output_path {
		Some(output_path) => {
			std::fs::write(output_path, report)
				.with_context(|| format!("failed to write report to {}", output_path.display()))?;
			log::info!("your report was written to {}", output_path.display());
		}
		None => writeln!(stdout, "{}", report)?,
	}
	Ok(())
}

fn label_name(label_names: Option<&[String]>, index: usize) -> String {
	label_names
		.and_then(|label_names| label_names.get(index))
		.cloned()
		.unwrap_or_else(|| index.to_string())
}

#[cfg(test)]
fn test_input(label_names: Option<Vec<String>>) -> Input {
	Input {
		predictions: arr2(&[
			[0.9, 0.1, 0.2],
			[0.3, 0.7, 0.1],
			[0.8, 0.4, 0.0],
			[0.1, 0.2, 0.6],
		]),
		labels: arr2(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 1]]),
		label_names,
	}
}

#[test]
fn test_evaluate() {
	let config: Config =
		serde_yaml::from_str("search:\n  thresholds: [0.05, 0.35, 0.5, 0.95]\n").unwrap();
	let label_names = ["cat", "dog", "bird"].iter().map(|name| name.to_string()).collect();
	let report = evaluate(&config, &test_input(Some(label_names))).unwrap();
	assert_eq!(report.n_examples, 4);
	assert_eq!(report.n_labels, 3);
	assert!((report.hamming_accuracy - 11.0 / 12.0).abs() < 1e-6);
	assert_eq!(report.zero_one_accuracy, 0.75);
	insta::assert_debug_snapshot!(report.search, @r###"
 SearchReport {
     metric: ZeroOne,
     threshold: 0.35,
     hamming_accuracy: 1.0,
     zero_one_accuracy: 1.0,
     thresholds: [
         ThresholdScore {
             threshold: 0.05,
             score: 0.25,
         },
         ThresholdScore {
             threshold: 0.35,
             score: 1.0,
         },
         ThresholdScore {
             threshold: 0.5,
             score: 0.75,
         },
         ThresholdScore {
             threshold: 0.95,
             score: 0.0,
         },
     ],
 }
 "###);
	let labels: Vec<Vec<&str>> = report
		.examples
		.iter()
		.map(|example| example.labels.iter().map(|label| label.as_str()).collect())
		.collect();
	assert_eq!(
		labels,
		vec![vec!["cat"], vec!["dog"], vec!["cat", "dog"], vec!["bird"]]
	);
}

#[test]
fn test_evaluate_sigmoid() {
	let config: Config = serde_yaml::from_str(
		"sigmoid: true\nsearch:\n  metric: hamming\n  thresholds: [0.5, 0.6]\n",
	)
	.unwrap();
	let input = Input {
		predictions: arr2(&[[0.0, 2.0], [-2.0, 0.2]]),
		labels: arr2(&[[0, 1], [0, 1]]),
		label_names: None,
	};
	let report = evaluate(&config, &input).unwrap();
	assert_eq!(report.hamming_accuracy, 1.0);
	assert_eq!(report.search.threshold, 0.5);
	assert_eq!(report.search.thresholds[1].score, 0.75);
	assert_eq!(
		report.examples,
		vec![
			ExampleReport {
				labels: vec!["1".to_owned()],
			},
			ExampleReport {
				labels: vec!["1".to_owned()],
			},
		]
	);
}

#[test]
fn test_run_search_scores_each_threshold_once() {
	let n_calls = std::cell::Cell::new(0);
	let metric =
		|predictions: ArrayView2<f32>, labels: ArrayView2<u8>, threshold: f32, sigmoid: bool| {
			n_calls.set(n_calls.get() + 1);
			zero_one_accuracy(predictions, labels, threshold, sigmoid)
		};
	let input = test_input(None);
	let (sweep, threshold) = run_search(
		metric,
		input.predictions.view(),
		input.labels.view(),
		&[0.05, 0.35],
	)
	.unwrap();
	assert_eq!(n_calls.get(), 2);
	assert_eq!(sweep.len(), 2);
	assert_eq!(threshold, 0.35);
}

#[test]
fn test_write_report() {
	let config: Config = serde_yaml::from_str("search:\n  thresholds: [0.35]\n").unwrap();
	let report = evaluate(&config, &test_input(None)).unwrap();
	let expected = serde_json::to_string_pretty(&report).unwrap();

	let mut stdout = Vec::new();
	write_report(&report, None, &mut stdout).unwrap();
	assert_eq!(String::from_utf8(stdout).unwrap(), format!("{}\n", expected));

	let output_path =
		std::env::temp_dir().join(format!("multilabel_report_{}.json", std::process::id()));
	let mut stdout = Vec::new();
	write_report(&report, Some(&output_path), &mut stdout).unwrap();
	assert!(stdout.is_empty());
	let written = std::fs::read_to_string(&output_path).unwrap();
	std::fs::remove_file(&output_path).unwrap();
	assert_eq!(written, expected);
	let report_json: serde_json::Value = serde_json::from_str(&written).unwrap();
	assert_eq!(report_json["search"]["threshold"], 0.35);
	assert_eq!(report_json["search"]["metric"], "zero_one");

	let missing_dir = std::env::temp_dir()
		.join(format!("multilabel_missing_{}", std::process::id()))
		.join("report.json");
	let error = write_report(&report, Some(&missing_dir), Vec::new()).unwrap_err();
	assert!(error.to_string().starts_with("failed to write report to "));
}

#[test]
fn test_evaluate_shape_mismatch() {
	let input = Input {
		predictions: arr2(&[[0.1, 0.9]]),
		labels: arr2(&[[0, 1, 0]]),
		label_names: None,
	};
	let error = evaluate(&Config::default(), &input).unwrap_err();
	assert_eq!(
		error.to_string(),
		"predictions have shape (1, 2) but labels have shape (1, 3)"
	);
}
