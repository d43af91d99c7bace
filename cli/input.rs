use anyhow::{bail, Context, Result};
use ndarray::prelude::*;
use std::path::Path;

/// The contents of an input file: one row of predictions and one row of labels per example.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct InputFile {
	predictions: Vec<Vec<f32>>,
	labels: Vec<Vec<u8>>,
	label_names: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct Input {
	pub predictions: Array2<f32>,
	pub labels: Array2<u8>,
	pub label_names: Option<Vec<String>>,
}

pub fn load_input(path: &Path) -> Result<Input> {
	let input = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read input file {}", path.display()))?;
	parse_input(&input).with_context(|| format!("failed to parse input file {}", path.display()))
}

fn parse_input(input: &str) -> Result<Input> {
	let InputFile {
		predictions,
		labels,
		label_names,
	} = serde_json::from_str(input)?;
	let predictions = to_array2(predictions).context("invalid predictions")?;
	let labels = to_array2(labels).context("invalid labels")?;
	if let Some(label_names) = label_names.as_ref() {
		if label_names.len() != predictions.ncols() {
			bail!(
				"there are {} label names but {} labels per example",
				label_names.len(),
				predictions.ncols()
			);
		}
	}
	Ok(Input {
		predictions,
		labels,
		label_names,
	})
}

fn to_array2<T>(rows: Vec<Vec<T>>) -> Result<Array2<T>> {
	let n_rows = rows.len();
	let n_cols = rows.first().map(|row| row.len()).unwrap_or(0);
	if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n_cols) {
		bail!(
			"row {} has {} values but row 0 has {}",
			index,
			row.len(),
			n_cols
		);
	}
	let values = rows.into_iter().flatten().collect();
	Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

#[test]
fn test_parse_input() {
	let input = parse_input(
		r#"{
			"predictions": [[0.9, 0.1], [0.2, 0.7], [0.6, 0.8]],
			"labels": [[1, 0], [0, 1], [1, 1]],
			"label_names": ["cat", "dog"]
		}"#,
	)
	.unwrap();
	assert_eq!(input.predictions.dim(), (3, 2));
	assert_eq!(input.labels, arr2(&[[1, 0], [0, 1], [1, 1]]));
	assert_eq!(
		input.label_names,
		Some(vec!["cat".to_owned(), "dog".to_owned()])
	);
}

#[test]
fn test_ragged_rows() {
	let error = parse_input(r#"{ "predictions": [[0.9, 0.1], [0.2]], "labels": [[1, 0], [0, 1]] }"#)
		.unwrap_err();
	assert_eq!(
		format!("{:#}", error),
		"invalid predictions: row 1 has 1 values but row 0 has 2"
	);
}

#[test]
fn test_label_names_mismatch() {
	let error = parse_input(
		r#"{ "predictions": [[0.9, 0.1]], "labels": [[1, 0]], "label_names": ["cat"] }"#,
	)
	.unwrap_err();
	assert_eq!(
		error.to_string(),
		"there are 1 label names but 2 labels per example"
	);
}

#[test]
fn test_empty() {
	let input = parse_input(r#"{ "predictions": [], "labels": [] }"#).unwrap();
	assert_eq!(input.predictions.dim(), (0, 0));
}
