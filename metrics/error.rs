use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The errors that can occur when computing a multi-label metric.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
	#[error("predictions have shape {predictions:?} but labels have shape {labels:?}")]
	ShapeMismatch {
		predictions: (usize, usize),
		labels: (usize, usize),
	},
	#[error("at least one candidate threshold is required")]
	NoThresholds,
	#[error("the prediction for example {row}, label {column} is not finite")]
	NotFinite { row: usize, column: usize },
	#[error("the threshold {0} is not finite")]
	NonFiniteThreshold(f32),
	#[error("the metric is undefined for an empty batch")]
	Empty,
}
