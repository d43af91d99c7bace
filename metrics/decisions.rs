use crate::{
	error::{Error, Result},
	finite::check_finite,
};
use itertools::Itertools;
use ndarray::prelude::*;

/// The logistic sigmoid, which maps a logit to a probability in (0, 1).
pub fn sigmoid(value: f32) -> f32 {
	1.0 / (1.0 + (-value).exp())
}

/**
`Decisions` holds the binary label decisions for a batch of examples alongside the ground truth they are scored against. Both arrays have the shape (n_examples, n_labels).

A prediction is a positive decision if and only if it is strictly greater than the threshold, so a probability exactly equal to the threshold is a negative decision. A label is present if it is nonzero.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct Decisions {
	predicted: Array2<bool>,
	actual: Array2<bool>,
}

impl Decisions {
	/**
	Binarize `predictions` at `threshold`, first mapping each prediction through the [`sigmoid`](fn.sigmoid.html) if `sigmoid` is true.

	This returns an error if the shapes of `predictions` and `labels` differ, if any prediction is not finite, or if the threshold is not finite.
	*/
	pub fn new(
		predictions: ArrayView2<f32>,
		labels: ArrayView2<u8>,
		threshold: f32,
		sigmoid: bool,
	) -> Result<Self> {
		if predictions.dim() != labels.dim() {
			return Err(Error::ShapeMismatch {
				predictions: predictions.dim(),
				labels: labels.dim(),
			});
		}
		if !threshold.is_finite() {
			return Err(Error::NonFiniteThreshold(threshold));
		}
		check_finite(predictions)?;
		let predicted = if sigmoid {
			predictions.mapv(|prediction| self::sigmoid(prediction) > threshold)
		} else {
			predictions.mapv(|prediction| prediction > threshold)
		};
		let actual = labels.mapv(|label| label != 0);
		Ok(Self { predicted, actual })
	}

	pub fn n_examples(&self) -> usize {
		self.actual.nrows()
	}

	pub fn n_labels(&self) -> usize {
		self.actual.ncols()
	}

	/// The positive decisions, with shape (n_examples, n_labels).
	pub fn predicted(&self) -> ArrayView2<bool> {
		self.predicted.view()
	}

	/// The labels that are present, with shape (n_examples, n_labels).
	pub fn actual(&self) -> ArrayView2<bool> {
		self.actual.view()
	}

	/// Count the individual label decisions that agree with the ground truth.
	pub fn n_correct_labels(&self) -> usize {
		self.predicted
			.iter()
			.zip(self.actual.iter())
			.filter(|(predicted, actual)| predicted == actual)
			.count()
	}

	/// Count the examples whose decisions agree with the ground truth for every label.
	pub fn n_exact_matches(&self) -> usize {
		self.predicted
			.outer_iter()
			.zip(self.actual.outer_iter())
			.filter(|(predicted, actual)| predicted == actual)
			.count()
	}

	/// The indexes of the labels predicted present for each example.
	pub fn predicted_label_indexes(&self) -> Vec<Vec<usize>> {
		self.predicted
			.outer_iter()
			.map(|row| row.iter().positions(|present| *present).collect())
			.collect()
	}
}

#[test]
fn test_strict_threshold() {
	let predictions = arr2(&[[0.5, 0.50001, 0.49999]]);
	let labels = arr2(&[[0, 1, 0]]);
	let decisions = Decisions::new(predictions.view(), labels.view(), 0.5, false).unwrap();
	assert_eq!(decisions.predicted(), arr2(&[[false, true, false]]));
}

#[test]
fn test_sigmoid_midpoint() {
	assert_eq!(sigmoid(0.0), 0.5);
	let predictions = arr2(&[[0.0, 4.0, -4.0]]);
	let labels = arr2(&[[0, 1, 0]]);
	let decisions = Decisions::new(predictions.view(), labels.view(), 0.5, true).unwrap();
	assert_eq!(decisions.predicted(), arr2(&[[false, true, false]]));
	assert_eq!(decisions.n_correct_labels(), 3);
}

#[test]
fn test_nonzero_labels_are_present() {
	let predictions = arr2(&[[0.9, 0.9, 0.1]]);
	let labels = arr2(&[[1, 7, 0]]);
	let decisions = Decisions::new(predictions.view(), labels.view(), 0.5, false).unwrap();
	assert_eq!(decisions.actual(), arr2(&[[true, true, false]]));
	assert_eq!(decisions.n_exact_matches(), 1);
	assert_eq!(decisions.predicted_label_indexes(), vec![vec![0, 1]]);
}

#[test]
fn test_invalid_input() {
	let predictions = arr2(&[[0.1, 0.2], [0.3, 0.4]]);
	let labels = arr2(&[[0, 1, 0], [1, 0, 0]]);
	assert_eq!(
		Decisions::new(predictions.view(), labels.view(), 0.5, false),
		Err(Error::ShapeMismatch {
			predictions: (2, 2),
			labels: (2, 3),
		}),
	);
	let labels = arr2(&[[0, 1], [1, 0]]);
	assert_eq!(
		Decisions::new(predictions.view(), labels.view(), std::f32::NAN, false)
			.map(|_| ())
			.map_err(|error| error.to_string()),
		Err("the threshold NaN is not finite".to_owned()),
	);
	let predictions = arr2(&[[0.1, 0.2], [std::f32::INFINITY, 0.4]]);
	assert_eq!(
		Decisions::new(predictions.view(), labels.view(), 0.5, false),
		Err(Error::NotFinite { row: 1, column: 0 }),
	);
}
