use crate::{
	decisions::Decisions,
	error::{Error, Result},
	StreamingMetric,
};
use ndarray::prelude::*;
use num_traits::ToPrimitive;

/// The zero-one accuracy, also called the exact match ratio, is the proportion of examples whose label decisions all agree with the ground truth. An example with no labels present and none predicted is a match.
#[derive(Clone, Debug, Default)]
pub struct ZeroOneAccuracy {
	n_matches: u64,
	n_examples: u64,
}

impl ZeroOneAccuracy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for ZeroOneAccuracy {
	type Input = &'a Decisions;
	type Output = Option<f32>;

	fn update(&mut self, decisions: Self::Input) {
		self.n_matches += decisions.n_exact_matches().to_u64().unwrap();
		self.n_examples += decisions.n_examples().to_u64().unwrap();
	}

	fn merge(&mut self, other: Self) {
		self.n_matches += other.n_matches;
		self.n_examples += other.n_examples;
	}

	fn finalize(self) -> Option<f32> {
		if self.n_examples == 0 {
			return None;
		}
		Some(self.n_matches.to_f32().unwrap() / self.n_examples.to_f32().unwrap())
	}
}

/**
Compute the zero-one accuracy of `predictions` against `labels`, binarizing each prediction at `threshold` after applying the sigmoid if `sigmoid` is true. Both arrays have the shape (n_examples, n_labels).

This returns an error if the inputs are invalid (see [`Decisions::new`](struct.Decisions.html#method.new)) or contain no examples.
*/
pub fn zero_one_accuracy(
	predictions: ArrayView2<f32>,
	labels: ArrayView2<u8>,
	threshold: f32,
	sigmoid: bool,
) -> Result<f32> {
	let decisions = Decisions::new(predictions, labels, threshold, sigmoid)?;
	let mut metric = ZeroOneAccuracy::new();
	metric.update(&decisions);
	metric.finalize().ok_or(Error::Empty)
}

#[test]
fn test_one_missed_label() {
	let labels = arr2(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 1]]);
	let predictions = arr2(&[
		[0.9, 0.1, 0.2],
		[0.3, 0.7, 0.1],
		[0.8, 0.4, 0.0],
		[0.1, 0.2, 0.6],
	]);
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(0.75)
	);
}

#[test]
fn test_empty_rows_match() {
	let labels = arr2(&[[0, 0, 0], [0, 1, 0]]);
	let predictions = arr2(&[[0.1, 0.2, 0.3], [0.2, 0.4, 0.1]]);
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(0.5)
	);
}

#[test]
fn test_exact_match_implies_perfect_hamming() {
	let labels = arr2(&[[1, 0, 1, 0], [0, 0, 0, 0], [1, 1, 1, 1]]);
	let predictions = arr2(&[
		[2.0, -1.0, 0.5, -3.0],
		[-0.5, -2.0, -1.0, -4.0],
		[1.0, 3.0, 0.1, 2.5],
	]);
	for &threshold in &[0.0, 0.05] {
		let zero_one = zero_one_accuracy(predictions.view(), labels.view(), threshold, false);
		let hamming =
			crate::hamming_accuracy(predictions.view(), labels.view(), threshold, false);
		assert_eq!(zero_one, Ok(1.0));
		assert_eq!(hamming, Ok(1.0));
	}
}

#[test]
fn test_sigmoid_midpoint() {
	let labels = arr2(&[[0, 1], [1, 1]]);
	let predictions = arr2(&[[0.0, 1.0], [0.0, 1.0]]);
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, true),
		Ok(0.5)
	);
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(0.5)
	);
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.4, true),
		Ok(0.5)
	);
}

#[test]
fn test_no_labels() {
	let predictions = Array2::<f32>::zeros((3, 0));
	let labels = Array2::<u8>::zeros((3, 0));
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(1.0)
	);
	let predictions = Array2::<f32>::zeros((0, 2));
	let labels = Array2::<u8>::zeros((0, 2));
	assert_eq!(
		zero_one_accuracy(predictions.view(), labels.view(), 0.5, false),
		Err(Error::Empty)
	);
}

#[test]
fn test_streaming() {
	let labels = arr2(&[[1, 0], [0, 1], [1, 1]]);
	let predictions = arr2(&[[0.9, 0.1], [0.6, 0.7], [0.8, 0.9]]);
	let mut metric = ZeroOneAccuracy::new();
	for (predictions, labels) in predictions
		.axis_chunks_iter(Axis(0), 2)
		.zip(labels.axis_chunks_iter(Axis(0), 2))
	{
		let decisions = Decisions::new(predictions, labels, 0.5, false).unwrap();
		metric.update(&decisions);
	}
	assert_eq!(metric.finalize(), Some(2.0 / 3.0));
}
