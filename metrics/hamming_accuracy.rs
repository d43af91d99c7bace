use crate::{
	decisions::Decisions,
	error::{Error, Result},
	StreamingMetric,
};
use ndarray::prelude::*;
use num_traits::ToPrimitive;

/// The hamming accuracy is the proportion of individual label decisions that agree with the ground truth, taken across every label of every example.
#[derive(Clone, Debug, Default)]
pub struct HammingAccuracy {
	n_correct: u64,
	n_total: u64,
}

impl HammingAccuracy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for HammingAccuracy {
	type Input = &'a Decisions;
	type Output = Option<f32>;

	fn update(&mut self, decisions: Self::Input) {
		self.n_correct += decisions.n_correct_labels().to_u64().unwrap();
		self.n_total += (decisions.n_examples() * decisions.n_labels())
			.to_u64()
			.unwrap();
	}

	fn merge(&mut self, other: Self) {
		self.n_correct += other.n_correct;
		self.n_total += other.n_total;
	}

	fn finalize(self) -> Option<f32> {
		if self.n_total == 0 {
			return None;
		}
		Some(self.n_correct.to_f32().unwrap() / self.n_total.to_f32().unwrap())
	}
}

/**
Compute the hamming accuracy of `predictions` against `labels`, binarizing each prediction at `threshold` after applying the sigmoid if `sigmoid` is true. Both arrays have the shape (n_examples, n_labels).

This returns an error if the inputs are invalid (see [`Decisions::new`](struct.Decisions.html#method.new)) or contain no label decisions at all.
*/
pub fn hamming_accuracy(
	predictions: ArrayView2<f32>,
	labels: ArrayView2<u8>,
	threshold: f32,
	sigmoid: bool,
) -> Result<f32> {
	let decisions = Decisions::new(predictions, labels, threshold, sigmoid)?;
	let mut metric = HammingAccuracy::new();
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
	let accuracy = hamming_accuracy(predictions.view(), labels.view(), 0.5, false).unwrap();
	assert!((accuracy - 11.0 / 12.0).abs() < 1e-6);
}

#[test]
fn test_perfect_and_inverted() {
	let labels = arr2(&[[1, 0], [0, 1], [0, 0]]);
	let predictions = arr2(&[[0.9, 0.1], [0.2, 0.8], [0.3, 0.4]]);
	assert_eq!(
		hamming_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(1.0)
	);
	let predictions = predictions.mapv(|prediction| 1.0 - prediction);
	assert_eq!(
		hamming_accuracy(predictions.view(), labels.view(), 0.5, false),
		Ok(0.0)
	);
}

#[test]
fn test_empty() {
	let predictions = Array2::<f32>::zeros((0, 3));
	let labels = Array2::<u8>::zeros((0, 3));
	assert_eq!(
		hamming_accuracy(predictions.view(), labels.view(), 0.5, false),
		Err(Error::Empty)
	);
}

#[test]
fn test_streaming() {
	use ndarray::s;
	let labels = arr2(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 1]]);
	let predictions = arr2(&[
		[0.9, 0.1, 0.2],
		[0.3, 0.7, 0.1],
		[0.8, 0.4, 0.0],
		[0.1, 0.2, 0.6],
	]);
	let mut left = HammingAccuracy::new();
	let decisions = Decisions::new(
		predictions.slice(s![..2, ..]),
		labels.slice(s![..2, ..]),
		0.5,
		false,
	)
	.unwrap();
	left.update(&decisions);
	let mut right = HammingAccuracy::new();
	let decisions = Decisions::new(
		predictions.slice(s![2.., ..]),
		labels.slice(s![2.., ..]),
		0.5,
		false,
	)
	.unwrap();
	right.update(&decisions);
	left.merge(right);
	let accuracy = left.finalize().unwrap();
	let expected = hamming_accuracy(predictions.view(), labels.view(), 0.5, false).unwrap();
	assert_eq!(accuracy, expected);
	assert_eq!(HammingAccuracy::new().finalize(), None);
}
