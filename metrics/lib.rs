/*!
This crate computes accuracy metrics for multi-label classifiers, where each example may have any number of labels present at once. It provides [`hamming_accuracy`](fn.hamming_accuracy.html) and [`zero_one_accuracy`](fn.zero_one_accuracy.html), their streaming counterparts [`HammingAccuracy`](struct.HammingAccuracy.html) and [`ZeroOneAccuracy`](struct.ZeroOneAccuracy.html), and [`optimal_threshold`](fn.optimal_threshold.html), which searches a grid of decision thresholds for the one that maximizes a metric.

# Example

```
use ndarray::prelude::*;
use multilabel_metrics::{hamming_accuracy, optimal_threshold, zero_one_accuracy, ThresholdGrid};

let predictions = arr2(&[[0.9, 0.2, 0.1], [0.3, 0.8, 0.4]]);
let labels = arr2(&[[1u8, 0, 0], [0, 1, 1]]);
let hamming = hamming_accuracy(predictions.view(), labels.view(), 0.5, false).unwrap();
assert!((hamming - 5.0 / 6.0).abs() < 1e-6);
let thresholds = ThresholdGrid::default().thresholds();
let threshold =
	optimal_threshold(zero_one_accuracy, predictions.view(), labels.view(), &thresholds).unwrap();
assert_eq!(zero_one_accuracy(predictions.view(), labels.view(), threshold, false).unwrap(), 1.0);
```
*/

#![allow(clippy::tabs_in_doc_comments)]

mod decisions;
mod error;
mod finite;
mod hamming_accuracy;
mod threshold;
mod zero_one_accuracy;

pub use self::decisions::{sigmoid, Decisions};
pub use self::error::{Error, Result};
pub use self::finite::check_finite;
pub use self::hamming_accuracy::{hamming_accuracy, HammingAccuracy};
pub use self::threshold::{
	best_threshold, optimal_threshold, threshold_sweep, ThresholdGrid, ThresholdScore,
	DEFAULT_N_THRESHOLDS,
};
pub use self::zero_one_accuracy::{zero_one_accuracy, ZeroOneAccuracy};

/// This is the threshold used to binarize predictions when none is specified.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/**
The `StreamingMetric` trait defines a common interface to metrics that can be computed in a streaming manner, where the input is available in chunks, such as the batches produced while evaluating a model.

After being initialized, a value of type `T` implementing the `StreamingMetric` trait can have `update()` called on it with values of the associated type `Input`. Multiple values of `T` can be merged together by calling `merge()`. When finished aggregating, you can call `finalize()` on the metric to produce the associated type `Output`.

# Examples

```
use ndarray::prelude::*;
use multilabel_metrics::{Decisions, HammingAccuracy, StreamingMetric};

let mut metric = HammingAccuracy::new();
for (predictions, labels) in &[
	(arr2(&[[0.9, 0.1]]), arr2(&[[1u8, 0]])),
	(arr2(&[[0.2, 0.7]]), arr2(&[[1u8, 1]])),
] {
	let decisions = Decisions::new(predictions.view(), labels.view(), 0.5, false).unwrap();
	metric.update(&decisions);
}
assert_eq!(metric.finalize(), Some(0.75));
```

The generic lifetime `'a` exists here to allow `Input`s to borrow from their enclosing scope.
*/
pub trait StreamingMetric<'a> {
	/// `Input` is the type to aggregate in calls to `update()`.
	type Input;
	/// `Output` is the return type of `finalize()`.
	type Output;
	/// Update this streaming metric with the `Input` `input`.
	fn update(&mut self, input: Self::Input);
	/// Merge multiple independently computed streaming metrics.
	fn merge(&mut self, other: Self);
	/// When you are done aggregating `Input`s, call `finalize()` to produce an `Output`.
	fn finalize(self) -> Self::Output;
}
