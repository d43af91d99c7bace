use crate::error::{Error, Result};
use ndarray::prelude::*;
use num_traits::ToPrimitive;

/// This is the number of thresholds in the default [`ThresholdGrid`](struct.ThresholdGrid.html).
pub const DEFAULT_N_THRESHOLDS: usize = 10;

/**
A `ThresholdGrid` describes `n_thresholds` candidate thresholds evenly spaced strictly inside the interval (0, 1). The `i`th threshold is `(i + 1) / (n_thresholds + 1)`.

```
use multilabel_metrics::ThresholdGrid;

let grid = ThresholdGrid { n_thresholds: 3 };
assert_eq!(grid.thresholds(), vec![0.25, 0.5, 0.75]);
```
*/
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdGrid {
	pub n_thresholds: usize,
}

impl Default for ThresholdGrid {
	fn default() -> Self {
		Self {
			n_thresholds: DEFAULT_N_THRESHOLDS,
		}
	}
}

impl ThresholdGrid {
	pub fn thresholds(&self) -> Vec<f32> {
		(0..self.n_thresholds).map(|i| self.threshold(i)).collect()
	}

	/// The `i`th threshold, for `i` in `0..n_thresholds`.
	fn threshold(&self, i: usize) -> f32 {
		let n_intervals = self.n_thresholds.to_f32().unwrap() + 1.0;
		(i.to_f32().unwrap() + 1.0) / n_intervals
	}
}

/// The score a metric produced at a single candidate threshold.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ThresholdScore {
	pub threshold: f32,
	pub score: f32,
}

/**
Evaluate `metric` at each of `thresholds`, in order, without applying the sigmoid. The thresholds are expected to already be in the same domain as the predictions.

The `metric` is any function with the signature of [`hamming_accuracy`](fn.hamming_accuracy.html) or [`zero_one_accuracy`](fn.zero_one_accuracy.html). The first error it returns is propagated.
*/
pub fn threshold_sweep<F>(
	metric: F,
	predictions: ArrayView2<f32>,
	labels: ArrayView2<u8>,
	thresholds: &[f32],
) -> Result<Vec<ThresholdScore>>
where
	F: Fn(ArrayView2<f32>, ArrayView2<u8>, f32, bool) -> Result<f32>,
{
	if thresholds.is_empty() {
		return Err(Error::NoThresholds);
	}
	thresholds
		.iter()
		.map(|&threshold| {
			let score = metric(predictions, labels, threshold, false)?;
			log::debug!("threshold {} scored {}", threshold, score);
			Ok(ThresholdScore { threshold, score })
		})
		.collect()
}

/**
Find the threshold among `thresholds` at which `metric` scores highest on `predictions` and `labels`.

The thresholds are scanned in order and a later threshold replaces the best so far only if its score is strictly greater, so ties go to the earliest threshold. A score of `NaN` never wins over a score that is not `NaN`. A single threshold is always returned as is, regardless of its score.

```
use ndarray::prelude::*;
use multilabel_metrics::{optimal_threshold, zero_one_accuracy};

let predictions = arr2(&[[0.3, 0.7], [0.6, 0.2]]);
let labels = arr2(&[[0u8, 1], [0, 0]]);
let threshold =
	optimal_threshold(zero_one_accuracy, predictions.view(), labels.view(), &[0.1, 0.5, 0.9])
		.unwrap();
assert_eq!(threshold, 0.5);
```
*/
pub fn optimal_threshold<F>(
	metric: F,
	predictions: ArrayView2<f32>,
	labels: ArrayView2<u8>,
	thresholds: &[f32],
) -> Result<f32>
where
	F: Fn(ArrayView2<f32>, ArrayView2<u8>, f32, bool) -> Result<f32>,
{
	let scores = threshold_sweep(metric, predictions, labels, thresholds)?;
	let best = best_threshold(&scores).ok_or(Error::NoThresholds)?;
	Ok(best.threshold)
}

/**
Select the best of the `scores` produced by [`threshold_sweep`](fn.threshold_sweep.html), using the same rules as [`optimal_threshold`](fn.optimal_threshold.html). This returns `None` if `scores` is empty.
*/
pub fn best_threshold(scores: &[ThresholdScore]) -> Option<ThresholdScore> {
	let mut scores = scores.iter();
	let mut best = *scores.next()?;
	for score in scores {
		if score.score > best.score || (best.score.is_nan() && !score.score.is_nan()) {
			best = *score;
		}
	}
	Some(best)
}

#[cfg(test)]
fn score_table(
	scores: &'static [(f32, f32)],
) -> impl Fn(ArrayView2<f32>, ArrayView2<u8>, f32, bool) -> Result<f32> {
	move |_: ArrayView2<f32>, _: ArrayView2<u8>, threshold: f32, _: bool| {
		scores
			.iter()
			.find(|(candidate, _)| *candidate == threshold)
			.map(|(_, score)| *score)
			.ok_or(Error::Empty)
	}
}

#[test]
fn test_default_grid() {
	let thresholds = ThresholdGrid::default().thresholds();
	assert_eq!(thresholds.len(), 10);
	assert!(thresholds.iter().all(|&threshold| threshold > 0.0 && threshold < 1.0));
	assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));
	assert!((thresholds[0] - 1.0 / 11.0).abs() < 1e-6);
	assert!((thresholds[9] - 10.0 / 11.0).abs() < 1e-6);
	assert!(ThresholdGrid { n_thresholds: 0 }.thresholds().is_empty());
}

#[test]
fn test_largest_grid() {
	let grid = ThresholdGrid {
		n_thresholds: std::usize::MAX,
	};
	let first = grid.threshold(0);
	let last = grid.threshold(std::usize::MAX - 1);
	assert!(first > 0.0 && first < 1.0);
	assert!(last > 0.0 && last <= 1.0);
}

#[test]
fn test_picks_peak() {
	let metric = score_table(&[(0.1, 0.6), (0.5, 0.8), (0.9, 0.4)]);
	let predictions = Array2::<f32>::zeros((1, 1));
	let labels = Array2::<u8>::zeros((1, 1));
	let threshold =
		optimal_threshold(&metric, predictions.view(), labels.view(), &[0.1, 0.5, 0.9]).unwrap();
	assert_eq!(threshold, 0.5);
	let threshold =
		optimal_threshold(&metric, predictions.view(), labels.view(), &[0.9, 0.1, 0.5]).unwrap();
	assert_eq!(threshold, 0.5);
}

#[test]
fn test_ties_keep_earliest() {
	let metric = score_table(&[(0.2, 0.5), (0.4, 0.9), (0.6, 0.9), (0.8, 0.1)]);
	let predictions = Array2::<f32>::zeros((1, 1));
	let labels = Array2::<u8>::zeros((1, 1));
	let threshold =
		optimal_threshold(&metric, predictions.view(), labels.view(), &[0.2, 0.4, 0.6, 0.8])
			.unwrap();
	assert_eq!(threshold, 0.4);
	let threshold =
		optimal_threshold(&metric, predictions.view(), labels.view(), &[0.8, 0.6, 0.4, 0.2])
			.unwrap();
	assert_eq!(threshold, 0.6);
}

#[test]
fn test_singleton() {
	let metric = score_table(&[(0.3, std::f32::NAN), (0.7, std::f32::NEG_INFINITY)]);
	let predictions = Array2::<f32>::zeros((1, 1));
	let labels = Array2::<u8>::zeros((1, 1));
	for &threshold in &[0.3, 0.7] {
		assert_eq!(
			optimal_threshold(&metric, predictions.view(), labels.view(), &[threshold]),
			Ok(threshold)
		);
	}
	let threshold =
		optimal_threshold(&metric, predictions.view(), labels.view(), &[0.3, 0.7]).unwrap();
	assert_eq!(threshold, 0.7);
}

#[test]
fn test_errors() {
	let predictions = arr2(&[[0.3, 0.7]]);
	let labels = arr2(&[[0, 1]]);
	assert_eq!(
		optimal_threshold(crate::zero_one_accuracy, predictions.view(), labels.view(), &[]),
		Err(Error::NoThresholds)
	);
	let labels = arr2(&[[0, 1, 1]]);
	assert_eq!(
		optimal_threshold(crate::hamming_accuracy, predictions.view(), labels.view(), &[0.5]),
		Err(Error::ShapeMismatch {
			predictions: (1, 2),
			labels: (1, 3),
		})
	);
}

#[test]
fn test_sweep() {
	let labels = arr2(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 1]]);
	let predictions = arr2(&[
		[0.9, 0.1, 0.2],
		[0.3, 0.7, 0.1],
		[0.8, 0.4, 0.0],
		[0.1, 0.2, 0.6],
	]);
	let scores = threshold_sweep(
		crate::zero_one_accuracy,
		predictions.view(),
		labels.view(),
		&[0.05, 0.35, 0.5, 0.95],
	)
	.unwrap();
	insta::assert_debug_snapshot!(scores, @r###"
 [
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
 ]
 "###);
	assert_eq!(best_threshold(&scores).map(|best| best.threshold), Some(0.35));
	assert_eq!(best_threshold(&[]), None);
}
