/*!
This module defines the `Config` struct, which is used to configure an evaluation run. It is read from a YAML file passed with `--config`.
*/

use anyhow::{bail, Context, Result};
use multilabel_metrics::{ThresholdGrid, DEFAULT_THRESHOLD};
use std::path::Path;

/// Grids larger than this are rejected before any thresholds are generated.
pub const MAX_GRID_THRESHOLDS: usize = 10_000;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub threshold: Option<f32>,
	pub sigmoid: Option<bool>,
	pub search: Option<SearchConfig>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
	pub metric: Option<SearchMetric>,
	pub thresholds: Option<Vec<f32>>,
	pub grid: Option<ThresholdGrid>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum SearchMetric {
	#[serde(rename = "hamming")]
	Hamming,
	#[serde(rename = "zero_one")]
	ZeroOne,
}

impl Default for SearchMetric {
	fn default() -> Self {
		SearchMetric::ZeroOne
	}
}

impl Config {
	pub fn threshold(&self) -> f32 {
		self.threshold.unwrap_or(DEFAULT_THRESHOLD)
	}

	pub fn sigmoid(&self) -> bool {
		self.sigmoid.unwrap_or(false)
	}

	pub fn search_metric(&self) -> SearchMetric {
		self.search
			.as_ref()
			.and_then(|search| search.metric)
			.unwrap_or_default()
	}

	/// The candidates for the threshold search: the explicit list if one was given, otherwise the grid.
	pub fn search_thresholds(&self) -> Result<Vec<f32>> {
		let search = match self.search.as_ref() {
			Some(search) => search,
			None => return Ok(ThresholdGrid::default().thresholds()),
		};
		match (&search.thresholds, &search.grid) {
			(Some(_), Some(_)) => bail!("the search config may set thresholds or grid, not both"),
			(Some(thresholds), None) => Ok(thresholds.clone()),
			(None, Some(grid)) if grid.n_thresholds > MAX_GRID_THRESHOLDS => bail!(
				"the search grid has {} thresholds but at most {} are allowed",
				grid.n_thresholds,
				MAX_GRID_THRESHOLDS
			),
			(None, Some(grid)) => Ok(grid.thresholds()),
			(None, None) => Ok(ThresholdGrid::default().thresholds()),
		}
	}
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(config)
	} else {
		Ok(Config::default())
	}
}

#[test]
fn test_defaults() {
	let config = Config::default();
	assert_eq!(config.threshold(), 0.5);
	assert!(!config.sigmoid());
	assert_eq!(config.search_metric(), SearchMetric::ZeroOne);
	assert_eq!(config.search_thresholds().unwrap().len(), 10);
}

#[test]
fn test_parse() {
	let config: Config = serde_yaml::from_str(
		"
threshold: 0.0
sigmoid: true
search:
  metric: hamming
  thresholds: [0.25, 0.5, 0.75]
",
	)
	.unwrap();
	assert_eq!(config.threshold(), 0.0);
	assert!(config.sigmoid());
	assert_eq!(config.search_metric(), SearchMetric::Hamming);
	assert_eq!(config.search_thresholds().unwrap(), vec![0.25, 0.5, 0.75]);
	let config: Config = serde_yaml::from_str("search:\n  grid:\n    n_thresholds: 3\n").unwrap();
	assert_eq!(config.search_thresholds().unwrap(), vec![0.25, 0.5, 0.75]);
}

#[test]
fn test_invalid() {
	assert!(serde_yaml::from_str::<Config>("search:\n  metric: f1\n").is_err());
	assert!(serde_yaml::from_str::<Config>("treshold: 0.5\n").is_err());
	let config: Config = serde_yaml::from_str(
		"search:\n  thresholds: [0.5]\n  grid:\n    n_thresholds: 3\n",
	)
	.unwrap();
	assert!(config.search_thresholds().is_err());
}

#[test]
fn test_grid_size_limit() {
	let config: Config =
		serde_yaml::from_str("search:\n  grid:\n    n_thresholds: 18446744073709551615\n")
			.unwrap();
	assert_eq!(
		config.search_thresholds().unwrap_err().to_string(),
		"the search grid has 18446744073709551615 thresholds but at most 10000 are allowed"
	);
	let config: Config =
		serde_yaml::from_str("search:\n  grid:\n    n_thresholds: 10000\n").unwrap();
	assert_eq!(config.search_thresholds().unwrap().len(), MAX_GRID_THRESHOLDS);
}
