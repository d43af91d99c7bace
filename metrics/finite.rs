use crate::error::{Error, Result};
use ndarray::prelude::*;
use num_traits::Float;

/**
Check that every value in `values` is finite, that is, neither infinite nor `NaN`. The metrics in this crate are undefined for non-finite predictions, so they call this before binarizing.

```
use ndarray::prelude::*;
use multilabel_metrics::{check_finite, Error};

assert!(check_finite(arr2(&[[0.1f32, 0.9]]).view()).is_ok());
assert_eq!(
	check_finite(arr2(&[[0.1f32, std::f32::NAN]]).view()),
	Err(Error::NotFinite { row: 0, column: 1 }),
);
```
*/
pub fn check_finite<T>(values: ArrayView2<T>) -> Result<()>
where
	T: Float,
{
	match values.indexed_iter().find(|(_, value)| !value.is_finite()) {
		Some(((row, column), _)) => Err(Error::NotFinite { row, column }),
		None => Ok(()),
	}
}

#[test]
fn test_check_finite() {
	let values = arr2(&[[0.0f32, 1.0], [-3.5, 1e30]]);
	assert_eq!(check_finite(values.view()), Ok(()));
	let values = arr2(&[[0.0f32, 1.0], [std::f32::NEG_INFINITY, std::f32::NAN]]);
	assert_eq!(
		check_finite(values.view()),
		Err(Error::NotFinite { row: 1, column: 0 })
	);
	let values = Array2::<f64>::zeros((0, 3));
	assert_eq!(check_finite(values.view()), Ok(()));
}
