use crate::errors::{DoeError, Result};
use crate::CodedDesign;
use linfa::Float;
use ndarray::{array, s, Array1, Array2};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Maximum number of runs of a combinatorial design (factorial, response surface)
/// or of rows of a candidate grid
pub const MAX_RUNS: usize = 1 << 20;

/// Number of rows of the cross product of grids with the given numbers of levels.
///
/// Fails with [DoeError::Infeasible] when the product overflows or exceeds `max`.
pub fn grid_size(levels: impl IntoIterator<Item = usize>, max: usize) -> Result<usize> {
    let size = levels
        .into_iter()
        .try_fold(1usize, |acc, n| acc.checked_mul(n))
        .filter(|&size| size <= max);
    size.ok_or_else(|| {
        DoeError::Infeasible(format!("cross product of the factor levels exceeds {max} runs"))
    })
}

/// The FullFactorial design consists of all possible combinations
/// of levels for all components.
///
/// Values of the coded design are level indices: the jth column takes values
/// in `{0, 1, ..., levels[j] - 1}`. The first column varies fastest.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct FullFactorial {
    /// Number of levels of each component
    levels: Vec<usize>,
}

impl FullFactorial {
    /// Constructor given the number of levels of each component,
    /// the design may not exceed [MAX_RUNS] runs
    ///
    /// ```
    /// use planbox_doe::{CodedDesign, FullFactorial};
    ///
    /// let doe = FullFactorial::new(&[2, 3]).unwrap();
    /// assert_eq!(doe.n_runs(), 6);
    /// assert!(FullFactorial::new(&[2; 64]).is_err());
    /// ```
    pub fn new(levels: &[usize]) -> Result<Self> {
        if levels.is_empty() {
            return Err(DoeError::InvalidValue(
                "full factorial requires at least one factor".to_string(),
            ));
        }
        if let Some(j) = levels.iter().position(|&n| n == 0) {
            return Err(DoeError::InvalidValue(format!(
                "factor {j} of full factorial has no level"
            )));
        }
        grid_size(levels.iter().copied(), MAX_RUNS)?;
        Ok(FullFactorial {
            levels: levels.to_vec(),
        })
    }

    /// Levels of each component
    pub fn levels(&self) -> &[usize] {
        &self.levels
    }
}

impl CodedDesign for FullFactorial {
    fn nx(&self) -> usize {
        self.levels.len()
    }

    fn n_runs(&self) -> usize {
        self.levels.iter().product()
    }

    fn coded(&self) -> Array2<f64> {
        let grid: Vec<Array1<f64>> = self
            .levels
            .iter()
            .map(|&n| Array1::from_iter((0..n).map(|i| i as f64)))
            .collect();
        fill_grid(&grid, self.n_runs())
    }
}

/// Cross product of per-component level values.
///
/// The jth column of the result cycles through `values[j]`, the first column
/// varying fastest, so that the result has `prod(len(values[j]))` rows.
/// Fails when that number exceeds [MAX_RUNS].
pub fn expand_grid<F: Float>(values: &[Array1<F>]) -> Result<Array2<F>> {
    let nrows = grid_size(values.iter().map(|v| v.len()), MAX_RUNS)?;
    Ok(fill_grid(values, nrows))
}

/// Two-level full factorial design 2^nx valued in `{-1, 1}`, at most [MAX_RUNS] runs
pub fn two_level(nx: usize) -> Result<Array2<f64>> {
    expand_grid(&vec![array![-1., 1.]; nx])
}

/// `two_level` for a number of factors whose run count is already checked
pub(crate) fn two_level_unchecked(nx: usize) -> Array2<f64> {
    fill_grid(&vec![array![-1., 1.]; nx], 1 << nx)
}

fn fill_grid<F: Float>(values: &[Array1<F>], nrows: usize) -> Array2<F> {
    let mut grid = Array2::zeros((nrows, values.len()));

    let mut level_repeat = 1;
    for (j, vals) in values.iter().enumerate() {
        let n = vals.len();
        if n == 0 {
            continue;
        }
        let chunk_len = level_repeat * n;
        let mut chunk = Array1::zeros(chunk_len);
        for (i, v) in vals.iter().enumerate() {
            chunk
                .slice_mut(s![i * level_repeat..(i + 1) * level_repeat])
                .fill(*v);
        }
        for k in 0..nrows / chunk_len {
            grid.slice_mut(s![k * chunk_len..(k + 1) * chunk_len, j])
                .assign(&chunk);
        }
        level_repeat = chunk_len;
    }
    grid
}
