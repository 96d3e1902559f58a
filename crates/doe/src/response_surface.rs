//! Three-level response surface designs valued in `{-1, 0, 1}`.
use crate::errors::{DoeError, Result};
use crate::full_factorial::{grid_size, two_level_unchecked, MAX_RUNS};
use crate::CodedDesign;
use ndarray::{concatenate, s, Array2, Axis};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of center runs appended to the factorial and axial blocks
pub const CCD_CENTER_POINTS: (usize, usize) = (4, 4);

/// Face-centered central composite design (alpha = 1)
///
/// Runs are the 2^nx factorial block followed by its center runs, then the
/// 2 * nx axial (star) points followed by their center runs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct CentralComposite {
    nx: usize,
    /// Number of center runs in (factorial block, axial block)
    center: (usize, usize),
}

impl CentralComposite {
    /// Constructor for `nx` three-level factors with default center runs
    ///
    /// ```
    /// use planbox_doe::{CentralComposite, CodedDesign};
    ///
    /// let doe = CentralComposite::new(3).unwrap();
    /// assert_eq!(doe.n_runs(), 8 + 4 + 6 + 4);
    /// ```
    pub fn new(nx: usize) -> Result<Self> {
        if nx == 0 {
            return Err(DoeError::InvalidValue(
                "central composite design requires at least one factor".to_string(),
            ));
        }
        let factorial = grid_size(std::iter::repeat(2).take(nx), MAX_RUNS)?;
        let axial = 2 * nx + CCD_CENTER_POINTS.0 + CCD_CENTER_POINTS.1;
        if factorial + axial > MAX_RUNS {
            return Err(DoeError::Infeasible(format!(
                "central composite design of {nx} factors exceeds {MAX_RUNS} runs"
            )));
        }
        Ok(CentralComposite {
            nx,
            center: CCD_CENTER_POINTS,
        })
    }

    /// Sets the number of center runs of the factorial and axial blocks
    pub fn center(mut self, center: (usize, usize)) -> Self {
        self.center = center;
        self
    }
}

impl CodedDesign for CentralComposite {
    fn nx(&self) -> usize {
        self.nx
    }

    fn n_runs(&self) -> usize {
        (1usize << self.nx)
            .saturating_add(2 * self.nx)
            .saturating_add(self.center.0)
            .saturating_add(self.center.1)
    }

    fn coded(&self) -> Array2<f64> {
        let nx = self.nx;
        let mut star = Array2::zeros((2 * nx, nx));
        for i in 0..nx {
            star[[2 * i, i]] = -1.;
            star[[2 * i + 1, i]] = 1.;
        }
        concatenate![
            Axis(0),
            two_level_unchecked(nx),
            Array2::<f64>::zeros((self.center.0, nx)),
            star,
            Array2::<f64>::zeros((self.center.1, nx))
        ]
    }
}

/// Box-Behnken design
///
/// For each pair of factors a 2^2 factorial block is built while the other
/// factors stay at their center level, then center runs are appended.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct BoxBehnken {
    nx: usize,
    center: usize,
}

/// Default center runs indexed by the number of factors
const BBD_CENTER_POINTS: [usize; 17] = [0, 0, 0, 3, 3, 6, 6, 6, 8, 9, 10, 12, 12, 13, 14, 15, 16];

impl BoxBehnken {
    /// Constructor for `nx >= 3` three-level factors with default center runs
    ///
    /// ```
    /// use planbox_doe::{BoxBehnken, CodedDesign};
    ///
    /// let doe = BoxBehnken::new(3).unwrap();
    /// assert_eq!(doe.n_runs(), 15);
    /// ```
    pub fn new(nx: usize) -> Result<Self> {
        if nx < 3 {
            return Err(DoeError::InvalidValue(format!(
                "Box-Behnken design requires at least 3 factors, got {nx}"
            )));
        }
        let center = BBD_CENTER_POINTS.get(nx).copied().unwrap_or(nx);
        let runs = nx
            .checked_mul(nx - 1)
            .and_then(|n| n.checked_mul(2))
            .and_then(|n| n.checked_add(center))
            .filter(|&n| n <= MAX_RUNS);
        if runs.is_none() {
            return Err(DoeError::Infeasible(format!(
                "Box-Behnken design of {nx} factors exceeds {MAX_RUNS} runs"
            )));
        }
        Ok(BoxBehnken { nx, center })
    }

    /// Overrides the number of center runs
    pub fn center(mut self, center: usize) -> Self {
        self.center = center;
        self
    }
}

impl CodedDesign for BoxBehnken {
    fn nx(&self) -> usize {
        self.nx
    }

    fn n_runs(&self) -> usize {
        (2 * self.nx * (self.nx - 1)).saturating_add(self.center)
    }

    fn coded(&self) -> Array2<f64> {
        let nx = self.nx;
        let block = two_level_unchecked(2);
        let mut doe = Array2::zeros((self.n_runs(), nx));
        let mut start = 0;
        for i in 0..nx - 1 {
            for j in (i + 1)..nx {
                doe.slice_mut(s![start..start + 4, i])
                    .assign(&block.column(0));
                doe.slice_mut(s![start..start + 4, j])
                    .assign(&block.column(1));
                start += 4;
            }
        }
        doe
    }
}
