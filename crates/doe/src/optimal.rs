//! D-optimal subset selection using the Fedorov exchange algorithm.
//!
//! Given a candidate set (typically the full factorial grid of the factor
//! levels), the search selects `n_trials` distinct candidates maximizing the
//! determinant of the information matrix `X'X` of the first-order model with
//! intercept `y = b0 + b1 x1 + ... + bk xk`.
use crate::errors::{DoeError, Result};
use linfa_linalg::cholesky::*;
use log::{debug, warn};
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::sync::{Arc, RwLock};

/// Default maximum number of point exchanges
pub const DOPT_MAX_EXCHANGES: usize = 1000;

/// Maximum number of candidate points: every exchange scores all the
/// candidates against every selected trial
pub const DOPT_MAX_CANDIDATES: usize = 1 << 18;

/// Minimal relative determinant improvement for an exchange to be accepted
const EXCHANGE_TOL: f64 = 1e-9;

/// Regularization used while building the initial design
const INIT_RIDGE: f64 = 1e-8;

/// Fedorov exchange search of a D-optimal design among candidate points
#[derive(Clone, Debug)]
pub struct DOptimal<R: Rng> {
    /// Candidate points as a (n_candidates, nx) matrix
    candidates: Array2<f64>,
    /// Number of runs to select
    n_trials: usize,
    /// Max number of point exchanges
    max_exchanges: usize,
    /// Random generator used to draw the initial design
    rng: Arc<RwLock<R>>,
}

impl DOptimal<Xoshiro256Plus> {
    /// Constructor given the candidate points and the number of runs to select
    ///
    /// ```
    /// use planbox_doe::{expand_grid, DOptimal};
    /// use ndarray::array;
    ///
    /// let candidates = expand_grid(&[array![0., 0.5, 1.], array![10., 20., 30.]]).unwrap();
    /// let doe = DOptimal::new(&candidates, 4).unwrap().sample().unwrap();
    /// assert_eq!(doe.nrows(), 4);
    /// ```
    pub fn new(candidates: &ArrayBase<impl Data<Elem = f64>, Ix2>, n_trials: usize) -> Result<Self> {
        let p = candidates.ncols() + 1;
        if candidates.ncols() == 0 {
            return Err(DoeError::InvalidValue(
                "D-optimal design requires at least one factor".to_string(),
            ));
        }
        if n_trials < p {
            return Err(DoeError::Infeasible(format!(
                "D-optimal design needs at least {p} trials to estimate {p} coefficients, got {n_trials}"
            )));
        }
        if candidates.nrows() > DOPT_MAX_CANDIDATES {
            return Err(DoeError::Infeasible(format!(
                "{} candidates exceed the {DOPT_MAX_CANDIDATES} handled by the D-optimal search",
                candidates.nrows()
            )));
        }
        if n_trials > candidates.nrows() {
            return Err(DoeError::Infeasible(format!(
                "cannot select {n_trials} distinct trials among {} candidates",
                candidates.nrows()
            )));
        }
        Ok(DOptimal {
            candidates: candidates.to_owned(),
            n_trials,
            max_exchanges: DOPT_MAX_EXCHANGES,
            rng: Arc::new(RwLock::new(Xoshiro256Plus::from_entropy())),
        })
    }
}

impl<R: Rng> DOptimal<R> {
    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> DOptimal<R2> {
        DOptimal {
            candidates: self.candidates,
            n_trials: self.n_trials,
            max_exchanges: self.max_exchanges,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the maximum number of point exchanges
    pub fn max_exchanges(mut self, max_exchanges: usize) -> Self {
        self.max_exchanges = max_exchanges;
        self
    }

    /// Selected trials as a (n_trials, nx) matrix of candidate rows
    pub fn sample(&self) -> Result<Array2<f64>> {
        let indices = self.select()?;
        Ok(self.candidates.select(Axis(0), &indices))
    }

    /// Indices of the selected candidates, sorted in candidate order
    pub fn select(&self) -> Result<Vec<usize>> {
        let x = model_matrix(&self.candidates)?;
        let mut design = self.initial_design(&x)?;
        let mut in_design = vec![false; x.nrows()];
        design.iter().for_each(|&i| in_design[i] = true);

        let mut exchanges = 0;
        while exchanges < self.max_exchanges {
            let xd = x.select(Axis(0), &design);
            let minv = xd.t().dot(&xd).invc()?;
            // prediction variances and covariances against every candidate
            let cross = xd.dot(&minv).dot(&x.t());
            let var = (&x.dot(&minv) * &x).sum_axis(Axis(1));

            let mut best = (0., 0, 0);
            for (pos, &i) in design.iter().enumerate() {
                let di = var[i];
                for j in (0..x.nrows()).filter(|&j| !in_design[j]) {
                    let dij = cross[[pos, j]];
                    let delta = var[j] - (di * var[j] - dij * dij) - di;
                    if delta > best.0 {
                        best = (delta, pos, j);
                    }
                }
            }
            let (delta, pos, j) = best;
            if delta <= EXCHANGE_TOL {
                break;
            }
            debug!(
                "D-optimal exchange {exchanges}: candidate {} <- {j} (det x {:.6})",
                design[pos],
                1. + delta
            );
            in_design[design[pos]] = false;
            in_design[j] = true;
            design[pos] = j;
            exchanges += 1;
        }
        if exchanges == self.max_exchanges {
            warn!("D-optimal search stopped after {exchanges} exchanges");
        }

        design.sort_unstable();
        Ok(design)
    }

    /// Greedy sequential start: from a random candidate, repeatedly adds the
    /// candidate with the largest prediction variance under the current design.
    fn initial_design(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        order.shuffle(&mut *self.rng.write().unwrap());

        let p = x.ncols();
        let mut design = vec![order[0]];
        while design.len() < self.n_trials {
            let xd = x.select(Axis(0), &design);
            let info = xd.t().dot(&xd) + Array2::<f64>::eye(p) * INIT_RIDGE;
            let minv = info.invc()?;
            let var = (&x.dot(&minv) * x).sum_axis(Axis(1));
            let next = order
                .iter()
                .copied()
                .filter(|j| !design.contains(j))
                .fold(None, |acc: Option<usize>, j| match acc {
                    Some(k) if var[k] >= var[j] => Some(k),
                    _ => Some(j),
                });
            match next {
                Some(j) => design.push(j),
                None => break,
            }
        }
        Ok(design)
    }
}

/// First-order model matrix `[1, x1, ..., xk]` with every factor rescaled to `[-1, 1]`
///
/// The rescaling is affine per column so it leaves the D-optimal selection unchanged
/// while keeping the information matrix well conditioned.
fn model_matrix(candidates: &Array2<f64>) -> Result<Array2<f64>> {
    let (n, k) = candidates.dim();
    let mut x = Array2::ones((n, k + 1));
    for (j, col) in candidates.columns().into_iter().enumerate() {
        let lo = col.fold(f64::INFINITY, |a, &b| a.min(b));
        let up = col.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        if !(up > lo) {
            return Err(DoeError::Infeasible(format!(
                "candidate factor {j} takes a single value, model is not estimable"
            )));
        }
        let (mid, half) = ((up + lo) / 2., (up - lo) / 2.);
        x.slice_mut(s![.., j + 1])
            .assign(&col.mapv(|v| (v - mid) / half));
    }
    Ok(x)
}

/// Log-determinant of the information matrix `X'X` of the first-order model of `design`
///
/// Factors are rescaled to `[-1, 1]` using the design's own range.
pub fn log_det_information(design: &Array2<f64>) -> Result<f64> {
    let x = model_matrix(design)?;
    let l = x.t().dot(&x).cholesky()?;
    let diag: Array1<f64> = l.diag().mapv(f64::ln);
    Ok(2. * diag.sum())
}
