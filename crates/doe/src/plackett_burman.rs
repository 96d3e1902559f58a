//! Two-level screening designs built from Hadamard matrices.
//!
//! A Plackett-Burman design for `nx` factors uses `N` runs where `N` is the
//! smallest multiple of 4 greater than `nx` for which a Hadamard matrix can be
//! built. Supported orders are `2^a` (Sylvester) and `2^a * (p + 1)` where `p`
//! is a prime with `p ≡ 3 (mod 4)` (Sylvester doubling of a Paley matrix),
//! which covers 4, 8, 12, 16, 20, 24, 32, 40, 44, 48... Orders without such
//! a decomposition (28, 36) are skipped in favor of the next available one.
use crate::errors::{DoeError, Result};
use crate::utils::{is_prime, legendre};
use crate::CodedDesign;
use ndarray::{concatenate, s, Array2, Axis};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Plackett-Burman screening design valued in `{-1, 1}`
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct PlackettBurman {
    nx: usize,
    /// Order of the underlying Hadamard matrix (aka number of runs)
    order: usize,
    /// Order of the Paley core doubled `doublings` times (1 when pure Sylvester)
    core: usize,
    doublings: u32,
}

impl PlackettBurman {
    /// Constructor for a screening of `nx` two-level factors
    ///
    /// ```
    /// use planbox_doe::{CodedDesign, PlackettBurman};
    ///
    /// let doe = PlackettBurman::new(11).unwrap();
    /// assert_eq!(doe.n_runs(), 12);
    /// ```
    pub fn new(nx: usize) -> Result<Self> {
        if nx == 0 {
            return Err(DoeError::InvalidValue(
                "Plackett-Burman design requires at least one factor".to_string(),
            ));
        }
        // A power of two always exists so the search terminates
        let mut order = 4 * (nx / 4 + 1);
        loop {
            if let Some((core, doublings)) = hadamard_decomposition(order) {
                return Ok(PlackettBurman {
                    nx,
                    order,
                    core,
                    doublings,
                });
            }
            order += 4;
        }
    }
}

impl CodedDesign for PlackettBurman {
    fn nx(&self) -> usize {
        self.nx
    }

    fn n_runs(&self) -> usize {
        self.order
    }

    fn coded(&self) -> Array2<f64> {
        let h = hadamard(self.core, self.doublings);
        // drop the constant column, rows upside down
        h.slice(s![..;-1, 1..=self.nx]).mapv(f64::from)
    }
}

/// Finds `(core, doublings)` such that `order = core * 2^doublings` and a
/// Hadamard matrix of order `core` is available (1 or Paley order).
fn hadamard_decomposition(order: usize) -> Option<(usize, u32)> {
    let mut core = order;
    let mut doublings = 0;
    loop {
        if core == 1 || (core > 2 && is_prime(core - 1) && (core - 1) % 4 == 3) {
            return Some((core, doublings));
        }
        if core % 2 != 0 {
            return None;
        }
        core /= 2;
        doublings += 1;
    }
}

/// Normalized Hadamard matrix of order `core * 2^doublings`:
/// first row and first column are all ones.
pub(crate) fn hadamard(core: usize, doublings: u32) -> Array2<i8> {
    let mut h = if core == 1 {
        Array2::ones((1, 1))
    } else {
        paley(core - 1)
    };
    for _ in 0..doublings {
        let neg = h.mapv(|v| -v);
        let top = concatenate![Axis(1), h, h];
        let bottom = concatenate![Axis(1), h, neg];
        h = concatenate![Axis(0), top, bottom];
    }
    h
}

/// Paley type I construction of order `p + 1` for a prime `p ≡ 3 (mod 4)`
fn paley(p: usize) -> Array2<i8> {
    let n = p + 1;
    let mut h = Array2::<i8>::ones((n, n));
    for i in 1..n {
        h[[i, 0]] = -1;
        for j in 1..n {
            if i != j {
                h[[i, j]] = legendre((j + p - i) % p, p);
            }
        }
    }
    for mut row in h.rows_mut() {
        if row[0] == -1 {
            row.mapv_inplace(|v| -v);
        }
    }
    h
}
