use crate::utils::pdist;
use crate::SamplingMethod;
use linfa::Float;
use ndarray::{s, Array, Array2, ArrayBase, Data, Ix2, ShapeBuilder};
use ndarray_rand::{
    rand::seq::SliceRandom, rand::Rng, rand::SeedableRng, rand_distr::Uniform, RandomExt,
};
use ndarray_stats::QuantileExt;
use rand_xoshiro::Xoshiro256Plus;
use std::sync::{Arc, RwLock};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Number of candidate hypercubes drawn by maximin variants
const MAXIMIN_ITERS: usize = 5;

/// Point placement rule inside the Latin hypercube strata
#[derive(Clone, Debug, Default, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// Uniformly drawn within each stratum
    Classic,
    /// Middle of each stratum
    #[default]
    Centered,
    /// Classic hypercube with the largest minimal pairwise distance among a few draws
    Maximin,
    /// Centered hypercube with the largest minimal pairwise distance among a few draws
    CenteredMaximin,
}

type RngRef<R> = Arc<RwLock<R>>;

/// Latin hypercube sampling used by space filling designs
///
/// Every axis of the design space is cut into `ns` strata of equal width and
/// each stratum holds exactly one of the `ns` points. Where the point lies in
/// its stratum depends on the [LhsKind].
#[derive(Clone, Debug)]
pub struct Lhs<F: Float, R: Rng> {
    /// (nx, 2) matrix of `[lower, upper]` bounds per axis
    xlimits: Array2<F>,
    kind: LhsKind,
    /// Shared generator, draws and shuffles strata
    rng: RngRef<R>,
}

impl<F: Float> Lhs<F, Xoshiro256Plus> {
    /// Hypercube over coded factor ranges, one `[lower, upper]` row per factor
    ///
    /// Log factors are given by their log10 bounds. The generator is seeded
    /// from entropy: plans needing reproducible runs replace it with
    /// [Lhs::with_rng].
    ///
    /// ```
    /// use planbox_doe::Lhs;
    /// use ndarray::arr2;
    ///
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float, R: Rng> SamplingMethod<F> for Lhs<F, R> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        match &self.kind {
            LhsKind::Classic => self.classic_lhs(ns),
            LhsKind::Centered => self.centered_lhs(ns),
            LhsKind::Maximin => self.maximin_lhs(ns, false),
            LhsKind::CenteredMaximin => self.maximin_lhs(ns, true),
        }
    }
}

impl<F: Float, R: Rng> Lhs<F, R> {
    /// Same as [Lhs::new] with runs drawn from `rng`
    ///
    /// **Panics** if `xlimits` is not a `[lower, upper]` pair per factor.
    pub fn new_with_rng(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>, rng: R) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Lhs {
            xlimits: xlimits.to_owned(),
            kind: LhsKind::default(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Chooses between random and centered strata, with or without the
    /// maximin spreading of the runs
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Draws the runs from `rng`, e.g. a `Xoshiro256Plus` seeded with the plan seed
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Lhs<F, R2> {
        Lhs {
            xlimits: self.xlimits,
            kind: self.kind,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    fn classic_lhs(&self, ns: usize) -> Array2<F> {
        let nx = self.xlimits.nrows();
        let cut = Array::linspace(0., 1., ns + 1);
        let a = cut.slice(s![..ns]).to_owned();
        let width = &cut.slice(s![1..(ns + 1)]) - &a;

        let mut rng = self.rng.write().unwrap();
        let rnd = Array::random_using((ns, nx).f(), Uniform::new(0., 1.), &mut *rng);
        let mut lhs = Array::zeros((ns, nx).f());
        for j in 0..nx {
            let mut col = rnd.column(j).to_owned() * &width + &a;
            col.as_slice_mut().unwrap().shuffle(&mut *rng);
            lhs.column_mut(j).assign(&col);
        }
        lhs.mapv(|v: f64| F::cast(v))
    }

    fn centered_lhs(&self, ns: usize) -> Array2<F> {
        let nx = self.xlimits.nrows();
        let cut = Array::linspace(0., 1., ns + 1);
        let mut centers = (&cut.slice(s![..ns]) + &cut.slice(s![1..(ns + 1)])) / 2.;

        let mut lhs = Array::zeros((ns, nx).f());
        let mut rng = self.rng.write().unwrap();
        for j in 0..nx {
            centers.as_slice_mut().unwrap().shuffle(&mut *rng);
            lhs.column_mut(j).assign(&centers);
        }
        lhs.mapv(|v: f64| F::cast(v))
    }

    fn maximin_lhs(&self, ns: usize, centered: bool) -> Array2<F> {
        let draw = || {
            if centered {
                self.centered_lhs(ns)
            } else {
                self.classic_lhs(ns)
            }
        };
        let mut best = draw();
        if ns < 2 {
            return best;
        }
        let mut max_dist = *pdist(&best).min().unwrap();
        for _ in 1..MAXIMIN_ITERS {
            let lhs = draw();
            let d_min = *pdist(&lhs).min().unwrap();
            if max_dist < d_min {
                max_dist = d_min;
                best = lhs;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Axis};

    fn assert_latin(doe: &Array2<f64>, xlimits: &Array2<f64>) {
        let ns = doe.nrows();
        for (j, col) in doe.axis_iter(Axis(1)).enumerate() {
            let (lo, up) = (xlimits[[j, 0]], xlimits[[j, 1]]);
            let mut strata: Vec<usize> = col
                .iter()
                .map(|v| (((v - lo) / (up - lo)) * ns as f64).floor().min(ns as f64 - 1.) as usize)
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..ns).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_centered_lhs() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let actual = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .kind(LhsKind::Centered)
            .sample(5);
        assert_latin(&actual, &xlimits);
        let mut col0 = actual.column(0).to_vec();
        col0.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_abs_diff_eq!(
            ndarray::Array1::from(col0),
            ndarray::array![5.5, 6.5, 7.5, 8.5, 9.5],
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_classic_lhs() {
        let xlimits = arr2(&[[5., 10.], [0., 1.], [-3., 3.]]);
        let actual = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .kind(LhsKind::Classic)
            .sample(8);
        assert_eq!(actual.dim(), (8, 3));
        assert_latin(&actual, &xlimits);
    }

    #[test]
    fn test_maximin_lhs() {
        let xlimits = arr2(&[[0., 1.], [0., 1.]]);
        for kind in [LhsKind::Maximin, LhsKind::CenteredMaximin] {
            let actual = Lhs::new(&xlimits)
                .with_rng(Xoshiro256Plus::seed_from_u64(42))
                .kind(kind)
                .sample(10);
            assert_latin(&actual, &xlimits);
        }
    }

    #[test]
    fn test_seeded_lhs_is_reproducible() {
        let xlimits = arr2(&[[0., 1.], [0., 1.]]);
        let s1 = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(1))
            .sample(6);
        let s2 = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(1))
            .sample(6);
        assert_abs_diff_eq!(s1, s2, epsilon = 1e-15);
    }

    #[test]
    fn test_single_sample() {
        let xlimits = arr2(&[[0., 2.]]);
        let actual = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(3))
            .kind(LhsKind::CenteredMaximin)
            .sample(1);
        assert_abs_diff_eq!(actual, arr2(&[[1.]]), epsilon = 1e-12);
    }
}
