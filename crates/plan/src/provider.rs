//! Design matrix provider: the numerical back end producing coded matrices.
use crate::factor::Scale;
use crate::scale::Linearized;
use crate::strategy::Method;
use log::debug;
use ndarray::{Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use planbox_doe::{
    expand_grid, grid_size, BoxBehnken, CentralComposite, CodedDesign, DOptimal, DoeError,
    FullFactorial, Lhs, LhsKind, PlackettBurman, SamplingMethod, DOPT_MAX_CANDIDATES,
};
use rand_xoshiro::Xoshiro256Plus;

/// Seed of space filling and optimal subset designs when none is configured
pub const DEFAULT_SEED: u64 = 1;

/// Coded description of one factor handed to a provider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodedSpec {
    /// Coded lower bound
    pub lower: f64,
    /// Coded upper bound
    pub upper: f64,
    /// Number of levels
    pub levels: usize,
    /// Scale of the levels in the real domain
    pub spacing: Scale,
}

impl CodedSpec {
    /// Real values of the levels (level indices for ordinal specs)
    pub fn real_levels(&self) -> Array1<f64> {
        let coded = Array1::linspace(self.lower, self.upper, self.levels);
        match self.spacing {
            Scale::Log => coded.mapv(|x| 10f64.powf(x)),
            Scale::Linear | Scale::Ordinal => coded,
        }
    }
}

impl From<&Linearized<'_>> for CodedSpec {
    fn from(lin: &Linearized<'_>) -> Self {
        CodedSpec {
            lower: lin.lower(),
            upper: lin.upper(),
            levels: lin.factor().step_count(),
            spacing: lin.factor().scale(),
        }
    }
}

/// Request for a coded design matrix
#[derive(Clone, Debug, PartialEq)]
pub struct DesignRequest {
    /// Requested design
    pub method: Method,
    /// One spec per factor, in column order
    pub specs: Vec<CodedSpec>,
    /// Number of runs of sample based methods
    pub num_samples: Option<usize>,
    /// Latin hypercube kind
    pub lhs_kind: LhsKind,
    /// Seed of the random components
    pub seed: Option<u64>,
    /// Center runs of central composite designs
    pub center_points: (usize, usize),
    /// Center runs of Box-Behnken designs
    pub bbd_center: Option<usize>,
    /// Cap of the D-optimal exchange search
    pub max_exchanges: usize,
}

impl DesignRequest {
    fn samples(&self) -> Result<usize, DoeError> {
        self.num_samples.ok_or_else(|| {
            DoeError::InvalidValue(format!("{} requires a number of samples", self.method))
        })
    }

    fn rng(&self) -> Xoshiro256Plus {
        Xoshiro256Plus::seed_from_u64(self.seed.unwrap_or(DEFAULT_SEED))
    }
}

/// A source of coded design matrices
///
/// The returned matrix has one column per spec, expressed in the coded domain
/// of the method:
/// * space filling: values within `[lower, upper]`,
/// * full factorial: level indices,
/// * two-level screening and response surfaces: `{-1, 0, 1}`,
/// * optimal subset: rows of the grid of real levels.
pub trait DesignProvider {
    /// Generates the coded matrix of the request
    fn generate(&self, request: &DesignRequest) -> Result<Array2<f64>, DoeError>;
}

/// Provider built on the classic designs of `planbox-doe`
#[derive(Clone, Copy, Debug, Default)]
pub struct Classics;

impl DesignProvider for Classics {
    fn generate(&self, request: &DesignRequest) -> Result<Array2<f64>, DoeError> {
        let nx = request.specs.len();
        let coded = match request.method {
            Method::SpaceFilling => {
                let mut xlimits = Array2::zeros((nx, 2));
                for (mut row, spec) in xlimits.outer_iter_mut().zip(&request.specs) {
                    row[0] = spec.lower;
                    row[1] = spec.upper;
                }
                Lhs::new(&xlimits)
                    .kind(request.lhs_kind)
                    .with_rng(request.rng())
                    .sample(request.samples()?)
            }
            Method::FullFactorial => {
                let levels: Vec<usize> = request.specs.iter().map(|s| s.levels).collect();
                FullFactorial::new(&levels)?.coded()
            }
            Method::TwoLevelScreening => PlackettBurman::new(nx)?.coded(),
            Method::CentralComposite => CentralComposite::new(nx)?
                .center(request.center_points)
                .coded(),
            Method::BoxBehnken => {
                let bbd = BoxBehnken::new(nx)?;
                match request.bbd_center {
                    Some(center) => bbd.center(center).coded(),
                    None => bbd.coded(),
                }
            }
            Method::OptimalSubset => {
                grid_size(request.specs.iter().map(|s| s.levels), DOPT_MAX_CANDIDATES)?;
                let grid: Vec<Array1<f64>> =
                    request.specs.iter().map(CodedSpec::real_levels).collect();
                let candidates = expand_grid(&grid)?;
                debug!("D-optimal search among {} candidates", candidates.nrows());
                DOptimal::new(&candidates, request.samples()?)?
                    .with_rng(request.rng())
                    .max_exchanges(request.max_exchanges)
                    .sample()?
            }
        };
        Ok(coded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn request(method: Method, specs: Vec<CodedSpec>) -> DesignRequest {
        DesignRequest {
            method,
            specs,
            num_samples: None,
            lhs_kind: LhsKind::Centered,
            seed: None,
            center_points: (4, 4),
            bbd_center: None,
            max_exchanges: 100,
        }
    }

    fn spec(lower: f64, upper: f64, levels: usize) -> CodedSpec {
        CodedSpec {
            lower,
            upper,
            levels,
            spacing: Scale::Linear,
        }
    }

    #[test]
    fn test_real_levels() {
        let log = CodedSpec {
            lower: 0.,
            upper: 2.,
            levels: 3,
            spacing: Scale::Log,
        };
        assert_abs_diff_eq!(log.real_levels(), array![1., 10., 100.], epsilon = 1e-12);
    }

    #[test]
    fn test_space_filling_is_seeded() {
        let mut req = request(Method::SpaceFilling, vec![spec(0., 10., 3), spec(-1., 1., 2)]);
        req.num_samples = Some(6);
        let a = Classics.generate(&req).unwrap();
        let b = Classics.generate(&req).unwrap();
        assert_eq!(a.dim(), (6, 2));
        assert_eq!(a, b);
        assert!(a.column(0).iter().all(|&x| (0. ..=10.).contains(&x)));
        assert!(a.column(1).iter().all(|&x| (-1. ..=1.).contains(&x)));
    }

    #[test]
    fn test_missing_samples() {
        let req = request(Method::OptimalSubset, vec![spec(0., 1., 2)]);
        assert!(matches!(
            Classics.generate(&req),
            Err(DoeError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_box_behnken_center() {
        let mut req = request(Method::BoxBehnken, vec![spec(0., 1., 3); 3]);
        assert_eq!(Classics.generate(&req).unwrap().nrows(), 15);
        req.bbd_center = Some(1);
        assert_eq!(Classics.generate(&req).unwrap().nrows(), 13);
    }

    #[test]
    fn test_optimal_subset_rows_are_candidates() {
        let mut req = request(Method::OptimalSubset, vec![spec(0., 10., 3), spec(1., 2., 2)]);
        req.num_samples = Some(4);
        let doe = Classics.generate(&req).unwrap();
        assert_eq!(doe.dim(), (4, 2));
        for row in doe.outer_iter() {
            assert!([0., 5., 10.].contains(&row[0]));
            assert!([1., 2.].contains(&row[1]));
        }
    }

    #[test]
    fn test_oversized_grids() {
        let mut req = request(Method::OptimalSubset, vec![spec(0., 1., 3); 30]);
        req.num_samples = Some(40);
        assert!(matches!(
            Classics.generate(&req),
            Err(DoeError::Infeasible(_))
        ));
        let req = request(Method::FullFactorial, vec![spec(0., 1., 2); 64]);
        assert!(matches!(
            Classics.generate(&req),
            Err(DoeError::Infeasible(_))
        ));
        let req = request(Method::CentralComposite, vec![spec(0., 1., 3); 64]);
        assert!(matches!(
            Classics.generate(&req),
            Err(DoeError::Infeasible(_))
        ));
    }
}
