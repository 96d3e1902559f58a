use crate::errors::{PlanError, Result};
use crate::scale::LogMidpoint;
use crate::strategy::{Options, Strategy};
use linfa::ParamGuard;
use planbox_doe::{LhsKind, CCD_CENTER_POINTS, DOPT_MAX_EXCHANGES, MAX_RUNS};
use serde::{Deserialize, Serialize};

/// Checked plan parameters, see [PlanParams]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanValidParams {
    pub(crate) strategy: Strategy,
    pub(crate) seed: Option<u64>,
    pub(crate) lhs_kind: LhsKind,
    pub(crate) log_midpoint: LogMidpoint,
    pub(crate) center_points: (usize, usize),
    pub(crate) bbd_center: Option<usize>,
    pub(crate) max_exchanges: usize,
}

impl PlanValidParams {
    /// Design strategy
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Seed of the random components, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Latin hypercube kind of the space filling strategy
    pub fn lhs_kind(&self) -> LhsKind {
        self.lhs_kind
    }

    /// Center value rule of log factors in three-level designs
    pub fn log_midpoint(&self) -> LogMidpoint {
        self.log_midpoint
    }

    /// Center runs of the factorial and axial blocks of a central composite design
    pub fn center_points(&self) -> (usize, usize) {
        self.center_points
    }

    /// Center runs of a Box-Behnken design, `None` for the default count
    pub fn bbd_center(&self) -> Option<usize> {
        self.bbd_center
    }

    /// Maximum number of point exchanges of the D-optimal search
    pub fn max_exchanges(&self) -> usize {
        self.max_exchanges
    }
}

/// Plan parameters builder
///
/// ```
/// use planbox::{PlanParams, Strategy};
/// use linfa::ParamGuard;
///
/// let params = PlanParams::new(Strategy::FullFactorial { randomize: true })
///     .seed(Some(42))
///     .check()
///     .unwrap();
/// assert_eq!(params.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PlanParams(PlanValidParams);

impl PlanParams {
    /// Parameters of the given strategy with default options
    pub fn new(strategy: Strategy) -> PlanParams {
        Self(PlanValidParams {
            strategy,
            seed: None,
            lhs_kind: LhsKind::default(),
            log_midpoint: LogMidpoint::default(),
            center_points: CCD_CENTER_POINTS,
            bbd_center: None,
            max_exchanges: DOPT_MAX_EXCHANGES,
        })
    }

    /// Sets the strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.0.strategy = strategy;
        self
    }

    /// Sets the seed of every random component.
    ///
    /// Without seed, space filling and optimal subset designs still use a
    /// fixed default seed while row shuffling draws from entropy.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets the Latin hypercube kind
    pub fn lhs_kind(mut self, lhs_kind: LhsKind) -> Self {
        self.0.lhs_kind = lhs_kind;
        self
    }

    /// Sets the center value rule of log factors
    pub fn log_midpoint(mut self, log_midpoint: LogMidpoint) -> Self {
        self.0.log_midpoint = log_midpoint;
        self
    }

    /// Sets the center runs of central composite designs
    pub fn center_points(mut self, center_points: (usize, usize)) -> Self {
        self.0.center_points = center_points;
        self
    }

    /// Sets the center runs of Box-Behnken designs
    pub fn bbd_center(mut self, bbd_center: Option<usize>) -> Self {
        self.0.bbd_center = bbd_center;
        self
    }

    /// Sets the maximum number of point exchanges of the D-optimal search
    pub fn max_exchanges(mut self, max_exchanges: usize) -> Self {
        self.0.max_exchanges = max_exchanges;
        self
    }
}

impl From<PlanValidParams> for PlanParams {
    fn from(valid: PlanValidParams) -> Self {
        PlanParams(valid)
    }
}

impl TryFrom<&Options> for PlanParams {
    type Error = PlanError;

    fn try_from(options: &Options) -> Result<Self> {
        Ok(PlanParams::new(Strategy::try_from(options)?).seed(options.seed))
    }
}

impl ParamGuard for PlanParams {
    type Checked = PlanValidParams;
    type Error = PlanError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.strategy.num_samples() == Some(0) {
            return Err(PlanError::InvalidConfig(format!(
                "{} requires a positive number of samples",
                self.0.strategy.method()
            )));
        }
        let (before, after) = self.0.center_points;
        let runs = [self.0.strategy.num_samples(), Some(before), Some(after), self.0.bbd_center];
        if runs.into_iter().flatten().any(|n| n > MAX_RUNS) {
            return Err(PlanError::InvalidConfig(format!(
                "number of samples and center runs are limited to {MAX_RUNS}"
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
