//! Design orchestration: from a factor set to a decoded design table.
//!
//! A run goes through `validate -> linearize -> fold -> generate -> decode ->
//! [randomize]` and stops at the first failure, so that a table is either
//! fully decoded or not produced at all.
use crate::errors::{PlanError, Result};
use crate::factor::{FactorKind, FactorSet};
use crate::parameters::PlanValidParams;
use crate::provider::{Classics, CodedSpec, DesignProvider, DesignRequest};
use crate::scale::{decode_column, decode_levels, decode_real, decode_signed, linearize_bounds};
use crate::strategy::{Method, Strategy};
use crate::table::{Column, DesignTable};
use log::{debug, info};
use ndarray::{Array2, Axis};
use ndarray_rand::rand::{seq::SliceRandom, SeedableRng};
use planbox_doe::DoeError;
use rand_xoshiro::Xoshiro256Plus;

/// Drives a [DesignProvider] to build design tables
///
/// The orchestrator holds no state between runs.
#[derive(Clone, Debug, Default)]
pub struct Orchestrator<P: DesignProvider = Classics> {
    provider: P,
}

impl Orchestrator<Classics> {
    /// Orchestrator using the classic designs
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: DesignProvider> Orchestrator<P> {
    /// Orchestrator using the given provider
    pub fn with_provider(provider: P) -> Self {
        Orchestrator { provider }
    }

    /// Builds the design table of the factors with the given parameters
    pub fn run(&self, factors: &FactorSet, params: &PlanValidParams) -> Result<DesignTable> {
        let strategy = params.strategy();
        let method = strategy.method();
        validate(factors, strategy)?;

        let numeric = factors.fold();
        let linearized: Vec<_> = numeric.iter().map(linearize_bounds).collect();
        let request = DesignRequest {
            method,
            specs: linearized.iter().map(CodedSpec::from).collect(),
            num_samples: strategy.num_samples(),
            lhs_kind: params.lhs_kind(),
            seed: params.seed(),
            center_points: params.center_points(),
            bbd_center: params.bbd_center(),
            max_exchanges: params.max_exchanges(),
        };
        info!("Generate {method} design of {} factors", factors.len());
        let coded = self.provider.generate(&request)?;
        debug!("Coded matrix {:?}", coded.dim());
        check_shape(&coded, factors.len())?;

        let columns: Vec<Column> = linearized
            .iter()
            .zip(coded.axis_iter(Axis(1)))
            .map(|(lin, values)| match method {
                Method::SpaceFilling => decode_column(lin, &values),
                Method::FullFactorial => decode_levels(lin, &values),
                Method::TwoLevelScreening | Method::CentralComposite | Method::BoxBehnken => {
                    decode_signed(lin, &values, params.log_midpoint())
                }
                Method::OptimalSubset => decode_real(lin, &values),
            })
            .collect();
        let table = DesignTable::new(factors.names(), columns)?;
        info!("Design of {} runs", table.nrows());

        if strategy.randomize() {
            Ok(shuffle(&table, params.seed()))
        } else {
            Ok(table)
        }
    }
}

/// Checks the structural requirements of the strategy on every factor
fn validate(factors: &FactorSet, strategy: &Strategy) -> Result<()> {
    let method = strategy.method();
    for factor in factors {
        match method {
            Method::TwoLevelScreening if factor.step_count() != 2 => {
                return Err(PlanError::StructuralMismatch(format!(
                    "{method} requires 2 steps, factor '{}' has {}",
                    factor.name(),
                    factor.step_count()
                )));
            }
            Method::CentralComposite | Method::BoxBehnken => {
                if factor.kind() == FactorKind::Categorical {
                    return Err(PlanError::StructuralMismatch(format!(
                        "{method} does not support categorical factor '{}'",
                        factor.name()
                    )));
                }
                if factor.step_count() != 3 {
                    return Err(PlanError::StructuralMismatch(format!(
                        "{method} requires 3 steps, factor '{}' has {}",
                        factor.name(),
                        factor.step_count()
                    )));
                }
            }
            _ => (),
        }
    }
    Ok(())
}

fn check_shape(coded: &Array2<f64>, nx: usize) -> Result<()> {
    if coded.ncols() != nx {
        return Err(PlanError::GenerationFailed(DoeError::InvalidValue(format!(
            "provider returned {} columns for {nx} factors",
            coded.ncols()
        ))));
    }
    Ok(())
}

fn shuffle(table: &DesignTable, seed: Option<u64>) -> DesignTable {
    let mut rng = match seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    };
    let mut order: Vec<usize> = (0..table.nrows()).collect();
    order.shuffle(&mut rng);
    debug!("Run order {:?}", order);
    table.select_rows(&order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::Factor;
    use crate::parameters::PlanParams;
    use crate::table::Value;
    use approx::assert_abs_diff_eq;
    use linfa::ParamGuard;
    use ndarray::array;

    fn run(factors: &FactorSet, params: PlanParams) -> Result<DesignTable> {
        Orchestrator::new().run(factors, &params.check()?)
    }

    fn set(factors: Vec<Factor>) -> FactorSet {
        FactorSet::new(factors).unwrap()
    }

    fn sorted_rows(table: &DesignTable) -> Vec<String> {
        let mut rows: Vec<String> = table
            .rows()
            .map(|r| r.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","))
            .collect();
        rows.sort();
        rows
    }

    #[test]
    fn test_full_factorial_single_factor() {
        let factors = set(vec![Factor::linear("A", 0., 10., 3).unwrap()]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::FullFactorial { randomize: false }),
        )
        .unwrap();
        assert_eq!(table.names(), ["A"]);
        assert_eq!(table.numbers("A").unwrap(), &array![0., 5., 10.]);
    }

    #[test]
    fn test_full_factorial_mixed() {
        let factors = set(vec![
            Factor::linear("A", 0., 1., 2).unwrap(),
            Factor::log("C", 1., 100., 3).unwrap(),
        ]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::FullFactorial { randomize: false }),
        )
        .unwrap();
        assert_eq!(table.nrows(), 6);
        assert_eq!(table.numbers("A").unwrap(), &array![0., 1., 0., 1., 0., 1.]);
        assert_abs_diff_eq!(
            table.numbers("C").unwrap(),
            &array![1., 1., 10., 10., 100., 100.],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_randomize_is_a_permutation() {
        let factors = set(vec![
            Factor::linear("A", 0., 1., 2).unwrap(),
            Factor::linear("B", 0., 2., 3).unwrap(),
            Factor::categorical("C", ["x", "y"]).unwrap(),
        ]);
        let ordered = run(
            &factors,
            PlanParams::new(Strategy::FullFactorial { randomize: false }),
        )
        .unwrap();
        let again = run(
            &factors,
            PlanParams::new(Strategy::FullFactorial { randomize: false }),
        )
        .unwrap();
        assert_eq!(ordered, again);

        let shuffled = run(
            &factors,
            PlanParams::new(Strategy::FullFactorial { randomize: true }),
        )
        .unwrap();
        assert_eq!(shuffled.nrows(), 12);
        assert_eq!(sorted_rows(&shuffled), sorted_rows(&ordered));

        let seeded = |seed| {
            run(
                &factors,
                PlanParams::new(Strategy::FullFactorial { randomize: true }).seed(Some(seed)),
            )
            .unwrap()
        };
        assert_eq!(seeded(3), seeded(3));
        assert_ne!(seeded(3), ordered);
    }

    #[test]
    fn test_screening_categorical() {
        let factors = set(vec![
            Factor::linear("A", 0., 10., 2).unwrap(),
            Factor::categorical("B", ["x", "y"]).unwrap(),
            Factor::log("C", 1., 1000., 2).unwrap(),
        ]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::TwoLevelScreening { randomize: false }),
        )
        .unwrap();
        assert_eq!(table.nrows(), 4);
        assert!(table
            .labels("B")
            .unwrap()
            .iter()
            .all(|b| b == "x" || b == "y"));
        assert!(table
            .numbers("C")
            .unwrap()
            .iter()
            .all(|&c| c == 1. || c == 1000.));
    }

    #[test]
    fn test_screening_run_count() {
        let factors = set((0..5)
            .map(|i| Factor::linear(&format!("x{i}"), 0., 1., 2).unwrap())
            .collect());
        let table = run(
            &factors,
            PlanParams::new(Strategy::TwoLevelScreening { randomize: false }),
        )
        .unwrap();
        assert_eq!(table.nrows(), 8);
    }

    #[test]
    fn test_screening_mismatch() {
        let factors = set(vec![
            Factor::linear("A", 0., 10., 2).unwrap(),
            Factor::linear("B", 0., 10., 3).unwrap(),
        ]);
        let res = run(
            &factors,
            PlanParams::new(Strategy::TwoLevelScreening { randomize: false }),
        );
        assert!(matches!(res, Err(PlanError::StructuralMismatch(msg)) if msg.contains("'B'")));
    }

    #[test]
    fn test_response_surface_mismatch() {
        let categorical = set(vec![
            Factor::linear("A", 0., 10., 3).unwrap(),
            Factor::categorical("B", ["x", "y", "z"]).unwrap(),
        ]);
        let two_steps = set(vec![Factor::linear("A", 0., 10., 2).unwrap()]);
        for strategy in [
            Strategy::CentralComposite { randomize: false },
            Strategy::BoxBehnken { randomize: false },
        ] {
            for factors in [&categorical, &two_steps] {
                assert!(matches!(
                    run(factors, PlanParams::new(strategy)),
                    Err(PlanError::StructuralMismatch(_))
                ));
            }
        }
    }

    #[test]
    fn test_central_composite() {
        let factors = set(vec![
            Factor::linear("A", 2., 4., 3).unwrap(),
            Factor::log("C", 10., 1000., 3).unwrap(),
        ]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::CentralComposite { randomize: false }),
        )
        .unwrap();
        // 4 factorial + 4 centers + 4 axial + 4 centers
        assert_eq!(table.nrows(), 16);
        assert!(table
            .numbers("A")
            .unwrap()
            .iter()
            .all(|a| [2., 3., 4.].contains(a)));
        assert_abs_diff_eq!(table.numbers("C").unwrap()[4], 100., epsilon = 1e-9);

        let legacy = run(
            &factors,
            PlanParams::new(Strategy::CentralComposite { randomize: false })
                .log_midpoint(crate::scale::LogMidpoint::Legacy)
                .center_points((1, 0)),
        )
        .unwrap();
        assert_eq!(legacy.nrows(), 9);
        assert_abs_diff_eq!(
            legacy.numbers("C").unwrap()[4],
            10f64.powf(2.5),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_box_behnken() {
        let factors = set(vec![
            Factor::linear("A", 0., 1., 3).unwrap(),
            Factor::linear("B", 0., 1., 3).unwrap(),
            Factor::linear("C", 0., 1., 3).unwrap(),
        ]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::BoxBehnken { randomize: false }),
        )
        .unwrap();
        assert_eq!(table.nrows(), 15);
        assert_eq!(table.row(14).unwrap(), vec![Value::Number(0.5); 3]);
    }

    #[test]
    fn test_space_filling() {
        let factors = set(vec![
            Factor::linear("A", 0., 10., 3).unwrap(),
            Factor::log("C", 1., 1000., 4).unwrap(),
            Factor::categorical("B", ["x", "y", "z"]).unwrap(),
        ]);
        let params = PlanParams::new(Strategy::SpaceFilling { num_samples: 9 });
        let table = run(&factors, params.clone()).unwrap();
        assert_eq!(table.nrows(), 9);
        assert!(table
            .numbers("A")
            .unwrap()
            .iter()
            .all(|a| [0., 5., 10.].contains(a)));
        assert!(table
            .numbers("C")
            .unwrap()
            .iter()
            .all(|&c| c > 0. && (0. ..=3.).contains(&c.log10())));
        assert!(table
            .labels("B")
            .unwrap()
            .iter()
            .all(|b| ["x", "y", "z"].contains(&b.as_str())));
        // centered hypercube over 9 runs hits every level of each factor
        let labels = table.labels("B").unwrap();
        assert!(["x", "y", "z"].iter().all(|o| labels.iter().any(|b| b == o)));
        assert_eq!(table, run(&factors, params).unwrap());
    }

    #[test]
    fn test_optimal_subset() {
        let factors = set(vec![
            Factor::linear("A", 0., 10., 3).unwrap(),
            Factor::categorical("B", ["x", "y"]).unwrap(),
        ]);
        let table = run(
            &factors,
            PlanParams::new(Strategy::OptimalSubset { num_samples: 4 }),
        )
        .unwrap();
        assert_eq!(table.nrows(), 4);
        assert!(table
            .numbers("A")
            .unwrap()
            .iter()
            .all(|a| [0., 5., 10.].contains(a)));
        assert!(table.labels("B").unwrap().iter().any(|b| b == "x"));
        assert!(table.labels("B").unwrap().iter().any(|b| b == "y"));
    }

    #[test]
    fn test_optimal_subset_infeasible() {
        let factors = set(vec![
            Factor::linear("A", 0., 10., 2).unwrap(),
            Factor::linear("B", 0., 10., 2).unwrap(),
        ]);
        // 3 coefficients cannot be estimated from 2 runs
        let res = run(
            &factors,
            PlanParams::new(Strategy::OptimalSubset { num_samples: 2 }),
        );
        assert!(matches!(res, Err(PlanError::GenerationFailed(_))));
    }

    #[test]
    fn test_oversized_designs() {
        let factors = |steps| {
            set((0..64)
                .map(|i| Factor::linear(&format!("x{i}"), 0., 1., steps).unwrap())
                .collect())
        };
        let res = run(
            &factors(2),
            PlanParams::new(Strategy::FullFactorial { randomize: false }),
        );
        assert!(matches!(res, Err(PlanError::GenerationFailed(_))));
        let res = run(
            &factors(3),
            PlanParams::new(Strategy::CentralComposite { randomize: false }),
        );
        assert!(matches!(res, Err(PlanError::GenerationFailed(_))));

        // 3^30 candidate grid
        let grid = set((0..30)
            .map(|i| Factor::linear(&format!("x{i}"), 0., 1., 3).unwrap())
            .collect());
        let res = run(
            &grid,
            PlanParams::new(Strategy::OptimalSubset { num_samples: 40 }),
        );
        assert!(matches!(res, Err(PlanError::GenerationFailed(_))));
    }

    struct Ragged;

    impl DesignProvider for Ragged {
        fn generate(&self, _request: &DesignRequest) -> std::result::Result<Array2<f64>, DoeError> {
            Ok(Array2::zeros((2, 5)))
        }
    }

    #[test]
    fn test_custom_provider_shape() {
        let factors = set(vec![Factor::linear("A", 0., 10., 3).unwrap()]);
        let params = PlanParams::new(Strategy::FullFactorial { randomize: false })
            .check()
            .unwrap();
        assert!(matches!(
            Orchestrator::with_provider(Ragged).run(&factors, &params),
            Err(PlanError::GenerationFailed(_))
        ));
    }
}
