use crate::errors::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Design methods known by the planner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Latin hypercube sampling
    SpaceFilling,
    /// Every combination of the factor levels
    FullFactorial,
    /// Plackett-Burman screening of two-level factors
    TwoLevelScreening,
    /// Face-centered central composite design of three-level factors
    CentralComposite,
    /// Box-Behnken design of three-level factors
    BoxBehnken,
    /// D-optimal subset of the full factorial grid
    OptimalSubset,
}

impl Method {
    /// Canonical name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Method::SpaceFilling => "space_filling",
            Method::FullFactorial => "full_factorial",
            Method::TwoLevelScreening => "two_level_screening",
            Method::CentralComposite => "central_composite",
            Method::BoxBehnken => "box_behnken",
            Method::OptimalSubset => "optimal_subset",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = PlanError;

    /// Parses a method name, case insensitive, aliases included
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "space_filling" | "latin_hypercube" | "lhs" | "lth" => Ok(Method::SpaceFilling),
            "full_factorial" | "full_fact" => Ok(Method::FullFactorial),
            "two_level_screening" | "plackett_burman" | "placket_burman" => {
                Ok(Method::TwoLevelScreening)
            }
            "central_composite" => Ok(Method::CentralComposite),
            "box_behnken" => Ok(Method::BoxBehnken),
            "optimal_subset" | "d_optimal" => Ok(Method::OptimalSubset),
            _ => Err(PlanError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Design strategy with its required options
///
/// Sample based strategies carry the number of runs, combinatorial ones
/// whether the rows are shuffled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Strategy {
    /// Latin hypercube of `num_samples` runs
    SpaceFilling {
        /// Number of runs
        num_samples: usize,
    },
    /// Full factorial design
    FullFactorial {
        /// Whether run order is shuffled
        randomize: bool,
    },
    /// Plackett-Burman design, every factor must have 2 steps
    TwoLevelScreening {
        /// Whether run order is shuffled
        randomize: bool,
    },
    /// Central composite design, every factor must be numerical with 3 steps
    CentralComposite {
        /// Whether run order is shuffled
        randomize: bool,
    },
    /// Box-Behnken design, every factor must be numerical with 3 steps
    BoxBehnken {
        /// Whether run order is shuffled
        randomize: bool,
    },
    /// D-optimal selection of `num_samples` runs
    OptimalSubset {
        /// Number of runs
        num_samples: usize,
    },
}

impl Strategy {
    /// Method implementing the strategy
    pub fn method(&self) -> Method {
        match self {
            Strategy::SpaceFilling { .. } => Method::SpaceFilling,
            Strategy::FullFactorial { .. } => Method::FullFactorial,
            Strategy::TwoLevelScreening { .. } => Method::TwoLevelScreening,
            Strategy::CentralComposite { .. } => Method::CentralComposite,
            Strategy::BoxBehnken { .. } => Method::BoxBehnken,
            Strategy::OptimalSubset { .. } => Method::OptimalSubset,
        }
    }

    /// Whether the rows of the design are shuffled (never for sample based strategies)
    pub fn randomize(&self) -> bool {
        match *self {
            Strategy::FullFactorial { randomize }
            | Strategy::TwoLevelScreening { randomize }
            | Strategy::CentralComposite { randomize }
            | Strategy::BoxBehnken { randomize } => randomize,
            Strategy::SpaceFilling { .. } | Strategy::OptimalSubset { .. } => false,
        }
    }

    /// Requested number of runs of sample based strategies
    pub fn num_samples(&self) -> Option<usize> {
        match *self {
            Strategy::SpaceFilling { num_samples } | Strategy::OptimalSubset { num_samples } => {
                Some(num_samples)
            }
            _ => None,
        }
    }
}

/// Loosely typed options as read from a configuration file
///
/// ```
/// use planbox::{Options, Strategy};
///
/// let options: Options = serde_json::from_str(r#"{"method": "lhs", "num_sample": 10}"#).unwrap();
/// let strategy = Strategy::try_from(&options).unwrap();
/// assert_eq!(strategy, Strategy::SpaceFilling { num_samples: 10 });
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Method name or alias
    pub method: String,
    /// Number of runs, required by sample based methods
    #[serde(default, alias = "num_sample", skip_serializing_if = "Option::is_none")]
    pub num_samples: Option<usize>,
    /// Row shuffling, required by combinatorial methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomize: Option<bool>,
    /// Seed of every random component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TryFrom<&Options> for Strategy {
    type Error = PlanError;

    fn try_from(options: &Options) -> Result<Self> {
        let method: Method = options.method.parse()?;
        let num_samples = || {
            options.num_samples.ok_or_else(|| {
                PlanError::InvalidConfig(format!("{method} requires the `num_samples` option"))
            })
        };
        let randomize = || {
            options.randomize.ok_or_else(|| {
                PlanError::InvalidConfig(format!("{method} requires the `randomize` option"))
            })
        };
        let strategy = match method {
            Method::SpaceFilling => Strategy::SpaceFilling {
                num_samples: num_samples()?,
            },
            Method::OptimalSubset => Strategy::OptimalSubset {
                num_samples: num_samples()?,
            },
            Method::FullFactorial => Strategy::FullFactorial {
                randomize: randomize()?,
            },
            Method::TwoLevelScreening => Strategy::TwoLevelScreening {
                randomize: randomize()?,
            },
            Method::CentralComposite => Strategy::CentralComposite {
                randomize: randomize()?,
            },
            Method::BoxBehnken => Strategy::BoxBehnken {
                randomize: randomize()?,
            },
        };
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(json: &str) -> Options {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_method_aliases() {
        for (name, method) in [
            ("lth", Method::SpaceFilling),
            ("latin_hypercube", Method::SpaceFilling),
            ("full_fact", Method::FullFactorial),
            ("placket_burman", Method::TwoLevelScreening),
            ("Plackett_Burman", Method::TwoLevelScreening),
            ("central_composite", Method::CentralComposite),
            ("box_behnken", Method::BoxBehnken),
            ("d_optimal", Method::OptimalSubset),
        ] {
            assert_eq!(name.parse::<Method>().unwrap(), method);
        }
        assert_eq!(
            Method::OptimalSubset.name().parse::<Method>().unwrap(),
            Method::OptimalSubset
        );
    }

    #[test]
    fn test_unknown_method() {
        assert!(matches!(
            "taguchi".parse::<Method>(),
            Err(PlanError::UnknownStrategy(name)) if name == "taguchi"
        ));
    }

    #[test]
    fn test_strategy_from_options() {
        let s = Strategy::try_from(&options(r#"{"method": "full_fact", "randomize": true}"#));
        assert_eq!(s.unwrap(), Strategy::FullFactorial { randomize: true });
        let s = Strategy::try_from(&options(r#"{"method": "d_optimal", "num_samples": 8}"#)).unwrap();
        assert_eq!(s, Strategy::OptimalSubset { num_samples: 8 });
        assert_eq!(s.num_samples(), Some(8));
        assert!(!s.randomize());
    }

    #[test]
    fn test_missing_option() {
        let s = Strategy::try_from(&options(r#"{"method": "box_behnken"}"#));
        assert!(matches!(s, Err(PlanError::InvalidConfig(_))));
        let s = Strategy::try_from(&options(r#"{"method": "lhs", "randomize": false}"#));
        assert!(matches!(s, Err(PlanError::InvalidConfig(_))));
        let s = Strategy::try_from(&options(r#"{"method": "simplex", "randomize": false}"#));
        assert!(matches!(s, Err(PlanError::UnknownStrategy(_))));
    }

    #[test]
    fn test_strategy_serde() {
        let s: Strategy =
            serde_json::from_str(r#"{"method": "central_composite", "randomize": false}"#).unwrap();
        assert_eq!(s, Strategy::CentralComposite { randomize: false });
        assert_eq!(s.method(), Method::CentralComposite);
    }
}
