//! This library generates experiment plans (design of experiments tables) from a
//! declarative specification of the experimental variables.
//!
//! Factors are either numerical, with a linear or logarithmic scale, or
//! categorical ([Factor], [FactorSet]). A design is generated in a coded space
//! by a [DesignProvider] (by default the classic designs of `planbox-doe`) then
//! every column is decoded back into the factor real domain ([decode_column]).
//!
//! Six strategies ([Strategy]) are available:
//! * space filling (Latin hypercube),
//! * full factorial,
//! * two-level screening (Plackett-Burman),
//! * central composite and Box-Behnken response surfaces,
//! * optimal subset (D-optimal selection among the full factorial grid).
//!
//! Example:
//! ```
//! use planbox::{create_table, Factor, FactorSet, PlanParams, Strategy};
//!
//! let factors = FactorSet::new(vec![
//!     Factor::linear("temperature", 20., 80., 3).unwrap(),
//!     Factor::log("concentration", 1e-3, 1e-1, 3).unwrap(),
//!     Factor::categorical("catalyst", ["Pt", "Pd"]).unwrap(),
//! ])
//! .unwrap();
//! let table = create_table(&factors, PlanParams::new(Strategy::FullFactorial { randomize: false }))
//!     .unwrap();
//! assert_eq!(table.nrows(), 18);
//! assert_eq!(table.names(), ["temperature", "concentration", "catalyst"]);
//! ```
//!
//! Plans can also be built from loosely typed declarations and options,
//! as read from a configuration file with [build].
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod factor;
mod orchestrator;
mod parameters;
mod provider;
mod scale;
mod strategy;
mod table;

pub use errors::*;
pub use factor::*;
pub use orchestrator::*;
pub use parameters::*;
pub use provider::*;
pub use scale::*;
pub use strategy::*;
pub use table::*;

use linfa::ParamGuard;

/// Builds the design table of the factor set with the default provider
pub fn create_table(factors: &FactorSet, params: PlanParams) -> Result<DesignTable> {
    let params = params.check()?;
    Orchestrator::new().run(factors, &params)
}

/// Builds a design table from raw factor declarations and options
///
/// ```
/// use planbox::{build, FactorDecl, Options};
///
/// let decls: Vec<FactorDecl> = serde_json::from_str(r#"[
///     {"name": "A", "kind": "linear", "min": 0, "max": 10, "step_count": 2},
///     {"name": "B", "kind": "categorical", "options": ["x", "y"]}
/// ]"#).unwrap();
/// let options: Options = serde_json::from_str(r#"{"method": "placket_burman", "randomize": false}"#)
///     .unwrap();
/// let table = build(&decls, &options).unwrap();
/// assert_eq!(table.nrows(), 4);
/// ```
pub fn build(decls: &[FactorDecl], options: &Options) -> Result<DesignTable> {
    let params = PlanParams::try_from(options)?;
    let factors = FactorSet::from_decls(decls)?;
    create_table(&factors, params)
}
