/*!
This library implements the design matrices used to plan experiments:

* [Latin Hypercube sampling](crate::Lhs) for space-filling designs,
* [Full factorial](crate::FullFactorial) designs over mixed numbers of levels,
* [Plackett-Burman](crate::PlackettBurman) two-level screening designs,
* [Central composite](crate::CentralComposite) and [Box-Behnken](crate::BoxBehnken)
  three-level response surface designs,
* [D-optimal](crate::DOptimal) subset selection among candidate points.

Sampling methods ([SamplingMethod]) generate points within a design space `xlimits`
defined as a 2D ndarray `(nx, 2)` of lower and upper bounds. Classic designs
([CodedDesign]) are expressed in a coded space (level indices or `{-1, 0, 1}`).

Example:
```
use planbox_doe::{CodedDesign, FullFactorial, Lhs, LhsKind, PlackettBurman, SamplingMethod};
use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// Design space is defined as [5., 10.] x [0., 1.], samples are 2-dimensional.
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
// Five samples using centered Latin Hypercube sampling with a seeded generator
let samples = Lhs::new(&xlimits)
    .kind(LhsKind::Centered)
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .sample(5);
// Level indices of a 2x3 full factorial
let levels = FullFactorial::new(&[2, 3]).unwrap().coded();
// Screening of 5 two-level factors in 8 runs
let screening = PlackettBurman::new(5).unwrap().coded();
assert_eq!(screening.nrows(), 8);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod full_factorial;
mod lhs;
mod optimal;
mod plackett_burman;
mod response_surface;
mod traits;
mod utils;

pub use errors::*;
pub use full_factorial::*;
pub use lhs::*;
pub use optimal::*;
pub use plackett_burman::PlackettBurman;
pub use response_surface::*;
pub use traits::*;
pub use utils::pdist;
