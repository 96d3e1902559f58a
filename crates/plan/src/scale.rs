//! Scale transform between the real domain of a factor and its coded domain.
//!
//! The coded domain of a factor is its real domain, except for log factors
//! whose bounds are linearized in log10 space. Designs are generated in the
//! coded domain and every generated value is decoded by snapping it to the
//! nearest of the `step_count` evenly spaced levels.
use crate::factor::{NumericFactor, Scale};
use crate::table::Column;
use ndarray::{Array1, ArrayBase, Data, Ix1};
use serde::{Deserialize, Serialize};

/// Rule giving the center level of a log factor in three-level designs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMidpoint {
    /// `10^((log10(min) + log10(max)) / 2)`, the geometric mean of the bounds
    #[default]
    Geometric,
    /// `10^(log10(min) + log10(max) / 2)`, kept to reproduce earlier plans
    Legacy,
}

/// A numeric factor together with its coded bounds
///
/// Only [linearize_bounds] builds such a value, from a [NumericFactor]: bounds
/// cannot be linearized twice.
#[derive(Clone, Debug)]
pub struct Linearized<'a> {
    factor: &'a NumericFactor,
    lower: f64,
    upper: f64,
}

/// Coded bounds of a factor: `(log10(min), log10(max))` for log factors,
/// the real bounds otherwise. The factor is left untouched.
pub fn linearize_bounds(factor: &NumericFactor) -> Linearized<'_> {
    let (lower, upper) = match factor.scale() {
        Scale::Log => (factor.min().log10(), factor.max().log10()),
        Scale::Linear | Scale::Ordinal => (factor.min(), factor.max()),
    };
    Linearized {
        factor,
        lower,
        upper,
    }
}

impl Linearized<'_> {
    /// The underlying factor
    pub fn factor(&self) -> &NumericFactor {
        self.factor
    }

    /// Coded lower bound
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Coded upper bound
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Distance between two consecutive levels in the coded domain
    pub fn interval(&self) -> f64 {
        (self.upper - self.lower) / (self.factor.step_count() - 1) as f64
    }

    /// The `step_count` evenly spaced levels in the coded domain
    pub fn levels(&self) -> Array1<f64> {
        Array1::linspace(self.lower, self.upper, self.factor.step_count())
    }

    /// Index of the level nearest to the coded value `x`.
    ///
    /// Bin edges lie halfway between levels, the outer bins extend half an
    /// interval beyond the bounds and values outside are clamped to the end
    /// levels. A value exactly on an edge belongs to the lower bin.
    pub fn level_of(&self, x: f64) -> usize {
        let last = (self.factor.step_count() - 1) as f64;
        let t = (x - self.lower) / self.interval();
        (t - 0.5).ceil().max(0.).min(last) as usize
    }

    /// Real value of the level at `index`; end levels are the exact real bounds
    pub fn level_value(&self, index: usize) -> f64 {
        let last = self.factor.step_count() - 1;
        if index == 0 {
            return self.factor.min();
        }
        if index >= last {
            return self.factor.max();
        }
        let coded = self.lower + index as f64 * self.interval();
        match self.factor.scale() {
            Scale::Log => 10f64.powf(coded),
            Scale::Linear | Scale::Ordinal => coded,
        }
    }

    /// Real values of every level (level indices for ordinal factors)
    pub fn real_levels(&self) -> Array1<f64> {
        (0..self.factor.step_count())
            .map(|i| self.level_value(i))
            .collect()
    }

    /// Real center value used by three-level designs
    pub fn midpoint(&self, rule: LogMidpoint) -> f64 {
        let (min, max) = (self.factor.min(), self.factor.max());
        match (self.factor.scale(), rule) {
            (Scale::Log, LogMidpoint::Geometric) => 10f64.powf((self.lower + self.upper) / 2.),
            (Scale::Log, LogMidpoint::Legacy) => 10f64.powf(min.log10() + max.log10() / 2.),
            (Scale::Linear | Scale::Ordinal, _) => (min + max) / 2.,
        }
    }

    fn label(&self, index: usize) -> String {
        self.factor.options()[index.min(self.factor.options().len() - 1)].clone()
    }

    fn is_ordinal(&self) -> bool {
        self.factor.scale() == Scale::Ordinal
    }
}

/// Decodes coded values into the factor real domain.
///
/// Every coded value is snapped to its nearest level (see [Linearized::level_of]);
/// linear levels are returned as is, log levels are exponentiated and
/// ordinal levels are replaced by the corresponding option label.
///
/// ```
/// use planbox::{decode_column, linearize_bounds, Column, Factor};
/// use ndarray::array;
///
/// let factor = Factor::log("C", 1., 100., 3).unwrap().fold_to_numeric();
/// let coded = linearize_bounds(&factor);
/// let decoded = decode_column(&coded, &array![0., 0.9, 2.]);
/// assert_eq!(decoded, Column::Numbers(array![1., 10., 100.]));
/// ```
pub fn decode_column(lin: &Linearized, coded: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Column {
    let indices = coded.iter().map(|&x| lin.level_of(x));
    if lin.is_ordinal() {
        Column::Labels(indices.map(|i| lin.label(i)).collect())
    } else {
        Column::Numbers(indices.map(|i| lin.level_value(i)).collect())
    }
}

/// Decodes level indices `0..step_count-1` into the factor real domain
pub fn decode_levels(lin: &Linearized, levels: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Column {
    let coded = lin.levels();
    let last = coded.len() - 1;
    let values = levels.mapv(|l| coded[(l.round().max(0.) as usize).min(last)]);
    decode_column(lin, &values)
}

/// Decodes values of `{-1, 0, 1}` into `{min, midpoint, max}`
///
/// Values are rounded to the nearest of `{-1, 0, 1}`.
pub fn decode_signed(
    lin: &Linearized,
    coded: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rule: LogMidpoint,
) -> Column {
    let signs = coded.iter().map(|&x| x.round().max(-1.).min(1.) as i8);
    if lin.is_ordinal() {
        let last = lin.factor.step_count() - 1;
        let center = lin.level_of(lin.midpoint(rule));
        Column::Labels(
            signs
                .map(|s| match s {
                    -1 => lin.label(0),
                    0 => lin.label(center),
                    _ => lin.label(last),
                })
                .collect(),
        )
    } else {
        let (min, mid, max) = (lin.factor.min(), lin.midpoint(rule), lin.factor.max());
        Column::Numbers(
            signs
                .map(|s| match s {
                    -1 => min,
                    0 => mid,
                    _ => max,
                })
                .collect(),
        )
    }
}

/// Decodes values already expressed in the real domain, such as rows of a
/// candidate grid: values are snapped back onto the factor levels and
/// ordinal values are replaced by their label.
pub fn decode_real(lin: &Linearized, values: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Column {
    match lin.factor.scale() {
        Scale::Log => decode_column(lin, &values.mapv(f64::log10)),
        Scale::Linear | Scale::Ordinal => decode_column(lin, values),
    }
}
