//! Factor model: the experimental variables of a plan.
//!
//! A [Factor] is either numerical (linear or logarithmic scale, bounded,
//! discretized in `step_count` levels) or categorical (a finite ordered set of
//! option labels). Before a design is generated every factor is folded into a
//! [NumericFactor] so that all strategies work on numbers only.
use crate::errors::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Labels of the two levels created by [FactorSet::one_hot]
pub const ONE_HOT_OPTIONS: [&str; 2] = ["on", "off"];

/// Kind of an experimental variable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Numerical variable with evenly spaced levels
    Linear,
    /// Positive numerical variable with levels evenly spaced in log10 space
    Log,
    /// Variable taking one of a finite set of labels
    Categorical,
}

/// Raw factor declaration as produced by a loader
///
/// Numerical declarations require `min`, `max` and `step_count`.
/// Categorical declarations require `options`; `step_count`, when given,
/// must match the number of options and bounds are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorDecl {
    /// Unique factor name
    pub name: String,
    /// Kind of variable
    pub kind: FactorKind,
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Number of levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<usize>,
    /// Ordered option labels of a categorical factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A validated experimental variable
#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    name: String,
    kind: FactorKind,
    min: f64,
    max: f64,
    step_count: usize,
    options: Vec<String>,
}

impl Factor {
    /// Builds a factor from a raw declaration
    pub fn new(decl: &FactorDecl) -> Result<Self> {
        match decl.kind {
            FactorKind::Categorical => {
                let options = decl.options.as_ref().ok_or_else(|| {
                    PlanError::InvalidFactor(format!(
                        "categorical factor '{}' declares no options",
                        decl.name
                    ))
                })?;
                if let Some(steps) = decl.step_count {
                    if steps != options.len() {
                        return Err(PlanError::InvalidFactor(format!(
                            "categorical factor '{}' declares {steps} steps but {} options",
                            decl.name,
                            options.len()
                        )));
                    }
                }
                Factor::categorical(&decl.name, options.iter().cloned())
            }
            kind => {
                let missing = |what: &str| {
                    PlanError::InvalidFactor(format!("factor '{}' misses {what}", decl.name))
                };
                let min = decl.min.ok_or_else(|| missing("min"))?;
                let max = decl.max.ok_or_else(|| missing("max"))?;
                let step_count = decl.step_count.ok_or_else(|| missing("step_count"))?;
                Factor::numerical(&decl.name, kind, min, max, step_count)
            }
        }
    }

    /// Linear factor with `step_count` levels evenly spaced in `[min, max]`
    ///
    /// ```
    /// use planbox::Factor;
    ///
    /// let temperature = Factor::linear("temperature", 20., 80., 3).unwrap();
    /// assert!(Factor::linear("pressure", 2., 1., 3).is_err());
    /// ```
    pub fn linear(name: &str, min: f64, max: f64, step_count: usize) -> Result<Self> {
        Factor::numerical(name, FactorKind::Linear, min, max, step_count)
    }

    /// Logarithmic factor with `step_count` levels evenly spaced in `[log10(min), log10(max)]`
    pub fn log(name: &str, min: f64, max: f64, step_count: usize) -> Result<Self> {
        Factor::numerical(name, FactorKind::Log, min, max, step_count)
    }

    /// Categorical factor taking one of the given ordered options
    pub fn categorical<S: Into<String>>(
        name: &str,
        options: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        check_name(name)?;
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.len() < 2 {
            return Err(PlanError::InvalidFactor(format!(
                "categorical factor '{name}' needs at least 2 options, got {}",
                options.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = options.iter().find(|o| !seen.insert(o.as_str())) {
            return Err(PlanError::InvalidFactor(format!(
                "categorical factor '{name}' declares option '{dup}' twice"
            )));
        }
        Ok(Factor {
            name: name.to_string(),
            kind: FactorKind::Categorical,
            min: 0.,
            max: (options.len() - 1) as f64,
            step_count: options.len(),
            options,
        })
    }

    fn numerical(
        name: &str,
        kind: FactorKind,
        min: f64,
        max: f64,
        step_count: usize,
    ) -> Result<Self> {
        check_name(name)?;
        if step_count < 2 {
            return Err(PlanError::InvalidFactor(format!(
                "factor '{name}' needs at least 2 steps, got {step_count}"
            )));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(PlanError::InvalidFactor(format!(
                "factor '{name}' has non finite bounds [{min}, {max}]"
            )));
        }
        if min >= max {
            return Err(PlanError::InvalidFactor(format!(
                "factor '{name}' has inverted bounds: min {min} >= max {max}"
            )));
        }
        if kind == FactorKind::Log && min <= 0. {
            return Err(PlanError::InvalidFactor(format!(
                "log factor '{name}' requires positive bounds, got min {min}"
            )));
        }
        Ok(Factor {
            name: name.to_string(),
            kind,
            min,
            max,
            step_count,
            options: vec![],
        })
    }

    /// Factor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Factor kind
    pub fn kind(&self) -> FactorKind {
        self.kind
    }

    /// Lower bound (0 for categorical factors)
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound (number of options - 1 for categorical factors)
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of levels
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Option labels, empty for numerical factors
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Numeric equivalent of the factor.
    ///
    /// Categorical factors become ordinal factors over `0..count-1` with
    /// `count` steps, retaining their options for decoding.
    pub fn fold_to_numeric(&self) -> NumericFactor {
        let scale = match self.kind {
            FactorKind::Linear => Scale::Linear,
            FactorKind::Log => Scale::Log,
            FactorKind::Categorical => Scale::Ordinal,
        };
        NumericFactor {
            name: self.name.clone(),
            scale,
            min: self.min,
            max: self.max,
            step_count: self.step_count,
            options: self.options.clone(),
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PlanError::InvalidFactor(
            "factor name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Scale of a numeric factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Levels evenly spaced in the real domain
    Linear,
    /// Levels evenly spaced in log10 space
    Log,
    /// Level indices of a folded categorical factor
    Ordinal,
}

/// A factor expressed on a numeric scale, see [Factor::fold_to_numeric]
#[derive(Clone, Debug, PartialEq)]
pub struct NumericFactor {
    name: String,
    scale: Scale,
    min: f64,
    max: f64,
    step_count: usize,
    options: Vec<String>,
}

impl NumericFactor {
    /// Factor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric scale
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Real lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Real upper bound
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of levels
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Labels retained from a categorical factor
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Ordered collection of factors with unique names
///
/// The order of the factors defines the column order of the designs.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorSet {
    factors: Vec<Factor>,
}

impl FactorSet {
    /// Builds a non empty factor set, names have to be unique
    pub fn new(factors: Vec<Factor>) -> Result<Self> {
        if factors.is_empty() {
            return Err(PlanError::InvalidFactor(
                "neither numerical nor categorical factor is declared".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = factors.iter().find(|f| !seen.insert(f.name())) {
            return Err(PlanError::InvalidFactor(format!(
                "factor name '{}' is declared twice",
                dup.name()
            )));
        }
        Ok(FactorSet { factors })
    }

    /// Builds a factor set from raw declarations
    pub fn from_decls(decls: &[FactorDecl]) -> Result<Self> {
        let factors = decls.iter().map(Factor::new).collect::<Result<Vec<_>>>()?;
        FactorSet::new(factors)
    }

    /// Number of factors
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Always false as a factor set holds at least one factor
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Iterator over the factors in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Factor> {
        self.factors.iter()
    }

    /// Factor names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.name.clone()).collect()
    }

    /// Factor with the given name
    pub fn get(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name == name)
    }

    /// Whether at least one factor is categorical
    pub fn has_categorical(&self) -> bool {
        self.factors
            .iter()
            .any(|f| f.kind == FactorKind::Categorical)
    }

    /// Numeric equivalents of the factors, categorical factors being folded
    pub fn fold(&self) -> Vec<NumericFactor> {
        self.factors.iter().map(Factor::fold_to_numeric).collect()
    }

    /// One-hot expansion of the categorical factors.
    ///
    /// Each categorical factor with options `o_1, ..., o_k` is replaced, at its
    /// position, by `k` two-level categorical factors named `{name}_{o_i}` with
    /// options `["on", "off"]`. Numerical factors are kept as is.
    ///
    /// ```
    /// use planbox::{Factor, FactorSet};
    ///
    /// let factors = FactorSet::new(vec![
    ///     Factor::categorical("color", ["red", "blue", "green"]).unwrap(),
    ///     Factor::linear("x", 0., 1., 2).unwrap(),
    /// ]).unwrap();
    /// let expanded = factors.one_hot().unwrap();
    /// assert_eq!(expanded.names(), vec!["color_red", "color_blue", "color_green", "x"]);
    /// ```
    pub fn one_hot(&self) -> Result<FactorSet> {
        let mut factors = Vec::with_capacity(self.factors.len());
        for factor in &self.factors {
            match factor.kind {
                FactorKind::Categorical => {
                    for option in &factor.options {
                        factors.push(Factor::categorical(
                            &format!("{}_{option}", factor.name),
                            ONE_HOT_OPTIONS,
                        )?);
                    }
                }
                _ => factors.push(factor.clone()),
            }
        }
        FactorSet::new(factors)
    }
}

impl<'a> IntoIterator for &'a FactorSet {
    type Item = &'a Factor;
    type IntoIter = std::slice::Iter<'a, Factor>;

    fn into_iter(self) -> Self::IntoIter {
        self.factors.iter()
    }
}
