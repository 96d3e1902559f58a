use linfa::Float;
use ndarray::Array2;

/// Sampling method allowing to generate a DoE in a given sample space
///
/// A sampling method is able to generate a set of `ns` samples in a given sample space
/// defined by `[lower_bound_xi, upper_bound_xi]^nx` where `nx` is the dimension
/// of the sample space.
pub trait SamplingMethod<F: Float> {
    /// Returns the bounds of the sample space as a (nx, 2) matrix
    /// where the ith row is the interval of the ith component of a sample.
    fn sampling_space(&self) -> &Array2<F>;

    /// Generates a (ns, nx)-shaped array of samples belonging to `[0., 1.]^nx`
    fn normalized_sample(&self, ns: usize) -> Array2<F>;

    /// Generates a (ns, nx)-shaped array of samples belonging to the sample space.
    ///
    /// Normalized samples are mapped back with an inverse min-max scaling
    /// using the bounds returned by `sampling_space`.
    fn sample(&self, ns: usize) -> Array2<F> {
        let xlimits = self.sampling_space();
        let lower = xlimits.column(0);
        let scaler = &xlimits.column(1) - &lower;
        self.normalized_sample(ns) * scaler + lower
    }
}

/// A deterministic design expressed in a coded space
///
/// Classic designs (factorial, screening, response surface) do not depend on
/// the factor bounds: they produce coded levels (level indices or `{-1, 0, 1}`)
/// which are decoded afterwards by the caller.
pub trait CodedDesign {
    /// Number of factors (columns) of the design
    fn nx(&self) -> usize;

    /// Number of runs (rows) of the design
    fn n_runs(&self) -> usize;

    /// Builds the (n_runs, nx) coded matrix
    fn coded(&self) -> Array2<f64>;
}
