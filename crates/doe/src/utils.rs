use linfa::Float;
use ndarray::{Array, Array1, ArrayBase, Data, Ix2};
use ndarray_stats::DeviationExt;
use rayon::prelude::*;

/// Euclidean distances between every pair of runs of a design, rows in parallel
///
/// Feeds the maximin criterion of the hypercube: only the smallest distance is
/// read, the order of the result is unspecified.
pub fn pdist<F: Float>(x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>) -> Array1<F> {
    let nrows = x.nrows();
    let pairs: Vec<_> = (0..nrows)
        .flat_map(|i| ((i + 1)..nrows).map(move |j| (i, j)))
        .collect();

    let distances: Vec<_> = pairs
        .par_iter()
        .map(|&(i, j)| F::cast(x.row(i).l2_dist(&x.row(j)).unwrap()))
        .collect();

    Array::from_vec(distances)
}

/// Trial division primality test, enough for design orders
pub(crate) fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Quadratic character of `a` modulo the odd prime `p`
///
/// Returns 1 for a non-zero quadratic residue, -1 for a non-residue, 0 when `p` divides `a`.
pub(crate) fn legendre(a: usize, p: usize) -> i8 {
    let a = a % p;
    if a == 0 {
        return 0;
    }
    // Euler's criterion: a^((p-1)/2) mod p
    let (mut base, mut exp, mut acc) = (a as u64, ((p - 1) / 2) as u64, 1u64);
    let m = p as u64;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    if acc == 1 {
        1
    } else {
        -1
    }
}
