//! Magnitude-based sampling of row and column indices.
//!
//! For a matrix $A\in\mathbb{C}^{m\times n}$ the row sampling probabilities are
//! defined as $p_i = \sum_j |a_{ij}|^2 / \sum_{ij} |a_{ij}|^2$ and the column
//! probabilities correspondingly with the roles of rows and columns swapped.
//! Rows and columns that carry more energy are therefore more likely to be
//! selected, which bounds the expected reconstruction error of the sampled
//! approximation relative to uniform sampling.
//!
//! Indices are drawn independently with replacement by inverting the
//! cumulative distribution with uniform samples from $[0, 1)$. Repeated
//! selection of a high-energy index is allowed and preserved in the output.

use crate::types::{Result, RustyCurError, Scalar};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use num::{Float, Zero};
use rand::Rng;

/// Return the row and column sampling probabilities of a matrix.
///
/// The two returned vectors have lengths `arr.nrows()` and `arr.ncols()`
/// and each sums to one. Probabilities are invariant under scaling of
/// `arr` by a nonzero constant.
///
/// Fails with [`RustyCurError::DegenerateInputError`] if the matrix has no
/// energy along an axis, since the probabilities are undefined in that case.
pub fn sample_probabilities<A: Scalar>(
    arr: ArrayView2<A>,
) -> Result<(Array1<A::Real>, Array1<A::Real>)> {
    let squared = arr.map(|item| item.square());

    let row_energy = squared.sum_axis(Axis(1));
    let col_energy = squared.sum_axis(Axis(0));

    let row_total = row_energy.sum();
    let col_total = col_energy.sum();

    if row_total <= A::Real::zero() || col_total <= A::Real::zero() {
        return Err(RustyCurError::DegenerateInputError);
    }

    Ok((
        row_energy.mapv(|item| item / row_total),
        col_energy.mapv(|item| item / col_total),
    ))
}

/// Draw `count` indices from the distribution `probs`, with replacement.
///
/// Each draw inverts the cumulative sum of `probs` with a uniform sample
/// from $[0, 1)$. The result is sorted ascending, has length exactly
/// `count`, and may contain duplicates. `probs` must be a valid discrete
/// probability distribution; draws falling above the final cumulative value
/// due to rounding are clamped to the last index.
///
/// # Arguments
///
/// * `count`: The number of indices to draw.
/// * `probs`: The probability of selecting each index.
/// * `rng`: The random number generator to use.
pub fn sample_indices<T: Float, R: Rng>(
    count: usize,
    probs: ArrayView1<T>,
    rng: &mut R,
) -> Array1<usize> {
    assert!(
        !probs.is_empty(),
        "`sample_indices`: probability vector must not be empty"
    );

    let n = probs.len();

    let mut cumulative = Vec::<f64>::with_capacity(n);
    let mut acc = 0.0;
    for item in probs.iter() {
        acc += item.to_f64().unwrap();
        cumulative.push(acc);
    }

    let mut indices = Vec::<usize>::with_capacity(count);
    for _ in 0..count {
        let draw = rng.gen::<f64>();
        let index = cumulative
            .iter()
            .position(|&item| item >= draw)
            .unwrap_or(n - 1);
        indices.push(index);
    }
    indices.sort_unstable();

    Array1::from(indices)
}
