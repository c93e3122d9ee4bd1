//! CUR decomposition of a matrix.
//!
//! The CUR decomposition of a matrix $A\in\mathbb{C}^{m\times n}$ approximates
//! $A\approx CUR$, where $C\in\mathbb{C}^{m\times s_c}$ holds $s_c$ sampled
//! columns of $A$, $R\in\mathbb{C}^{s_r\times n}$ holds $s_r$ sampled rows,
//! and $U = C^\dagger A R^\dagger\in\mathbb{C}^{s_c\times s_r}$ is the
//! Moore-Penrose optimal linking matrix minimizing $\|A - CUR\|$ for the
//! given $C$ and $R$. Rows and columns are drawn with probability
//! proportional to their squared-magnitude energy, so the factors are built
//! from actual entries of $A$ and remain interpretable in terms of the
//! original data.
//!
//! Sampling is with replacement. A column drawn $t$ times occupies $t$ slots
//! of $C$, each scaled by the square root of its occurrence count, which
//! corrects the oversampling bias relative to a naive concatenation. The
//! occurrence count of every slot is one, so repeated draws increase the
//! weight of an index through repetition rather than through the counts.

use crate::pinv::{ComputePinv, ScalarType};
use crate::sampling::{sample_indices, sample_probabilities};
use crate::types::{Result, RustyCurError, Scalar};
use itertools::zip_eq;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use num::traits::cast::cast;
use num::Float;
use rand::Rng;

/// The factors of a CUR decomposition.
pub struct CURData<A: Scalar> {
    /// The sampled column matrix, scaled by occurrence counts
    pub c: Array2<A>,
    /// The linking matrix
    pub u: Array2<A>,
    /// The sampled row matrix, scaled by occurrence counts
    pub r: Array2<A>,
    /// Sampled row indices, ascending, duplicates permitted
    pub row_ind: Array1<usize>,
    /// Sampled column indices, ascending, duplicates permitted
    pub col_ind: Array1<usize>,
    /// True if a sampled submatrix turned out rank deficient. The factors
    /// are still valid but the reconstruction error may be large.
    pub rank_deficient: bool,
}

impl<A: Scalar> CURData<A> {
    /// Number of rows of the decomposed matrix.
    pub fn nrows(&self) -> usize {
        self.c.nrows()
    }

    /// Number of columns of the decomposed matrix.
    pub fn ncols(&self) -> usize {
        self.r.ncols()
    }

    /// Number of sampled rows.
    pub fn row_rank(&self) -> usize {
        self.r.nrows()
    }

    /// Number of sampled columns.
    pub fn col_rank(&self) -> usize {
        self.c.ncols()
    }

    /// Convert the decomposition to a matrix by evaluating $CUR$.
    pub fn to_mat(&self) -> Array2<A> {
        self.c.dot(&self.u).dot(&self.r)
    }
}

/// A CUR decomposer for a fixed matrix and rank configuration.
///
/// The matrix and the two sample counts are fixed at construction.
/// [`factorize`](CUR::factorize) can be called repeatedly; every call
/// resamples rows and columns, so two calls only agree when driven by
/// identically seeded random number generators.
pub struct CUR<A: ScalarType> {
    data: Array2<A>,
    row_rank: usize,
    col_rank: usize,
}

impl<A: ScalarType> CUR<A> {
    /// Create a new decomposer for `data`.
    ///
    /// `row_rank` and `col_rank` are the number of rows and columns to
    /// sample. Both must be positive and must not exceed the corresponding
    /// matrix dimension.
    pub fn new(data: Array2<A>, row_rank: usize, col_rank: usize) -> Result<CUR<A>> {
        if row_rank == 0
            || col_rank == 0
            || row_rank > data.nrows()
            || col_rank > data.ncols()
        {
            return Err(RustyCurError::ConfigurationError);
        }

        Ok(CUR {
            data,
            row_rank,
            col_rank,
        })
    }

    /// Return a view onto the stored matrix.
    pub fn data(&self) -> ArrayView2<A> {
        self.data.view()
    }

    /// The configured number of rows to sample.
    pub fn row_rank(&self) -> usize {
        self.row_rank
    }

    /// The configured number of columns to sample.
    pub fn col_rank(&self) -> usize {
        self.col_rank
    }

    /// Compute a CUR decomposition of the stored matrix.
    ///
    /// Sequences the sampling probability estimate, the row and column
    /// index draws and the factor assembly. Rank deficiency of a sampled
    /// submatrix is reported through [`CURData::rank_deficient`] and a
    /// warning log entry; it does not fail the call.
    pub fn factorize<R: Rng>(&self, rng: &mut R) -> Result<CURData<A>> {
        let (row_probs, col_probs) = sample_probabilities(self.data.view())?;

        let row_ind = sample_indices(self.row_rank, row_probs.view(), rng);
        let col_ind = sample_indices(self.col_rank, col_probs.view(), rng);

        debug!(
            "sampled row indices {:?} and column indices {:?}",
            row_ind, col_ind
        );

        // One occurrence per sampled slot; repeated indices keep their own slot.
        let row_cnt = Array1::<usize>::ones(row_ind.len());
        let col_cnt = Array1::<usize>::ones(col_ind.len());

        let (c, u, r, rank_deficient) = assemble_factors(
            self.data.view(),
            row_ind.view(),
            row_cnt.view(),
            col_ind.view(),
            col_cnt.view(),
        )?;

        if rank_deficient {
            warn!("A sampled submatrix is rank deficient. Reconstruction error may be large.");
        }

        Ok(CURData {
            c,
            u,
            r,
            row_ind,
            col_ind,
            rank_deficient,
        })
    }
}

// Build the scaled column and row submatrices for the given sampled indices
// and occurrence counts and link them through the pseudo-inverses.
pub(crate) fn assemble_factors<A: ScalarType>(
    arr: ArrayView2<A>,
    row_ind: ArrayView1<usize>,
    row_cnt: ArrayView1<usize>,
    col_ind: ArrayView1<usize>,
    col_cnt: ArrayView1<usize>,
) -> Result<(Array2<A>, Array2<A>, Array2<A>, bool)> {
    let (nrows, ncols) = arr.dim();

    let mut c = Array2::<A>::zeros((nrows, col_ind.len()));
    for (slot, (&index, &count)) in zip_eq(col_ind.iter(), col_cnt.iter()).enumerate() {
        let weight = A::from_real(Float::sqrt(cast::<usize, A::Real>(count).unwrap()));
        let scaled = arr.index_axis(Axis(1), index).map(|&item| item * weight);
        c.index_axis_mut(Axis(1), slot).assign(&scaled);
    }

    let mut r = Array2::<A>::zeros((row_ind.len(), ncols));
    for (slot, (&index, &count)) in zip_eq(row_ind.iter(), row_cnt.iter()).enumerate() {
        let weight = A::from_real(Float::sqrt(cast::<usize, A::Real>(count).unwrap()));
        let scaled = arr.index_axis(Axis(0), index).map(|&item| item * weight);
        r.index_axis_mut(Axis(0), slot).assign(&scaled);
    }

    let c_pinv = A::compute_pinv(c.view())?;
    let r_pinv = A::compute_pinv(r.view())?;

    let rank_deficient = c_pinv.rank < nrows.min(col_ind.len())
        || r_pinv.rank < row_ind.len().min(ncols);

    let u = c_pinv.inv.dot(&arr).dot(&r_pinv.inv);

    Ok((c, u, r, rank_deficient))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::random_matrix::RandomMatrix;
    use crate::types::RelDiff;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn factor_shapes_of_concrete_matrix() {
        let mat = array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];
        let decomposer = CUR::new(mat, 1, 2).unwrap();
        let mut rng = rand::thread_rng();

        let result = decomposer.factorize(&mut rng).unwrap();

        assert_eq!(result.c.dim(), (2, 2));
        assert_eq!(result.u.dim(), (2, 1));
        assert_eq!(result.r.dim(), (1, 3));
        assert_eq!(result.to_mat().dim(), (2, 3));
        assert_eq!(result.nrows(), 2);
        assert_eq!(result.ncols(), 3);
        assert_eq!(result.row_rank(), 1);
        assert_eq!(result.col_rank(), 2);
        assert!(result.row_ind.iter().all(|&index| index < 2));
        assert!(result.col_ind.iter().all(|&index| index < 3));
    }

    #[test]
    fn invalid_rank_configuration_is_rejected() {
        let mat = Array2::<f64>::ones((3, 4));

        assert!(matches!(
            CUR::new(mat.clone(), 0, 2),
            Err(RustyCurError::ConfigurationError)
        ));
        assert!(matches!(
            CUR::new(mat.clone(), 2, 0),
            Err(RustyCurError::ConfigurationError)
        ));
        assert!(matches!(
            CUR::new(mat.clone(), 4, 2),
            Err(RustyCurError::ConfigurationError)
        ));
        assert!(matches!(
            CUR::new(mat.clone(), 2, 5),
            Err(RustyCurError::ConfigurationError)
        ));
        assert!(CUR::new(mat, 3, 4).is_ok());
    }

    #[test]
    fn zero_matrix_fails_before_sampling() {
        let decomposer = CUR::new(Array2::<f64>::zeros((3, 3)), 1, 1).unwrap();
        let mut rng = rand::thread_rng();

        assert!(matches!(
            decomposer.factorize(&mut rng),
            Err(RustyCurError::DegenerateInputError)
        ));
    }

    #[test]
    fn factors_consist_of_matrix_rows_and_columns() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((12, 9), &mut rng);
        let decomposer = CUR::new(mat.clone(), 3, 4).unwrap();

        let result = decomposer.factorize(&mut rng).unwrap();

        // With unit occurrence counts the factor slots are verbatim copies
        // of the sampled rows and columns.
        for (slot, &index) in result.row_ind.iter().enumerate() {
            let actual = result.r.index_axis(Axis(0), slot);
            let expected = mat.index_axis(Axis(0), index);
            assert!(f64::rel_diff_l2(actual, expected) < 1E-12);
        }
        for (slot, &index) in result.col_ind.iter().enumerate() {
            let actual = result.c.index_axis(Axis(1), slot);
            let expected = mat.index_axis(Axis(1), index);
            assert!(f64::rel_diff_l2(actual, expected) < 1E-12);
        }
    }

    #[test]
    fn seeded_factorizations_are_identical() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((20, 15), &mut rng);
        let decomposer = CUR::new(mat, 4, 5).unwrap();

        let mut first_rng = StdRng::seed_from_u64(42);
        let first = decomposer.factorize(&mut first_rng).unwrap();

        let mut second_rng = StdRng::seed_from_u64(42);
        let second = decomposer.factorize(&mut second_rng).unwrap();

        assert_eq!(first.row_ind, second.row_ind);
        assert_eq!(first.col_ind, second.col_ind);
        assert_eq!(first.c, second.c);
        assert_eq!(first.u, second.u);
        assert_eq!(first.r, second.r);
    }

    #[test]
    fn rank_one_matrix_is_reconstructed_exactly() {
        // Every row and column of this rank one matrix spans the full
        // row and column space, so a single sample of each reconstructs
        // the matrix up to numerical precision.
        let left = [1.0, 2.0, 3.0];
        let right = [2.0, 1.0, 4.0, 0.5];
        let mat = Array2::from_shape_fn((3, 4), |(i, j)| left[i] * right[j]);

        let decomposer = CUR::new(mat.clone(), 1, 1).unwrap();
        let mut rng = rand::thread_rng();

        let result = decomposer.factorize(&mut rng).unwrap();

        assert!(!result.rank_deficient);
        assert!(f64::rel_diff_fro(result.to_mat().view(), mat.view()) < 1E-10);
    }

    #[test]
    fn oversampled_rank_one_matrix_reports_deficiency() {
        let left = [1.0, 2.0, 3.0];
        let right = [2.0, 1.0, 4.0];
        let mat = Array2::from_shape_fn((3, 3), |(i, j)| left[i] * right[j]);

        // Two samples of a rank one matrix always give a rank deficient
        // submatrix, whether or not the same index is drawn twice.
        let decomposer = CUR::new(mat.clone(), 2, 2).unwrap();
        let mut rng = rand::thread_rng();

        let result = decomposer.factorize(&mut rng).unwrap();

        assert!(result.rank_deficient);
        assert!(f64::rel_diff_fro(result.to_mat().view(), mat.view()) < 1E-10);
    }

    #[test]
    fn repeated_draws_are_scaled_by_the_count_root() {
        let mat = array![[2.0, 0.0], [0.0, 3.0]];

        let row_ind = array![0, 1];
        let row_cnt = array![1, 1];
        let col_ind = array![1, 1];
        let col_cnt = array![2, 2];

        let (c, _, _, _) = assemble_factors(
            mat.view(),
            row_ind.view(),
            row_cnt.view(),
            col_ind.view(),
            col_cnt.view(),
        )
        .unwrap();

        // Column 1 of the matrix is [0, 3]; a count of two scales it by sqrt(2).
        let expected = 3.0 * 2.0_f64.sqrt();
        assert!((c[[1, 0]] - expected).abs() < 1E-12);
        assert!((c[[1, 1]] - expected).abs() < 1E-12);
        assert!(c[[0, 0]].abs() < 1E-12);
        assert!(c[[0, 1]].abs() < 1E-12);
    }

    macro_rules! reconstruction_tests {

        ($($name:ident: $scalar:ty, $dim:expr, $rank:expr, $samples:expr, $tol:expr,)*) => {

            $(

        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_low_rank($dim, $rank, &mut rng);
            let decomposer = CUR::new(mat.clone(), $samples, $samples).unwrap();

            // Sampling is randomized, so the spanning property is only
            // statistical. Demand that the large majority of trials
            // reconstruct the matrix to the target tolerance.
            let mut successes = 0;
            for _ in 0..20 {
                let result = decomposer.factorize(&mut rng).unwrap();
                if <$scalar>::rel_diff_fro(result.to_mat().view(), mat.view()) < $tol {
                    successes += 1;
                }
            }
            assert!(successes >= 15);
        }

            )*

        }
    }

    reconstruction_tests! {
        reconstruction_of_low_rank_f32: f32, (50, 40), 3, 15, 1E-2,
        reconstruction_of_low_rank_f64: f64, (50, 40), 3, 15, 1E-8,
        reconstruction_of_low_rank_c32: ndarray_linalg::c32, (50, 40), 3, 15, 1E-2,
        reconstruction_of_low_rank_c64: ndarray_linalg::c64, (50, 40), 3, 15, 1E-8,
    }
}
