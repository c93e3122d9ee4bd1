//! CUR decompositions of dense matrices.
//!
//! A CUR decomposition approximates a matrix $A$ by the product $CUR$, where
//! $C$ and $R$ consist of scaled columns and rows sampled from $A$ itself and
//! $U$ is the Moore-Penrose optimal linking matrix. Because the factors are
//! built from actual matrix entries, the approximation preserves the
//! interpretability and sparsity structure that generic factorizations such
//! as the SVD lose.

pub mod cur;
pub mod pinv;
pub mod random_matrix;
pub mod sampling;
pub mod types;

pub use cur::{CURData, CUR};
pub use pinv::{ComputePinv, PinvData, ScalarType};
pub use random_matrix::RandomMatrix;
pub use sampling::{sample_indices, sample_probabilities};
pub use types::{RelDiff, Result, RustyCurError};
