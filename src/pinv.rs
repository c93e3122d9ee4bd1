//! Moore-Penrose pseudo-inverse computed through the SVD.
//!
//! For $A = U\Sigma V^H$ the pseudo-inverse is $A^\dagger = V\Sigma^\dagger U^H$,
//! where $\Sigma^\dagger$ contains the reciprocals of the singular values that
//! lie above a cutoff and zeros elsewhere. The number of retained singular
//! values is the effective rank of $A$.

use crate::types::{c32, c64, Result, RustyCurError, Scalar};
use ndarray::{Array2, ArrayView2, Axis, Zip};
use ndarray_linalg::{JobSvd, Lapack, SVDDCInto};
use num::traits::cast::cast;
use num::{Float, One, Zero};

pub struct PinvData<A: Scalar> {
    /// The pseudo-inverse matrix
    pub inv: Array2<A>,
    /// The number of singular values above the cutoff
    pub rank: usize,
}

pub trait ComputePinv {
    type A: Scalar;

    /// Compute the pseudo-inverse of a matrix together with its effective rank.
    fn compute_pinv(arr: ArrayView2<Self::A>) -> Result<PinvData<Self::A>>;
}

macro_rules! compute_pinv_impl {
    ($scalar:ty) => {
        impl ComputePinv for $scalar {
            type A = $scalar;
            fn compute_pinv(arr: ArrayView2<Self::A>) -> Result<PinvData<Self::A>> {
                type Real = <$scalar as Scalar>::Real;

                let m = arr.nrows();
                let n = arr.ncols();

                let result = arr.to_owned().svddc_into(JobSvd::Some);

                let (u, s, vt) = match result {
                    Ok((u, s, vt)) => (u.unwrap(), s, vt.unwrap()),
                    Err(err) => return Err(RustyCurError::LinalgError(err)),
                };

                // Singular values below the cutoff count as zero. The largest
                // singular value comes first in the Lapack ordering.
                let cutoff =
                    cast::<f64, Real>(m.max(n) as f64).unwrap() * Real::epsilon() * s[0];

                let mut rank = 0;
                let sinv = s.mapv(|item| {
                    if item > cutoff {
                        rank += 1;
                        Real::one() / item
                    } else {
                        Real::zero()
                    }
                });

                let mut ut = u.t().map(|item| item.conj());
                Zip::from(ut.axis_iter_mut(Axis(0)))
                    .and(sinv.view())
                    .for_each(|mut row, &factor| {
                        row.map_inplace(|item| *item *= <$scalar>::from_real(factor))
                    });

                let inv = vt.t().map(|item| item.conj()).dot(&ut);

                Ok(PinvData { inv, rank })
            }
        }
    };
}

compute_pinv_impl!(f32);
compute_pinv_impl!(f64);
compute_pinv_impl!(c32);
compute_pinv_impl!(c64);

/// Scalar types supported by the decompositions of this crate.
pub trait ScalarType: Scalar + Lapack + ComputePinv<A = Self> {}

impl<A: Scalar + Lapack + ComputePinv<A = A>> ScalarType for A {}
