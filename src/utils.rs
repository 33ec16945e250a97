use crate::error::{MeanShiftError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use num_traits::{Float, FromPrimitive};
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::iter::Sum;

pub trait LibData:
    'static + Unpin + Clone + Send + Default + Sync + Debug + Float + FromPrimitive + Sum + Display
{
}

impl LibData for f32 {}

impl LibData for f64 {}

/// Owned coordinates of one point, as stored in a `KdTree`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinates<A: LibData>(pub Vec<A>);

impl<A: LibData> AsRef<[A]> for Coordinates<A> {
    fn as_ref(&self) -> &[A] {
        &self.0
    }
}

pub trait SliceComp {
    fn slice_cmp(&self, b: &Self) -> Ordering;
}

impl<A: LibData> SliceComp for [A] {
    fn slice_cmp(&self, other: &Self) -> Ordering {
        debug_assert!(self.len() == other.len());
        for (a, b) in self.iter().zip(other.iter()) {
            let cmp = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            if cmp.ne(&Ordering::Equal) {
                return cmp;
            }
        }
        Ordering::Equal
    }
}

pub fn squared_distance<A: LibData>(a: ArrayView1<A>, b: ArrayView1<A>) -> A {
    a.iter()
        .zip(b.iter())
        .map(|(a_, b_)| {
            let diff = *a_ - *b_;
            diff * diff
        })
        .sum()
}

/// Stacks equally long vectors into one row per vector.
pub fn to_matrix<A: LibData, P: AsRef<[A]>>(vectors: &[P]) -> Result<Array2<A>> {
    let dim = match vectors.first() {
        Some(first) => first.as_ref().len(),
        None => {
            return Err(MeanShiftError::InvalidParameter(
                "at least one vector is required".to_string(),
            ))
        }
    };

    let mut flat = Vec::with_capacity(vectors.len() * dim);
    for (index, vector) in vectors.iter().enumerate() {
        let vector = vector.as_ref();
        if vector.len() != dim {
            return Err(MeanShiftError::DimensionMismatch {
                index,
                expected: dim,
                got: vector.len(),
            });
        }
        flat.extend_from_slice(vector);
    }

    let matrix = Array2::from_shape_vec((vectors.len(), dim), flat)
        .map_err(|e| MeanShiftError::InvalidParameter(e.to_string()))?;
    check_matrix(matrix.view())?;
    Ok(matrix)
}

pub fn check_matrix<A: LibData>(matrix: ArrayView2<A>) -> Result<()> {
    if matrix.nrows() == 0 {
        return Err(MeanShiftError::InvalidParameter(
            "at least one vector is required".to_string(),
        ));
    }
    if matrix.ncols() == 0 {
        return Err(MeanShiftError::InvalidParameter(
            "vectors need at least one coordinate".to_string(),
        ));
    }
    match matrix
        .outer_iter()
        .position(|row| row.iter().any(|x| !x.is_finite()))
    {
        Some(index) => Err(MeanShiftError::InvalidParameter(format!(
            "vector {} contains a non-finite coordinate",
            index
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_to_matrix() {
        let vectors = vec![vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]];
        let matrix = to_matrix(&vectors).unwrap();

        assert_eq!(matrix, arr2(&[[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]));
    }

    #[test]
    fn test_to_matrix_reports_first_mismatch() {
        let vectors: Vec<&[f64]> = vec![&[0.0, 1.0], &[2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0]];

        match to_matrix(&vectors) {
            Err(MeanShiftError::DimensionMismatch {
                index,
                expected,
                got,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, 2);
                assert_eq!(got, 3);
            }
            other => panic!("expected a dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_to_matrix_rejects_empty_and_non_finite() {
        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            to_matrix(&empty),
            Err(MeanShiftError::InvalidParameter(_))
        ));

        let zero_dim: Vec<Vec<f64>> = vec![vec![], vec![]];
        assert!(matches!(
            to_matrix(&zero_dim),
            Err(MeanShiftError::InvalidParameter(_))
        ));

        let nan = vec![vec![0.0, 1.0], vec![f64::NAN, 1.0]];
        assert!(matches!(
            to_matrix(&nan),
            Err(MeanShiftError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_slice_cmp() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.5, 0.0];

        assert_eq!(a[..].slice_cmp(&b[..]), Ordering::Less);
        assert_eq!(b[..].slice_cmp(&a[..]), Ordering::Greater);
        assert_eq!(a[..].slice_cmp(&a[..]), Ordering::Equal);
    }

    #[test]
    fn test_squared_distance() {
        let a = arr1(&[0.0, 0.0, 0.0]);
        let b = arr1(&[1.0, 2.0, 2.0]);

        assert_eq!(squared_distance(a.view(), b.view()), 9.0);
    }
}
