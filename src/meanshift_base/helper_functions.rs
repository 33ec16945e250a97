use crate::error::{MeanShiftError, Result};
use crate::kernel::Kernel;
use crate::utils::{check_matrix, squared_distance, Coordinates, LibData};
use kdtree::distance::squared_euclidean;
use kdtree::KdTree;
use log::debug;
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, Zip};
use ndarray_stats::QuantileExt;

/// Moves one centroid to the kernel-weighted average of all points.
///
/// `weights` receives the kernel row of this centroid. A centroid whose weights
/// all vanish keeps its position.
pub(crate) fn shift_row<A: LibData, K: Kernel<A>>(
    points: ArrayView2<A>,
    centroid: ArrayView1<A>,
    mut weights: ArrayViewMut1<A>,
    mut next: ArrayViewMut1<A>,
    bandwidth: A,
) {
    let zero = A::zero();
    let mut total = zero;
    for (weight, point) in weights.iter_mut().zip(points.outer_iter()) {
        *weight = K::weight(squared_distance(point, centroid), bandwidth);
        total = total + *weight;
    }

    if total > zero {
        next.fill(zero);
        for (&weight, point) in weights.iter().zip(points.outer_iter()) {
            Zip::from(&mut next)
                .and(&point)
                .for_each(|n, &x| *n = *n + weight * x);
        }
        next.mapv_inplace(|x| x / total);
    } else {
        next.assign(&centroid);
    }
}

/// Euclidean norm of the flattened difference of two centroid sets.
pub(crate) fn displacement<A: LibData>(old: ArrayView2<A>, new: ArrayView2<A>) -> A {
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| {
            let diff = *b - *a;
            diff * diff
        })
        .sum::<A>()
        .sqrt()
}

/// Displacement below which successive centroid sets only differ by rounding.
///
/// Grows with the coordinate magnitude and the number of summed terms. Far
/// below `1e-6` for `f64` on ordinary data; around `1e-4` for `f32`.
pub(crate) fn rounding_floor<A: LibData>(points: ArrayView2<A>, seeds: ArrayView2<A>) -> A {
    let scale = points
        .iter()
        .chain(seeds.iter())
        .fold(A::zero(), |max, x| max.max(x.abs()));
    let terms = A::from_usize(seeds.len() * points.nrows()).unwrap_or_else(A::max_value);
    let four = A::from_f64(4.0).unwrap_or_else(A::one);

    four * A::epsilon() * scale * terms.sqrt()
}

pub(crate) fn closest_center<A: LibData>(
    point: ArrayView1<A>,
    cluster_centers: ArrayView2<A>,
) -> Result<usize> {
    let distances = cluster_centers.map_axis(ndarray::Axis(1), |center| {
        squared_distance(point, center)
    });
    distances.argmin().map_err(|e| {
        MeanShiftError::InvalidParameter(format!(
            "cannot label against {} cluster centers: {}",
            cluster_centers.nrows(),
            e
        ))
    })
}

pub(crate) fn index_error<E: std::fmt::Debug>(error: E) -> MeanShiftError {
    MeanShiftError::Index(format!("{:?}", error))
}

/// Mean distance of every point to its `quantile * N`-th nearest neighbour.
pub fn estimate_bandwidth<A: LibData>(points: ArrayView2<A>, quantile: A) -> Result<A> {
    check_matrix(points)?;
    if !(quantile > A::zero() && quantile <= A::one()) {
        return Err(MeanShiftError::InvalidParameter(format!(
            "quantile must lie in (0, 1], got {}",
            quantile
        )));
    }

    let data_rows = A::from_usize(points.nrows()).ok_or_else(|| {
        MeanShiftError::InvalidParameter(format!("{} rows do not fit", points.nrows()))
    })?;
    let n_neighbors: usize = (data_rows * quantile)
        .floor()
        .to_usize()
        .unwrap_or(1)
        .max(1);

    let rows: Vec<Coordinates<A>> = points
        .outer_iter()
        .map(|row| Coordinates(row.to_vec()))
        .collect();

    let mut tree = KdTree::new(points.ncols());
    for (i, row) in rows.iter().enumerate() {
        tree.add(row.clone(), i).map_err(index_error)?;
    }

    let mut total = A::zero();
    for row in rows.iter() {
        let nearest = tree
            .nearest(row.as_ref(), n_neighbors, &squared_euclidean)
            .map_err(index_error)?;
        let furthest = nearest
            .into_iter()
            .map(|(dist, _)| dist)
            .fold(A::zero(), A::max);
        total = total + furthest.sqrt();
    }

    let bandwidth = total / data_rows;
    if !(bandwidth > A::zero() && bandwidth.is_finite()) {
        return Err(MeanShiftError::InvalidParameter(format!(
            "estimated bandwidth is {} because the {} nearest neighbours of every point coincide with it, \
             pass a bandwidth or raise the quantile",
            bandwidth, n_neighbors
        )));
    }
    debug!(
        "estimated bandwidth {} from {} neighbours per point",
        bandwidth, n_neighbors
    );
    Ok(bandwidth)
}
