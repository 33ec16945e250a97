use crate::error::{MeanShiftError, Result};
use crate::meanshift_base::helper_functions::index_error;
use crate::meanshift_base::Convergence;
use crate::utils::{Coordinates, LibData, SliceComp};
use kdtree::distance::squared_euclidean;
use kdtree::KdTree;
use log::debug;
use ndarray::Array2;
use std::cmp::Ordering;

/// Merges converged centroids into cluster centers.
///
/// Denser centroids win: walking from the highest intensity down, every
/// centroid still standing absorbs all others within `radius`.
pub(crate) fn collect_modes<A: LibData>(convergence: &Convergence<A>, radius: A) -> Result<Array2<A>> {
    let dim = convergence.centroids.ncols();

    let mut means: Vec<(Coordinates<A>, A)> = convergence
        .centroids
        .outer_iter()
        .zip(convergence.intensities.iter())
        .map(|(mean, intensity)| (Coordinates(mean.to_vec()), *intensity))
        .collect();

    means.sort_by(|(a, a_intensity), (b, b_intensity)| {
        match a.0[..].slice_cmp(&b.0[..]) {
            Ordering::Equal => b_intensity.partial_cmp(a_intensity).unwrap_or(Ordering::Equal),
            cmp => cmp,
        }
    });
    means.dedup_by(|(a, _), (b, _)| a == b);

    means.sort_by(|(a, a_intensity), (b, b_intensity)| {
        match b_intensity.partial_cmp(a_intensity).unwrap_or(Ordering::Equal) {
            Ordering::Equal => a.0[..].slice_cmp(&b.0[..]).reverse(),
            cmp => cmp,
        }
    });

    let mut tree = KdTree::new(dim);
    for (i, (mean, _)) in means.iter().enumerate() {
        tree.add(mean.clone(), i).map_err(index_error)?;
    }

    let squared_radius = radius * radius;
    let mut unique = vec![true; means.len()];
    for (i, (mean, _)) in means.iter().enumerate() {
        if unique[i] {
            let neighbors = tree
                .within(mean.as_ref(), squared_radius, &squared_euclidean)
                .map_err(index_error)?;
            for (_, neighbor) in neighbors {
                unique[*neighbor] = false;
            }
            unique[i] = true;
        }
    }

    let centers: Vec<A> = means
        .iter()
        .zip(unique.iter())
        .filter(|(_, keep)| **keep)
        .flat_map(|((mean, _), _)| mean.0.iter().copied())
        .collect();
    let n_centers = centers.len() / dim;
    debug!(
        "merged {} centroids into {} cluster centers",
        convergence.centroids.nrows(),
        n_centers
    );

    Array2::from_shape_vec((n_centers, dim), centers)
        .map_err(|e| MeanShiftError::InvalidParameter(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn convergence(centroids: Array2<f64>, intensities: Vec<f64>) -> Convergence<f64> {
        Convergence {
            centroids,
            intensities: arr1(&intensities),
            iterations: 1,
        }
    }

    #[test]
    fn test_merges_close_centroids() {
        let converged = convergence(
            arr2(&[[0.0, 0.0], [10.0, 10.0], [0.05, 0.0], [10.0, 10.02], [0.0, 0.0]]),
            vec![3.0, 2.0, 3.5, 1.0, 3.0],
        );

        let centers = collect_modes(&converged, 1.0).unwrap();

        assert_eq!(centers, arr2(&[[0.05, 0.0], [10.0, 10.0]]));
    }

    #[test]
    fn test_keeps_distant_centroids_ordered_by_intensity() {
        let converged = convergence(
            arr2(&[[0.0], [5.0], [10.0]]),
            vec![1.0, 3.0, 2.0],
        );

        let centers = collect_modes(&converged, 1.0).unwrap();

        assert_eq!(centers, arr2(&[[5.0], [10.0], [0.0]]));
    }

    #[test]
    fn test_ties_prefer_larger_coordinates() {
        let converged = convergence(arr2(&[[0.0], [5.0]]), vec![1.0, 1.0]);

        let centers = collect_modes(&converged, 1.0).unwrap();

        assert_eq!(centers, arr2(&[[5.0], [0.0]]));
    }
}
