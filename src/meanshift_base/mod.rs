mod helper_functions;
mod modes;

pub use crate::meanshift_base::helper_functions::estimate_bandwidth;
pub(crate) use crate::meanshift_base::helper_functions::closest_center;
pub(crate) use crate::meanshift_base::modes::collect_modes;

use crate::error::{MeanShiftError, Result};
use crate::interface::{check_bandwidth, Parameters};
use crate::kernel::{Gaussian, Kernel};
use crate::meanshift_base::helper_functions::{displacement, rounding_floor, shift_row};
use crate::utils::{check_matrix, to_matrix, LibData};
use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use std::marker::PhantomData;

/// Outcome of one mode-seeking run.
#[derive(Clone, Debug)]
pub struct Convergence<A: LibData> {
    /// One row per seed, in seed order.
    pub centroids: Array2<A>,
    /// Unnormalised kernel density at each centroid during the last step.
    pub intensities: Array1<A>,
    pub iterations: usize,
}

/// Fixed-point iteration state. The weight matrix and both centroid buffers
/// are allocated once and reused by every step.
pub(crate) struct MeanShiftBase<'a, A: LibData, K: Kernel<A>> {
    points: ArrayView2<'a, A>,
    centroids: Array2<A>,
    next: Array2<A>,
    weights: Array2<A>,
    bandwidth: A,
    threshold: A,
    max_iter: Option<usize>,
    kernel: PhantomData<K>,
}

impl<'a, A: LibData, K: Kernel<A>> MeanShiftBase<'a, A, K> {
    pub(crate) fn new(
        points: ArrayView2<'a, A>,
        seeds: Array2<A>,
        bandwidth: A,
        parameters: &Parameters<A>,
    ) -> Result<Self> {
        parameters.validate()?;
        check_bandwidth(bandwidth)?;
        check_matrix(points)?;
        check_matrix(seeds.view())?;
        if seeds.ncols() != points.ncols() {
            return Err(MeanShiftError::DimensionMismatch {
                index: 0,
                expected: points.ncols(),
                got: seeds.ncols(),
            });
        }

        let floor = rounding_floor(points, seeds.view());
        if floor > parameters.threshold {
            debug!(
                "raising threshold {} to rounding floor {}",
                parameters.threshold, floor
            );
        }

        let n_seeds = seeds.nrows();
        Ok(Self {
            points,
            next: Array2::zeros(seeds.raw_dim()),
            centroids: seeds,
            weights: Array2::zeros((n_seeds, points.nrows())),
            bandwidth,
            threshold: parameters.threshold.max(floor),
            max_iter: parameters.max_iter,
            kernel: PhantomData,
        })
    }

    /// Computes the next centroid set from the current one and returns the
    /// displacement between both.
    fn step(&mut self, parallel: bool) -> A {
        let points = self.points;
        let bandwidth = self.bandwidth;
        let rows = Zip::from(self.next.rows_mut())
            .and(self.weights.rows_mut())
            .and(self.centroids.rows());

        if parallel {
            rows.par_for_each(|next, weights, centroid| {
                shift_row::<A, K>(points, centroid, weights, next, bandwidth)
            });
        } else {
            rows.for_each(|next, weights, centroid| {
                shift_row::<A, K>(points, centroid, weights, next, bandwidth)
            });
        }

        displacement(self.centroids.view(), self.next.view())
    }

    /// Steps until the displacement drops below the threshold.
    pub(crate) fn run(mut self, parallel: bool) -> Result<Convergence<A>> {
        let mut iterations: usize = 0;
        loop {
            let shift = self.step(parallel);
            iterations += 1;
            trace!("iteration {}: shift {}", iterations, shift);

            if shift < self.threshold {
                debug!(
                    "{} centroids converged after {} iterations with {} kernel",
                    self.next.nrows(),
                    iterations,
                    K::name()
                );
                return Ok(Convergence {
                    intensities: self.weights.sum_axis(Axis(1)),
                    centroids: self.next,
                    iterations,
                });
            }

            if let Some(max_iter) = self.max_iter {
                if iterations >= max_iter {
                    debug!("giving up after {} iterations, shift {}", iterations, shift);
                    return Err(MeanShiftError::NonConvergence {
                        iterations,
                        last_shift: shift.to_f64().unwrap_or(f64::NAN),
                    });
                }
            }

            std::mem::swap(&mut self.centroids, &mut self.next);
        }
    }
}

/// Shifts every point to its mode under a Gaussian kernel.
///
/// Returns one centroid per input point, in input order. There is no
/// iteration cap; use `mean_shift_from` or `MeanShift` with
/// `Parameters::max_iter` to bound slowly converging runs.
///
/// ```
/// use gaussian_meanshift::mean_shift;
///
/// let points: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![10.0, 10.0]];
/// let centroids = mean_shift(&points, 1.0).unwrap();
///
/// assert_eq!(centroids.nrows(), 3);
/// assert!((centroids[[2, 0]] - 10.0).abs() < 1e-6);
/// ```
pub fn mean_shift<A: LibData, P: AsRef<[A]>>(points: &[P], bandwidth: A) -> Result<Array2<A>> {
    check_bandwidth(bandwidth)?;
    let points = to_matrix(points)?;
    let parameters = Parameters::default()
        .with_bandwidth(bandwidth)
        .with_max_iter(None);

    MeanShiftBase::<A, Gaussian>::new(points.view(), points.clone(), bandwidth, &parameters)?
        .run(false)
        .map(|convergence| convergence.centroids)
}

/// Shifts caller-chosen seeds towards the modes of `points` under a Gaussian
/// kernel. Without a bandwidth in `parameters` one is estimated from the points.
pub fn mean_shift_from<A: LibData, P: AsRef<[A]>, S: AsRef<[A]>>(
    points: &[P],
    seeds: &[S],
    parameters: &Parameters<A>,
) -> Result<Convergence<A>> {
    parameters.validate()?;
    let points = to_matrix(points)?;
    let seeds = to_matrix(seeds)?;
    let bandwidth = match parameters.bandwidth {
        Some(bandwidth) => bandwidth,
        None => estimate_bandwidth(points.view(), parameters.quantile)?,
    };

    MeanShiftBase::<A, Gaussian>::new(points.view(), seeds, bandwidth, parameters)?.run(false)
}
