
use crate::error::{MeanShiftError, Result};
use crate::interface::{MeanShiftInterface, MeanShiftResult, Parameters};
use crate::kernel::{Gaussian, Kernel};
use crate::meanshift_base::{
    closest_center, collect_modes, estimate_bandwidth, Convergence, MeanShiftBase,
};
use crate::utils::{check_matrix, LibData};
use anyhow::Context;
use log::debug;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Axis};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::marker::PhantomData;

/// Mean shift estimator. With more than one thread configured, centroid
/// updates and labelling run on a private rayon pool.
pub struct MeanShift<A: LibData, K: Kernel<A> = Gaussian> {
    parameters: Parameters<A>,
    pool: Option<ThreadPool>,
    pub bandwidth: Option<A>,
    pub cluster_centers: Option<Array2<A>>,
    kernel: PhantomData<K>,
}

impl<A: LibData, K: Kernel<A>> MeanShift<A, K> {
    pub fn new(parameters: Parameters<A>) -> Result<Self> {
        parameters.validate()?;
        let pool = if parameters.n_threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(parameters.n_threads)
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            bandwidth: parameters.bandwidth,
            parameters,
            pool,
            cluster_centers: None,
            kernel: PhantomData,
        })
    }

    fn resolve_bandwidth(&mut self, points: ArrayView2<A>) -> Result<A> {
        match self.parameters.bandwidth {
            Some(bandwidth) => Ok(bandwidth),
            None => {
                let bandwidth = estimate_bandwidth(points, self.parameters.quantile)?;
                self.bandwidth = Some(bandwidth);
                Ok(bandwidth)
            }
        }
    }

    /// Shifts a copy of every point to its mode; one centroid per point.
    pub fn shift(&mut self, points: ArrayView2<A>) -> Result<Array2<A>> {
        self.shift_from(points, points.to_owned())
            .map(|convergence| convergence.centroids)
    }

    pub fn shift_from(&mut self, points: ArrayView2<A>, seeds: Array2<A>) -> Result<Convergence<A>> {
        check_matrix(points)?;
        let bandwidth = self.resolve_bandwidth(points)?;
        let base = MeanShiftBase::<A, K>::new(points, seeds, bandwidth, &self.parameters)?;

        match &self.pool {
            Some(pool) => pool.install(|| base.run(true)),
            None => base.run(false),
        }
    }

    /// Finds the cluster centers of `points` and labels every point with the
    /// index of its nearest center.
    pub fn cluster(&mut self, points: ArrayView2<A>) -> Result<MeanShiftResult<A>> {
        let convergence = self.shift_from(points, points.to_owned())?;
        let radius = match (self.parameters.merge_radius, self.bandwidth) {
            (Some(radius), _) | (None, Some(radius)) => radius,
            (None, None) => {
                return Err(MeanShiftError::InvalidParameter(
                    "no bandwidth to merge centroids with".to_string(),
                ))
            }
        };

        let cluster_centers = collect_modes(&convergence, radius)?;
        debug!(
            "found {} clusters after {} iterations",
            cluster_centers.nrows(),
            convergence.iterations
        );

        let labels = self.label(points, cluster_centers.view())?;
        self.cluster_centers = Some(cluster_centers.clone());
        Ok((cluster_centers, labels))
    }

    /// Index of the nearest fitted cluster center for every point.
    pub fn predict(&self, points: ArrayView2<A>) -> Result<Vec<usize>> {
        let cluster_centers = self.cluster_centers.as_ref().ok_or_else(|| {
            MeanShiftError::InvalidParameter(
                "You must fit your model before predicting!".to_string(),
            )
        })?;
        self.label(points, cluster_centers.view())
    }

    fn label(&self, points: ArrayView2<A>, centers: ArrayView2<A>) -> Result<Vec<usize>> {
        check_matrix(points)?;
        if points.ncols() != centers.ncols() {
            return Err(MeanShiftError::DimensionMismatch {
                index: 0,
                expected: centers.ncols(),
                got: points.ncols(),
            });
        }

        match &self.pool {
            Some(pool) => pool.install(|| {
                points
                    .axis_iter(Axis(0))
                    .into_par_iter()
                    .map(|point| closest_center(point, centers))
                    .collect()
            }),
            None => points
                .outer_iter()
                .map(|point| closest_center(point, centers))
                .collect(),
        }
    }
}

impl<A: LibData, K: Kernel<A>> MeanShiftInterface<A> for MeanShift<A, K> {
    fn init(parameters: Parameters<A>) -> anyhow::Result<Self> {
        Self::new(parameters).context("Could not set up MeanShift")
    }

    fn fit(&mut self, data: Array2<A>) -> anyhow::Result<MeanShiftResult<A>> {
        Ok(self.cluster(data.view())?)
    }
}
