use crate::error::{MeanShiftError, Result};
use crate::utils::LibData;

pub const DEFAULT_MAX_ITER: usize = 300;

#[derive(Clone, Debug)]
pub struct Parameters<A: LibData> {
    pub n_threads: usize,
    /// `None` estimates the bandwidth from the data.
    pub bandwidth: Option<A>,
    /// `None` iterates until convergence, however long that takes.
    pub max_iter: Option<usize>,
    pub threshold: A,
    /// Converged centroids closer than this collapse into one cluster center.
    /// Defaults to the bandwidth.
    pub merge_radius: Option<A>,
    pub quantile: A,
}

impl<A: LibData> Default for Parameters<A> {
    fn default() -> Self {
        Self {
            n_threads: 1,
            bandwidth: Some(A::one()),
            max_iter: Some(DEFAULT_MAX_ITER),
            threshold: A::from_f64(1e-6).unwrap_or_else(A::epsilon),
            merge_radius: None,
            quantile: A::from_f64(0.3).unwrap_or_else(A::one),
        }
    }
}

impl<A: LibData> Parameters<A> {
    pub fn with_bandwidth(mut self, bandwidth: A) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    pub fn with_estimated_bandwidth(mut self, quantile: A) -> Self {
        self.bandwidth = None;
        self.quantile = quantile;
        self
    }

    pub fn with_max_iter(mut self, max_iter: Option<usize>) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_threshold(mut self, threshold: A) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_merge_radius(mut self, merge_radius: A) -> Self {
        self.merge_radius = Some(merge_radius);
        self
    }

    pub fn with_n_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Checks everything that does not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if let Some(bandwidth) = self.bandwidth {
            check_bandwidth(bandwidth)?;
        }
        if !(self.threshold > A::zero() && self.threshold.is_finite()) {
            return Err(MeanShiftError::InvalidParameter(format!(
                "threshold must be positive and finite, got {}",
                self.threshold
            )));
        }
        if self.max_iter == Some(0) {
            return Err(MeanShiftError::InvalidParameter(
                "max_iter must allow at least one iteration".to_string(),
            ));
        }
        if let Some(radius) = self.merge_radius {
            if !(radius > A::zero() && radius.is_finite()) {
                return Err(MeanShiftError::InvalidParameter(format!(
                    "merge radius must be positive and finite, got {}",
                    radius
                )));
            }
        }
        if !(self.quantile > A::zero() && self.quantile <= A::one()) {
            return Err(MeanShiftError::InvalidParameter(format!(
                "quantile must lie in (0, 1], got {}",
                self.quantile
            )));
        }
        Ok(())
    }
}

pub fn check_bandwidth<A: LibData>(bandwidth: A) -> Result<()> {
    if bandwidth > A::zero() && bandwidth.is_finite() {
        Ok(())
    } else {
        Err(MeanShiftError::InvalidParameter(format!(
            "bandwidth must be positive and finite, got {}",
            bandwidth
        )))
    }
}
