pub use crate::interface::parameters::{check_bandwidth, Parameters, DEFAULT_MAX_ITER};
use crate::utils::LibData;
use anyhow::Result;
use ndarray::Array2;

mod parameters;

pub trait MeanShiftInterface<A: LibData> {
    fn init(parameters: Parameters<A>) -> Result<Self>
    where
        Self: Sized;
    fn fit(&mut self, data: Array2<A>) -> Result<MeanShiftResult<A>>;
}

/// Cluster centers, one row each, and the center index of every input row.
pub type MeanShiftResult<A> = (Array2<A>, Vec<usize>);
