pub mod error;
pub mod interface;
pub mod kernel;
mod meanshift_base;
mod parallel;
#[cfg(feature = "python")]
mod python_binding;
#[cfg(test)]
mod test_utils;
mod utils;

pub use crate::error::{MeanShiftError, Result};
pub use crate::interface::{MeanShiftInterface, MeanShiftResult, Parameters};
pub use crate::kernel::{Flat, Gaussian, Kernel};
pub use crate::meanshift_base::{estimate_bandwidth, mean_shift, mean_shift_from, Convergence};
pub use crate::utils::LibData;
pub use parallel::MeanShift;
