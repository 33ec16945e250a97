use crate::utils::LibData;

pub mod flat;
pub mod gaussian;

pub use flat::Flat;
pub use gaussian::Gaussian;

/// Weighting profile used to average points around a centroid.
pub trait Kernel<A: LibData>
where
    Self: Default + Copy + Clone + Send + Sync,
{
    const NAME: &'static str;

    /// Weight of a point at `squared_distance` from the centroid. Never negative.
    fn weight(squared_distance: A, bandwidth: A) -> A;

    fn name() -> String {
        Self::NAME.to_string()
    }
}
