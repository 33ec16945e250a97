use crate::kernel::Kernel;
use crate::utils::LibData;

#[derive(Copy, Clone, Default, Debug)]
pub struct Gaussian;

impl<A: LibData> Kernel<A> for Gaussian {
    const NAME: &'static str = "gaussian";

    fn weight(squared_distance: A, bandwidth: A) -> A {
        (-squared_distance / (bandwidth * bandwidth)).exp()
    }
}
