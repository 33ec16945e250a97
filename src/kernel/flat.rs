use crate::kernel::Kernel;
use crate::utils::LibData;

/// Uniform window: every point within `bandwidth` counts once.
#[derive(Copy, Clone, Default, Debug)]
pub struct Flat;

impl<A: LibData> Kernel<A> for Flat {
    const NAME: &'static str = "flat";

    fn weight(squared_distance: A, bandwidth: A) -> A {
        if squared_distance <= bandwidth * bandwidth {
            A::one()
        } else {
            A::zero()
        }
    }
}
