use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

use num_traits::ConstZero;

/// Scalar used for residual intensities and interpolation.
pub trait Float:
    'static
    + Debug
    + Display
    + Sync
    + Send
    + AddAssign
    + SubAssign
    + Sum
    + num_traits::Float
    + ConstZero
{
    const TWO_FIVE_FIVE: Self;
}

impl Float for f32 {
    const TWO_FIVE_FIVE: Self = 255.0;
}

impl Float for f64 {
    const TWO_FIVE_FIVE: Self = 255.0;
}
