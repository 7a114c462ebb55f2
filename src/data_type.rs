use num::Float;
use std::fmt::{Debug, Display};

/// Gathers [`Float`](num::Float), `Debug`, and `Display` in one trait.
/// Every real scalar that is used as value of an expression needs to implement this.
/// `Display` is what the literal of a number node is rendered with, hence `2.0f64`
/// becomes `2`.
pub trait DataType: Float + Debug + Display {}
impl<T: Float + Debug + Display> DataType for T {}
