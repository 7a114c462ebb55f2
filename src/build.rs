//! Free functions that build binary operator nodes. They do the same as the overloaded
//! operators and [`DeepEx::pow`](crate::DeepEx::pow) and accept expressions, references
//! to expressions, and raw numbers on both sides.
//!
//! ```rust
//! use symex::{build, prelude::*};
//! # fn main() -> ExResult<()> {
//! let x = DeepEx::<f64>::var("x")?;
//! let expr = build::sub(3.0, build::pow(&x, 2.0));
//! assert_eq!(expr.unparse(), "3 - x ^ 2");
//! # Ok(())
//! # }
//! ```
use crate::{expression::deep::DeepEx, operators::BinOpKind};

pub fn add<T, L: Into<DeepEx<T>>, R: Into<DeepEx<T>>>(lhs: L, rhs: R) -> DeepEx<T> {
    DeepEx::bin(BinOpKind::Add, lhs, rhs)
}
pub fn sub<T, L: Into<DeepEx<T>>, R: Into<DeepEx<T>>>(lhs: L, rhs: R) -> DeepEx<T> {
    DeepEx::bin(BinOpKind::Sub, lhs, rhs)
}
pub fn mul<T, L: Into<DeepEx<T>>, R: Into<DeepEx<T>>>(lhs: L, rhs: R) -> DeepEx<T> {
    DeepEx::bin(BinOpKind::Mul, lhs, rhs)
}
pub fn div<T, L: Into<DeepEx<T>>, R: Into<DeepEx<T>>>(lhs: L, rhs: R) -> DeepEx<T> {
    DeepEx::bin(BinOpKind::Div, lhs, rhs)
}
pub fn pow<T, L: Into<DeepEx<T>>, R: Into<DeepEx<T>>>(base: L, exponent: R) -> DeepEx<T> {
    DeepEx::bin(BinOpKind::Pow, base, exponent)
}

#[test]
fn test_build() {
    use crate::Express;
    let x = DeepEx::<f64>::var("x").unwrap();
    assert_eq!(div(1.0, add(&x, mul(2.0, &x))).unparse(), "1 / (x + 2 * x)");
    let lookup = |_: &str| Some(2.0);
    assert_eq!(pow(2.0, sub(&x, 5.0)).eval_with(lookup).unwrap(), 0.125);
}
