#![doc(html_root_url = "https://docs.rs/symex/0.1.0")]
//! Symex builds immutable arithmetic expression trees over real numbers. Expressions are
//! composed of numbers, named variables, and the binary operators `+`, `-`, `*`, `/`, and
//! power. They can be evaluated for given variable values, rendered with minimal
//! parentheses, and differentiated symbolically.
//!
//! # Building and evaluating
//!
//! Expressions are built with the usual Rust operators. Raw numbers are promoted to number
//! nodes on either side of an operator. Exponentiation is available via
//! [`DeepEx::pow`](DeepEx::pow) or [`build::pow`](build::pow).
//!
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use std::collections::HashMap;
//! use symex::prelude::*;
//!
//! let x = DeepEx::<f64>::var("x")?;
//! let y = DeepEx::<f64>::var("y")?;
//! let expr = 3.0 - (&x - &y).pow(2.0) / 4.0;
//! assert_eq!(format!("{}", expr), "3 - (x - y) ^ 2 / 4");
//!
//! let bindings: HashMap<&str, f64> = [("x", 5.0), ("y", 1.0)].into_iter().collect();
//! assert_eq!(expr.eval(&bindings)?, -1.0);
//! assert_eq!(expr.var_names(), ["x", "y"]);
//! #
//! #     Ok(())
//! # }
//! ```
//!
//! Handles are cheap to clone. A clone refers to the same node, so using a sub-expression
//! twice creates a graph where the sub-expression is stored and evaluated once.
//!
//! # Differentiation
//!
//! With the default feature `partial`, the trait [`Differentiate`](Differentiate) computes
//! derivatives symbolically. The results are not simplified.
//!
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! # #[cfg(feature = "partial")]
//! # {
//! use std::collections::HashMap;
//! use symex::prelude::*;
//!
//! let x = DeepEx::<f64>::var("x")?;
//! let expr = &x * &x;
//! let dexpr_dx = expr.partial("x")?;
//! assert_eq!(dexpr_dx.unparse(), "1 * x + x * 1");
//! let bindings: HashMap<&str, f64> = [("x", 3.0)].into_iter().collect();
//! assert_eq!(dexpr_dx.eval(&bindings)?, 6.0);
//! # }
//! #
//! #     Ok(())
//! # }
//! ```
//!
//! # Traversal
//!
//! Evaluation, rendering, substitution, and differentiation are built on the postorder
//! visitor [`try_postorder`](try_postorder), which is also available for custom
//! computations on expressions.
//!
//! # Logging
//!
//! Symex emits events through [`tracing`](https://docs.rs/tracing). Nothing is printed
//! unless the application installs a subscriber.

mod data_type;
mod definitions;
mod expression;
mod operators;
mod result;

pub mod build;

pub use {
    data_type::DataType,
    expression::{
        deep::{DeepEx, DeepNode},
        visit::{postorder, try_postorder},
        Express,
    },
    operators::{BinOp, BinOpKind},
    result::{ExError, ExErrorKind, ExResult},
};

#[cfg(feature = "partial")]
pub use expression::partial::Differentiate;

/// To use the expression trait [`Express`](Express) and its implementation
/// [`DeepEx`](DeepEx) one can `use symex::prelude::*;`.
pub mod prelude {
    #[cfg(feature = "partial")]
    pub use super::Differentiate;
    pub use super::{DataType, DeepEx, ExError, ExErrorKind, ExResult, Express};
}
