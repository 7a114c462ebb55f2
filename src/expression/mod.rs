use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use crate::{data_type::DataType, ExResult};

pub mod deep;
mod eval;
#[cfg(feature = "partial")]
pub mod partial;
mod unparse;
pub mod visit;

/// Expressions implementing this trait can be evaluated for specific variable values and
/// unparsed, i.e., transformed into a string representation.
pub trait Express<T>
where
    T: DataType,
{
    /// Evaluates an expression with the given variable values and returns the computed
    /// result.
    ///
    /// # Arguments
    ///
    /// * `bindings` - values of the variables of the expression by name. Bindings of
    ///                variables that do not occur in the expression are ignored.
    ///
    /// # Errors
    ///
    /// If a variable of the expression has no binding, we return an
    /// [`ExError`](crate::ExError) of kind [`UnboundVariable`](crate::ExErrorKind::UnboundVariable).
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// #
    /// use std::collections::HashMap;
    /// use symex::prelude::*;
    ///
    /// let x = DeepEx::<f64>::var("x")?;
    /// let y = DeepEx::<f64>::var("y")?;
    /// let expr = (&x - &y) / 2.0;
    /// let mut bindings = HashMap::new();
    /// bindings.insert("x".to_string(), 5.0);
    /// bindings.insert("y".to_string(), 1.0);
    /// assert_eq!(expr.eval(&bindings)?, 2.0);
    /// bindings.remove("y");
    /// assert!(expr.eval(&bindings).is_err());
    /// #
    /// #     Ok(())
    /// # }
    /// ```
    fn eval<K>(&self, bindings: &HashMap<K, T>) -> ExResult<T>
    where
        K: Borrow<str> + Hash + Eq,
    {
        self.eval_with(|name| bindings.get(name).copied())
    }

    /// Evaluates an expression where variable values are looked up by `lookup`.
    ///
    /// # Errors
    ///
    /// If `lookup` returns `None` for a variable of the expression, we return an
    /// [`ExError`](crate::ExError) of kind [`UnboundVariable`](crate::ExErrorKind::UnboundVariable).
    fn eval_with<F>(&self, lookup: F) -> ExResult<T>
    where
        F: FnMut(&str) -> Option<T>;

    /// Creates an infix string representation of the expression that contains only the
    /// parentheses necessary to preserve the meaning.
    fn unparse(&self) -> String;

    /// Returns the sorted names of the variables of the expression without duplicates.
    fn var_names(&self) -> Vec<String>;
}
