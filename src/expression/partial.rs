use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use tracing::debug;

use crate::{
    data_type::DataType,
    exerr,
    expression::{
        deep::{DeepEx, DeepNode},
        visit, Express,
    },
    operators::BinOpKind,
    ExErrorKind, ExResult,
};

pub fn check_partial_var(var: &str) -> ExResult<()> {
    if var.is_empty() {
        exerr!(
            ExErrorKind::Construction,
            "cannot differentiate with respect to a variable with empty name"
        )
    } else {
        Ok(())
    }
}

/// *`feature = "partial"`* - Trait for symbolic differentiation.
pub trait Differentiate<T>
where
    T: DataType,
    Self: Sized + Express<T>,
{
    /// *`feature = "partial"`* - This method computes a new expression
    /// that is the derivative of `self` with respect to the variable `var`. The result is
    /// not simplified.
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
    /// let expr = &y * x.pow(2.0);
    /// let dexpr_dx = expr.partial("x")?;
    /// assert_eq!(dexpr_dx.unparse(), "0 * x ^ 2 + y * 2 * x ^ 1 * 1");
    ///
    /// let bindings: HashMap<&str, f64> = [("x", 3.0), ("y", 0.5)].into_iter().collect();
    /// assert_eq!(dexpr_dx.eval(&bindings)?, 3.0);
    /// #
    /// #     Ok(())
    /// # }
    /// ```
    /// # Arguments
    ///
    /// * `var` - name of the variable with respect to which the derivative is computed
    ///
    /// # Errors
    ///
    /// * If the expression contains a power whose exponent is not a number, we return an
    ///   [`ExError`](crate::ExError) of kind [`Unsupported`](crate::ExErrorKind::Unsupported).
    /// * If `var` is empty, we return an [`ExError`](crate::ExError) of kind
    ///   [`Construction`](crate::ExErrorKind::Construction).
    ///
    fn partial(&self, var: &str) -> ExResult<Self>;

    /// *`feature = "partial"`* - Computes the nth derivative with respect to one variable.
    /// For `n == 0` a clone of `self` is returned.
    ///
    /// # Errors
    ///
    /// See [`partial`](Differentiate::partial).
    fn partial_nth(&self, var: &str, n: usize) -> ExResult<Self>
    where
        Self: Clone,
    {
        (0..n).try_fold(self.clone(), |deri, _| deri.partial(var))
    }

    /// *`feature = "partial"`* - Computes a chain of derivatives with respect to the variables
    /// passed as iterator, e.g., `["x", "y"]` computes d/dy d/dx of `self`.
    ///
    /// # Errors
    ///
    /// See [`partial`](Differentiate::partial).
    fn partial_iter<I, S>(&self, vars: I) -> ExResult<Self>
    where
        Self: Clone,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        vars.into_iter()
            .try_fold(self.clone(), |deri, var| deri.partial(var.as_ref()))
    }

    /// *`feature = "partial"`* - Evaluates the derivative with respect to `var` at the
    /// point given by `bindings`.
    ///
    /// # Errors
    ///
    /// See [`partial`](Differentiate::partial) and [`eval`](Express::eval).
    fn partial_at<K>(&self, var: &str, bindings: &HashMap<K, T>) -> ExResult<T>
    where
        K: Borrow<str> + Hash + Eq,
    {
        self.partial(var)?.eval(bindings)
    }
}

/// An operand of a binary operator together with its derivative.
struct ValueDerivative<'b, T> {
    val: &'b DeepEx<T>,
    der: &'b DeepEx<T>,
}

fn partial_bin<T: DataType>(
    kind: BinOpKind,
    f: ValueDerivative<T>,
    g: ValueDerivative<T>,
) -> ExResult<DeepEx<T>> {
    Ok(match kind {
        BinOpKind::Add => f.der + g.der,
        BinOpKind::Sub => f.der - g.der,
        BinOpKind::Mul => f.der * g.val + f.val * g.der,
        BinOpKind::Div => {
            let two = T::one() + T::one();
            (f.der * g.val - f.val * g.der) / g.val.clone().pow(DeepEx::num(two))
        }
        BinOpKind::Pow => match g.val.as_num() {
            Some(exponent) => {
                DeepEx::num(exponent)
                    * f.val.clone().pow(DeepEx::num(exponent - T::one()))
                    * f.der
            }
            None => {
                debug!(exponent = %g.val, "cannot differentiate power");
                return exerr!(ExErrorKind::Unsupported, "non-constant exponent");
            }
        },
    })
}

/// Computes the derivative of `deepex` with respect to `var` in one postorder traversal.
/// Each operator node receives the derivatives of its operands and refers to its original
/// operands where the rules need them, e.g., the product rule. The result shares these
/// operands with `deepex`.
pub fn partial_deepex<T: DataType>(deepex: &DeepEx<T>, var: &str) -> ExResult<DeepEx<T>> {
    check_partial_var(var)?;
    visit::try_postorder(deepex, |node, ders: &[&DeepEx<T>]| match node.node() {
        DeepNode::Num(_) => Ok(DeepEx::zero()),
        DeepNode::Var(name) => Ok(if name == var {
            DeepEx::one()
        } else {
            DeepEx::zero()
        }),
        DeepNode::BinOp { kind, operands } => {
            let [f, g] = operands;
            partial_bin(
                *kind,
                ValueDerivative {
                    val: f,
                    der: ders[0],
                },
                ValueDerivative {
                    val: g,
                    der: ders[1],
                },
            )
        }
    })
}

impl<T: DataType> Differentiate<T> for DeepEx<T> {
    fn partial(&self, var: &str) -> ExResult<Self> {
        partial_deepex(self, var)
    }
}
