use crate::{
    data_type::DataType,
    exerr,
    expression::visit,
    operators::BinOpKind,
    ExErrorKind, ExResult,
};
use std::{
    mem,
    ops::{Add, Div, Mul, Sub},
    sync::Arc,
};

/// A deep node can be a number, a variable, or a binary operator applied to two
/// deep expressions.
#[derive(Clone)]
pub enum DeepNode<T> {
    /// Number literal, also called terminal.
    Num(T),
    /// Named variable, also called symbol. The name is never empty.
    Var(String),
    /// Binary operation. The order of the operands is the order in which they appear in
    /// the rendered expression, i.e., `operands[0] - operands[1]`.
    BinOp {
        kind: BinOpKind,
        operands: [DeepEx<T>; 2],
    },
}

/// A deep expression is an immutable tree of [`DeepNode`](DeepNode)s. The handle is cheap
/// to clone. Clones refer to the very same node, and the postorder visitor treats them as
/// one node. Hence, re-using a clone at multiple places of a bigger expression creates a
/// shared sub-expression whose results are computed only once.
///
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// #
/// use symex::prelude::*;
///
/// let x = DeepEx::<f64>::var("x")?;
/// let expr = 2.0 * &x + 1.0;
/// assert_eq!(expr.unparse(), "2 * x + 1");
/// assert_eq!(expr.eval(&[("x", 3.0)].into_iter().collect())?, 7.0);
/// #
/// #     Ok(())
/// # }
/// ```
pub struct DeepEx<T> {
    node: Arc<DeepNode<T>>,
}

impl<T> Clone for DeepEx<T> {
    fn clone(&self) -> Self {
        DeepEx {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> DeepEx<T> {
    fn from_node(node: DeepNode<T>) -> Self {
        DeepEx {
            node: Arc::new(node),
        }
    }

    /// Creates a number node.
    pub fn num(x: T) -> Self {
        Self::from_node(DeepNode::Num(x))
    }

    /// Creates a variable node.
    ///
    /// # Errors
    ///
    /// If the name is empty, an [`ExError`](crate::ExError) of kind
    /// [`Construction`](ExErrorKind::Construction) is returned.
    pub fn var(name: &str) -> ExResult<Self> {
        if name.is_empty() {
            exerr!(ExErrorKind::Construction, "symbol name must not be empty")
        } else {
            Ok(Self::from_node(DeepNode::Var(name.to_string())))
        }
    }

    /// Creates a binary operator node. Raw numbers are promoted to number nodes.
    pub fn bin<L, R>(kind: BinOpKind, lhs: L, rhs: R) -> Self
    where
        L: Into<DeepEx<T>>,
        R: Into<DeepEx<T>>,
    {
        Self::from_node(DeepNode::BinOp {
            kind,
            operands: [lhs.into(), rhs.into()],
        })
    }

    /// Raises `self` to the power of `exponent`. There is no operator for this since
    /// `^` is Rust's xor with a priority lower than `+`.
    pub fn pow<R: Into<DeepEx<T>>>(self, exponent: R) -> Self {
        Self::bin(BinOpKind::Pow, self, exponent)
    }

    pub fn node(&self) -> &DeepNode<T> {
        &self.node
    }

    /// Operands of a binary operator or an empty slice for terminals.
    pub fn operands(&self) -> &[DeepEx<T>] {
        match self.node() {
            DeepNode::BinOp { operands, .. } => operands,
            _ => &[],
        }
    }

    pub fn bin_kind(&self) -> Option<BinOpKind> {
        match self.node() {
            DeepNode::BinOp { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&str> {
        match self.node() {
            DeepNode::Var(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.operands().is_empty()
    }

    /// Identity of the node this handle points to. Structurally equal nodes that have
    /// been created separately have different ids.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }

    /// Checks if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl<T: DataType> DeepEx<T> {
    /// Same as [`num`](DeepEx::num).
    pub fn from_num(x: T) -> Self {
        Self::num(x)
    }
    pub fn zero() -> Self {
        Self::num(T::zero())
    }
    pub fn one() -> Self {
        Self::num(T::one())
    }

    pub fn as_num(&self) -> Option<T> {
        match self.node() {
            DeepNode::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Substitutes variables with other expressions. Sub-expressions that do not contain
    /// a substituted variable are re-used and keep their identity.
    ///
    /// # Arguments
    ///
    /// * `sub` - function that assigns to each variable name optionally a new expression
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// #
    /// use symex::prelude::*;
    /// let x = DeepEx::<f64>::var("x")?;
    /// let z = DeepEx::<f64>::var("z")?;
    /// let expr = 2.0 - z / x;
    /// let y = DeepEx::var("y")?;
    /// let substituted = expr.subs(&mut |var: &str| match var {
    ///     "z" => Some(2.0 * &y),
    ///     _ => None,
    /// });
    /// assert_eq!(substituted.unparse(), "2 - 2 * y / x");
    /// assert_eq!(substituted.var_names(), ["x", "y"]);
    /// #
    /// #     Ok(())
    /// # }
    /// ```
    pub fn subs<F>(&self, sub: &mut F) -> Self
    where
        F: FnMut(&str) -> Option<Self>,
    {
        visit::postorder(self, |node, children: &[&Self]| match node.node() {
            DeepNode::Num(_) => node.clone(),
            DeepNode::Var(name) => sub(name).unwrap_or_else(|| node.clone()),
            DeepNode::BinOp { kind, operands } => {
                let unchanged = operands
                    .iter()
                    .zip(children.iter())
                    .all(|(op, child)| op.ptr_eq(child));
                if unchanged {
                    node.clone()
                } else {
                    Self::bin(*kind, children[0].clone(), children[1].clone())
                }
            }
        })
    }
}

// A uniquely owned chain of nodes would otherwise be released with one nested drop call
// per level.
impl<T> Drop for DeepEx<T> {
    fn drop(&mut self) {
        fn take_if_unique<T>(deepex: &mut DeepEx<T>) -> Option<DeepNode<T>> {
            Arc::get_mut(&mut deepex.node)
                .map(|node| mem::replace(node, DeepNode::Var(String::new())))
        }
        let mut pending = match take_if_unique(self) {
            Some(DeepNode::BinOp { operands, .. }) => Vec::from(operands),
            _ => return,
        };
        while let Some(mut deepex) = pending.pop() {
            if let Some(DeepNode::BinOp { operands, .. }) = take_if_unique(&mut deepex) {
                pending.extend(operands);
            }
        }
    }
}

impl<T> From<&DeepEx<T>> for DeepEx<T> {
    fn from(deepex: &DeepEx<T>) -> Self {
        deepex.clone()
    }
}

macro_rules! impl_bin_ops {
    ($($trait_name:ident, $method:ident, $kind:expr);*) => {
        $(
            impl<T, R: Into<DeepEx<T>>> $trait_name<R> for DeepEx<T> {
                type Output = DeepEx<T>;
                fn $method(self, rhs: R) -> DeepEx<T> {
                    DeepEx::bin($kind, self, rhs)
                }
            }
            impl<T, R: Into<DeepEx<T>>> $trait_name<R> for &DeepEx<T> {
                type Output = DeepEx<T>;
                fn $method(self, rhs: R) -> DeepEx<T> {
                    DeepEx::bin($kind, self.clone(), rhs)
                }
            }
        )*
    };
}
impl_bin_ops!(
    Add, add, BinOpKind::Add;
    Sub, sub, BinOpKind::Sub;
    Mul, mul, BinOpKind::Mul;
    Div, div, BinOpKind::Div
);

// Raw numbers are promoted to number nodes on both sides of an operator.
macro_rules! impl_scalar_ops {
    (@ops $scalar:ty, $($trait_name:ident, $method:ident, $kind:expr);*) => {
        $(
            impl $trait_name<DeepEx<$scalar>> for $scalar {
                type Output = DeepEx<$scalar>;
                fn $method(self, rhs: DeepEx<$scalar>) -> DeepEx<$scalar> {
                    DeepEx::bin($kind, self, rhs)
                }
            }
            impl $trait_name<&DeepEx<$scalar>> for $scalar {
                type Output = DeepEx<$scalar>;
                fn $method(self, rhs: &DeepEx<$scalar>) -> DeepEx<$scalar> {
                    DeepEx::bin($kind, self, rhs.clone())
                }
            }
        )*
    };
    ($($scalar:ty),*) => {
        $(
            impl From<$scalar> for DeepEx<$scalar> {
                fn from(x: $scalar) -> Self {
                    DeepEx::num(x)
                }
            }
            impl_scalar_ops!(@ops $scalar,
                Add, add, BinOpKind::Add;
                Sub, sub, BinOpKind::Sub;
                Mul, mul, BinOpKind::Mul;
                Div, div, BinOpKind::Div
            );
        )*
    };
}
impl_scalar_ops!(f32, f64);
