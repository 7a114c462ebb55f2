use crate::{
    data_type::DataType,
    expression::{
        deep::{DeepEx, DeepNode},
        unparse, visit, Express,
    },
    format_exerr, ExErrorKind, ExResult,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Evaluates `deepex` bottom-up. Numbers evaluate to themselves, variables to the value
/// `lookup` returns for them, and operators apply their arithmetic to the already
/// evaluated operands.
pub fn eval_deepex<T, F>(deepex: &DeepEx<T>, mut lookup: F) -> ExResult<T>
where
    T: DataType,
    F: FnMut(&str) -> Option<T>,
{
    visit::try_postorder(deepex, |node, children: &[&T]| match node.node() {
        DeepNode::Num(n) => Ok(*n),
        DeepNode::Var(name) => lookup(name.as_str()).ok_or_else(|| {
            debug!(var = name.as_str(), "unbound variable during evaluation");
            format_exerr!(
                ExErrorKind::UnboundVariable,
                "value for symbol '{}' not provided",
                name
            )
        }),
        DeepNode::BinOp { kind, .. } => Ok(kind.apply(*children[0], *children[1])),
    })
}

fn var_names<T>(deepex: &DeepEx<T>) -> Vec<String> {
    let mut names = BTreeSet::new();
    visit::postorder(deepex, |node, _: &[&()]| {
        if let DeepNode::Var(name) = node.node() {
            names.insert(name.clone());
        }
    });
    names.into_iter().collect()
}

impl<T: DataType> Express<T> for DeepEx<T> {
    fn eval_with<F>(&self, lookup: F) -> ExResult<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        eval_deepex(self, lookup)
    }

    fn unparse(&self) -> String {
        unparse::unparse(self)
    }

    fn var_names(&self) -> Vec<String> {
        var_names(self)
    }
}
