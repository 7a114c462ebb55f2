use crate::{
    data_type::DataType,
    expression::{
        deep::{DeepEx, DeepNode},
        visit::{self, ChildResults},
    },
    operators::BinOpKind,
};
use std::{
    borrow::Cow,
    collections::VecDeque,
    fmt::{self, Debug, Display, Formatter},
};

/// Text as a sequence of fragments. Concatenation moves the fragments of the shorter
/// operand into the longer one, so each fragment is moved at most logarithmically often
/// and rendering a deep expression does not copy its text once per level.
#[derive(Clone, Default)]
struct Fragments(VecDeque<Cow<'static, str>>);

impl Fragments {
    fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Fragments(VecDeque::from([text.into()]))
    }

    fn enclose(&mut self, open: &'static str, close: &'static str) {
        self.0.push_front(Cow::Borrowed(open));
        self.0.push_back(Cow::Borrowed(close));
    }

    /// Concatenates `lhs`, the separator pieces, and `rhs`.
    fn join(mut lhs: Self, sep: &[&'static str], mut rhs: Self) -> Self {
        if lhs.0.len() >= rhs.0.len() {
            lhs.0.extend(sep.iter().map(|piece| Cow::Borrowed(*piece)));
            lhs.0.append(&mut rhs.0);
            lhs
        } else {
            for piece in sep.iter().rev() {
                rhs.0.push_front(Cow::Borrowed(*piece));
            }
            while let Some(fragment) = lhs.0.pop_back() {
                rhs.0.push_front(fragment);
            }
            rhs
        }
    }

    fn write_to(&self, f: &mut Formatter) -> fmt::Result {
        self.0.iter().try_for_each(|fragment| f.write_str(fragment))
    }
}

impl From<Fragments> for String {
    fn from(fragments: Fragments) -> Self {
        let mut text = String::with_capacity(fragments.0.iter().map(|f| f.len()).sum());
        fragments.0.iter().for_each(|fragment| text.push_str(fragment));
        text
    }
}

/// Rendered operand together with the operator it has been rendered from, if any.
#[derive(Clone)]
struct Unparsed {
    text: Fragments,
    kind: Option<BinOpKind>,
}

fn needs_parens(parent: BinOpKind, child: Option<BinOpKind>, is_right: bool) -> bool {
    match child {
        None => false,
        Some(child) => {
            child.prio() < parent.prio()
                || (is_right && child.prio() == parent.prio() && !parent.is_commutative())
        }
    }
}

fn operand_text(parent: BinOpKind, unparsed: Unparsed, is_right: bool) -> Fragments {
    let mut text = unparsed.text;
    if needs_parens(parent, unparsed.kind, is_right) {
        text.enclose("(", ")");
    }
    text
}

fn split<R>(children: ChildResults<R>) -> Option<(R, R)> {
    let mut children = children.into_iter();
    match (children.next(), children.next()) {
        (Some(lhs), Some(rhs)) => Some((lhs, rhs)),
        _ => None,
    }
}

fn unparse_fragments<T: DataType>(deepex: &DeepEx<T>) -> Fragments {
    visit::postorder_owned(deepex, |node, children: ChildResults<Unparsed>| {
        match (node.node(), split(children)) {
            (DeepNode::BinOp { kind, .. }, Some((lhs, rhs))) => Unparsed {
                text: Fragments::join(
                    operand_text(*kind, lhs, false),
                    &[" ", kind.repr(), " "],
                    operand_text(*kind, rhs, true),
                ),
                kind: Some(*kind),
            },
            (DeepNode::Num(n), _) => Unparsed {
                text: Fragments::new(format!("{}", n)),
                kind: None,
            },
            (DeepNode::Var(name), _) => Unparsed {
                text: Fragments::new(name.clone()),
                kind: None,
            },
            // the visitor passes exactly one result per operand
            (DeepNode::BinOp { .. }, None) => Unparsed {
                text: Fragments::default(),
                kind: None,
            },
        }
    })
    .text
}

fn repr_fragments<T: DataType>(deepex: &DeepEx<T>) -> Fragments {
    visit::postorder_owned(deepex, |node, children: ChildResults<Fragments>| {
        match (node.node(), split(children)) {
            (DeepNode::BinOp { kind, .. }, Some((lhs, rhs))) => {
                let mut text = Fragments::join(lhs, &[", "], rhs);
                text.enclose("(", ")");
                text.0.push_front(Cow::Borrowed(kind.name()));
                text
            }
            (DeepNode::Num(n), _) => Fragments::new(format!("Number({})", n)),
            (DeepNode::Var(name), _) => Fragments::new(format!("Symbol({:?})", name)),
            (DeepNode::BinOp { .. }, None) => Fragments::default(),
        }
    })
}

/// Creates the infix representation of `deepex` with as few parentheses as possible.
/// A left operand is put into parentheses if its operator has a lower priority than the
/// parent's. A right operand is additionally put into parentheses if its priority equals
/// the parent's and the parent is not commutative. Hence, `a - (b - c)` and `a - b - c`
/// are kept apart, while `a + (b + c)` is shown as `a + b + c`.
pub fn unparse<T: DataType>(deepex: &DeepEx<T>) -> String {
    unparse_fragments(deepex).into()
}

/// Creates the structural representation of `deepex`, e.g., `Add(Symbol("x"), Number(1))`.
pub fn repr<T: DataType>(deepex: &DeepEx<T>) -> String {
    repr_fragments(deepex).into()
}

impl<T: DataType> DeepEx<T> {
    /// Creates the structural representation of the expression, see also
    /// [`Debug`](std::fmt::Debug).
    pub fn repr(&self) -> String {
        repr(self)
    }
}

impl<T: DataType> Display for DeepEx<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        unparse_fragments(self).write_to(f)
    }
}

impl<T: DataType> Debug for DeepEx<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        repr_fragments(self).write_to(f)
    }
}
