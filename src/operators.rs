use crate::data_type::DataType;
use std::fmt::{self, Display, Formatter};

/// The binary operators an expression can be built of.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Properties of a binary operator, looked up by [`BinOpKind::op`](BinOpKind::op).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct BinOp {
    /// Representation of the operator in rendered expressions, e.g., `-` or `^`.
    pub repr: &'static str,
    /// Priority of the binary operation. A binary operation with a
    /// higher number binds stronger, e.g., `*` has a higher priority than `+`.
    pub prio: i32,
    /// Commutative operators do not need parentheses around a right operand of equal
    /// priority when rendered, `a + (b + c)` can be shown as `a + b + c`.
    pub is_commutative: bool,
}

const ADD: BinOp = BinOp {
    repr: "+",
    prio: 1,
    is_commutative: true,
};
const SUB: BinOp = BinOp {
    repr: "-",
    prio: 1,
    is_commutative: false,
};
const MUL: BinOp = BinOp {
    repr: "*",
    prio: 2,
    is_commutative: true,
};
const DIV: BinOp = BinOp {
    repr: "/",
    prio: 2,
    is_commutative: false,
};
const POW: BinOp = BinOp {
    repr: "^",
    prio: 3,
    is_commutative: false,
};

impl BinOpKind {
    /// All operator kinds in ascending priority.
    pub const ALL: [BinOpKind; 5] = [
        BinOpKind::Add,
        BinOpKind::Sub,
        BinOpKind::Mul,
        BinOpKind::Div,
        BinOpKind::Pow,
    ];

    pub const fn op(self) -> BinOp {
        match self {
            BinOpKind::Add => ADD,
            BinOpKind::Sub => SUB,
            BinOpKind::Mul => MUL,
            BinOpKind::Div => DIV,
            BinOpKind::Pow => POW,
        }
    }
    pub const fn repr(self) -> &'static str {
        self.op().repr
    }
    pub const fn prio(self) -> i32 {
        self.op().prio
    }
    pub const fn is_commutative(self) -> bool {
        self.op().is_commutative
    }

    /// Applies the arithmetic meaning of the operator to already evaluated operands.
    /// Division by zero yields the IEEE-754 results, i.e., `inf`, `-inf`, or `NaN`.
    pub fn apply<T: DataType>(self, a: T, b: T) -> T {
        match self {
            BinOpKind::Add => a + b,
            BinOpKind::Sub => a - b,
            BinOpKind::Mul => a * b,
            BinOpKind::Div => a / b,
            BinOpKind::Pow => a.powf(b),
        }
    }

    /// Returns the name used in structural representations such as `Add(..)`.
    pub const fn name(self) -> &'static str {
        match self {
            BinOpKind::Add => "Add",
            BinOpKind::Sub => "Sub",
            BinOpKind::Mul => "Mul",
            BinOpKind::Div => "Div",
            BinOpKind::Pow => "Pow",
        }
    }
}

impl Display for BinOpKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

#[cfg(test)]
mod test {
    use super::BinOpKind;

    #[test]
    fn test_prio() {
        let mut kinds = BinOpKind::ALL;
        kinds.sort_by(|k1, k2| k2.prio().cmp(&k1.prio()));
        assert_eq!(kinds[0], BinOpKind::Pow);
        assert_eq!(kinds[1].prio(), kinds[2].prio());
        assert_eq!(kinds[3].prio(), kinds[4].prio());
        assert!(BinOpKind::Mul.prio() > BinOpKind::Sub.prio());
    }

    #[test]
    fn test_apply() {
        assert_eq!(BinOpKind::Sub.apply(3.0, 5.0), -2.0);
        assert_eq!(BinOpKind::Div.apply(1.0, 4.0), 0.25);
        assert_eq!(BinOpKind::Pow.apply(2.0f32, 10.0), 1024.0);
        assert!(BinOpKind::Div.apply(1.0f64, 0.0).is_infinite());
        assert!(BinOpKind::Div.apply(0.0f64, 0.0).is_nan());
    }

    #[test]
    fn test_repr() {
        let reprs = BinOpKind::ALL.iter().map(|k| k.repr()).collect::<String>();
        assert_eq!(reprs, "+-*/^");
        assert!(BinOpKind::Add.is_commutative());
        assert!(!BinOpKind::Div.is_commutative());
    }
}
