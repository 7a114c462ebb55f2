use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Classifies what went wrong. Arithmetic domain problems such as a division by zero are
/// not errors; they produce the IEEE-754 special values of the scalar type.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[non_exhaustive]
pub enum ExErrorKind {
    /// A node could not be built, e.g., a symbol with an empty name.
    Construction,
    /// Evaluation met a symbol that has no value in the passed bindings.
    UnboundVariable,
    /// Differentiation met a construct it has no rule for, e.g., a non-constant exponent.
    Unsupported,
}

impl Display for ExErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            ExErrorKind::Construction => "construction error",
            ExErrorKind::UnboundVariable => "unbound variable",
            ExErrorKind::Unsupported => "unsupported",
        };
        write!(f, "{}", s)
    }
}

/// This will be thrown at you if something within Symex went wrong. Ok, obviously it is not an
/// exception, so thrown needs to be understood figuratively.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ExError {
    kind: ExErrorKind,
    msg: String,
}
impl ExError {
    pub fn new(kind: ExErrorKind, msg: &str) -> ExError {
        ExError {
            kind,
            msg: msg.to_string(),
        }
    }
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for ExError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}
impl Error for ExError {}

/// Creates an [`ExError`](ExError) of the given kind with a formatted message.
///
/// ```rust
/// use symex::{format_exerr, ExErrorKind};
/// let err = format_exerr!(ExErrorKind::UnboundVariable, "no value for {}", "x");
/// assert_eq!(err.msg(), "no value for x");
/// ```
#[macro_export]
macro_rules! format_exerr {
    ($kind:expr, $s:literal, $( $exps:expr ),*) => {
        $crate::ExError::new($kind, format!($s, $($exps),*).as_str())
    }
}

/// Creates an `Err` of the given kind with a formatted message.
#[macro_export]
macro_rules! exerr {
    ($kind:expr, $s:literal, $( $exps:expr ),*) => {
        Err($crate::format_exerr!($kind, $s, $($exps),*))
    };
    ($kind:expr, $s:literal) => {
        Err($crate::ExError::new($kind, $s))
    };
}

/// Symex' result type with [`ExError`](ExError) as error type.
pub type ExResult<U> = Result<U, ExError>;

#[test]
fn test_display() {
    let err = ExError::new(ExErrorKind::Unsupported, "non-constant exponent");
    assert_eq!(format!("{}", err), "unsupported: non-constant exponent");
    let res: ExResult<()> = exerr!(ExErrorKind::Construction, "name of {} is empty", "symbol");
    assert_eq!(res.unwrap_err().kind(), ExErrorKind::Construction);
}
