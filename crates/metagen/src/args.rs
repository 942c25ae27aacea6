//! Tagged arguments carried by a broadcast.
//!
//! A broadcast is an ordered list of [`Arg`]s. Each rule declares the types it
//! expects through [`FromArg`]; a rule only fires when every argument converts.

use std::fmt::{self, Display, Formatter};

use metagen_lang::SyntaxNode;
use smol_str::SmolStr;

/// Name of a type passed to a rule, such as `String` or `Int32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName(SmolStr);

impl TypeName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
    Type(TypeName),
    Node(SyntaxNode),
}

impl Arg {
    pub fn arg_type(&self) -> ArgType {
        match self {
            Arg::Null => ArgType::Null,
            Arg::Bool(_) => ArgType::Bool,
            Arg::Int(_) => ArgType::Int,
            Arg::Float(_) => ArgType::Float,
            Arg::Str(_) => ArgType::Str,
            Arg::Type(_) => ArgType::Type,
            Arg::Node(_) => ArgType::Node,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => write!(f, "null"),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Float(n) => write!(f, "{}", n),
            Arg::Str(s) => write!(f, "{:?}", s.as_str()),
            Arg::Type(t) => write!(f, "typeof({})", t),
            Arg::Node(node) => write!(f, "<{}>", node.kind()),
        }
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.into())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value.into())
    }
}

impl From<SmolStr> for Arg {
    fn from(value: SmolStr) -> Self {
        Arg::Str(value)
    }
}

impl From<TypeName> for Arg {
    fn from(value: TypeName) -> Self {
        Arg::Type(value)
    }
}

impl From<SyntaxNode> for Arg {
    fn from(value: SyntaxNode) -> Self {
        Arg::Node(value)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Arg::Null)
    }
}

/// Declared type of a rule parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Type,
    Node,
    Any,
    Optional(Box<ArgType>),
}

impl Display for ArgType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Null => write!(f, "null"),
            ArgType::Bool => write!(f, "bool"),
            ArgType::Int => write!(f, "int"),
            ArgType::Float => write!(f, "double"),
            ArgType::Str => write!(f, "string"),
            ArgType::Type => write!(f, "Type"),
            ArgType::Node => write!(f, "SyntaxNode"),
            ArgType::Any => write!(f, "object?"),
            ArgType::Optional(inner) => write!(f, "{}?", inner),
        }
    }
}

/// Conversion from a broadcast argument into a rule parameter.
///
/// Returning `None` means the argument is not assignable to the parameter,
/// which makes the rule skip the broadcast.
pub trait FromArg: Sized {
    fn arg_type() -> ArgType;

    fn from_arg(arg: &Arg) -> Option<Self>;
}

impl FromArg for Arg {
    fn arg_type() -> ArgType {
        ArgType::Any
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        Some(arg.clone())
    }
}

impl FromArg for bool {
    fn arg_type() -> ArgType {
        ArgType::Bool
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromArg for i32 {
    fn arg_type() -> ArgType {
        ArgType::Int
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Int(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl FromArg for i64 {
    fn arg_type() -> ArgType {
        ArgType::Int
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromArg for f64 {
    fn arg_type() -> ArgType {
        ArgType::Float
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromArg for String {
    fn arg_type() -> ArgType {
        ArgType::Str
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Str(s) => Some(s.to_string()),
            _ => None,
        }
    }
}

impl FromArg for SmolStr {
    fn arg_type() -> ArgType {
        ArgType::Str
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromArg for TypeName {
    fn arg_type() -> ArgType {
        ArgType::Type
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Type(t) => Some(t.clone()),
            _ => None,
        }
    }
}

impl FromArg for SyntaxNode {
    fn arg_type() -> ArgType {
        ArgType::Node
    }

    // Nodes handed in from outside must not carry tags of this tree.
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Node(node) => Some(node.untagged()),
            _ => None,
        }
    }
}

impl<T: FromArg> FromArg for Option<T> {
    fn arg_type() -> ArgType {
        ArgType::Optional(Box::new(T::arg_type()))
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Null => Some(None),
            arg => T::from_arg(arg).map(Some),
        }
    }
}

/// Builds a `Vec<Arg>` from values convertible into [`Arg`].
///
/// ```rust
/// use metagen::{Arg, TypeName, args};
///
/// let args = args![TypeName::new("String"), "Name"];
/// assert_eq!(args, vec![Arg::Type(TypeName::new("String")), Arg::Str("Name".into())]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::int(Arg::Int(5), Some(5))]
    #[case::out_of_range(Arg::Int(i64::MAX), None)]
    #[case::string(Arg::Str("5".into()), None)]
    #[case::null(Arg::Null, None)]
    fn test_i32_from_arg(#[case] arg: Arg, #[case] expected: Option<i32>) {
        assert_eq!(i32::from_arg(&arg), expected);
    }

    #[rstest]
    #[case::null(Arg::Null, Some(None))]
    #[case::value(Arg::Str("a".into()), Some(Some("a".to_string())))]
    #[case::mismatch(Arg::Bool(true), None)]
    fn test_option_from_arg(#[case] arg: Arg, #[case] expected: Option<Option<String>>) {
        assert_eq!(Option::<String>::from_arg(&arg), expected);
    }

    #[test]
    fn test_null_never_matches_plain_parameters() {
        assert_eq!(String::from_arg(&Arg::Null), None);
        assert_eq!(bool::from_arg(&Arg::Null), None);
        assert_eq!(TypeName::from_arg(&Arg::Null), None);
        assert_eq!(SyntaxNode::from_arg(&Arg::Null), None);
        assert_eq!(Arg::from_arg(&Arg::Null), Some(Arg::Null));
    }

    #[test]
    fn test_float_does_not_accept_int() {
        assert_eq!(f64::from_arg(&Arg::Int(1)), None);
        assert_eq!(f64::from_arg(&Arg::Float(1.5)), Some(1.5));
    }

    #[test]
    fn test_args_macro() {
        let node = metagen_lang::make::identifier_name("x");
        let args = args![1, "a", true, 2.5, None::<i64>, node.clone()];

        assert_eq!(
            args,
            vec![
                Arg::Int(1),
                Arg::Str("a".into()),
                Arg::Bool(true),
                Arg::Float(2.5),
                Arg::Null,
                Arg::Node(node),
            ]
        );
        assert!(args![].is_empty());
    }

    #[rstest]
    #[case(<Option<i64> as FromArg>::arg_type(), "int?")]
    #[case(<TypeName as FromArg>::arg_type(), "Type")]
    #[case(<Arg as FromArg>::arg_type(), "object?")]
    fn test_arg_type_display(#[case] arg_type: ArgType, #[case] expected: &str) {
        assert_eq!(arg_type.to_string(), expected);
    }
}
