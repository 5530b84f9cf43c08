//! Enumerated comparison kinds for `cmp_ok` and `contains_ok`.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

/// A binary comparison between two values of the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `==`
    Eq,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `!=`
    Ne,
    /// Both operands are the same object.
    Is,
    /// The operands are distinct objects.
    IsNot,
}

impl Comparison {
    /// Evaluates `got <op> expected`.
    pub fn evaluate<T: PartialOrd + ?Sized>(self, got: &T, expected: &T) -> bool {
        match self {
            Self::Lt => got < expected,
            Self::Gt => got > expected,
            Self::Eq => got == expected,
            Self::Ge => got >= expected,
            Self::Le => got <= expected,
            Self::Ne => got != expected,
            Self::Is => std::ptr::eq(got, expected),
            Self::IsNot => !std::ptr::eq(got, expected),
        }
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "==" => Ok(Self::Eq),
            ">=" => Ok(Self::Ge),
            "<=" => Ok(Self::Le),
            "!=" | "<>" => Ok(Self::Ne),
            "is" => Ok(Self::Is),
            "is not" => Ok(Self::IsNot),
            _ => Err(Error::UnsupportedOperator(s.to_owned())),
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Ne => "!=",
            Self::Is => "is",
            Self::IsNot => "is not",
        };
        f.write_str(op)
    }
}

/// Membership of a value in a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// `in`
    In,
    /// `not in`
    NotIn,
}

impl Membership {
    /// Evaluates `item <op> haystack`.
    pub fn evaluate<T: PartialEq>(self, item: &T, haystack: &[T]) -> bool {
        let found = haystack.contains(item);
        match self {
            Self::In => found,
            Self::NotIn => !found,
        }
    }
}

impl FromStr for Membership {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in" => Ok(Self::In),
            "not in" => Ok(Self::NotIn),
            _ => Err(Error::UnsupportedOperator(s.to_owned())),
        }
    }
}

impl Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::NotIn => f.write_str("not in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_matches};

    #[test]
    fn ordering_comparisons() {
        assert!(Comparison::Lt.evaluate(&1, &2));
        assert!(!Comparison::Gt.evaluate(&1, &2));
        assert!(Comparison::Ge.evaluate(&2, &2));
        assert!(Comparison::Le.evaluate("abc", "abd"));
        assert!(Comparison::Ne.evaluate(&1.5, &2.5));
        assert!(Comparison::Eq.evaluate(&String::from("x"), &String::from("x")));
    }

    #[test]
    fn identity_comparisons() {
        let a = String::from("same");
        let b = a.clone();

        assert!(Comparison::Is.evaluate(&a, &a));
        assert!(!Comparison::Is.evaluate(&a, &b));
        assert!(Comparison::IsNot.evaluate(&a, &b));
        assert!(Comparison::Eq.evaluate(&a, &b));
    }

    #[test]
    fn membership() {
        let primes = [2, 3, 5, 7];
        assert!(Membership::In.evaluate(&5, &primes));
        assert!(Membership::NotIn.evaluate(&4, &primes));
    }

    #[test]
    fn operators_round_trip_through_text() {
        for op in ["<", ">", "==", ">=", "<=", "!=", "is", "is not"] {
            assert_eq!(op.parse::<Comparison>().unwrap().to_string(), op);
        }
        assert_eq!("<>".parse::<Comparison>().unwrap(), Comparison::Ne);
        assert_eq!("not in".parse::<Membership>().unwrap(), Membership::NotIn);
    }

    #[test]
    fn unknown_operators_are_rejected() {
        assert_matches!("=~".parse::<Comparison>(), Err(Error::UnsupportedOperator(op)) if op == "=~");
        assert_matches!("in".parse::<Comparison>(), Err(Error::UnsupportedOperator(_)));
        assert_matches!("within".parse::<Membership>(), Err(Error::UnsupportedOperator(_)));
    }
}
