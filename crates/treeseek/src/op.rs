//! Operators understood by `where`-family conditions.
//!
//! Each operator has one canonical [`Op`] variant and one or more names
//! it can be spelled with in a condition call.

use std::fmt;

/// Comparison operator for a `where` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `=`, `eq`, `equal`: loose equality.
    Equal,
    /// `!=`, `<>`, `notEq`, `notEqual`.
    NotEqual,
    /// `<`, `lwr`, `minor`.
    Lower,
    /// `>`, `gt`, `major`.
    Greater,
    /// `<=`, `lwrEq`, `minorEqual`.
    LowerEqual,
    /// `>=`, `gtEq`, `majorEqual`.
    GreaterEqual,
    /// `odd`: true when the operand is divisible by two.
    Odd,
    /// `even`: true when the operand leaves a positive remainder.
    Even,
    /// `match`: regular expression test.
    Match,
    /// `notMatch`: negated regular expression test.
    NotMatch,
    /// `is`, `getType`: runtime type tag comparison.
    Is,
    /// `empty`, `isEmpty`.
    Empty,
    /// `instanceOf`: structured value of a named type.
    InstanceOf,
    /// `has`: item contains a sub-path.
    Has,
    /// `hasNot`: item lacks a sub-path.
    HasNot,
}

/// Every accepted spelling, paired with the operator it names.
const NAMES: &[(&str, Op)] = &[
    ("=", Op::Equal),
    ("eq", Op::Equal),
    ("equal", Op::Equal),
    ("!=", Op::NotEqual),
    ("<>", Op::NotEqual),
    ("notEq", Op::NotEqual),
    ("notEqual", Op::NotEqual),
    ("<", Op::Lower),
    ("lwr", Op::Lower),
    ("minor", Op::Lower),
    (">", Op::Greater),
    ("gt", Op::Greater),
    ("major", Op::Greater),
    ("<=", Op::LowerEqual),
    ("lwrEq", Op::LowerEqual),
    ("minorEqual", Op::LowerEqual),
    (">=", Op::GreaterEqual),
    ("gtEq", Op::GreaterEqual),
    ("majorEqual", Op::GreaterEqual),
    ("odd", Op::Odd),
    ("even", Op::Even),
    ("match", Op::Match),
    ("notMatch", Op::NotMatch),
    ("is", Op::Is),
    ("getType", Op::Is),
    ("empty", Op::Empty),
    ("isEmpty", Op::Empty),
    ("instanceOf", Op::InstanceOf),
    ("has", Op::Has),
    ("hasNot", Op::HasNot),
];

impl Op {
    /// Looks an operator up by any of its names. Matching is exact.
    pub fn parse(name: &str) -> Option<Op> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, op)| *op)
    }

    /// Evaluates an ordering operator against a comparison result.
    ///
    /// Operators other than `<`, `>`, `<=` and `>=` always yield `false`.
    pub fn eval_ordering(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Op::Greater => ordering == Greater,
            Op::GreaterEqual => ordering != Less,
            Op::Lower => ordering == Less,
            Op::LowerEqual => ordering != Greater,
            _ => false,
        }
    }

    /// Returns the canonical name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Equal => "equal",
            Op::NotEqual => "notEqual",
            Op::Lower => "minor",
            Op::Greater => "major",
            Op::LowerEqual => "minorEqual",
            Op::GreaterEqual => "majorEqual",
            Op::Odd => "odd",
            Op::Even => "even",
            Op::Match => "match",
            Op::NotMatch => "notMatch",
            Op::Is => "getType",
            Op::Empty => "isEmpty",
            Op::InstanceOf => "instanceOf",
            Op::Has => "has",
            Op::HasNot => "hasNot",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
