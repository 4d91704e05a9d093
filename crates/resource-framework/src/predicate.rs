//! # Predicate Algebra
//!
//! Predicates are plain expression trees. Building one never looks anything up:
//! a [`FieldRef`] names its owning type symbolically, so `Account` can describe a
//! query over `User` before `User` has been registered. Names are only checked
//! when the [`Resolver`](crate::Resolver) compiles the tree.
//!
//! ```rust
//! use resource_framework::predicate::{field, this};
//!
//! // Declared on Account: the user whose id is this account's owner_id.
//! let owner = field("User", "id").eq(this("owner_id"));
//! assert_eq!(owner.to_string(), "(User.id == self.owner_id)");
//!
//! let adults = field("User", "age").ge(18) & !field("User", "banned").eq(true);
//! assert_eq!(adults.to_string(), "((User.age >= 18) && !(User.banned == true))");
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::{BitAnd, BitOr, Not};

/// A symbolic `Type.field` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub type_name: String,
    pub field: String,
}

/// Shorthand for [`FieldRef::new`].
pub fn field(type_name: impl Into<String>, field: impl Into<String>) -> FieldRef {
    FieldRef::new(type_name, field)
}

/// A reference to a field of the instance a relationship is accessed on.
pub fn this(field: impl Into<String>) -> Operand {
    Operand::This(field.into())
}

impl FieldRef {
    pub fn new(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    fn compare(self, op: CompareOp, operand: impl IntoOperand) -> Predicate {
        Predicate::Compare {
            field: self,
            op,
            operand: operand.into_operand(),
        }
    }

    pub fn eq(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Eq, operand)
    }

    pub fn ne(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Neq, operand)
    }

    pub fn gt(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Gt, operand)
    }

    pub fn lt(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Lt, operand)
    }

    pub fn ge(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Geq, operand)
    }

    pub fn le(self, operand: impl IntoOperand) -> Predicate {
        self.compare(CompareOp::Leq, operand)
    }

    pub fn one_of<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        Predicate::In {
            field: self,
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn none_of<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        Predicate::In {
            field: self,
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Field(FieldRef),
    /// `self.field`, bound when a relationship is accessed.
    This(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Field(r) => write!(f, "{r}"),
            Operand::This(name) => write!(f, "self.{name}"),
        }
    }
}

/// Anything usable on the right-hand side of a comparison.
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for FieldRef {
    fn into_operand(self) -> Operand {
        Operand::Field(self)
    }
}

macro_rules! literal_operand {
    ($($t:ty),*) => {
        $(impl IntoOperand for $t {
            fn into_operand(self) -> Operand {
                Operand::Value(Value::from(self))
            }
        })*
    };
}

literal_operand!(Value, bool, i32, i64, u32, f64, &str, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Lt,
    Geq,
    Leq,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Geq => ">=",
            CompareOp::Leq => "<=",
        }
    }

    /// The operator with its operands swapped: `a < b` ⇔ `b > a`.
    pub fn flipped(self) -> Self {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Geq => CompareOp::Leq,
            CompareOp::Leq => CompareOp::Geq,
            op => op,
        }
    }

    /// Applies the operator. Ordering operators are false for values that
    /// cannot be ordered against each other.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            CompareOp::Eq => lhs.loosely_eq(rhs),
            CompareOp::Neq => !lhs.loosely_eq(rhs),
            CompareOp::Gt => lhs.compare(rhs) == Some(Greater),
            CompareOp::Lt => lhs.compare(rhs) == Some(Less),
            CompareOp::Geq => matches!(lhs.compare(rhs), Some(Greater | Equal)),
            CompareOp::Leq => matches!(lhs.compare(rhs), Some(Less | Equal)),
        }
    }
}

/// A deferred boolean expression over field comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        field: FieldRef,
        op: CompareOp,
        operand: Operand,
    },
    In {
        field: FieldRef,
        values: Vec<Value>,
        negated: bool,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(field: FieldRef, operand: impl IntoOperand) -> Self {
        field.eq(operand)
    }

    pub fn and(lhs: Predicate, rhs: Predicate) -> Self {
        Predicate::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Predicate, rhs: Predicate) -> Self {
        Predicate::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Left-folds with AND. `None` when there is nothing to fold.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        predicates.into_iter().reduce(Predicate::and)
    }

    /// Left-folds with OR. `None` when there is nothing to fold.
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        predicates.into_iter().reduce(Predicate::or)
    }

    /// Left-hand field of the leftmost comparison.
    pub fn leading_field(&self) -> &FieldRef {
        match self {
            Predicate::Compare { field, .. } | Predicate::In { field, .. } => field,
            Predicate::And(a, _) | Predicate::Or(a, _) => a.leading_field(),
            Predicate::Not(p) => p.leading_field(),
        }
    }

    /// Every field reference in the tree, left-hand sides and operands alike.
    pub fn field_refs(&self) -> Vec<&FieldRef> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a FieldRef>) {
        match self {
            Predicate::Compare { field, operand, .. } => {
                refs.push(field);
                if let Operand::Field(r) = operand {
                    refs.push(r);
                }
            }
            Predicate::In { field, .. } => refs.push(field),
            Predicate::And(a, b) | Predicate::Or(a, b) => {
                a.collect_refs(refs);
                b.collect_refs(refs);
            }
            Predicate::Not(p) => p.collect_refs(refs),
        }
    }

    /// Rebuilds the tree, rewriting every comparison through `f`.
    pub(crate) fn try_map_compare<E>(
        &self,
        f: &mut impl FnMut(&FieldRef, CompareOp, &Operand) -> Result<Predicate, E>,
    ) -> Result<Predicate, E> {
        Ok(match self {
            Predicate::Compare { field, op, operand } => f(field, *op, operand)?,
            Predicate::In { .. } => self.clone(),
            Predicate::And(a, b) => Predicate::and(a.try_map_compare(f)?, b.try_map_compare(f)?),
            Predicate::Or(a, b) => Predicate::or(a.try_map_compare(f)?, b.try_map_compare(f)?),
            Predicate::Not(p) => Predicate::negate(p.try_map_compare(f)?),
        })
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { field, op, operand } => {
                write!(f, "({field} {} {operand})", op.symbol())
            }
            Predicate::In {
                field,
                values,
                negated,
            } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                let op = if *negated { "not in" } else { "in" };
                write!(f, "({field} {op} [{}])", values.join(", "))
            }
            Predicate::And(a, b) => write!(f, "({a} && {b})"),
            Predicate::Or(a, b) => write!(f, "({a} || {b})"),
            Predicate::Not(p) => write!(f, "!{p}"),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        Predicate::and(self, rhs)
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        Predicate::or(self, rhs)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::negate(self)
    }
}
