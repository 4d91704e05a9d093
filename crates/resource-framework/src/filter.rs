//! # Compiled Filters
//!
//! A [`Filter`] is what a storage backend receives: a predicate whose type names
//! have all been resolved, whose `self` references have been bound, and whose
//! field references are plain field names on a single target type. Backends may
//! translate it to whatever they speak; [`Filter::matches`] defines the meaning.

use crate::predicate::CompareOp;
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOperand {
    Value(Value),
    /// Another field of the same record.
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Compare {
        field: String,
        op: CompareOp,
        operand: FilterOperand,
    },
    In {
        field: String,
        values: Vec<Value>,
        negated: bool,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Evaluates the filter against one record. Missing fields read as `Null`.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Compare { field, op, operand } => {
                let lhs = lookup(record, field);
                let rhs = match operand {
                    FilterOperand::Value(v) => v,
                    FilterOperand::Field(name) => lookup(record, name),
                };
                op.apply(lhs, rhs)
            }
            Filter::In {
                field,
                values,
                negated,
            } => {
                let lhs = lookup(record, field);
                values.iter().any(|v| lhs.loosely_eq(v)) != *negated
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(record)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(record)),
            Filter::Not(inner) => !inner.matches(record),
        }
    }

    /// AND-combines, flattening nested conjunctions.
    pub(crate) fn conjoin(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::And(mut a), Filter::And(b)) => {
                a.extend(b);
                Filter::And(a)
            }
            (Filter::And(mut a), f) => {
                a.push(f);
                Filter::And(a)
            }
            (f, Filter::And(mut b)) => {
                b.insert(0, f);
                Filter::And(b)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// OR-combines, flattening nested disjunctions.
    pub(crate) fn disjoin(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::Or(mut a), Filter::Or(b)) => {
                a.extend(b);
                Filter::Or(a)
            }
            (Filter::Or(mut a), f) => {
                a.push(f);
                Filter::Or(a)
            }
            (f, Filter::Or(mut b)) => {
                b.insert(0, f);
                Filter::Or(b)
            }
            (a, b) => Filter::Or(vec![a, b]),
        }
    }
}

fn lookup<'a>(record: &'a Record, field: &str) -> &'a Value {
    const NULL: &Value = &Value::Null;
    record.get(field).unwrap_or(NULL)
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Everything a backend's `find` receives besides the type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindRequest {
    pub filter: Option<Filter>,
    pub order_by: Vec<OrderBy>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl FindRequest {
    pub fn new(filter: Option<Filter>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Reference evaluation over an in-memory sequence: filter, stable sort,
    /// then offset and limit. Input order is kept between equal sort keys.
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<Record> {
        let mut hits: Vec<&Record> = records
            .into_iter()
            .filter(|r| self.filter.as_ref().map_or(true, |f| f.matches(r)))
            .collect();

        if !self.order_by.is_empty() {
            hits.sort_by(|a, b| {
                self.order_by
                    .iter()
                    .map(|key| {
                        let ord = lookup(a, &key.field).sort_cmp(lookup(b, &key.field));
                        if key.descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| ord.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        hits.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
