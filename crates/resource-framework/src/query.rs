//! Explicit queries, run with [`Resolver::execute`](crate::Resolver::execute).

use crate::filter::OrderBy;
use crate::predicate::Predicate;

/// A query over one resource type.
///
/// ```rust
/// use resource_framework::predicate::field;
/// use resource_framework::{OrderBy, Query};
///
/// let q = Query::new("User")
///     .filter(field("User", "age").ge(18))
///     .filter(field("User", "banned").eq(false))
///     .order_by(OrderBy::desc("age"))
///     .limit(10);
/// assert_eq!(
///     q.predicate().unwrap().to_string(),
///     "((User.age >= 18) && (User.banned == false))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    type_name: String,
    predicate: Option<Predicate>,
    order_by: Vec<OrderBy>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl Query {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            predicate: None,
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Adds a condition; repeated calls are AND-ed together.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    pub fn order_by(mut self, key: OrderBy) -> Self {
        self.order_by.push(key);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Caps the result count. Zero is raised to one.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.max(1));
        self
    }

    pub fn first(self) -> Self {
        self.limit(1)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn order_keys(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn offset_value(&self) -> Option<usize> {
        self.offset
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_first_only(&self) -> bool {
        self.limit == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::field;

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(Query::new("T").limit(0).limit_value(), Some(1));
        assert!(Query::new("T").first().is_first_only());
    }

    #[test]
    fn test_single_filter_is_kept_as_is() {
        let p = field("T", "x").eq(1);
        assert_eq!(Query::new("T").filter(p.clone()).predicate(), Some(&p));
    }
}
