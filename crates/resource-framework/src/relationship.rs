//! Relationship descriptors and resolved relationship values.

use crate::instance::ResourceInstance;
use crate::predicate::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A named, deferred query attached to a resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDescriptor {
    name: String,
    predicate: Predicate,
    cardinality: Cardinality,
}

impl RelationshipDescriptor {
    pub fn new(name: impl Into<String>, predicate: Predicate, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            predicate,
            cardinality,
        }
    }

    pub fn one(name: impl Into<String>, predicate: Predicate) -> Self {
        Self::new(name, predicate, Cardinality::One)
    }

    pub fn many(name: impl Into<String>, predicate: Predicate) -> Self {
        Self::new(name, predicate, Cardinality::Many)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// The materialized value of a relationship on one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationValue {
    One(Option<ResourceInstance>),
    Many(Vec<ResourceInstance>),
}

impl RelationValue {
    /// Shapes resolver output by cardinality. For `One`, the first instance wins.
    pub fn shape(cardinality: Cardinality, instances: Vec<ResourceInstance>) -> Self {
        match cardinality {
            Cardinality::One => RelationValue::One(instances.into_iter().next()),
            Cardinality::Many => RelationValue::Many(instances),
        }
    }

    pub fn as_one(&self) -> Option<&ResourceInstance> {
        match self {
            RelationValue::One(one) => one.as_ref(),
            RelationValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> &[ResourceInstance] {
        match self {
            RelationValue::One(_) => &[],
            RelationValue::Many(many) => many,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RelationValue::One(one) => usize::from(one.is_some()),
            RelationValue::Many(many) => many.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
