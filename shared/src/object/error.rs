use thiserror::Error;

use crate::{FieldKind, Oid};

/// Errors raised when an event or initial attribute set does not fit an
/// object's schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// Attribute name is not declared by the object's schema
    #[error("Schema `{schema}` declares no attribute named `{name}`")]
    UnknownAttribute { schema: String, name: String },

    /// Value does not conform to the attribute's declared kind
    #[error("Attribute `{name}` is declared as {expected} but was given a {actual} value")]
    TypeMismatch {
        name: String,
        expected: FieldKind,
        actual: &'static str,
    },

    /// Element event targeted a scalar attribute
    #[error("Attribute `{name}` is not a List or Set, element events do not apply")]
    NotACollection { name: String },

    /// Element index past the end of the collection
    #[error("Index {index} is out of range for attribute `{name}` of length {length}")]
    IndexOutOfRange {
        name: String,
        index: u32,
        length: usize,
    },

    /// Value is already an element of a Set attribute
    #[error("Set attribute `{name}` already contains the added element")]
    DuplicateElement { name: String },

    /// Event was addressed to a different object
    #[error("Event for {event_target} applied to {oid}")]
    WrongTarget { oid: Oid, event_target: Oid },

    /// Schema declares the same attribute twice
    #[error("Schema `{schema}` declares attribute `{name}` more than once")]
    DuplicateAttribute { schema: String, name: String },
}
