use cohort_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{Oid, Value};

/// Coarse classification of an event, as carried in the wire envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    AttributeChange,
    ElementUpdate,
    Message,
    ObjectAdded,
    ObjectRemoved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Replaces the whole value of an attribute
    AttributeChanged {
        name: String,
        value: Value,
        old_value: Option<Value>,
    },
    /// Appends an element to a List or Set attribute
    ElementAdded { name: String, value: Value },
    /// Replaces the element at `index` of a List or Set attribute
    ElementUpdated {
        name: String,
        index: u32,
        value: Value,
        old_value: Option<Value>,
    },
    /// Removes the element at `index` of a List or Set attribute
    ElementRemoved {
        name: String,
        index: u32,
        old_value: Option<Value>,
    },
    /// Named message with arguments, no effect on attributes
    Message { name: String, args: Vec<Value> },
    ObjectAdded,
    ObjectRemoved,
}

/// An immutable description of one mutation of, or one message to, a
/// single Shared Object.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    target: Oid,
    source: Option<Oid>,
    kind: EventKind,
}

impl Event {
    pub fn new(target: Oid, kind: EventKind) -> Self {
        Self {
            target,
            source: None,
            kind,
        }
    }

    pub fn attribute_changed(target: Oid, name: &str, value: impl Into<Value>) -> Self {
        Self::new(
            target,
            EventKind::AttributeChanged {
                name: name.to_string(),
                value: value.into(),
                old_value: None,
            },
        )
    }

    pub fn element_added(target: Oid, name: &str, value: impl Into<Value>) -> Self {
        Self::new(
            target,
            EventKind::ElementAdded {
                name: name.to_string(),
                value: value.into(),
            },
        )
    }

    pub fn element_updated(target: Oid, name: &str, index: u32, value: impl Into<Value>) -> Self {
        Self::new(
            target,
            EventKind::ElementUpdated {
                name: name.to_string(),
                index,
                value: value.into(),
                old_value: None,
            },
        )
    }

    pub fn element_removed(target: Oid, name: &str, index: u32) -> Self {
        Self::new(
            target,
            EventKind::ElementRemoved {
                name: name.to_string(),
                index,
                old_value: None,
            },
        )
    }

    pub fn message(target: Oid, name: &str, args: Vec<Value>) -> Self {
        Self::new(
            target,
            EventKind::Message {
                name: name.to_string(),
                args,
            },
        )
    }

    pub fn object_added(target: Oid) -> Self {
        Self::new(target, EventKind::ObjectAdded)
    }

    pub fn object_removed(target: Oid) -> Self {
        Self::new(target, EventKind::ObjectRemoved)
    }

    /// Tags the event with the object that originated it
    pub fn with_source(mut self, source: Oid) -> Self {
        self.source = Some(source);
        self
    }

    pub fn target(&self) -> Oid {
        self.target
    }

    pub fn source(&self) -> Option<Oid> {
        self.source
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn event_type(&self) -> EventType {
        match &self.kind {
            EventKind::AttributeChanged { .. } => EventType::AttributeChange,
            EventKind::ElementAdded { .. }
            | EventKind::ElementUpdated { .. }
            | EventKind::ElementRemoved { .. } => EventType::ElementUpdate,
            EventKind::Message { .. } => EventType::Message,
            EventKind::ObjectAdded => EventType::ObjectAdded,
            EventKind::ObjectRemoved => EventType::ObjectRemoved,
        }
    }

    /// The attribute this event mutates, if any
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.kind {
            EventKind::AttributeChanged { name, .. }
            | EventKind::ElementAdded { name, .. }
            | EventKind::ElementUpdated { name, .. }
            | EventKind::ElementRemoved { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Message name and arguments, if this is a message event
    pub fn as_message(&self) -> Option<(&str, &[Value])> {
        match &self.kind {
            EventKind::Message { name, args } => Some((name.as_str(), args.as_slice())),
            _ => None,
        }
    }

    pub fn into_message(self) -> Option<(String, Vec<Value>)> {
        match self.kind {
            EventKind::Message { name, args } => Some((name, args)),
            _ => None,
        }
    }

    /// Records the value the mutation replaced; set once, when the event is
    /// committed against the object.
    pub(crate) fn set_old_value(&mut self, previous: Value) {
        match &mut self.kind {
            EventKind::AttributeChanged { old_value, .. }
            | EventKind::ElementUpdated { old_value, .. }
            | EventKind::ElementRemoved { old_value, .. } => *old_value = Some(previous),
            _ => {}
        }
    }
}

impl Serde for Event {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.target.ser(writer);
        self.source.ser(writer);
        match &self.kind {
            EventKind::AttributeChanged {
                name,
                value,
                old_value,
            } => {
                writer.write_byte(0);
                name.ser(writer);
                value.ser(writer);
                old_value.ser(writer);
            }
            EventKind::ElementAdded { name, value } => {
                writer.write_byte(1);
                name.ser(writer);
                value.ser(writer);
            }
            EventKind::ElementUpdated {
                name,
                index,
                value,
                old_value,
            } => {
                writer.write_byte(2);
                name.ser(writer);
                index.ser(writer);
                value.ser(writer);
                old_value.ser(writer);
            }
            EventKind::ElementRemoved {
                name,
                index,
                old_value,
            } => {
                writer.write_byte(3);
                name.ser(writer);
                index.ser(writer);
                old_value.ser(writer);
            }
            EventKind::Message { name, args } => {
                writer.write_byte(4);
                name.ser(writer);
                args.ser(writer);
            }
            EventKind::ObjectAdded => writer.write_byte(5),
            EventKind::ObjectRemoved => writer.write_byte(6),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let target = Oid::de(reader)?;
        let source = Option::<Oid>::de(reader)?;
        let kind = match reader.read_byte()? {
            0 => EventKind::AttributeChanged {
                name: String::de(reader)?,
                value: Value::de(reader)?,
                old_value: Option::<Value>::de(reader)?,
            },
            1 => EventKind::ElementAdded {
                name: String::de(reader)?,
                value: Value::de(reader)?,
            },
            2 => EventKind::ElementUpdated {
                name: String::de(reader)?,
                index: u32::de(reader)?,
                value: Value::de(reader)?,
                old_value: Option::<Value>::de(reader)?,
            },
            3 => EventKind::ElementRemoved {
                name: String::de(reader)?,
                index: u32::de(reader)?,
                old_value: Option::<Value>::de(reader)?,
            },
            4 => EventKind::Message {
                name: String::de(reader)?,
                args: Vec::<Value>::de(reader)?,
            },
            5 => EventKind::ObjectAdded,
            6 => EventKind::ObjectRemoved,
            tag => {
                return Err(SerdeErr::UnknownTag {
                    type_name: "Event",
                    tag,
                })
            }
        };
        Ok(Self {
            target,
            source,
            kind,
        })
    }
}
