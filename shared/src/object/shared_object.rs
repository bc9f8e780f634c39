use std::sync::Arc;

use crate::{
    object::{error::ObjectError, schema::Schema, snapshot::Snapshot},
    Event, EventKind, Oid, Value,
};

/// A mutable record of schema-declared attributes, the unit of replication.
/// The authority and every proxy hold one of these per object; both advance
/// it only by applying events, in order.
#[derive(Debug, Clone)]
pub struct SharedObject {
    oid: Oid,
    schema: Arc<Schema>,
    values: Vec<Value>,
    sequence: u64,
}

impl SharedObject {
    pub fn new(
        oid: Oid,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
    ) -> Result<Self, ObjectError> {
        let values = schema.instantiate(attributes)?;
        Ok(Self {
            oid,
            schema,
            values,
            sequence: 0,
        })
    }

    /// Rebuilds a proxy copy from a subscription snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, ObjectError> {
        let Snapshot {
            oid,
            schema,
            values,
            sequence,
        } = snapshot;
        let attributes = schema
            .fields()
            .map(|(name, _)| name.to_string())
            .zip(values)
            .collect();
        let schema = Arc::new(schema);
        let mut object = Self::new(oid, schema, attributes)?;
        object.sequence = sequence;
        Ok(object)
    }

    pub fn oid(&self) -> Oid {
        self.oid
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of events applied to this copy since creation
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let (index, _) = self.schema.field(name).ok()?;
        self.values.get(index)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .map(|(name, _)| name)
            .zip(self.values.iter())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            oid: self.oid,
            schema: self.schema.as_ref().clone(),
            values: self.values.clone(),
            sequence: self.sequence,
        }
    }

    /// Validates and applies one event, returning it with the replaced value
    /// recorded. On error the object is left untouched.
    pub fn apply(&mut self, mut event: Event) -> Result<Event, ObjectError> {
        if event.target() != self.oid {
            return Err(ObjectError::WrongTarget {
                oid: self.oid,
                event_target: event.target(),
            });
        }

        let previous = match event.kind() {
            EventKind::AttributeChanged { name, value, .. } => {
                let index = self.schema.check(name, value)?;
                Some(std::mem::replace(&mut self.values[index], value.clone()))
            }
            EventKind::ElementAdded { name, value } => {
                let (index, element_kind) = self.element_field(name)?;
                if !value.conforms_to(element_kind) {
                    return Err(ObjectError::TypeMismatch {
                        name: name.clone(),
                        expected: element_kind.clone(),
                        actual: value.type_name(),
                    });
                }
                let is_set = matches!(self.values[index], Value::Set(_));
                let Some(items) = self.values[index].elements_mut() else {
                    return Err(ObjectError::NotACollection { name: name.clone() });
                };
                if is_set && items.contains(value) {
                    return Err(ObjectError::DuplicateElement { name: name.clone() });
                }
                items.push(value.clone());
                None
            }
            EventKind::ElementUpdated {
                name, index, value, ..
            } => {
                let (field_index, element_kind) = self.element_field(name)?;
                if !value.conforms_to(element_kind) {
                    return Err(ObjectError::TypeMismatch {
                        name: name.clone(),
                        expected: element_kind.clone(),
                        actual: value.type_name(),
                    });
                }
                let is_set = matches!(self.values[field_index], Value::Set(_));
                let items = self.elements(field_index, name, *index)?;
                let position = *index as usize;
                if is_set
                    && items
                        .iter()
                        .enumerate()
                        .any(|(other, item)| other != position && item == value)
                {
                    return Err(ObjectError::DuplicateElement { name: name.clone() });
                }
                Some(std::mem::replace(&mut items[position], value.clone()))
            }
            EventKind::ElementRemoved { name, index, .. } => {
                let (field_index, _) = self.element_field(name)?;
                let items = self.elements(field_index, name, *index)?;
                Some(items.remove(*index as usize))
            }
            EventKind::Message { .. } | EventKind::ObjectAdded | EventKind::ObjectRemoved => None,
        };

        if let Some(previous) = previous {
            event.set_old_value(previous);
        }
        self.sequence += 1;
        Ok(event)
    }

    fn element_field(
        &self,
        name: &str,
    ) -> Result<(usize, &crate::FieldKind), ObjectError> {
        let (index, kind) = self.schema.field(name)?;
        let Some(element_kind) = kind.element() else {
            return Err(ObjectError::NotACollection {
                name: name.to_string(),
            });
        };
        Ok((index, element_kind))
    }

    fn elements(
        &mut self,
        field_index: usize,
        name: &str,
        index: u32,
    ) -> Result<&mut Vec<Value>, ObjectError> {
        let Some(items) = self.values[field_index].elements_mut() else {
            return Err(ObjectError::NotACollection {
                name: name.to_string(),
            });
        };
        if index as usize >= items.len() {
            return Err(ObjectError::IndexOutOfRange {
                name: name.to_string(),
                index,
                length: items.len(),
            });
        }
        Ok(items)
    }
}
