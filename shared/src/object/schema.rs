use cohort_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{object::error::ObjectError, FieldKind, Value};

/// The declared, ordered attribute set shared by every object of one kind.
/// Objects that differ only in their attributes (client, place, game objects)
/// are instances of different schemas rather than different types.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<(String, FieldKind)>,
}

impl Schema {
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position and kind of the named attribute
    pub fn field(&self, name: &str) -> Result<(usize, &FieldKind), ObjectError> {
        self.fields
            .iter()
            .position(|(field_name, _)| field_name == name)
            .map(|index| (index, &self.fields[index].1))
            .ok_or_else(|| ObjectError::UnknownAttribute {
                schema: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Checks a value against the named attribute's declared kind
    pub fn check(&self, name: &str, value: &Value) -> Result<usize, ObjectError> {
        let (index, kind) = self.field(name)?;
        if !value.conforms_to(kind) {
            return Err(ObjectError::TypeMismatch {
                name: name.to_string(),
                expected: kind.clone(),
                actual: value.type_name(),
            });
        }
        Ok(index)
    }

    /// Builds a full value row from a partial attribute list; attributes that
    /// are not given take their kind's default.
    pub fn instantiate(&self, attributes: Vec<(String, Value)>) -> Result<Vec<Value>, ObjectError> {
        let mut values: Vec<Value> = self
            .fields
            .iter()
            .map(|(_, kind)| kind.default_value())
            .collect();
        for (name, value) in attributes {
            let index = self.check(&name, &value)?;
            values[index] = value;
        }
        Ok(values)
    }
}

pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, FieldKind)>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.push((name.to_string(), kind));
        self
    }

    pub fn build(self) -> Result<Schema, ObjectError> {
        for (index, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[index + 1..]
                .iter()
                .any(|(other, _)| other == name)
            {
                return Err(ObjectError::DuplicateAttribute {
                    schema: self.name,
                    name: name.clone(),
                });
            }
        }
        Ok(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}

impl Serde for Schema {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        (self.fields.len() as u32).ser(writer);
        for (name, kind) in &self.fields {
            name.ser(writer);
            kind.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let name = String::de(reader)?;
        let count = u32::de(reader)?;
        let mut fields = Vec::new();
        for _ in 0..count {
            let field_name = String::de(reader)?;
            let kind = FieldKind::de(reader)?;
            fields.push((field_name, kind));
        }
        Ok(Schema { name, fields })
    }
}
