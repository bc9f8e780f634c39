use cohort_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{object::schema::Schema, Oid, Value};

/// Full state of an object at one point in its event order, delivered to a
/// subscriber in place of the history that preceded its subscription
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub oid: Oid,
    pub schema: Schema,
    pub values: Vec<Value>,
    pub sequence: u64,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&Value> {
        let (index, _) = self.schema.field(name).ok()?;
        self.values.get(index)
    }
}

impl Serde for Snapshot {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.oid.ser(writer);
        self.schema.ser(writer);
        self.values.ser(writer);
        self.sequence.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            oid: Oid::de(reader)?,
            schema: Schema::de(reader)?,
            values: Vec::<Value>::de(reader)?,
            sequence: u64::de(reader)?,
        })
    }
}
