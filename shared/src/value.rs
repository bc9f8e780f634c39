use std::{cmp::Ordering, fmt};

use cohort_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::Oid;

/// The declared type of an attribute. Restricted to what the wire can carry
/// compactly and compare by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Oid,
    List(Box<FieldKind>),
    Set(Box<FieldKind>),
}

impl FieldKind {
    pub fn list_of(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    pub fn set_of(element: FieldKind) -> Self {
        FieldKind::Set(Box::new(element))
    }

    /// The element kind of a collection, `None` for scalars
    pub fn element(&self) -> Option<&FieldKind> {
        match self {
            FieldKind::List(element) | FieldKind::Set(element) => Some(element),
            _ => None,
        }
    }

    /// The value a freshly created object holds for an attribute of this kind
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Byte => Value::Byte(0),
            FieldKind::Short => Value::Short(0),
            FieldKind::Int => Value::Int(0),
            FieldKind::Long => Value::Long(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Double => Value::Double(0.0),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Bytes => Value::Bytes(Vec::new()),
            FieldKind::Oid => Value::Oid(Oid::NONE),
            FieldKind::List(_) => Value::List(Vec::new()),
            FieldKind::Set(_) => Value::Set(Vec::new()),
        }
    }

    fn tag(&self) -> u8 {
        match self {
            FieldKind::Bool => 0,
            FieldKind::Byte => 1,
            FieldKind::Short => 2,
            FieldKind::Int => 3,
            FieldKind::Long => 4,
            FieldKind::Float => 5,
            FieldKind::Double => 6,
            FieldKind::String => 7,
            FieldKind::Bytes => 8,
            FieldKind::Oid => 9,
            FieldKind::List(_) => 10,
            FieldKind::Set(_) => 11,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::List(element) => write!(f, "List<{}>", element),
            FieldKind::Set(element) => write!(f, "Set<{}>", element),
            other => write!(f, "{:?}", other),
        }
    }
}

impl Serde for FieldKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(self.tag());
        if let Some(element) = self.element() {
            element.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = reader.read_byte()?;
        let kind = match tag {
            0 => FieldKind::Bool,
            1 => FieldKind::Byte,
            2 => FieldKind::Short,
            3 => FieldKind::Int,
            4 => FieldKind::Long,
            5 => FieldKind::Float,
            6 => FieldKind::Double,
            7 => FieldKind::String,
            8 => FieldKind::Bytes,
            9 => FieldKind::Oid,
            10 => FieldKind::list_of(reader.nested(FieldKind::de)?),
            11 => FieldKind::set_of(reader.nested(FieldKind::de)?),
            tag => {
                return Err(SerdeErr::UnknownTag {
                    type_name: "FieldKind",
                    tag,
                })
            }
        };
        Ok(kind)
    }
}

/// A single wire-representable value: an attribute value, a collection
/// element, or an invocation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Oid(Oid),
    List(Vec<Value>),
    Set(Vec<Value>),
}

impl Value {
    /// Whether this value may be stored in an attribute of the given kind.
    /// Collections are checked element by element.
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Value::Bool(_), FieldKind::Bool)
            | (Value::Byte(_), FieldKind::Byte)
            | (Value::Short(_), FieldKind::Short)
            | (Value::Int(_), FieldKind::Int)
            | (Value::Long(_), FieldKind::Long)
            | (Value::Float(_), FieldKind::Float)
            | (Value::Double(_), FieldKind::Double)
            | (Value::String(_), FieldKind::String)
            | (Value::Bytes(_), FieldKind::Bytes)
            | (Value::Oid(_), FieldKind::Oid) => true,
            (Value::List(items), FieldKind::List(element)) => {
                items.iter().all(|item| item.conforms_to(element))
            }
            (Value::Set(items), FieldKind::Set(element)) => {
                items.iter().all(|item| item.conforms_to(element))
                    && !has_duplicates(items)
            }
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Byte(_) => "Byte",
            Value::Short(_) => "Short",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Oid(_) => "Oid",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
        }
    }

    pub(crate) fn elements_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Byte(_) => 1,
            Value::Short(_) => 2,
            Value::Int(_) => 3,
            Value::Long(_) => 4,
            Value::Float(_) => 5,
            Value::Double(_) => 6,
            Value::String(_) => 7,
            Value::Bytes(_) => 8,
            Value::Oid(_) => 9,
            Value::List(_) => 10,
            Value::Set(_) => 11,
        }
    }
}

// Sorting first keeps this O(n log n); equal elements end up adjacent
fn has_duplicates(items: &[Value]) -> bool {
    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort_unstable_by(|a, b| total_order(a, b));
    sorted.windows(2).any(|pair| pair[0] == pair[1])
}

/// A total order consistent with `==`: values that compare equal sort as
/// equal. Signed zeros are folded together since `0.0 == -0.0`.
fn total_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
        (Value::Short(a), Value::Short(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Long(a), Value::Long(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
        (Value::Double(a), Value::Double(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Oid(a), Value::Oid(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => a
            .iter()
            .zip(b)
            .map(|(a, b)| total_order(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (a, b) => a.tag().cmp(&b.tag()),
    }
}

impl Serde for Value {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(self.tag());
        match self {
            Value::Bool(value) => value.ser(writer),
            Value::Byte(value) => value.ser(writer),
            Value::Short(value) => value.ser(writer),
            Value::Int(value) => value.ser(writer),
            Value::Long(value) => value.ser(writer),
            Value::Float(value) => value.ser(writer),
            Value::Double(value) => value.ser(writer),
            Value::String(value) => value.ser(writer),
            Value::Bytes(value) => value.ser(writer),
            Value::Oid(value) => value.ser(writer),
            Value::List(items) | Value::Set(items) => items.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = reader.read_byte()?;
        let value = match tag {
            0 => Value::Bool(bool::de(reader)?),
            1 => Value::Byte(i8::de(reader)?),
            2 => Value::Short(i16::de(reader)?),
            3 => Value::Int(i32::de(reader)?),
            4 => Value::Long(i64::de(reader)?),
            5 => Value::Float(f32::de(reader)?),
            6 => Value::Double(f64::de(reader)?),
            7 => Value::String(String::de(reader)?),
            8 => Value::Bytes(Vec::<u8>::de(reader)?),
            9 => Value::Oid(Oid::de(reader)?),
            10 => Value::List(reader.nested(Vec::<Value>::de)?),
            11 => Value::Set(reader.nested(Vec::<Value>::de)?),
            tag => {
                return Err(SerdeErr::UnknownTag {
                    type_name: "Value",
                    tag,
                })
            }
        };
        Ok(value)
    }
}

// Conversions used by generated marshallers to box and unbox typed arguments

/// Extracts a typed value, `None` if the variant does not match
pub trait FromValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_value_conversions {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::$variant(value)
            }
        }

        impl FromValue for $t {
            const TYPE_NAME: &'static str = stringify!($variant);

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    )*};
}

impl_value_conversions!(
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Bytes,
    Oid => Oid,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

macro_rules! impl_list_conversions {
    ($($t:ty),* $(,)?) => {$(
        impl From<Vec<$t>> for Value {
            fn from(items: Vec<$t>) -> Self {
                Value::List(items.into_iter().map(Value::from).collect())
            }
        }

        impl FromValue for Vec<$t> {
            const TYPE_NAME: &'static str = "List";

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::List(items) | Value::Set(items) => {
                        items.into_iter().map(<$t>::from_value).collect()
                    }
                    _ => None,
                }
            }
        }
    )*};
}

impl_list_conversions!(i32, i64, String, Oid);

/// Boxes a typed value for an argument list
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}
