use crate::{invocation::error::InvocationError, FromValue, Value};

/// Decodes a positional argument list into typed values, one at a time.
///
/// ```
/// use cohort_shared::{ArgReader, Oid, Value};
///
/// let mut reader = ArgReader::new(vec![Value::Oid(Oid::from_u32(3)), Value::Int(10)]);
/// let place: Oid = reader.read().unwrap();
/// let x: i32 = reader.read().unwrap();
/// reader.finish().unwrap();
/// # assert_eq!((place.to_u32(), x), (3, 10));
/// ```
pub struct ArgReader {
    args: std::vec::IntoIter<Value>,
    index: usize,
}

impl ArgReader {
    pub fn new(args: Vec<Value>) -> Self {
        Self {
            args: args.into_iter(),
            index: 0,
        }
    }

    pub fn read<T: FromValue>(&mut self) -> Result<T, InvocationError> {
        let index = self.index;
        self.index += 1;
        let Some(value) = self.args.next() else {
            return Err(InvocationError::Decode(format!(
                "argument {} is missing, expected {}",
                index,
                T::TYPE_NAME
            )));
        };
        let found = value.type_name();
        T::from_value(value).ok_or_else(|| {
            InvocationError::Decode(format!(
                "argument {} should be {} but is {}",
                index,
                T::TYPE_NAME,
                found
            ))
        })
    }

    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    /// Fails if arguments are left over
    pub fn finish(self) -> Result<(), InvocationError> {
        match self.args.len() {
            0 => Ok(()),
            extra => Err(InvocationError::Decode(format!(
                "{} unexpected trailing argument(s) after argument {}",
                extra,
                self.index.saturating_sub(1)
            ))),
        }
    }
}
