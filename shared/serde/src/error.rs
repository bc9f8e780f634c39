use thiserror::Error;

/// Errors that can occur while reading serialized data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Reader ran past the end of its buffer
    #[error("Unexpected end of buffer after {bits_read} bits")]
    UnexpectedEnd { bits_read: usize },

    /// A variable-length integer did not terminate within 128 bits
    #[error("Variable-length integer exceeds 128 bits")]
    IntegerTooLong,

    /// Decoded integer does not fit in the requested type
    #[error("Integer value {value} is out of range for {target}")]
    IntegerOutOfRange { value: i128, target: &'static str },

    /// Length prefix exceeds MAX_COLLECTION_LENGTH
    #[error("Length prefix {length} exceeds the limit of {limit}")]
    LengthLimitExceeded { length: usize, limit: usize },

    /// Recursive structure nested deeper than MAX_NESTING_DEPTH
    #[error("Nesting exceeds the limit of {limit} levels")]
    NestingLimitExceeded { limit: usize },

    /// String payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// Enum discriminant not recognized
    #[error("Unknown {type_name} tag {tag}")]
    UnknownTag { type_name: &'static str, tag: u8 },
}
