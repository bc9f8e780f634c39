pub mod args;
pub mod codes;
pub mod envelope;
pub mod error;
pub mod id_generator;
pub mod marshaller;
