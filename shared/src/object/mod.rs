pub mod error;
pub mod schema;
pub mod shared_object;
pub mod snapshot;
