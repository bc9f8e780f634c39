mod object_directory;
mod oid_allocator;

pub use object_directory::ObjectDirectory;
pub(crate) use oid_allocator::OidAllocator;
