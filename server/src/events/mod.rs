mod server_events;

pub use server_events::{ErrorEvent, EvictionEvent, ServerEvent, ServerEvents};
