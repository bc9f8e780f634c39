mod client_events;

pub use client_events::{
    ClientEvent, ClientEvents, ConnectEvent, DisconnectEvent, ErrorEvent, ObjectEvent,
    PostFailEvent, SubscribeEvent, SubscribeFailEvent,
};
