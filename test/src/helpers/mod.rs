pub mod test_client;
pub mod test_server;

pub use packet_exchange::{exchange_packets, ExchangeRecord};
pub use test_client::TestClient;
pub use test_server::game_server;
