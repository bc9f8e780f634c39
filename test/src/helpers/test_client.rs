use cohort_client::{Client, ClientConfig, ClientEvents};
use cohort_server::{CohortServerError, ConnectionKey, Server};

use crate::{LocalLink, LocalReceiver, LocalSocketPair};

/// A client attached to a server over an in-memory link
pub struct TestClient {
    pub client: Client,
    pub connection: ConnectionKey,
    to_server: LocalReceiver,
    from_server: LocalReceiver,
    link: LocalLink,
}

impl TestClient {
    /// Attaches a new connection and delivers the bootstrap packets, so the
    /// returned client is ready
    pub fn connect(server: &mut Server, config: ClientConfig) -> Result<Self, CohortServerError> {
        let LocalSocketPair {
            server_sender,
            client_sender,
            server_receiver,
            client_receiver,
            link,
        } = LocalSocketPair::new();
        let connection = server.connect(server_sender)?;
        let mut test_client = Self {
            client: Client::new(config, client_sender),
            connection,
            to_server: server_receiver,
            from_server: client_receiver,
            link,
        };
        test_client.receive_all();
        Ok(test_client)
    }

    /// Hands every packet the client sent to the server
    pub fn send_all(&mut self, server: &mut Server) -> usize {
        let mut count = 0;
        while let Some(payload) = self.to_server.receive() {
            server.receive_packet(self.connection, &payload);
            count += 1;
        }
        count
    }

    /// Hands every packet the server sent to the client
    pub fn receive_all(&mut self) -> usize {
        let mut count = 0;
        while let Some(payload) = self.from_server.receive() {
            self.client.receive_packet(&payload);
            count += 1;
        }
        count
    }

    /// Severs the link and reports the loss to both ends
    pub fn drop_link(&mut self, server: &mut Server) {
        self.link.close();
        server.disconnect(self.connection);
        self.client.connection_lost();
    }

    pub fn events(&mut self) -> ClientEvents {
        self.client.process()
    }
}
