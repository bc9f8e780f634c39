use cohort_server::{CohortServerError, Server, ServerConfig};

use crate::{game_marshaller, GameDispatcher, ScriptedGame};

/// A server with the `Game` module answered by `game`
pub fn game_server(config: ServerConfig, game: ScriptedGame) -> Result<Server, CohortServerError> {
    let mut server = Server::new(config)?;
    server.register_dispatcher(game_marshaller()?, GameDispatcher::new(game))?;
    Ok(server)
}
