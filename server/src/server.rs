use tokio::sync::mpsc::{channel, Sender};

use scribble_system::uuid::Uuid;
use scribble_system::SyncMessage;

use crate::api::ApiCommand;
use crate::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::store::{PathStore, StrokeFilter};
use crate::users::UserStore;

pub type ServerTx = Sender<ServerCommand>;

#[derive(Debug)]
pub enum ServerCommand {
    Connection(ConnectionCommand),
    Api(ApiCommand),
}

/// Single owner of all shared server state: the hub's subscriber map and
/// both durable stores. Commands are drained in arrival order by one task,
/// so no handler ever observes a half-applied mutation.
struct Server {
    connections: ConnectionTxStorage,
    paths: PathStore,
    users: UserStore,
}

impl Server {
    fn new(paths: PathStore, users: UserStore) -> Self {
        Self {
            connections: ConnectionTxStorage::new(),
            paths,
            users,
        }
    }

    async fn handle_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::Connection(command) => self.handle_connection_command(command),
            ServerCommand::Api(command) => self.handle_api_command(command).await,
        }
    }

    fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let session_id = Uuid::new_v4();
                self.connections.insert(session_id, tx);
                self.connections
                    .send(&session_id, ConnectionEvent::Connected { session_id });
                log::info!("client {} connected", session_id);
            }
            ConnectionCommand::Disconnect { from } => {
                if self.connections.remove(&from).is_some() {
                    log::info!("client {} disconnected", from);
                }
            }
            ConnectionCommand::Message { from, message } => match message {
                // The socket is a live channel only: strokes are persisted
                // through the draw endpoint, deletes through the delete
                // endpoints.
                SyncMessage::NewStroke(stroke) => {
                    self.connections
                        .broadcast(&SyncMessage::NewStroke(stroke), Some(&from));
                }
                SyncMessage::Delete => {
                    log::debug!("delete signal from {}", from);
                    self.connections.broadcast(&SyncMessage::Delete, Some(&from));
                }
            },
        }
    }

    async fn handle_api_command(&mut self, command: ApiCommand) {
        match command {
            ApiCommand::Snapshot { tx } => {
                let _ = tx.send(self.paths.find_all());
            }
            ApiCommand::Draw { stroke, tx } => {
                let result = self
                    .paths
                    .insert(stroke)
                    .await
                    .map(|_| self.paths.find_all());
                let _ = tx.send(result);
            }
            ApiCommand::Clear { user_id, tx } => {
                let result = self
                    .paths
                    .delete_where(&StrokeFilter::Owner(user_id))
                    .await
                    .map(|_| self.paths.find_all());
                if result.is_ok() {
                    self.connections.broadcast(&SyncMessage::Delete, None);
                }
                let _ = tx.send(result);
            }
            ApiCommand::Remove { stroke, tx } => {
                let result = self.paths.delete_where(&StrokeFilter::Exact(stroke)).await;
                if result.is_ok() {
                    self.connections.broadcast(&SyncMessage::Delete, None);
                }
                let _ = tx.send(result);
            }
            ApiCommand::Login {
                username,
                password,
                tx,
            } => {
                let _ = tx.send(self.users.login(&username, &password).await);
            }
        }
    }
}

pub fn spawn_server(paths: PathStore, users: UserStore) -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ServerCommand>(16);

    tokio::spawn(async move {
        let mut server = Box::new(Server::new(paths, users));

        while let Some(command) = srv_rx.recv().await {
            server.handle_command(command).await;
        }
    });

    srv_tx
}
