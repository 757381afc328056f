use std::collections::HashMap;

use scribble_system::{SessionId, SyncMessage};

use crate::connection::ConnectionEvent;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

/// The hub's subscriber set: one sender per live session, inserted on
/// connect and removed on disconnect by the owning session only.
pub struct ConnectionTxStorage {
    connection_txs: HashMap<SessionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, session_id: SessionId, tx: ConnectionTx) {
        self.connection_txs.insert(session_id, tx);
    }

    pub fn send(&mut self, to: &SessionId, event: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(to) {
            if let Err(err) = tx.try_send(event) {
                log::warn!("dropping event for session {}: {}", to, err);
            }
        }
    }

    /// Fans one frame out to every connected session except `origin`; no
    /// origin means an unconditional broadcast. Sends are fire-and-forget: a
    /// slow or dead subscriber is logged and skipped, never retried.
    pub fn broadcast(&mut self, message: &SyncMessage, origin: Option<&SessionId>) {
        for (session_id, tx) in self.connection_txs.iter_mut() {
            if origin.map_or(false, |id| id == session_id) {
                continue;
            }
            if let Err(err) = tx.try_send(ConnectionEvent::Push(message.clone())) {
                log::warn!("dropping push for session {}: {}", session_id, err);
            }
        }
    }

    pub fn remove(&mut self, session_id: &SessionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(session_id)
    }
}
