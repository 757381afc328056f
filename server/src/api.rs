use std::io;

use scribble_system::{Stroke, UserId};
use tokio::sync::oneshot::Sender;

use crate::users::LoginOutcome;

/// Commands from the HTTP handlers; each carries a oneshot slot for the
/// reply. Mutating commands answer with the post-mutation snapshot where the
/// endpoint contract requires it.
#[derive(Debug)]
pub enum ApiCommand {
    Snapshot {
        tx: Sender<Vec<Stroke>>,
    },
    Draw {
        stroke: Stroke,
        tx: Sender<io::Result<Vec<Stroke>>>,
    },
    Clear {
        user_id: UserId,
        tx: Sender<io::Result<Vec<Stroke>>>,
    },
    Remove {
        stroke: Stroke,
        tx: Sender<io::Result<()>>,
    },
    Login {
        username: String,
        password: String,
        tx: Sender<io::Result<LoginOutcome>>,
    },
}
