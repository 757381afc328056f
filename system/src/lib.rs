pub extern crate euclid;
pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;

mod client;
mod message;
mod traits;
mod types;

pub use client::{CanvasSession, SyncEffect, ToolMode, ERASE_TOLERANCE, REFRESH_DELAY_MS};
pub use message::{SyncMessage, DELETE_SENTINEL};
pub use traits::StrokeScene;
pub use types::{SessionId, Stroke, UserId};
