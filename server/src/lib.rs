pub extern crate actix_web;

pub mod api;
pub mod connection;
mod connection_tx_storage;
pub mod handlers;
pub mod server;
pub mod store;
pub mod users;
