#![allow(dead_code)]

pub mod recorder;
pub mod server;
pub mod websocket_client;
