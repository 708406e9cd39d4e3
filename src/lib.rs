pub mod asr;
pub mod codegen;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod language;
pub mod routes;
pub mod state;
pub mod translate;
pub mod websocket;
