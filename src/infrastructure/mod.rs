//! Infrastructure layer - Adapters for persistence, transport and configuration

pub mod chat_commands;
pub mod config;
pub mod event_bus;
pub mod http;
pub mod persistence;
pub mod state;
pub mod websocket;
