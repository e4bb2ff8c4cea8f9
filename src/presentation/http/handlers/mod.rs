//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod chat_room;
pub mod health;
