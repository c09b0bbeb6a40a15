//! Chat domain: message log, realtime delivery, typing presence,
//! unread tracking, conversation aggregation, and reply suggestions.

pub mod actions;
pub mod data;
pub mod models;
pub mod suggestion;
pub mod timeline;
pub mod typing;
pub mod unread;
