// Employment Chat - API Core
//
// Backend for the recruiting platform's chat between the staffing
// office and employees. One conversation per employment contract,
// fanned out live over SSE, with unread tracking and AI-drafted
// reply suggestions for the admin console.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
