pub mod employee;
pub mod message;

pub use employee::Employee;
pub use message::{ChatMessage, MessageMetadata, SenderRole};
