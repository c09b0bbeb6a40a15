// Kernel: infrastructure shared across domains

pub mod chat_hub;
pub mod notifier;

pub use chat_hub::{chat_topic, typing_topic, ChatHub};
pub use notifier::StaffNotifier;
