//! Typed ID definitions for the domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for employment contracts. A contract is also the
/// conversation key: one conversation per employee.
pub struct EmploymentContract;

/// Marker type for chat messages.
pub struct ChatMessageEntity;

/// Marker type for employee directory records.
pub struct EmployeeEntity;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for employment contracts / conversations.
pub type ContractId = Id<EmploymentContract>;

/// Typed ID for chat messages.
pub type MessageId = Id<ChatMessageEntity>;

/// Typed ID for employee records.
pub type EmployeeId = Id<EmployeeEntity>;
