//! Data models representing database entities and API payloads.

/// Account entity and `/account` payloads
pub mod account;
/// Fixed-point money
pub mod money;
/// `/transfer` payloads
pub mod transfer;
