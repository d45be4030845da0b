//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate input and drive the repository.

pub mod account_service;
pub mod number_generator;

pub use account_service::AccountService;
