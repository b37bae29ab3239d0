//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Repository, visitor tracking, assistant relay, back-office
//! - Shell: Current view, product list and consent prompt
//! - Errors: Domain-specific errors
//! - Messaging: Console input parsing

pub mod errors;
pub mod services;
pub mod messaging;
pub mod shell;
