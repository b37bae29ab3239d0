//! Domain layer - Core business objects and the seams to the outside world
//! 
//! This layer contains:
//! - Entities: Products, visitor logs, chat messages, views, icons
//! - Traits: Abstractions for infrastructure (document store, session
//!   storage, geolocation)

pub mod entities;
pub mod traits;
