//! Zetsu - marketing and download site for a security software suite,
//! with visitor analytics, a streaming AI assistant and a back-office.

pub mod domain;
pub mod application;
pub mod infrastructure;
