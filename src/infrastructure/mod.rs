//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: In-memory document and session stores
//! - Database: Firebase Realtime Database client
//! - Geo: IP geolocation lookup
//! - LLM: Gemini streaming chat
//! - Adapters: Console front-end

pub mod config;
pub mod storage;
pub mod database;
pub mod geo;
pub mod llm;
pub mod adapters;
