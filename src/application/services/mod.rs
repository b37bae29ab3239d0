//! Application services - Business logic orchestration

pub mod seed;
pub mod repository;
pub mod visitor_service;
pub mod assistant_service;
pub mod admin_service;

pub use repository::SiteRepository;
pub use visitor_service::{ConsentOutcome, TrackOutcome, TrackingState, VisitorTracker};
pub use assistant_service::{ChatRelay, Conversation};
pub use admin_service::{AdminDashboard, AdminTab, DashboardStats};
