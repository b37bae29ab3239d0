//! Domain entities - Core business objects with no external dependencies

pub mod icon;
pub mod software;
pub mod visitor;
pub mod chat;
pub mod view;

pub use icon::{Icon, UnknownIcon};
pub use software::{Requirements, Software, SoftwarePatch};
pub use visitor::{LocationMethod, NewVisitor, VisitorLog, VisitorPatch};
pub use chat::{ChatMessage, ChatRole};
pub use view::{NavTab, Platform, UnknownView, View};
