// ABOUTME: Core data models for QuickCopy clipboard panels

pub mod session;

pub use session::{derive_lines, Session, SessionStatus};
