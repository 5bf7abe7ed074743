// ABOUTME: Library crate for QuickCopy exposing the panel model, store, and TUI for testing and reuse

pub mod app;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod models;
pub mod session;
pub mod store;
