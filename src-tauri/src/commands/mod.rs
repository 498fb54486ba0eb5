//! Tauri command handlers

pub mod workflow;

pub use workflow::*;
