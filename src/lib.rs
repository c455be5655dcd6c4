//! Dream interpretation: scores dream texts on an upper/downer and a
//! static/dynamic axis and renders a symbol that evolves with a user's
//! dream history.

pub mod cli;
pub mod config;
pub mod core;
pub mod server;
pub mod service;
pub mod symbol;

pub use crate::core::{DreamAnalysis, DreamRecord, DreamScorer, DreamStore};
pub use crate::service::DreamService;
pub use crate::symbol::SymbolRenderer;
