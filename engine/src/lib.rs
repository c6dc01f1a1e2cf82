// Engine library root
// This file declares the modules for the engine crate.

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod movers;
pub mod scoring;
pub mod services;
pub mod workflow;

pub use error::{EngineError, Result};
