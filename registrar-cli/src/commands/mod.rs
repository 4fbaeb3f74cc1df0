//! Command implementations for the registrar CLI

pub mod serve;

pub use serve::run_serve;
