pub mod core;

// Re-export key components
pub use core::SignalEngine;
