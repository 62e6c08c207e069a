//! Application shell for the orrery: window lifecycle and the frame loop.

pub mod window;

pub use window::{AppError, run};
