// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod export;
pub mod registry;
pub mod runtime;
pub mod scoring;
pub mod sequencer;
pub mod session;
pub mod summary;
pub mod ui;
pub mod util;

pub use error::{Error, Result};

pub const TICK_RATE_MS: u64 = 50;
