//! Shared bootstrap utilities for preview front-ends.
//!
//! Provides configuration loading, content assembly, and runtime setup that
//! can be reused by the CLI or any other host of a playback session.
pub mod builder;
pub mod config;
pub mod source;

pub use builder::{RuntimeBuilder, RuntimeSetup};
pub use config::{ChannelConfig, PreviewConfig};
pub use source::{ContentSource, DirectoryContentSource};
