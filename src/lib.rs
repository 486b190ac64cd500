//! portrait-to-talking - generate talking-head videos from a portrait image.
//!
//! The [`TalkingVideoClient`] facade drives a [`TalkingVideoProvider`]; the
//! only live backend is [`EchoMimicProvider`], which wraps the EchoMimic
//! audio-to-video HTTP service.

pub mod adapters;
pub mod cassette;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod params;
pub mod ports;

pub use adapters::live::EchoMimicProvider;
pub use client::{generate_talking_video, CompletionCallback, TalkingVideoClient};
pub use config::EchoMimicSettings;
pub use error::GenerationError;
pub use ports::{GenerationConfig, GenerationResult, TalkingVideoProvider};
