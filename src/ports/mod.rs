//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the client facade and an
//! external video-generation backend. Implementations live in `src/adapters/`.

pub mod talking_video;

pub use talking_video::{
    GenerateFuture, GenerationConfig, GenerationResult, TalkingVideoProvider,
};
