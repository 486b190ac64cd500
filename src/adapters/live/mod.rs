//! Live adapters that talk to real backends.

pub mod echomimic;

pub use echomimic::EchoMimicProvider;
