//! Lens Core Library
//!
//! Typed-data signing, module payload codecs and receipt decoding for the
//! Lens Hub publication contract.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod modules;
pub mod nonce;
pub mod signing;
pub mod types;

pub use error::{Error, FlowStep, Result};
