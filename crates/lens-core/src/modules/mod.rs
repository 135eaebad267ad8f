//! Module payload codecs.
//!
//! Lens routes collects and follows through pluggable module contracts. Each
//! module decodes its own init / validate payload, so the client has to pick
//! the exact ABI layout from the module's address:
//!
//! ```text
//! module address ──► ModuleRegistry ──► ModuleKind ──► ModuleSchema ──► bytes
//!                        │
//!                        └── unknown ──► UnknownModulePolicy
//! ```

pub mod kind;
pub mod params;
pub mod registry;
pub mod schema;

pub use kind::{ModuleCategory, ModuleKind, PayloadKind};
pub use params::{CollectModuleInit, FeeQuote, FeeTerms, FollowModuleInit};
pub use registry::{ModuleRegistry, UnknownModulePolicy};
pub use schema::{AbiType, ModuleSchema};
