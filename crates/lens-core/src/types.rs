//! Request and receipt types shared by the signing and client layers.

pub mod receipt;
pub mod requests;

pub use receipt::*;
pub use requests::*;
