//! Core types for errlens.

pub mod context;
pub mod kind;
pub mod payload;
pub mod raw;
pub mod record;

pub use context::*;
pub use kind::*;
pub use payload::*;
pub use raw::*;
pub use record::*;
