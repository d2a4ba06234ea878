//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Dispatch model
//! - A run consumes a queue of [`DispatchItem`]s, each sent through a [`Transport`]
//! - Payloads are opaque bytes; the item id is used only for failure reporting
//! - A completed run is summarised by an immutable [`RunResult`]

mod config;
mod error;
mod item;
mod payload_source;
mod transport;

pub use config::*;
pub use error::*;
pub use item::*;
pub use payload_source::*;
pub use transport::*;
