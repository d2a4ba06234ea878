//! # Synth
//!
//! Payload source for the dispatcher.
//!
//! Responsibilities:
//! - Synthesize credit applications and transactions from a seeded RNG
//! - Adapt caller-supplied record batches into `DispatchItem`s
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{PayloadSource, RecordKind};
//! use synth::RecordGenerator;
//!
//! let mut generator = RecordGenerator::with_seed(RecordKind::Transaction, 42);
//! let items = generator.generate(1000)?;
//! ```

mod faker;
mod generator;
mod manual;
mod records;

pub use contracts::{DispatchItem, GenerationError, PayloadSource, RecordKind};
pub use generator::RecordGenerator;
pub use manual::ManualBatch;
pub use records::{Applicant, CreditApplication, Transaction};
