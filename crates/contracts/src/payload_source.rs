//! PayloadSource trait - record synthesis abstraction

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DispatchItem, GenerationError};

/// Kind of domain record being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    CreditApplication,
    Transaction,
}

impl RecordKind {
    /// JSON field holding the record identifier
    pub fn id_field(self) -> &'static str {
        match self {
            Self::CreditApplication => "application_id",
            Self::Transaction => "id",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreditApplication => "credit_application",
            Self::Transaction => "transaction",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "credit_application" | "ca" => Ok(Self::CreditApplication),
            "transaction" | "txn" => Ok(Self::Transaction),
            other => Err(format!("unsupported record kind '{other}'")),
        }
    }
}

/// Payload source trait
///
/// Produces serialized payloads with their identifiers. Called before any
/// worker starts; generation is never interleaved with a single call.
pub trait PayloadSource: Send {
    /// Record kind produced by this source
    fn kind(&self) -> RecordKind;

    /// Generate `count` items
    ///
    /// # Errors
    /// Returns a generation error; the run aborts before dispatch
    fn generate(&mut self, count: usize) -> Result<Vec<DispatchItem>, GenerationError>;
}
