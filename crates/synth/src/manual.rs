//! ManualBatch - caller-supplied records adapted into dispatch items

use contracts::{DispatchItem, GenerationError, RecordKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::generator::encode;
use crate::records::{CreditApplication, Transaction};

/// Adapter turning a JSON array of typed records into dispatch items
///
/// Each record is decoded into its typed form first, so malformed batches are
/// rejected before any dispatch happens.
pub struct ManualBatch;

impl ManualBatch {
    /// Parse a JSON array of `kind` records
    ///
    /// # Errors
    /// - Body is not a JSON array of `kind` records
    /// - A record has an empty identifier
    pub fn from_json(kind: RecordKind, body: &[u8]) -> Result<Vec<DispatchItem>, GenerationError> {
        let items = match kind {
            RecordKind::CreditApplication => {
                Self::decode::<CreditApplication>(kind, body, |r| r.id.clone())?
            }
            RecordKind::Transaction => Self::decode::<Transaction>(kind, body, |r| r.id.clone())?,
        };

        debug!(kind = %kind, count = items.len(), "manual batch decoded");
        Ok(items)
    }

    fn decode<T>(
        kind: RecordKind,
        body: &[u8],
        id_of: impl Fn(&T) -> String,
    ) -> Result<Vec<DispatchItem>, GenerationError>
    where
        T: DeserializeOwned + Serialize,
    {
        let records: Vec<T> =
            serde_json::from_slice(body).map_err(|e| GenerationError::InvalidBatch {
                kind: kind.to_string(),
                message: e.to_string(),
            })?;
        Self::encode_all(kind, &records, id_of)
    }

    fn encode_all<T: Serialize>(
        kind: RecordKind,
        records: &[T],
        id_of: impl Fn(&T) -> String,
    ) -> Result<Vec<DispatchItem>, GenerationError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = id_of(record);
                if id.trim().is_empty() {
                    return Err(GenerationError::MissingId {
                        kind: kind.to_string(),
                        index,
                        field: kind.id_field().to_string(),
                    });
                }
                encode(kind, id, record)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordGenerator;

    #[test]
    fn test_from_json_round_trips_generated_records() {
        let mut generator = RecordGenerator::with_seed(RecordKind::CreditApplication, 11);
        let records = vec![generator.credit_application(), generator.credit_application()];
        let body = serde_json::to_vec(&records).unwrap();

        let items = ManualBatch::from_json(RecordKind::CreditApplication, &body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, records[0].id);
        assert_eq!(items[1].id, records[1].id);
    }

    #[test]
    fn test_from_json_empty_array() {
        let items = ManualBatch::from_json(RecordKind::Transaction, b"[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = ManualBatch::from_json(RecordKind::Transaction, br#"{"id": "x"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidBatch { .. }));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut generator = RecordGenerator::with_seed(RecordKind::Transaction, 3);
        let mut txn = generator.transaction();
        txn.id = String::new();

        let body = serde_json::to_vec(&[txn]).unwrap();

        let err = ManualBatch::from_json(RecordKind::Transaction, &body).unwrap_err();
        assert!(err.to_string().contains("'id'"), "got: {err}");
    }

    #[test]
    fn test_credit_application_payload_is_json() {
        let mut generator = RecordGenerator::with_seed(RecordKind::CreditApplication, 5);
        let record = generator.credit_application();
        let body = serde_json::to_vec(std::slice::from_ref(&record)).unwrap();
        let items = ManualBatch::from_json(RecordKind::CreditApplication, &body).unwrap();

        let decoded: CreditApplication = serde_json::from_slice(&items[0].payload).unwrap();
        assert_eq!(decoded.id, record.id);
    }
}
