//! RecordGenerator - seeded synthetic payload source

use chrono::{SecondsFormat, Utc};
use contracts::{DispatchItem, GenerationError, PayloadSource, RecordKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::faker;
use crate::records::{Applicant, CreditApplication, Transaction};

const CHANNELS: &[&str] = &["mobile", "office", "web"];

const CREDIT_TYPES: &[&str] = &["Автомобильный", "Потребительский", "Ипотечный"];

const TRANSACTION_TYPES: &[&str] = &[
    "C2C", "C2A", "P2P", "A2C", "A2A", "CORPC2A", "CORPC2C", "CORPA2A", "CORPA2C",
];

/// Synthetic record generator
///
/// Owns its RNG, so two generators built with the same seed produce the same
/// identifiers and field choices. Timestamps are still taken from the wall clock.
pub struct RecordGenerator {
    kind: RecordKind,
    rng: StdRng,
}

impl RecordGenerator {
    /// Generator seeded from the OS
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generator with a fixed seed
    pub fn with_seed(kind: RecordKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fixed seed when given, OS seed otherwise
    pub fn from_seed(kind: RecordKind, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(kind, seed),
            None => Self::new(kind),
        }
    }

    /// Build one credit application
    pub fn credit_application(&mut self) -> CreditApplication {
        let rng = &mut self.rng;
        let now = Utc::now();

        let firstname = faker::first_name(rng);
        let lastname = faker::last_name(rng);
        let patronymic = faker::middle_name(rng);

        let applicant = Applicant {
            applicant_type: "person".to_string(),
            user_id: faker::uuid(rng).to_string(),
            iinbin: "001000001000".to_string(),
            id_card_number: faker::ssn(rng),
            id_card_issue_date: faker::past_date(rng, now),
            id_card_expiration_date: faker::future_date(rng, now),
            fullname: String::new(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            patronymic: patronymic.to_string(),
            age: rng.random_range(18..=90),
            birth_date: faker::past_date(rng, now).to_rfc3339(),
            nationality: "казах".to_string(),
            citizenship: "Казахстан".to_string(),
            gender: faker::gender(rng).to_string(),
            phone_number: faker::phone(rng),
            email: faker::email(rng, firstname, lastname),
            registered_address: faker::address(rng),
            residential_address: faker::address(rng),
        };

        CreditApplication {
            id: faker::uuid(rng).to_string(),
            date: now,
            time: now.format("%H:%M:%S").to_string(),
            channel: faker::pick(rng, CHANNELS).to_string(),
            duration: rng.random_range(60..=120),
            region: "Алматы".to_string(),
            applicant,
            credit_type: faker::pick(rng, CREDIT_TYPES).to_string(),
            credit_amount: format!("{:.6}", rng.random_range(1_000_000.0..10_000_000.0)),
            credit_currency: "KZT".to_string(),
            credit_term: rng.random_range(12..=72),
            income_amount: format!("{:.6}", rng.random_range(100_000.0..900_000.0)),
            job_type: faker::job_title(rng).to_string(),
            job_duration: rng.random_range(1..=5),
            social_status: String::new(),
            military_service: "Военнобязанный".to_string(),
            drivers_license_category: String::new(),
            drivers_license_number: String::new(),
            spouse_iin: String::new(),
            marital_status: String::new(),
            children: 0,
            debt_burden_ratio: rng.random(),
            credit_scoring: rng.random(),
            active_obligations_count: rng.random_range(0..=10),
            overdue_payments_count: rng.random_range(0..=5),
            overdue_payments_count_90: rng.random_range(0..=3),
            overdue_amount: String::new(),
            outstanding_debt: String::new(),
            credit_applications_count: rng.random_range(0..=5),
            gambling_total_number_of_payments: 0,
            gambling_payment_amount: String::new(),
            ip_address: faker::ipv4(rng),
            longitude: String::new(),
            latitude: String::new(),
            device_id: faker::uuid(rng).to_string(),
            device_model: "IPhone 15".to_string(),
            device_platform: "IOS".to_string(),
            os_id: String::new(),
            device_language: "ru".to_string(),
            bankruptcy_status: rng.random_bool(0.5),
            credit_issuance_restriction: rng.random_bool(0.5),
            biometrics: true,
            drivers_license: rng.random_bool(0.5),
            spouses_consent: true,
        }
    }

    /// Build one transaction
    pub fn transaction(&mut self) -> Transaction {
        let rng = &mut self.rng;
        let now = Utc::now();
        let rfc3339 = |date: chrono::DateTime<Utc>| date.to_rfc3339_opts(SecondsFormat::Secs, true);

        Transaction {
            id: faker::uuid(rng).to_string(),
            source_user_id: faker::uuid(rng).to_string(),
            source_identifier: rng.random_range(100_000_000_000u64..=900_000_000_000).to_string(),
            source_fullname: faker::full_name(rng),
            source_card_number: faker::card_number(rng),
            source_account: format!("KZ{}{}", faker::ssn(rng), faker::ssn(rng)),
            target_user_id: faker::uuid(rng).to_string(),
            target_identifier: rng.random_range(100_000_000_000u64..=900_000_000_000).to_string(),
            target_fullname: faker::full_name(rng),
            target_card_number: faker::card_number(rng),
            target_account: format!("KZ{}{}", faker::ssn(rng), faker::ssn(rng)),
            merchant_id: faker::uuid(rng).to_string(),
            merchant_terminal_id: faker::uuid(rng).to_string(),
            merchant_mcc_code: faker::three_digits(rng),
            date: rfc3339(now),
            time: now.format("%H:%M:%S").to_string(),
            amount: rng.random_range(100_000..=10_000_000).to_string(),
            currency: "KZT".to_string(),
            payment_mode: faker::three_digits(rng),
            transaction_type: faker::pick(rng, TRANSACTION_TYPES).to_string(),
            transaction_country: "Казахстан".to_string(),
            transaction_city: "Алматы".to_string(),
            transaction_channel: "Y".to_string(),
            transaction_rrn: faker::uuid(rng).to_string(),
            transaction_status: "Non-3DS".to_string(),
            registration_date: rfc3339(faker::any_date(rng, now)),
            card_type: "debit".to_string(),
            new_recipient: "yes".to_string(),
            new_terminal: "false".to_string(),
            device_id: faker::uuid(rng).to_string(),
            last_device_update_date: rfc3339(faker::any_date(rng, now)),
            ip_connection_type: String::new(),
            remote_access: "false".to_string(),
            screen_sharing: "false".to_string(),
            hardware_id: faker::uuid(rng).to_string(),
            os_id: faker::uuid(rng).to_string(),
            is_tokenized: "false".to_string(),
            web_locale: String::new(),
            cookie_enabled: "false".to_string(),
            last_login_date: faker::any_date(rng, now).to_rfc3339_opts(SecondsFormat::Nanos, true),
            last_registration_date: rfc3339(faker::any_date(rng, now)),
            last_deny_event: faker::any_date(rng, now).to_rfc3339_opts(SecondsFormat::Nanos, true),
            last_review_event: rfc3339(faker::any_date(rng, now)),
            last_limits_update_date: rfc3339(faker::any_date(rng, now)),
            last_loan_application_date: String::new(),
            last_loan_approval_date: String::new(),
            pin_update_date: rfc3339(faker::any_date(rng, now)),
        }
    }

    fn next_item(&mut self) -> Result<DispatchItem, GenerationError> {
        match self.kind {
            RecordKind::CreditApplication => {
                let record = self.credit_application();
                encode(self.kind, record.id.clone(), &record)
            }
            RecordKind::Transaction => {
                let record = self.transaction();
                encode(self.kind, record.id.clone(), &record)
            }
        }
    }
}

/// Serialize a record into a dispatch item keyed by `id`
pub(crate) fn encode<T: Serialize>(
    kind: RecordKind,
    id: String,
    record: &T,
) -> Result<DispatchItem, GenerationError> {
    let payload = serde_json::to_vec(record).map_err(|e| GenerationError::Serialize {
        kind: kind.to_string(),
        message: e.to_string(),
    })?;
    Ok(DispatchItem::new(id, payload))
}

impl PayloadSource for RecordGenerator {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    #[instrument(name = "record_generator_generate", skip(self), fields(kind = %self.kind))]
    fn generate(&mut self, count: usize) -> Result<Vec<DispatchItem>, GenerationError> {
        let items = (0..count)
            .map(|_| self.next_item())
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = items.len(), "generated records");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_count_and_unique_ids() {
        let mut generator = RecordGenerator::with_seed(RecordKind::CreditApplication, 1);
        let items = generator.generate(50).unwrap();
        assert_eq!(items.len(), 50);

        let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_generate_zero() {
        let mut generator = RecordGenerator::new(RecordKind::Transaction);
        assert!(generator.generate(0).unwrap().is_empty());
    }

    #[test]
    fn test_same_seed_same_ids() {
        let mut a = RecordGenerator::with_seed(RecordKind::Transaction, 42);
        let mut b = RecordGenerator::with_seed(RecordKind::Transaction, 42);

        let ids_a: Vec<_> = a.generate(5).unwrap().into_iter().map(|i| i.id).collect();
        let ids_b: Vec<_> = b.generate(5).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_different_seed_different_ids() {
        let mut a = RecordGenerator::with_seed(RecordKind::Transaction, 1);
        let mut b = RecordGenerator::with_seed(RecordKind::Transaction, 2);
        assert_ne!(a.generate(1).unwrap()[0].id, b.generate(1).unwrap()[0].id);
    }

    #[test]
    fn test_credit_application_payload_shape() {
        let mut generator = RecordGenerator::with_seed(RecordKind::CreditApplication, 7);
        let item = generator.generate(1).unwrap().remove(0);
        let json: serde_json::Value = serde_json::from_slice(&item.payload).unwrap();

        assert_eq!(json["application_id"], item.id.as_str());
        assert_eq!(json["credit_currency"], "KZT");
        assert!(json["spouce_iin"].is_string());
        assert_eq!(json["applicant"]["type"], "person");

        let age = json["applicant"]["age"].as_u64().unwrap();
        assert!((18..=90).contains(&age));
        let amount: f64 = json["credit_amount"].as_str().unwrap().parse().unwrap();
        assert!((1_000_000.0..10_000_000.0).contains(&amount));
        assert!(CHANNELS.contains(&json["application_channel"].as_str().unwrap()));
    }

    #[test]
    fn test_transaction_payload_shape() {
        let mut generator = RecordGenerator::with_seed(RecordKind::Transaction, 7);
        let item = generator.generate(1).unwrap().remove(0);
        let txn: Transaction = serde_json::from_slice(&item.payload).unwrap();

        assert_eq!(txn.id, item.id);
        assert!(TRANSACTION_TYPES.contains(&txn.transaction_type.as_str()));
        assert!(txn.source_account.starts_with("KZ"));
        assert_eq!(txn.source_identifier.len(), 12);
        let amount: u64 = txn.amount.parse().unwrap();
        assert!((100_000..=10_000_000).contains(&amount));
        assert!(chrono::DateTime::parse_from_rfc3339(&txn.date).is_ok());
    }

    #[test]
    fn test_kind() {
        let generator = RecordGenerator::new(RecordKind::Transaction);
        assert_eq!(generator.kind(), RecordKind::Transaction);
    }
}
