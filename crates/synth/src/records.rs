//! Domain records posted to the gateway
//!
//! Field names follow the gateway's JSON schema, including its historical
//! spellings (`spouce_iin`, `gambling_total_payment_amount`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credit application applicant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(rename = "type")]
    pub applicant_type: String,

    pub user_id: String,
    pub iinbin: String,

    pub id_card_number: String,
    pub id_card_issue_date: DateTime<Utc>,
    pub id_card_expiration_date: DateTime<Utc>,

    #[serde(default)]
    pub fullname: String,
    pub firstname: String,
    pub lastname: String,
    pub patronymic: String,

    pub age: u32,
    pub birth_date: String,
    pub nationality: String,
    pub citizenship: String,
    pub gender: String,

    pub phone_number: String,
    pub email: String,

    pub registered_address: String,
    pub residential_address: String,
}

/// Credit application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditApplication {
    #[serde(rename = "application_id")]
    pub id: String,
    #[serde(rename = "application_date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "application_time")]
    pub time: String,
    #[serde(rename = "application_channel")]
    pub channel: String,
    #[serde(rename = "application_duration")]
    pub duration: u32,
    #[serde(rename = "application_region")]
    pub region: String,

    pub applicant: Applicant,

    pub credit_type: String,
    pub credit_amount: String,
    pub credit_currency: String,
    pub credit_term: u32,

    pub income_amount: String,
    pub job_type: String,
    pub job_duration: u32,

    #[serde(default)]
    pub social_status: String,
    pub military_service: String,
    pub drivers_license_category: String,
    pub drivers_license_number: String,

    #[serde(rename = "spouce_iin")]
    pub spouse_iin: String,
    pub marital_status: String,
    pub children: u32,

    pub debt_burden_ratio: f64,
    pub credit_scoring: f64,
    pub active_obligations_count: u32,
    pub overdue_payments_count: u32,
    pub overdue_payments_count_90: u32,
    pub overdue_amount: String,
    pub outstanding_debt: String,
    pub credit_applications_count: u32,

    pub gambling_total_number_of_payments: u32,
    #[serde(rename = "gambling_total_payment_amount")]
    pub gambling_payment_amount: String,

    pub ip_address: String,
    pub longitude: String,
    pub latitude: String,

    #[serde(default)]
    pub device_id: String,
    pub device_model: String,
    pub device_platform: String,
    pub os_id: String,
    pub device_language: String,

    pub bankruptcy_status: bool,
    pub credit_issuance_restriction: bool,
    pub biometrics: bool,
    pub drivers_license: bool,
    pub spouses_consent: bool,
}

/// Card / account transaction
///
/// Optional gateway fields default to empty strings when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    pub source_user_id: String,
    pub source_identifier: String,
    pub source_fullname: String,
    pub source_card_number: String,
    pub source_account: String,

    pub target_user_id: String,
    pub target_identifier: String,
    pub target_fullname: String,
    pub target_card_number: String,
    pub target_account: String,

    pub merchant_id: String,
    pub merchant_terminal_id: String,
    pub merchant_mcc_code: String,

    pub date: String,
    pub time: String,
    pub amount: String,
    pub currency: String,
    pub payment_mode: String,
    pub transaction_type: String,
    pub transaction_country: String,
    pub transaction_city: String,
    pub transaction_channel: String,
    pub transaction_rrn: String,
    #[serde(default)]
    pub transaction_status: String,

    #[serde(default)]
    pub registration_date: String,
    pub card_type: String,

    #[serde(default)]
    pub new_recipient: String,
    #[serde(default)]
    pub new_terminal: String,

    pub device_id: String,
    #[serde(default)]
    pub last_device_update_date: String,
    #[serde(default)]
    pub ip_connection_type: String,
    #[serde(default)]
    pub remote_access: String,
    #[serde(default)]
    pub screen_sharing: String,
    #[serde(default)]
    pub hardware_id: String,
    #[serde(default)]
    pub os_id: String,
    #[serde(default)]
    pub is_tokenized: String,
    #[serde(default)]
    pub web_locale: String,
    #[serde(default)]
    pub cookie_enabled: String,

    #[serde(default)]
    pub last_login_date: String,
    #[serde(default)]
    pub last_registration_date: String,

    #[serde(default, rename = "last_deny_event_date")]
    pub last_deny_event: String,
    #[serde(default, rename = "last_review_event_date")]
    pub last_review_event: String,

    #[serde(default, rename = "last_limit_update_date")]
    pub last_limits_update_date: String,
    #[serde(default)]
    pub last_loan_application_date: String,
    #[serde(default)]
    pub last_loan_approval_date: String,
    #[serde(default)]
    pub pin_update_date: String,
}
