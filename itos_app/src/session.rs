//! User accounts, fabricated client-side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity-verification state gating investment eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

/// A registered platform user. There is no backing account system; accounts
/// are fabricated on login or registration and live for the session only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub document_id: String,
    pub phone: String,
    pub wallet: String,
    pub kyc_status: KycStatus,
    pub registration_date: NaiveDate,
}

/// Fields collected by the registration form. The wallet is optional; a
/// plausible one is fabricated when absent.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub document_id: String,
    pub phone: String,
    pub password: String,
    pub wallet: Option<String>,
}
