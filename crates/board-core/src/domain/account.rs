use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sanitize::{is_valid_email, is_valid_phone, sanitize_text};
use crate::error::DomainError;

/// The three kinds of registered accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Company,
    Driver,
    Admin,
}

/// User account - registration is optional; registered users gain a
/// "verified" badge on their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub account_type: AccountType,
    pub nickname: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub verified: bool,
    // Company-specific fields.
    pub company_name: Option<String>,
    pub representative_name: Option<String>,
    pub driver_count: Option<String>,
    // Driver-specific fields.
    pub name: Option<String>,
    pub age: Option<String>,
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }

    /// Sanitize every user-controlled text field. Fixed field list,
    /// same contract as [`super::MessageDraft::sanitized`].
    pub fn sanitized(self) -> Self {
        Self {
            account_type: self.account_type,
            nickname: sanitize_text(&self.nickname),
            phone_number: sanitize_text(&self.phone_number),
            email: self.email.map(|email| sanitize_text(&email)),
            verified: self.verified,
            company_name: self.company_name.map(|name| sanitize_text(&name)),
            representative_name: self.representative_name.map(|name| sanitize_text(&name)),
            driver_count: self.driver_count.map(|count| sanitize_text(&count)),
            name: self.name.map(|name| sanitize_text(&name)),
            age: self.age.map(|age| sanitize_text(&age)),
        }
    }

    /// Check registration fields. A nickname is required; email and
    /// phone are optional but must be well-formed when present.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nickname.is_empty() {
            return Err(DomainError::Validation("nickname is required".to_string()));
        }
        if let Some(email) = self.email.as_deref() {
            if !email.is_empty() && !is_valid_email(email) {
                return Err(DomainError::Validation(format!(
                    "invalid email format: {email}"
                )));
            }
        }
        if !self.phone_number.is_empty() && !is_valid_phone(&self.phone_number) {
            return Err(DomainError::Validation(format!(
                "invalid phone number format: {}",
                self.phone_number
            )));
        }
        Ok(())
    }

    /// The administrator identity. There is exactly one, and it is not
    /// created through registration.
    pub fn administrator(nickname: impl Into<String>) -> Self {
        Self {
            account_type: AccountType::Admin,
            nickname: nickname.into(),
            phone_number: String::new(),
            email: None,
            verified: true,
            company_name: None,
            representative_name: None,
            driver_count: None,
            name: None,
            age: None,
        }
    }

    pub fn driver(nickname: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            account_type: AccountType::Driver,
            nickname: nickname.into(),
            phone_number: phone_number.into(),
            email: None,
            verified: true,
            company_name: None,
            representative_name: None,
            driver_count: None,
            name: None,
            age: None,
        }
    }
}

/// A moderation request to ban a user by nickname.
#[derive(Debug, Clone)]
pub struct BanRequest {
    pub nickname: String,
    pub banned_by: String,
    pub reason: Option<String>,
}

/// A banned user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedUser {
    pub nickname: String,
    pub reason: Option<String>,
    pub banned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_accounts() {
        let mut account = UserAccount::driver("kenji", "090-1111-2222");
        account.email = Some("kenji@example.com".to_string());
        assert!(account.validate().is_ok());
        // Empty optional contact fields are fine.
        assert!(UserAccount::administrator("admin").validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_contact_fields() {
        let mut account = UserAccount::driver("kenji", "090-1111-2222");
        account.email = Some("not-an-email".to_string());
        assert!(matches!(
            account.validate(),
            Err(DomainError::Validation(_))
        ));

        let account = UserAccount::driver("kenji", "call me maybe");
        assert!(matches!(
            account.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn sanitized_covers_every_text_field() {
        let mut account = UserAccount::driver("<script>alert(1)</script>kenji", "090-1111-2222");
        account.name = Some("  Kenji Sato  ".to_string());
        let clean = account.sanitized();
        assert_eq!(clean.nickname, "kenji");
        assert_eq!(clean.name.as_deref(), Some("Kenji Sato"));
    }
}
