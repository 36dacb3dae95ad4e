//! Borrower model and related types

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Letters, spaces, hyphens and apostrophes, starting with a letter once trimmed
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Za-z][A-Za-z\s\-']*$").unwrap());

/// 7 to 15 digits
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7,15}$").unwrap());

/// Borrower gender as recorded on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {} (expected M or F)", s)),
        }
    }
}

/// Registered borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    /// Late returns so far; only an administrative reset lowers it
    pub violations: u32,
}

impl Borrower {
    pub fn full_name(&self) -> String {
        if self.middle_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
        }
    }

    /// Same person: first name, last name and email match case-insensitively
    pub fn same_identity(&self, first_name: &str, last_name: &str, email: &str) -> bool {
        self.first_name.eq_ignore_ascii_case(first_name.trim())
            && self.last_name.eq_ignore_ascii_case(last_name.trim())
            && self.email.eq_ignore_ascii_case(email.trim())
    }
}

impl std::fmt::Display for Borrower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Gender: {} | Birthday: {} | Contact: {} | Email: {} | Address: {} | Strikes: {}",
            self.id,
            self.full_name(),
            self.gender,
            self.birthday.format("%Y-%m-%d"),
            self.contact_number,
            self.email,
            self.address,
            self.violations
        )
    }
}

/// Register borrower request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBorrower {
    /// Explicit ID; a sequential one is assigned when absent
    #[validate(length(min = 1, message = "Borrower ID must not be empty"))]
    pub id: Option<String>,
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub first_name: String,
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub middle_name: Option<String>,
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub last_name: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
    #[validate(regex(path = *PHONE_RE, message = "Phone must contain digits only (7-15 digits)"))]
    pub contact_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Address must not be empty"))]
    pub address: String,
}

impl CreateBorrower {
    /// Build the borrower record under the given ID, with no violations
    pub fn into_borrower(self, id: String) -> Borrower {
        Borrower {
            id,
            first_name: self.first_name.trim().to_string(),
            middle_name: self
                .middle_name
                .map(|m| m.trim().to_string())
                .unwrap_or_default(),
            last_name: self.last_name.trim().to_string(),
            gender: self.gender,
            birthday: self.birthday,
            contact_number: self.contact_number.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            violations: 0,
        }
    }
}

/// Edit borrower request; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBorrower {
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub first_name: Option<String>,
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub middle_name: Option<String>,
    #[validate(regex(path = *NAME_RE, message = "Name must only contain letters, spaces, hyphen or apostrophe"))]
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    #[validate(regex(path = *PHONE_RE, message = "Phone must contain digits only (7-15 digits)"))]
    pub contact_number: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank", message = "Address must not be empty"))]
    pub address: Option<String>,
}

impl UpdateBorrower {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.middle_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.birthday.is_none()
            && self.contact_number.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }

    /// Apply the present fields to `borrower`. The violation counter is never touched.
    pub fn apply(self, borrower: &mut Borrower) {
        if let Some(v) = self.first_name {
            borrower.first_name = v.trim().to_string();
        }
        if let Some(v) = self.middle_name {
            borrower.middle_name = v.trim().to_string();
        }
        if let Some(v) = self.last_name {
            borrower.last_name = v.trim().to_string();
        }
        if let Some(v) = self.gender {
            borrower.gender = v;
        }
        if let Some(v) = self.birthday {
            borrower.birthday = v;
        }
        if let Some(v) = self.contact_number {
            borrower.contact_number = v.trim().to_string();
        }
        if let Some(v) = self.email {
            borrower.email = v.trim().to_string();
        }
        if let Some(v) = self.address {
            borrower.address = v.trim().to_string();
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
