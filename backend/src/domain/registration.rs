//! Provider onboarding submissions.
//!
//! A prospective provider files one registration form; administrators read
//! them from the dashboard. Nothing in this core mutates a submission after
//! the fact, so the aggregate is a plain read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Category;

/// Fields a prospective provider submits.
///
/// The store assigns the id and submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub full_name: String,
    pub phone: String,
    pub city: String,
    pub experience_years: u8,
    pub categories: Vec<Category>,
}

/// A stored onboarding submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    id: String,
    submitted_at: DateTime<Utc>,
    full_name: String,
    phone: String,
    city: String,
    experience_years: u8,
    categories: Vec<Category>,
}

impl RegistrationForm {
    /// Construct a submission as read back from the store.
    pub fn new(
        id: impl Into<String>,
        submitted_at: DateTime<Utc>,
        draft: RegistrationDraft,
    ) -> Self {
        Self {
            id: id.into(),
            submitted_at,
            full_name: draft.full_name,
            phone: draft.phone,
            city: draft.city,
            experience_years: draft.experience_years,
            categories: draft.categories,
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }
    pub fn city(&self) -> &str {
        self.city.as_str()
    }
    pub fn experience_years(&self) -> u8 {
        self.experience_years
    }
    /// Categories the applicant wants to serve.
    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }
}
