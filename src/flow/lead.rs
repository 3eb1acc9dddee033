use crate::error::LeadError;
use crate::service::LeadCaptureRequest;
use serde::{Deserialize, Serialize};

/// Contact details entered in a lead-capture form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl LeadForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: None,
            phone: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Checks the form and returns a trimmed copy with blank optionals cleared.
    pub fn validate(&self) -> Result<LeadForm, LeadError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LeadError::MissingName);
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(LeadError::InvalidEmail(email.to_string()));
        }

        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(LeadForm {
            name: name.to_string(),
            email: email.to_string(),
            company: optional(&self.company),
            phone: optional(&self.phone),
        })
    }
}

impl From<LeadForm> for LeadCaptureRequest {
    fn from(lead: LeadForm) -> Self {
        LeadCaptureRequest {
            email: lead.email,
            name: lead.name,
            company: lead.company,
            phone: lead.phone,
        }
    }
}

/// Syntactic email check: one `@`, a non-empty local part and a dotted domain
/// with non-empty labels. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
