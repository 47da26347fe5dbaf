//! Agent profile validation.

use thiserror::Error;

/// Errors raised when an agent profile is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// A required field is blank.
    #[error("{0} can't be blank")]
    Blank(&'static str),
}

impl AgentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "BLANK_FIELD"
    }

    /// The offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Blank(field) => *field,
        }
    }
}

/// A validated agent profile with trimmed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Display name.
    pub name: String,
    /// Classification, e.g. "Bank" or "Mobile Provider".
    pub type_of_agent: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl AgentProfile {
    /// Validates and normalizes an agent profile.
    ///
    /// Blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Blank` if `name` or `type_of_agent` is blank.
    pub fn new(
        name: &str,
        type_of_agent: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self, AgentError> {
        let name = required("name", name)?;
        let type_of_agent = required("type_of_agent", type_of_agent)?;

        Ok(Self {
            name,
            type_of_agent,
            phone: optional(phone),
            email: optional(email),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, AgentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgentError::Blank(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_trims_fields() {
        let profile = AgentProfile::new("  CRDB Bank ", "Bank", Some(" "), Some("ops@crdb.test")).unwrap();
        assert_eq!(profile.name, "CRDB Bank");
        assert_eq!(profile.phone, None);
        assert_eq!(profile.email.as_deref(), Some("ops@crdb.test"));
    }

    #[test]
    fn test_blank_required_fields() {
        assert_eq!(
            AgentProfile::new("", "Bank", None, None),
            Err(AgentError::Blank("name"))
        );
        assert_eq!(
            AgentProfile::new("M-Pesa", "   ", None, None),
            Err(AgentError::Blank("type_of_agent"))
        );
        assert_eq!(AgentError::Blank("name").to_string(), "name can't be blank");
    }
}
