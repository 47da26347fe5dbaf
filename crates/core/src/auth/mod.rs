//! Authentication and credential rules.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification and strength checks
//! - Email normalization and derivation for employee accounts

mod password;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, check_password_strength, hash_password, verify_password,
};

/// Lowercases and trims an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns true if the address has a non-empty local part and a dotted-or-bare domain.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Derives an employee email from their display name and the company domain.
///
/// `"Jane Doe"` at `cashbook.local` becomes `janedoe@cashbook.local`.
/// Returns `None` when the name has no usable characters.
#[must_use]
pub fn derive_employee_email(name: &str, domain: &str) -> Option<String> {
    let local: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if local.is_empty() || domain.trim().is_empty() {
        return None;
    }
    Some(format!("{local}@{}", domain.trim().to_lowercase()))
}
