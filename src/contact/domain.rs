use serde::{Deserialize, Serialize};

/// Raw contact-form payload as posted by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Submission after sanitization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Request metadata recorded alongside a submission for abuse follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    pub ip_address: String,
    pub user_agent: String,
}

/// Field-level validation failures for the contact form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactViolation {
    #[error("name must be between 2 and 50 characters")]
    NameLength,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("message must be between 10 and 1000 characters")]
    MessageLength,
}

/// Strip angle brackets and surrounding whitespace from free-text fields.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

fn valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn sanitize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

impl ContactSubmission {
    /// Sanitize free text and enforce the form's field constraints.
    pub fn sanitize(self) -> Result<SanitizedContact, ContactViolation> {
        let name = sanitize_text(&self.name);
        if !(2..=50).contains(&name.chars().count()) {
            return Err(ContactViolation::NameLength);
        }

        let email = self.email.trim().to_ascii_lowercase();
        if !valid_email(&email) {
            return Err(ContactViolation::InvalidEmail);
        }

        let phone = sanitize_phone(&self.phone);
        if !(10..=15).contains(&phone.chars().count()) {
            return Err(ContactViolation::InvalidPhone);
        }

        let message = sanitize_text(&self.message);
        if !(10..=1000).contains(&message.chars().count()) {
            return Err(ContactViolation::MessageLength);
        }

        Ok(SanitizedContact {
            name,
            email,
            phone,
            message,
        })
    }
}
