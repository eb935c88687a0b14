use anyhow::{anyhow, Result};
use validator::ValidationErrors;

/// Free-text fields from the client are capped at this many characters.
pub const MAX_INPUT_LENGTH: usize = 500;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Email validation
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(anyhow!("Email is required"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(anyhow!("Invalid email format"));
    };
    if local.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(anyhow!("Invalid email format"));
    }

    if email.len() > 255 {
        return Err(anyhow!("Email cannot be longer than 255 characters"));
    }

    Ok(())
}

/// Password validation
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(anyhow!("Password is required"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(anyhow!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.len() > 128 {
        return Err(anyhow!("Password cannot be longer than 128 characters"));
    }

    Ok(())
}

/// Trims the input and cuts it to `max_chars` characters.
pub fn sanitize_input(input: &str, max_chars: usize) -> String {
    input.trim().chars().take(max_chars).collect()
}

/// First message of a failed `validator` run, with a stable field order.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .next()
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for {}", field),
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("lifter@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("lifter.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("lifter@example").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_sanitize_input_trims_and_truncates() {
        assert_eq!(sanitize_input("  tired, short on time  ", 500), "tired, short on time");
        assert_eq!(sanitize_input(&"a".repeat(600), 500).len(), 500);
        assert_eq!(sanitize_input("héllo", 2), "hé");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 10, message = "Energy level must be between 1 and 10"))]
        energy: i32,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn test_first_validation_message_prefers_sorted_field() {
        let sample = Sample {
            energy: 11,
            name: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Energy level must be between 1 and 10"
        );

        let sample = Sample {
            energy: 5,
            name: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Invalid value for name");
    }
}
