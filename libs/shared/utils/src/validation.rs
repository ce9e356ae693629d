//! Input checks shared by the booking and registration endpoints.

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;
/// Width of the phone columns; applies to the trimmed value.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Phone numbers may carry punctuation as long as the whole value fits the column.
pub fn validate_phone(label: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.chars().count() > MAX_PHONE_LENGTH {
        return Err(format!("{} cannot be longer than {} characters", label, MAX_PHONE_LENGTH));
    }

    let digits = value.chars().filter(char::is_ascii_digit).count();

    if digits < MIN_PHONE_DIGITS {
        return Err(format!("{} must have at least {} digits", label, MIN_PHONE_DIGITS));
    }
    if digits > MAX_PHONE_DIGITS {
        return Err(format!("{} cannot have more than {} digits", label, MAX_PHONE_DIGITS));
    }

    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), String> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(format!("Invalid email address: {}", value))
    }
}

pub fn require_non_blank(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", label))
    } else {
        Ok(())
    }
}
