//! State and city field normalisation.

use crate::error::CoreError;

pub const MAX_STATE_CODE_LEN: usize = 10;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PINCODE_LEN: usize = 10;

/// State codes are stored trimmed and upper-case.
pub fn normalize_state_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() || code.len() > MAX_STATE_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "State code must be 1 to {MAX_STATE_CODE_LEN} characters"
        )));
    }
    Ok(code)
}

/// Trim a display name and enforce the column length.
pub fn normalize_name(field: &str, name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be 1 to {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub fn validate_pincode(pincode: &str) -> Result<(), CoreError> {
    if pincode.len() > MAX_PINCODE_LEN || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Pincode must be up to {MAX_PINCODE_LEN} digits"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn state_code_is_uppercased() {
        assert_eq!(normalize_state_code(" mh ").unwrap(), "MH");
    }

    #[test]
    fn state_code_length_enforced() {
        assert_matches!(normalize_state_code(""), Err(CoreError::Validation(_)));
        assert_matches!(normalize_state_code("ABCDEFGHIJK"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(normalize_name("City name", "  Pune ").unwrap(), "Pune");
        assert_matches!(normalize_name("City name", "   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn pincode_digits_only() {
        assert!(validate_pincode("411001").is_ok());
        assert_matches!(validate_pincode("41A001"), Err(CoreError::Validation(_)));
    }
}
