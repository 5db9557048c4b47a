use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};

/// Ask the operator for the current code of an MFA device. Blocks until answered.
pub fn prompt_token_code(serial: &str) -> Result<String> {
    let code = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("MFA code for {serial}"))
        .validate_with(|input: &String| {
            if is_valid_token_code(input) {
                Ok(())
            } else {
                Err("MFA code must be 6 digits")
            }
        })
        .interact_text()
        .context("Failed to read MFA code")?;

    Ok(code.trim().to_string())
}

fn is_valid_token_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token_code() {
        assert!(is_valid_token_code("123456"));
        assert!(is_valid_token_code("000000"));
        assert!(is_valid_token_code(" 654321 "));
    }

    #[test]
    fn test_invalid_token_code() {
        assert!(!is_valid_token_code(""));
        assert!(!is_valid_token_code("12345"));
        assert!(!is_valid_token_code("1234567"));
        assert!(!is_valid_token_code("12a456"));
        assert!(!is_valid_token_code("１２３４５６"));
    }
}
