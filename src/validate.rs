//! Client-side style input validation, enforced again at the API boundary so
//! nothing malformed reaches the registry or the database.

/// National ID numbers are exactly 8 digits; anything else is rejected
/// before any lookup is attempted.
pub fn is_valid_national_id(id: &str) -> bool {
    id.len() == 8 && id.chars().all(|c| c.is_ascii_digit())
}

/// OTP codes are exactly 6 digits.
pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_accepts_only_eight_digits() {
        assert!(is_valid_national_id("12345678"));
        assert!(is_valid_national_id("00000000"));
        assert!(!is_valid_national_id("1234567"));
        assert!(!is_valid_national_id("123456789"));
        assert!(!is_valid_national_id("1234567a"));
        assert!(!is_valid_national_id(""));
        assert!(!is_valid_national_id("1234 678"));
    }

    #[test]
    fn otp_code_accepts_only_six_digits() {
        assert!(is_valid_otp_code("482913"));
        assert!(!is_valid_otp_code("48291"));
        assert!(!is_valid_otp_code("4829134"));
        assert!(!is_valid_otp_code("48a913"));
    }
}
