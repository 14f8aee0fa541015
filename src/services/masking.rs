//! Masked contact display for the OTP step. Email is preferred over phone
//! when both are on file. Phone masking depends on the prefix: international
//! `+254`/`254` forms mask the middle three of the last six digits, local
//! `07`/`01` forms mask the three digits after the first three.

pub fn masked_destination(email: Option<&str>, phone: Option<&str>) -> Option<String> {
    match (email, phone) {
        (Some(e), _) if !e.is_empty() => Some(mask_email(e)),
        (_, Some(p)) if !p.is_empty() => Some(mask_phone(p)),
        _ => None,
    }
}

pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let shown: String = local.chars().take(3).collect();
            format!("{}***@{}", shown, domain)
        }
        None => email.to_string(),
    }
}

// Counts characters, not bytes: contact fields are user-supplied and are
// not guaranteed to be ASCII.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if phone.starts_with("+254") || phone.starts_with("254") {
        mask_middle_of_last_six(phone)
    } else if phone.starts_with("07") || phone.starts_with("01") {
        if len > 6 {
            let head: String = phone.chars().take(3).collect();
            let tail: String = phone.chars().skip(6).collect();
            format!("{}***{}", head, tail)
        } else {
            phone.to_string()
        }
    } else if len > 6 {
        mask_middle_of_last_six(phone)
    } else {
        phone.to_string()
    }
}

fn mask_middle_of_last_six(phone: &str) -> String {
    let len = phone.chars().count();
    if len < 6 {
        return phone.to_string();
    }
    let head: String = phone.chars().take(len - 6).collect();
    let tail: String = phone.chars().skip(len - 3).collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_plus_prefix() {
        assert_eq!(mask_phone("+254712345678"), "+254712***678");
    }

    #[test]
    fn international_without_plus() {
        assert_eq!(mask_phone("254712345678"), "254712***678");
    }

    #[test]
    fn local_07_prefix() {
        assert_eq!(mask_phone("0712345678"), "071***5678");
    }

    #[test]
    fn local_01_prefix() {
        assert_eq!(mask_phone("0112345678"), "011***5678");
    }

    #[test]
    fn non_ascii_phone_masks_without_panicking() {
        assert_eq!(mask_phone("07ñ1234567"), "07ñ***4567");
        assert_eq!(mask_phone("+254712345£78"), "+254712***£78");
        assert_eq!(mask_phone("ñ"), "ñ");
    }

    #[test]
    fn email_keeps_first_three_of_local_part() {
        assert_eq!(mask_email("jane.doe@example.com"), "jan***@example.com");
    }

    #[test]
    fn email_preferred_over_phone() {
        let masked = masked_destination(Some("jane@example.com"), Some("0712345678"));
        assert_eq!(masked.as_deref(), Some("jan***@example.com"));
    }

    #[test]
    fn falls_back_to_phone_when_email_missing() {
        let masked = masked_destination(None, Some("+254712345678"));
        assert_eq!(masked.as_deref(), Some("+254712***678"));
        assert_eq!(masked_destination(Some(""), Some("0712345678")).as_deref(), Some("071***5678"));
        assert!(masked_destination(None, None).is_none());
    }
}
