//! PIN requirements checklist. Each requirement renders as its own line in
//! the client checklist; submission additionally needs the confirmation to
//! match.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRequirement {
    /// Exactly 4 characters.
    Length,
    /// Non-empty, digits only.
    Numbers,
}

pub fn is_requirement_met(requirement: PinRequirement, pin: &str) -> bool {
    match requirement {
        PinRequirement::Length => pin.len() == 4,
        PinRequirement::Numbers => !pin.is_empty() && pin.chars().all(|c| c.is_ascii_digit()),
    }
}

pub fn can_submit(pin: &str, confirm_pin: &str) -> bool {
    is_requirement_met(PinRequirement::Length, pin)
        && is_requirement_met(PinRequirement::Numbers, pin)
        && pin == confirm_pin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_requirement_is_exactly_four() {
        assert!(is_requirement_met(PinRequirement::Length, "1234"));
        assert!(!is_requirement_met(PinRequirement::Length, "123"));
        assert!(!is_requirement_met(PinRequirement::Length, "12345"));
        assert!(is_requirement_met(PinRequirement::Length, "abcd"));
    }

    #[test]
    fn numbers_requirement_needs_digits_only() {
        assert!(is_requirement_met(PinRequirement::Numbers, "1234"));
        assert!(is_requirement_met(PinRequirement::Numbers, "12"));
        assert!(!is_requirement_met(PinRequirement::Numbers, ""));
        assert!(!is_requirement_met(PinRequirement::Numbers, "12a4"));
    }

    #[test]
    fn submit_needs_both_requirements_and_a_match() {
        assert!(can_submit("1234", "1234"));
        assert!(!can_submit("1234", "1235"));
        assert!(!can_submit("123", "123"));
        assert!(!can_submit("abcd", "abcd"));
    }
}
