//! Six-slot OTP entry model. Typing a digit fills the active slot and moves
//! the cursor forward; backspace clears the active slot, or steps back when
//! the slot is already empty. The code can be submitted only when every slot
//! holds a digit.

pub const OTP_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct OtpEntry {
    slots: [Option<char>; OTP_LEN],
    cursor: usize,
}

impl OtpEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Accepts only ASCII digits; anything else is ignored.
    pub fn type_digit(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() {
            return false;
        }
        self.slots[self.cursor] = Some(c);
        if self.cursor < OTP_LEN - 1 {
            self.cursor += 1;
        }
        true
    }

    pub fn backspace(&mut self) {
        if self.slots[self.cursor].is_some() {
            self.slots[self.cursor] = None;
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// The concatenated code, once every slot is filled.
    pub fn code(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.slots.iter().map(|s| s.unwrap()).collect())
        } else {
            None
        }
    }

    /// Empties every slot and returns the cursor to the first box, as after
    /// a resend.
    pub fn clear(&mut self) {
        self.slots = [None; OTP_LEN];
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_advances_cursor() {
        let mut entry = OtpEntry::new();
        for (i, c) in "48291".chars().enumerate() {
            assert!(entry.type_digit(c));
            assert_eq!(entry.cursor(), i + 1);
        }
        assert!(!entry.is_complete());
        entry.type_digit('3');
        // Cursor stays on the last box.
        assert_eq!(entry.cursor(), OTP_LEN - 1);
        assert_eq!(entry.code().as_deref(), Some("482913"));
    }

    #[test]
    fn backspace_on_empty_box_moves_back() {
        let mut entry = OtpEntry::new();
        entry.type_digit('4');
        entry.type_digit('8');
        // Cursor sits on empty box 2; backspace only moves focus.
        assert_eq!(entry.cursor(), 2);
        entry.backspace();
        assert_eq!(entry.cursor(), 1);
        // Box 1 still holds its digit; the next backspace clears it in place.
        entry.backspace();
        assert_eq!(entry.cursor(), 1);
        assert!(entry.code().is_none());
    }

    #[test]
    fn backspace_at_first_box_is_a_no_op() {
        let mut entry = OtpEntry::new();
        entry.backspace();
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn non_digits_are_rejected() {
        let mut entry = OtpEntry::new();
        assert!(!entry.type_digit('x'));
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut entry = OtpEntry::new();
        for c in "482913".chars() {
            entry.type_digit(c);
        }
        assert!(entry.is_complete());
        entry.clear();
        assert!(!entry.is_complete());
        assert_eq!(entry.cursor(), 0);
    }
}
