pub mod cooldown;
pub mod otp_entry;
pub mod requirements;
