pub mod accounts;
pub mod logindb;
pub mod otpdb;
