pub mod email;
pub mod iprs;
pub mod masking;
pub mod sms;
