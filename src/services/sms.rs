use anyhow::{anyhow, Context, Result};
use std::env;

/// Delivers the OTP over the configured SMS gateway. The gateway is an
/// opaque HTTP collaborator like the identity registry.
pub async fn send_code_sms(phone: &str, code: &str) -> Result<()> {
    let gateway_url = env::var("SMS_GATEWAY_URL").context("SMS_GATEWAY_URL must be set")?;
    let api_key = env::var("SMS_API_KEY").context("SMS_API_KEY must be set")?;

    let client = reqwest::Client::new();
    let response = client
        .post(&gateway_url)
        .header("x-api-key", api_key)
        .json(&serde_json::json!({
            "to": phone,
            "message": format!("Your Sukari Portal verification code is: {}", code),
        }))
        .send()
        .await
        .context("SMS gateway is unreachable")?;

    if !response.status().is_success() {
        return Err(anyhow!("SMS gateway rejected the message: {}", response.status()));
    }

    Ok(())
}
