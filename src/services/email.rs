use anyhow::{Context, Result};
use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;

pub async fn send_code_email(email: &str, code: &str) -> Result<()> {
    let smtp_user = env::var("SMTP_EMAIL").context("SMTP_EMAIL must be set")?;
    let smtp_pass = env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?;
    let smtp_host = env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string());
    let smtp_port: u16 = env::var("SMTP_PORT")
        .unwrap_or_else(|_| "587".to_string())
        .parse()
        .context("Invalid SMTP_PORT")?;

    let html_body = format!(
        r#"
    <div style="background-color:#166534;padding:50px 0">
        <div style="max-width:500px;margin:0 auto;background:#f0fdf4;padding:40px;border-radius:8px;text-align:center;font-family:Arial,sans-serif;">
            <h1 style="color:#14532d">Verify Your Account</h1>
            <p style="margin:20px 0;font-size:16px;color:#333">
                Use this code to finish setting up your Sukari Portal account
            </p>
            <h2 style="font-size:40px;letter-spacing:5px;color:#166534;margin:30px 0">{}</h2>
            <p style="color:#333">This code was requested for<br>
            <a style="color:#3b82f6;text-decoration:none;">{}</a></p>
        </div>
    </div>
    "#,
        code, email
    );

    let email_message = Message::builder()
        .from(smtp_user.parse()?)
        .to(email.parse()?)
        .subject("Your Sukari Portal verification code")
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(format!(
                    "Your verification code is: {}",
                    code
                )))
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html_body),
                ),
        )?;

    let creds = Credentials::new(smtp_user, smtp_pass);

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_host)?
        .port(smtp_port)
        .credentials(creds)
        .build();

    mailer
        .send(email_message)
        .await
        .context("Failed to send verification email")?;

    Ok(())
}
