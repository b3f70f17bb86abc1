//! Outbound email.
//!
//! The verification service only depends on the [`MailTransport`] trait; the
//! SMTP implementation lives behind it so tests can capture sends. Delivery
//! is not retried here: a transport failure propagates to the caller.

use async_trait::async_trait;
use graduon_common::{config::MailConfig, AppError, AppResult};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// Mail transport collaborator.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send a single message.
    async fn send(&self, to: &str, subject: &str, text_body: &str, html_body: &str)
        -> AppResult<()>;
}

/// Shared handle to the configured mail transport.
pub type Mailer = Arc<dyn MailTransport>;

/// SMTP mail transport backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a transport from the mail configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> AppResult<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text_body.to_string(),
                html_body.to_string(),
            ))
            .map_err(|e| AppError::Mail(format!("Failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

/// Render the signup email-verification message.
#[must_use]
pub fn signup_verification_email(code: &str, ttl_minutes: u32) -> (String, String, String) {
    let subject = "Verify your email address".to_string();
    let text = format!(
        "Your email verification code is {code}.\n\n\
        The code is valid for {ttl_minutes} minutes from the time it was sent.\n\n\
        If you did not request this, you can safely ignore this email."
    );
    let html = wrap_html(&format!(
        "<h2>Email verification</h2>\
        <p>Please enter <strong>{code}</strong> to verify your email address.</p>\
        <p>The code is valid for <strong>{ttl_minutes} minutes</strong> from the time it was sent.</p>\
        <hr/>\
        <p><small>If you did not request this, you can safely ignore this email.</small></p>"
    ));
    (subject, text, html)
}

/// Render the password-reset message.
#[must_use]
pub fn password_reset_email(code: &str, ttl_minutes: u32) -> (String, String, String) {
    let subject = "Your password reset code".to_string();
    let text = format!(
        "Your password reset code is {code}.\n\n\
        The code is valid for {ttl_minutes} minutes from the time it was sent.\n\n\
        If you did not request this, please change your password to keep your account safe."
    );
    let html = wrap_html(&format!(
        "<h2>Password reset requested</h2>\
        <p>Your verification code is <strong>{code}</strong>.</p>\
        <p>The code is valid for <strong>{ttl_minutes} minutes</strong> from the time it was sent.</p>\
        <hr/>\
        <p><small>If you did not request this, please change your password to keep your account safe.</small></p>"
    ));
    (subject, text, html)
}

/// Wrap HTML content in a basic email template.
fn wrap_html(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
    </style>
</head>
<body>
    {content}
</body>
</html>"#
    )
}
