use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SmtpConfig;

const APP_NAME: &str = "THRSHLD";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("Failed to send email: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

/// Delivers mail over SMTP with STARTTLS relay.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, EmailError> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| EmailError::InvalidAddress(e.to_string()))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| EmailError::InvalidAddress(e.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text_body, email.html_body))
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let recipient = email.to.clone();
        let message = self.build_message(email)?;
        let transport = SmtpTransport::relay(&self.config.host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        // lettre's SmtpTransport is blocking.
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        info!("Sent email to {}", recipient);
        Ok(())
    }
}

/// Used when SMTP is not configured: the email is written to the log.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        warn!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured, email not sent:\n{}",
            email.text_body
        );
        Ok(())
    }
}

fn render(template: &str, reset_url: &str) -> String {
    template
        .replace("{{app_name}}", APP_NAME)
        .replace("{{reset_url}}", reset_url)
        .replace("{{expires_in}}", "1 hour")
}

/// Password-reset message linking to `{base_url}/reset-password/{token}`.
pub fn password_reset_email(to: &str, base_url: &str, token: &str) -> OutgoingEmail {
    let reset_url = format!(
        "{}/reset-password/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(token)
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("{} - Reset Your Password", APP_NAME),
        text_body: render(include_str!("../templates/email/password_reset.txt"), &reset_url),
        html_body: render(include_str!("../templates/email/password_reset.html"), &reset_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_email_contains_link_and_expiry() {
        let email = password_reset_email("lifter@example.com", "https://thrshld.app/", "abc123");

        assert_eq!(email.to, "lifter@example.com");
        assert_eq!(email.subject, "THRSHLD - Reset Your Password");
        assert!(email.text_body.contains("https://thrshld.app/reset-password/abc123"));
        assert!(email.html_body.contains("href=\"https://thrshld.app/reset-password/abc123\""));
        assert!(email.text_body.contains("expires in 1 hour"));
        assert!(!email.html_body.contains("{{"));
    }

    #[test]
    fn test_invalid_sender_is_reported() {
        let mailer = SmtpMailer::new(SmtpConfig {
            host: "smtp.example.com".to_string(),
            username: String::new(),
            password: String::new(),
            from: "not an address".to_string(),
        });

        let email = password_reset_email("lifter@example.com", "http://x", "t");
        let result = mailer.build_message(email);
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        let email = password_reset_email("lifter@example.com", "http://localhost:3000", "t");
        assert!(LogMailer.send(email).await.is_ok());
    }
}
