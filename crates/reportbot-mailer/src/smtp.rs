use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use reportbot_core::config::MailConfig;
use reportbot_scheduler::{DeliveryError, ReportMailer};

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail configuration error: {0}")]
    Config(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Sends reports as plain-text emails over authenticated STARTTLS.
#[derive(Debug)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Build a `Mailer` from `[mail]` config.
    ///
    /// Requires username, password, and recipient; the sender address
    /// falls back to the username when `from` is unset.
    pub fn from_config(cfg: &MailConfig) -> Result<Self, MailerError> {
        let username = cfg
            .username
            .as_deref()
            .ok_or_else(|| MailerError::Config("mail.username is not set".to_string()))?;
        let password = cfg
            .password
            .as_deref()
            .ok_or_else(|| MailerError::Config("mail.password is not set".to_string()))?;
        let recipient = cfg
            .recipient
            .as_deref()
            .ok_or_else(|| MailerError::Config("mail.recipient is not set".to_string()))?;

        let from: Mailbox = cfg
            .from
            .as_deref()
            .unwrap_or(username)
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::Config(e.to_string()))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::Config(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .map_err(|e| MailerError::Config(e.to_string()))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from, to })
    }

    pub async fn deliver(&self, subject: &str, body: &str) -> Result<(), MailerError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| MailerError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailerError::Smtp(e.to_string()))?;

        info!(%subject, recipient = %self.to.email, "report emailed");
        Ok(())
    }
}

#[async_trait]
impl ReportMailer for Mailer {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.deliver(subject, body)
            .await
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> MailConfig {
        MailConfig {
            username: Some("bot@example.com".to_string()),
            password: Some("app-password".to_string()),
            recipient: Some("team@example.com".to_string()),
            ..MailConfig::default()
        }
    }

    #[test]
    fn builds_from_complete_config() {
        assert!(Mailer::from_config(&full_config()).is_ok());
    }

    #[test]
    fn missing_credentials_is_a_config_error() {
        let cfg = MailConfig::default();
        let err = Mailer::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("mail.username"));
    }

    #[test]
    fn missing_recipient_is_a_config_error() {
        let cfg = MailConfig {
            recipient: None,
            ..full_config()
        };
        let err = Mailer::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("mail.recipient"));
    }

    #[test]
    fn sender_falls_back_to_username() {
        let mailer = Mailer::from_config(&full_config()).unwrap();
        assert_eq!(mailer.from.email.to_string(), "bot@example.com");
    }

    #[test]
    fn explicit_from_overrides_username() {
        let cfg = MailConfig {
            from: Some("Reportbot <reports@example.com>".to_string()),
            ..full_config()
        };
        let mailer = Mailer::from_config(&cfg).unwrap();
        assert_eq!(mailer.from.email.to_string(), "reports@example.com");
    }

    #[test]
    fn invalid_recipient_address_rejected() {
        let cfg = MailConfig {
            recipient: Some("not-an-address".to_string()),
            ..full_config()
        };
        assert!(Mailer::from_config(&cfg).is_err());
    }
}
