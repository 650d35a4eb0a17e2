//! Email service for library notifications

use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::mail::Mail,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a plain text mail over SMTP
    pub async fn send(&self, mail: &Mail) -> AppResult<()> {
        let email = self.build_message(mail)?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        mailer_builder
            .build()
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::debug!(to = %mail.mail_to, subject = %mail.subject, "Email sent");
        Ok(())
    }

    fn build_message(&self, mail: &Mail) -> AppResult<Message> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(&mail.mail_to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let mut builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        if let Some(ref cc) = mail.to_cc {
            let cc_mailbox = Mailbox::from_str(cc)
                .map_err(|e| AppError::Internal(format!("Invalid cc address: {}", e)))?;
            builder = builder.cc(cc_mailbox);
        }

        builder
            .body(mail.message.clone())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }
}
