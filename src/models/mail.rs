//! Outgoing mail

/// A plain text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub mail_to: String,
    pub subject: String,
    pub message: String,
    pub to_cc: Option<String>,
}

impl Mail {
    pub fn new(mail_to: impl Into<String>, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            mail_to: mail_to.into(),
            subject: subject.into(),
            message: message.into(),
            to_cc: None,
        }
    }
}
