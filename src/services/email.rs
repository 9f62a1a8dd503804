//! Email service for verification links and return reminders

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the account verification link after registration
    pub async fn send_verification(&self, to: &str, verification_url: &str) -> AppResult<()> {
        let subject = "Verify your email";
        let body = format!(
            "Click the link to verify your email: {url}\n\nIf you didn't create an account, please ignore this email.",
            url = verification_url
        );

        self.send_email(to, subject, &body).await
    }

    /// Send the due-tomorrow return reminder
    pub async fn send_return_reminder(&self, to: &str, name: &str, title: &str) -> AppResult<()> {
        let subject = "Book Return Reminder";
        let body = format!(
            "Hello {name},\n\nThis is a friendly reminder that the book \"{title}\" is due tomorrow. \
             Please return it on time to avoid any fines.\n\nThank you.",
            name = name,
            title = title
        );

        self.send_email(to, subject, &body).await
    }

    /// Send the overdue notification
    pub async fn send_overdue_notice(&self, to: &str, name: &str, title: &str) -> AppResult<()> {
        let subject = "Overdue Book Notification";
        let body = format!(
            "Hello {name},\n\nThe book \"{title}\" is overdue. You are now incurring a fine of $1 per day \
             until it is returned. Please return it as soon as possible to minimize your fine.\n\nThank you.",
            name = name,
            title = title
        );

        self.send_email(to, subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Biblius");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Email(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            // Use STARTTLS for secure connection
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
