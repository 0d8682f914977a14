//! Fallback notification mail.
//!
//! When a request cannot be placed on the remote list it is escalated to a
//! human instead: an HTML mail carrying every original form field and the
//! failure reason, so an operator can re-submit manually or reply to the
//! requester. This is the terminal sink of the pipeline; a failure to send
//! is logged and goes no further.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::request::AcquisitionRequest;

/// Mail dispatch errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build notification message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("could not hand message to SMTP relay: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One outgoing notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body_html: String,
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand a notification to the transport. Fire-and-forget; no delivery
    /// confirmation is consumed.
    async fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// SMTP-backed mailer using lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a mailer relaying through the given SMTP host.
    pub fn new(smtp_host: &str) -> Result<Self, MailError> {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host).build();
        Ok(Self { transport })
    }

    /// Build a mailer relaying through the given SMTP host with STARTTLS.
    pub fn with_starttls(smtp_host: &str) -> Result<Self, MailError> {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)?.build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let message = Message::builder()
            .from(notification.from.parse()?)
            .to(notification.to.parse()?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(notification.body_html.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Compose the notification body for an escalated request.
///
/// Every form field is embedded so the operator can act without access to
/// the original submission. Form fields are untrusted free text and are
/// escaped before being placed in markup.
pub fn notification_body(request: &AcquisitionRequest, reason: &str) -> String {
    let mut body = String::new();
    body.push_str("<p>Ein Anschaffungsvorschlag konnte nicht an ELi:SA \u{00fc}bermittelt werden.</p>\n");
    body.push_str(&format!("<p>Grund: {}</p>\n", escape_html(reason)));
    body.push_str("<table>\n");

    let rows = [
        ("ISBN", request.isbn.as_str()),
        ("Titel", request.title.as_str()),
        ("Autor", request.contributor.as_str()),
        ("Auflage", request.edition.as_str()),
        ("Verlag", request.publisher.as_str()),
        ("Jahr", request.year.as_str()),
        ("Preis", request.price.as_str()),
        ("Fach", request.subject_area.as_str()),
        ("Literaturangebot von", request.source.as_str()),
        ("Kommentar", request.comment.as_str()),
        ("Name", request.name.as_str()),
        ("Nutzernummer", request.library_account_number.as_str()),
        ("E-Mail", request.email_address.as_str()),
        ("Standort", request.request_place.as_str()),
    ];
    for (label, value) in rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            label,
            escape_html(value)
        ));
    }
    body.push_str(&format!(
        "<tr><td>Benachrichtigung erw\u{00fc}nscht</td><td>{}</td></tr>\n",
        if request.notify_requester { "ja" } else { "nein" }
    ));
    body.push_str(&format!(
        "<tr><td>Essen</td><td>{}</td></tr>\n",
        if request.essen { "ja" } else { "nein" }
    ));
    body.push_str(&format!(
        "<tr><td>Duisburg</td><td>{}</td></tr>\n",
        if request.duisburg { "ja" } else { "nein" }
    ));
    body.push_str("</table>\n");
    body
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Mock implementation for tests
// ============================================================================

use std::sync::Mutex;

/// Mailer that records notifications instead of sending them.
pub struct MockMailer {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Mailer whose dispatch always fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Notifications handed to this mailer so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        if self.fail {
            return Err(anyhow::anyhow!("scripted mail failure").into());
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
