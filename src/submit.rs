//! Submission pipeline.
//!
//! Drives a request through normalization, account resolution, entry
//! construction and the two-step remote protocol (authenticate, then
//! create-list). Every request ends in exactly one terminal outcome:
//! submitted to the remote list, or escalated as a fallback notification.
//! Nothing is retried and nothing is persisted; the guarantee is that no
//! request is silently lost.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth;
use crate::config::{BridgeConfig, NOTIFICATION_SUBJECT};
use crate::elisa::{AuthenticationRequest, CreateListRequest, ElisaClient, Title};
use crate::entry::{self, ListEntry, CATEGORY_LABEL};
use crate::isbn;
use crate::mail::{self, Mailer, Notification};
use crate::request::AcquisitionRequest;
use crate::subject::{RoutingIdentity, SubjectClient};

/// Why a request was escalated instead of submitted.
///
/// Closed taxonomy; the caller-visible response class and the notification
/// text are both derived from it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EscalationReason {
    /// The request carried no usable ISBN. Benign by contract: the form
    /// caller still receives a 200-class acknowledgment.
    #[error("no valid ISBN provided")]
    InvalidIsbn,

    /// The account lookup failed or knows no account for the subject area.
    #[error("no responsible remote account found")]
    AccountResolutionFailed,

    /// A remote call failed at the transport level.
    #[error("ELi:SA API unreachable")]
    RemoteUnreachable,

    /// The remote service rejected the signed credential.
    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    /// The remote service rejected the create-list call.
    #[error("list creation rejected: {0}")]
    ListCreationRejected(String),
}

impl EscalationReason {
    /// Reason line embedded in the fallback notification. German, because
    /// that is what the operators reading these mails expect.
    pub fn notification_text(&self) -> String {
        match self {
            EscalationReason::InvalidIsbn => "Es wurde keine ISBN angegeben".to_string(),
            EscalationReason::AccountResolutionFailed => {
                "Der zuständige ELi:SA-Account konnte nicht gefunden werden".to_string()
            }
            EscalationReason::RemoteUnreachable => "ELi:SA API nicht erreichbar".to_string(),
            EscalationReason::AuthenticationRejected(_) => {
                "Die ELi:SA-Authentifizierung ist fehlgeschlagen".to_string()
            }
            EscalationReason::ListCreationRejected(message) => {
                format!("ELi:SA-Antwort: {message}")
            }
        }
    }
}

/// Terminal outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The remote list was created under the given account.
    Submitted {
        /// Account that now owns the list entry.
        account_id: String,
    },
    /// Remote submission was abandoned; a notification was dispatched.
    Escalated(EscalationReason),
}

/// The submission pipeline with its injected collaborators.
///
/// Stateless across requests; safe to share behind an `Arc` between
/// concurrent handlers.
pub struct Submitter {
    config: BridgeConfig,
    elisa: Arc<dyn ElisaClient>,
    subject: Arc<dyn SubjectClient>,
    mailer: Arc<dyn Mailer>,
}

impl Submitter {
    pub fn new(
        config: BridgeConfig,
        elisa: Arc<dyn ElisaClient>,
        subject: Arc<dyn SubjectClient>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            elisa,
            subject,
            mailer,
        }
    }

    /// Run one request through the pipeline.
    ///
    /// Returns exactly one outcome. On every escalation exactly one
    /// fallback notification is dispatched before this returns; a success
    /// dispatches none.
    pub async fn submit(&self, request: &AcquisitionRequest) -> SubmissionOutcome {
        let outcome = self.run(request).await;
        if let SubmissionOutcome::Escalated(reason) = &outcome {
            self.notify(request, reason).await;
        }
        outcome
    }

    async fn run(&self, request: &AcquisitionRequest) -> SubmissionOutcome {
        let Some(normalized_isbn) = isbn::normalize(&request.isbn) else {
            warn!(isbn = %request.isbn, "no usable ISBN given");
            return SubmissionOutcome::Escalated(EscalationReason::InvalidIsbn);
        };

        info!(isbn = %normalized_isbn, "received request to send ISBN to ELi:SA");

        let account_id = match self.subject.elisa_account(&request.subject_area).await {
            Ok(Some(account_id)) if !account_id.is_empty() => account_id,
            Ok(_) => {
                warn!(
                    subject_area = %request.subject_area,
                    "no ELi:SA account registered for subject area"
                );
                return SubmissionOutcome::Escalated(EscalationReason::AccountResolutionFailed);
            }
            Err(e) => {
                warn!(
                    subject_area = %request.subject_area,
                    error = %e,
                    "could not retrieve the ELi:SA account for subject area"
                );
                return SubmissionOutcome::Escalated(EscalationReason::AccountResolutionFailed);
            }
        };

        info!(account_id = %account_id, "resolved ELi:SA account");

        let routing = RoutingIdentity {
            account_id,
            subject_area: request.subject_area.clone(),
        };
        let list_entry = entry::build_entry(request, &routing, &normalized_isbn);

        let credential = auth::sign_now(&self.config.caller_id, &self.config.secret);
        let auth_response = match self
            .elisa
            .get_token(&AuthenticationRequest::from(credential))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "could not connect to ELi:SA API");
                return SubmissionOutcome::Escalated(EscalationReason::RemoteUnreachable);
            }
        };

        if auth_response.errorcode != 0 {
            let message = auth_response.error_message.unwrap_or_default();
            error!(
                errorcode = auth_response.errorcode,
                reason = %message,
                "ELi:SA authentication failed"
            );
            return SubmissionOutcome::Escalated(EscalationReason::AuthenticationRejected(
                message,
            ));
        }

        let token = auth_response.token.unwrap_or_default();
        let create_request = CreateListRequest::new(token, list_entry);

        match self.elisa.create_list(&create_request).await {
            Ok(response) if response.errorcode == 0 => {
                info!(account_id = %routing.account_id, "successfully created ELi:SA list");
                SubmissionOutcome::Submitted {
                    account_id: routing.account_id,
                }
            }
            Ok(response) => {
                let message = response.error_message.unwrap_or_default();
                warn!(
                    errorcode = response.errorcode,
                    reason = %message,
                    "could not create ELi:SA list"
                );
                SubmissionOutcome::Escalated(EscalationReason::ListCreationRejected(message))
            }
            Err(e) => {
                error!(error = %e, "could not connect to ELi:SA API");
                SubmissionOutcome::Escalated(EscalationReason::RemoteUnreachable)
            }
        }
    }

    /// Dispatch the fallback notification for an escalated request.
    ///
    /// The terminal sink: a dispatch failure is logged and never raised
    /// back to the caller, whose response is already determined.
    async fn notify(&self, request: &AcquisitionRequest, reason: &EscalationReason) {
        let notification = Notification {
            from: self.config.from_address.clone(),
            to: self.config.fallback_address.clone(),
            subject: NOTIFICATION_SUBJECT.to_string(),
            body_html: mail::notification_body(request, &reason.notification_text()),
        };

        match self.mailer.send(&notification).await {
            Ok(()) => {
                info!(to = %notification.to, "sent fallback notification");
            }
            Err(e) => {
                error!(
                    to = %notification.to,
                    error = %e,
                    "could not deliver fallback notification"
                );
            }
        }
    }

    /// Forward pre-built titles to a remote account, logging-only.
    ///
    /// Backs the fire-and-forget endpoint: the HTTP caller has already
    /// received its 202 by the time this runs, so every failure here ends
    /// in the log instead of a response.
    pub async fn forward(&self, account_id: Option<String>, titles: Vec<Title>) {
        let account_id = account_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.config.default_account.clone());

        if account_id.is_empty() {
            warn!("dropping forwarded titles: no target account and no default configured");
            return;
        }

        let credential = auth::sign_now(&self.config.caller_id, &self.config.secret);
        let auth_response = match self
            .elisa
            .get_token(&AuthenticationRequest::from(credential))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "forwarding failed: could not connect to ELi:SA API");
                return;
            }
        };

        if auth_response.errorcode != 0 {
            error!(
                errorcode = auth_response.errorcode,
                "forwarding failed: ELi:SA authentication rejected"
            );
            return;
        }

        let entry = ListEntry {
            account_id,
            category: CATEGORY_LABEL.to_string(),
            titles: titles.into_iter().map(|t| t.title).collect(),
        };
        let create_request =
            CreateListRequest::new(auth_response.token.unwrap_or_default(), entry);

        match self.elisa.create_list(&create_request).await {
            Ok(response) if response.errorcode == 0 => {
                info!(
                    account_id = %create_request.user_id,
                    titles = create_request.title_list.len(),
                    "forwarded titles to ELi:SA"
                );
            }
            Ok(response) => {
                error!(
                    errorcode = response.errorcode,
                    reason = %response.error_message.unwrap_or_default(),
                    "forwarding failed: could not create ELi:SA list"
                );
            }
            Err(e) => {
                error!(error = %e, "forwarding failed: could not connect to ELi:SA API");
            }
        }
    }
}
