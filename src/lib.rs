//! elisa-bridge - submission bridge for acquisition proposals.
//!
//! Accepts a library-acquisition proposal from the upstream web form and
//! registers it with the ELi:SA acquisition-list service of the hbz, using
//! a time-limited signed credential. Every request ends in exactly one of
//! two outcomes:
//!
//! - **Submitted**: the proposal is on a remote list owned by the
//!   responsible subject librarian's account.
//! - **Escalated**: submission was impossible (no ISBN, no responsible
//!   account, API unreachable, authentication or creation rejected) and a
//!   notification mail carrying the full request went to the fallback
//!   recipient instead.
//!
//! Nothing is persisted and nothing is retried; the contract is that no
//! proposal is ever silently lost.
//!
//! ```text
//! form ──► /sendEav ──► normalize ISBN ──► resolve account ──► build entry
//!                            │                   │                  │
//!                            ▼                   ▼                  ▼
//!                        escalate            escalate      authenticate ─► create list
//!                                                                │              │
//!                                                             escalate      escalate
//! ```

// === Core Modules ===

/// Signed credentials for the ELi:SA API.
pub mod auth;

/// Configuration values.
pub mod config;

/// ISBN normalization.
pub mod isbn;

/// Inbound request type.
pub mod request;

/// Subject-area account lookup.
pub mod subject;

/// List-entry construction.
pub mod entry;

/// ELi:SA API client.
pub mod elisa;

/// Fallback notification mail.
pub mod mail;

/// The submission pipeline.
pub mod submit;

/// HTTP surface.
pub mod api;

// === Re-exports ===

pub use config::BridgeConfig;
pub use request::AcquisitionRequest;
pub use submit::{EscalationReason, SubmissionOutcome, Submitter};
