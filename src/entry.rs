//! List-entry construction.
//!
//! Turns a normalized request plus a resolved account into the payload for
//! the remote create-list call. The two note strings are exact contracts:
//! subject librarians and downstream tooling parse them, so field order and
//! punctuation must not change.

use crate::elisa::TitleData;
use crate::request::AcquisitionRequest;
use crate::subject::RoutingIdentity;

/// Category label of every list created by this bridge.
pub const CATEGORY_LABEL: &str = "Anschaffungsvorschlag";

/// A list entry ready for submission, minus the token.
#[derive(Debug, Clone)]
pub struct ListEntry {
    /// ELi:SA account that will own the list.
    pub account_id: String,
    /// Fixed list category label.
    pub category: String,
    /// Titles on the list; the form contributes exactly one.
    pub titles: Vec<TitleData>,
}

/// Build the list entry for one request.
///
/// `isbn` is the already-normalized form; the raw field on the request may
/// still contain hyphens.
pub fn build_entry(
    request: &AcquisitionRequest,
    routing: &RoutingIdentity,
    isbn: &str,
) -> ListEntry {
    let title = TitleData {
        isbn: isbn.to_string(),
        note_intern: Some(intern_note(request)),
        note: Some(library_note(request)),
    };

    ListEntry {
        account_id: routing.account_id.clone(),
        category: CATEGORY_LABEL.to_string(),
        titles: vec![title],
    }
}

/// Staff-facing note: requester, contact, comment and offer source, plus a
/// notification reminder when the requester asked for one.
fn intern_note(request: &AcquisitionRequest) -> String {
    let mut note = format!(
        "{} ({}): {}\n Literaturangebe von: {}",
        request.name, request.email_address, request.comment, request.source
    );
    if request.notify_requester {
        note.push_str("\n Bitte den Nutzer benachrichtigen.");
    }
    note
}

/// Library note: one marker segment per requested site, each with its own
/// trailing separator, followed by the pickup line.
fn library_note(request: &AcquisitionRequest) -> String {
    let mut note = String::new();
    if request.essen {
        note.push_str("E :1, ");
    }
    if request.duisburg {
        note.push_str("D :1,  , ");
    }
    note.push_str(&format!(
        "VM für {} ({}) in {}",
        request.library_account_number, request.name, request.request_place
    ));
    note
}
