//! End-to-end tests of the submission pipeline against mock collaborators.

use std::sync::Arc;

use elisa_bridge::config::BridgeConfig;
use elisa_bridge::elisa::MockElisaClient;
use elisa_bridge::mail::MockMailer;
use elisa_bridge::request::AcquisitionRequest;
use elisa_bridge::subject::MockSubjectClient;
use elisa_bridge::submit::{EscalationReason, SubmissionOutcome, Submitter};

fn request() -> AcquisitionRequest {
    AcquisitionRequest {
        isbn: "978-3-16-148410-0".to_string(),
        title: "Beispieltitel".to_string(),
        contributor: "Mustermann, Max".to_string(),
        edition: "2. Aufl.".to_string(),
        publisher: "Mohr Siebeck".to_string(),
        year: "2024".to_string(),
        price: "49,90 EUR".to_string(),
        subject_area: "Physik".to_string(),
        source: "Verlagsprospekt".to_string(),
        comment: "dringend ben\u{00f6}tigt".to_string(),
        name: "Erika Musterfrau".to_string(),
        library_account_number: "U0012345".to_string(),
        email_address: "erika@example.org".to_string(),
        notify_requester: false,
        essen: true,
        duisburg: true,
        request_place: "Essen".to_string(),
    }
}

fn config() -> BridgeConfig {
    BridgeConfig::new("caller", "secret", "eav@example.org")
        .with_default_account("fallback-account")
}

struct Harness {
    submitter: Submitter,
    elisa: Arc<MockElisaClient>,
    mailer: Arc<MockMailer>,
}

fn harness(elisa: MockElisaClient, subject: MockSubjectClient) -> Harness {
    let elisa = Arc::new(elisa);
    let mailer = Arc::new(MockMailer::new());
    let submitter = Submitter::new(
        config(),
        elisa.clone(),
        Arc::new(subject),
        mailer.clone(),
    );
    Harness {
        submitter,
        elisa,
        mailer,
    }
}

#[tokio::test]
async fn test_successful_submission_sends_no_mail() {
    let h = harness(
        MockElisaClient::accepting(),
        MockSubjectClient::with_account("Physik", "account-7"),
    );

    let outcome = h.submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Submitted {
            account_id: "account-7".to_string()
        }
    );
    assert!(h.mailer.sent().is_empty());

    let create_calls = h.elisa.create_calls();
    assert_eq!(create_calls.len(), 1);
    let create = &create_calls[0];
    assert_eq!(create.token, "test-token");
    assert_eq!(create.user_id, "account-7");
    assert_eq!(create.notepad_name, "Anschaffungsvorschlag");
    assert_eq!(create.title_list.len(), 1);
    assert_eq!(create.title_list[0].title.isbn, "9783161484100");
    // both site flags set: Essen segment first, then Duisburg, then pickup line
    assert_eq!(
        create.title_list[0].title.note.as_deref(),
        Some("E :1, D :1,  , VM f\u{00fc}r U0012345 (Erika Musterfrau) in Essen")
    );
}

#[tokio::test]
async fn test_invalid_isbn_escalates_without_remote_calls() {
    let h = harness(
        MockElisaClient::accepting(),
        MockSubjectClient::with_account("Physik", "account-7"),
    );

    let mut invalid = request();
    invalid.isbn = "0-14-X".to_string();
    let outcome = h.submitter.submit(&invalid).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::InvalidIsbn)
    );
    assert!(h.elisa.auth_calls().is_empty());
    assert!(h.elisa.create_calls().is_empty());

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "eav@example.org");
    assert_eq!(sent[0].subject, "Anschaffungsvorschlag");
    assert!(sent[0].body_html.contains("Es wurde keine ISBN angegeben"));
    // the original request travels with the notification
    assert!(sent[0].body_html.contains("0-14-X"));
    assert!(sent[0].body_html.contains("Erika Musterfrau"));
}

#[tokio::test]
async fn test_unknown_subject_area_escalates_to_default_recipient() {
    let h = harness(MockElisaClient::accepting(), MockSubjectClient::empty());

    let outcome = h.submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::AccountResolutionFailed)
    );
    assert!(h.elisa.auth_calls().is_empty());

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "eav@example.org");
    assert!(sent[0]
        .body_html
        .contains("Der zust\u{00e4}ndige ELi:SA-Account konnte nicht gefunden werden"));
}

#[tokio::test]
async fn test_failed_lookup_escalates_like_unknown_subject() {
    let h = harness(MockElisaClient::accepting(), MockSubjectClient::failing());

    let outcome = h.submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::AccountResolutionFailed)
    );
    assert_eq!(h.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_rejected_authentication_keeps_message_and_skips_create() {
    let h = harness(
        MockElisaClient::rejecting_auth(3, "bad caller"),
        MockSubjectClient::with_account("Physik", "account-7"),
    );

    let outcome = h.submitter.submit(&request()).await;

    match &outcome {
        SubmissionOutcome::Escalated(reason @ EscalationReason::AuthenticationRejected(msg)) => {
            assert_eq!(msg, "bad caller");
            assert!(reason.to_string().contains("bad caller"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // create-list must never be reached after a rejected authentication
    assert_eq!(h.elisa.auth_calls().len(), 1);
    assert!(h.elisa.create_calls().is_empty());
    assert_eq!(h.mailer.sent().len(), 1);
    assert!(h.mailer.sent()[0]
        .body_html
        .contains("Die ELi:SA-Authentifizierung ist fehlgeschlagen"));
}

#[tokio::test]
async fn test_unreachable_api_escalates() {
    let h = harness(
        MockElisaClient::unreachable(),
        MockSubjectClient::with_account("Physik", "account-7"),
    );

    let outcome = h.submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::RemoteUnreachable)
    );
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body_html.contains("ELi:SA API nicht erreichbar"));
}

#[tokio::test]
async fn test_rejected_creation_surfaces_remote_message() {
    let h = harness(
        MockElisaClient::rejecting_create(7, "list quota exceeded"),
        MockSubjectClient::with_account("Physik", "account-7"),
    );

    let outcome = h.submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::ListCreationRejected(
            "list quota exceeded".to_string()
        ))
    );
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .body_html
        .contains("ELi:SA-Antwort: list quota exceeded"));
}

#[tokio::test]
async fn test_mail_failure_does_not_change_the_outcome() {
    let elisa = Arc::new(MockElisaClient::unreachable());
    let mailer = Arc::new(MockMailer::failing());
    let submitter = Submitter::new(
        config(),
        elisa,
        Arc::new(MockSubjectClient::with_account("Physik", "account-7")),
        mailer,
    );

    let outcome = submitter.submit(&request()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Escalated(EscalationReason::RemoteUnreachable)
    );
}

#[tokio::test]
async fn test_forward_uses_default_account_when_none_given() {
    let h = harness(
        MockElisaClient::accepting(),
        MockSubjectClient::empty(),
    );

    let titles = vec![elisa_bridge::elisa::Title::new(elisa_bridge::elisa::TitleData {
        isbn: "9783161484100".to_string(),
        note_intern: None,
        note: None,
    })];
    h.submitter.forward(None, titles).await;

    let create_calls = h.elisa.create_calls();
    assert_eq!(create_calls.len(), 1);
    assert_eq!(create_calls[0].user_id, "fallback-account");
    assert_eq!(create_calls[0].notepad_name, "Anschaffungsvorschlag");
    // forwarding never notifies
    assert!(h.mailer.sent().is_empty());
}
