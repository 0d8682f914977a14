//! Inbound acquisition request.

use serde::Deserialize;

/// One acquisition proposal as submitted by the upstream web form.
///
/// Field names mirror the form parameters; the struct is created once per
/// inbound call and never mutated afterwards. Free-text fields are passed
/// through verbatim and must be treated as untrusted when embedded in any
/// structured output.
#[derive(Debug, Clone, Deserialize)]
pub struct AcquisitionRequest {
    /// ISBN as typed by the requester, possibly hyphenated.
    pub isbn: String,

    /// Title of the proposed work.
    pub title: String,

    /// Author or other contributor.
    pub contributor: String,

    /// Edition statement.
    pub edition: String,

    /// Publisher.
    pub publisher: String,

    /// Year of publication.
    pub year: String,

    /// Price as free text.
    pub price: String,

    /// Subject area used to route the proposal to the responsible account.
    #[serde(rename = "subjectarea")]
    pub subject_area: String,

    /// Where the requester learned of the title.
    pub source: String,

    /// Free-text comment by the requester.
    pub comment: String,

    /// Name of the requester.
    pub name: String,

    /// Library account number of the requester.
    #[serde(rename = "libraryaccountNumber")]
    pub library_account_number: String,

    /// Email address of the requester.
    #[serde(rename = "emailAddress")]
    pub email_address: String,

    /// Whether the requester asked to be notified about the outcome.
    #[serde(rename = "response")]
    pub notify_requester: bool,

    /// Requested for the Essen site.
    pub essen: bool,

    /// Requested for the Duisburg site.
    pub duisburg: bool,

    /// Label of the place the request was made from.
    #[serde(rename = "requestPlace")]
    pub request_place: String,
}

#[cfg(test)]
pub(crate) fn sample_request() -> AcquisitionRequest {
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
        comment: "dringend benötigt".to_string(),
        name: "Erika Musterfrau".to_string(),
        library_account_number: "U0012345".to_string(),
        email_address: "erika@example.org".to_string(),
        notify_requester: false,
        essen: false,
        duisburg: false,
        request_place: "Essen".to_string(),
    }
}
