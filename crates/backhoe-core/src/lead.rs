//! Lead capture.
//!
//! A lead is a visitor's rental inquiry or call-back request. It is never
//! stored: [`LeadService`] composes an HTML email and hands it to the
//! configured [`Mailer`] once. [`LeadModal`] and [`CallModal`] hold the
//! state of the two dialogs that collect leads.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use backhoe_mail::{Mailer, OutboundEmail, SendReceipt};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::content::Category;
use crate::error::LeadError;
use crate::html::escape;

const PHONE_PLACEHOLDER: &str = "Not provided";
const MESSAGE_PLACEHOLDER: &str = "No additional information provided.";

/// Accept a string, `null`, or any scalar for a text field.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// A rental inquiry as posted to the mail endpoint.
///
/// Every field is optional on the wire; missing values become empty strings
/// and are replaced by placeholders in the email where one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentalRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub rental_period: String,
    #[serde(deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(deserialize_with = "lenient_text")]
    pub category_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub category_id: String,
}

/// A "request a call" submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub message: String,
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Build the email for a rental inquiry. Every interpolated value is escaped.
#[must_use]
pub fn compose_rental_email(request: &RentalRequest) -> OutboundEmail {
    let html_body = format!(
        "\n<h2>New Equipment Rental Request</h2>\n\
         <p><strong>Equipment:</strong> {}</p>\n\
         <p><strong>From:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Rental Period:</strong> {}</p>\n\
         <p><strong>Additional Information:</strong></p>\n\
         <p>{}</p>\n",
        escape(&request.category_name),
        escape(&request.name),
        escape(&request.email),
        escape(or_placeholder(&request.phone, PHONE_PLACEHOLDER)),
        escape(&request.rental_period),
        escape(or_placeholder(&request.message, MESSAGE_PLACEHOLDER)),
    );
    OutboundEmail {
        subject: format!("New Rental Request: {}", request.category_name),
        html_body,
    }
}

/// Build the email for a call-back request.
#[must_use]
pub fn compose_callback_email(request: &CallbackRequest) -> OutboundEmail {
    let html_body = format!(
        "\n<h2>New Call Back Request</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>How can we help:</strong></p>\n\
         <p>{}</p>\n",
        escape(&request.name),
        escape(&request.phone),
        escape(&request.email),
        escape(or_placeholder(&request.message, MESSAGE_PLACEHOLDER)),
    );
    OutboundEmail {
        subject: format!("New Call Back Request: {}", request.name),
        html_body,
    }
}

/// Forwards leads through a mail transport.
#[derive(Clone)]
pub struct LeadService {
    mailer: Arc<dyn Mailer>,
}

impl fmt::Debug for LeadService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadService")
            .field("mailer", &self.mailer.name())
            .finish()
    }
}

impl LeadService {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Name of the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &str {
        self.mailer.name()
    }

    /// Send one email for a rental inquiry. No retry.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Mail`] if the transport fails.
    pub async fn forward_rental(&self, request: &RentalRequest) -> Result<SendReceipt, LeadError> {
        info!(
            name = %request.name,
            email = %request.email,
            category = %request.category_name,
            "received rental request"
        );
        self.send(&compose_rental_email(request)).await
    }

    /// Send one email for a call-back request. No retry.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Mail`] if the transport fails.
    pub async fn forward_callback(
        &self,
        request: &CallbackRequest,
    ) -> Result<SendReceipt, LeadError> {
        info!(name = %request.name, phone = %request.phone, "received call-back request");
        self.send(&compose_callback_email(request)).await
    }

    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, LeadError> {
        match self.mailer.send(email).await {
            Ok(receipt) => {
                info!(transport = self.mailer.name(), reply = %receipt.reply, "lead email sent");
                Ok(receipt)
            }
            Err(e) => {
                error!(transport = self.mailer.name(), error = %e, "failed to send lead email");
                Err(e.into())
            }
        }
    }

    /// Submit the modal's draft, if it will accept a submission now.
    ///
    /// Returns `false` without sending when the modal refused (wrong phase
    /// or a submission already in flight).
    pub async fn submit_rental(&self, modal: &mut LeadModal, policy: MailFailurePolicy) -> bool {
        let Some(request) = modal.begin_submit() else {
            return false;
        };
        let outcome = self
            .forward_rental(&request)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        modal.finish_submit(outcome, policy);
        true
    }

    /// Submit the call-back dialog. Same contract as [`Self::submit_rental`].
    pub async fn submit_callback(&self, modal: &mut CallModal, policy: MailFailurePolicy) -> bool {
        let Some(request) = modal.begin_submit() else {
            return false;
        };
        let outcome = self
            .forward_callback(&request)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        modal.finish_submit(outcome, policy);
        true
    }
}

/// What the visitor sees when the mail transport fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailFailurePolicy {
    /// Stay on the form and show the error.
    #[default]
    ShowError,
    /// Show the confirmation anyway; the failure is only logged.
    ConfirmAnyway,
}

/// How the visitor wants to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Email,
    Phone,
}

impl ContactMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for ContactMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => Err(format!("unknown contact method '{other}'")),
        }
    }
}

/// Phases of the rental dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    ChoicePending,
    EmailForm,
    PhoneInfo,
    Submitted,
}

/// Form fields of the rental dialog, as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RentalDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "rentalPeriod")]
    pub rental_period: String,
    pub message: String,
}

impl RentalDraft {
    /// Attach the category to form the request payload.
    #[must_use]
    pub fn to_request(&self, category: &Category) -> RentalRequest {
        RentalRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            rental_period: self.rental_period.clone(),
            message: self.message.clone(),
            category_name: category.name.to_owned(),
            category_id: category.id.to_owned(),
        }
    }
}

/// The rental dialog opened from a category tile.
#[derive(Debug, Clone)]
pub struct LeadModal {
    category: &'static Category,
    phase: ModalPhase,
    draft: RentalDraft,
    submitting: bool,
    error: Option<String>,
}

impl LeadModal {
    #[must_use]
    pub fn open(category: &'static Category) -> Self {
        Self {
            category,
            phase: ModalPhase::ChoicePending,
            draft: RentalDraft::default(),
            submitting: false,
            error: None,
        }
    }

    /// Pick a contact method. Only valid while the choice is pending.
    pub fn choose(&mut self, method: ContactMethod) -> bool {
        if self.phase != ModalPhase::ChoicePending {
            return false;
        }
        self.phase = match method {
            ContactMethod::Email => ModalPhase::EmailForm,
            ContactMethod::Phone => ModalPhase::PhoneInfo,
        };
        true
    }

    /// "Back to options" from the phone details.
    pub fn back(&mut self) -> bool {
        if self.phase != ModalPhase::PhoneInfo {
            return false;
        }
        self.phase = ModalPhase::ChoicePending;
        true
    }

    pub fn update_draft(&mut self, draft: RentalDraft) {
        if self.phase == ModalPhase::EmailForm && !self.submitting {
            self.draft = draft;
        }
    }

    /// Start a submission and return the payload to send.
    ///
    /// Returns `None` unless the email form is showing and no submission is
    /// already in flight, so one click sends at most one request.
    pub fn begin_submit(&mut self) -> Option<RentalRequest> {
        if self.phase != ModalPhase::EmailForm || self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(self.draft.to_request(self.category))
    }

    /// Record the outcome of the submission started by [`Self::begin_submit`].
    pub fn finish_submit(&mut self, outcome: Result<(), String>, policy: MailFailurePolicy) {
        if !self.submitting {
            return;
        }
        self.submitting = false;
        match (outcome, policy) {
            (Ok(()), _) => self.phase = ModalPhase::Submitted,
            (Err(reason), MailFailurePolicy::ConfirmAnyway) => {
                warn!(category = self.category.id, error = %reason, "showing confirmation despite failed send");
                self.phase = ModalPhase::Submitted;
            }
            (Err(reason), MailFailurePolicy::ShowError) => self.error = Some(reason),
        }
    }

    #[must_use]
    pub fn category(&self) -> &'static Category {
        self.category
    }

    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    #[must_use]
    pub fn draft(&self) -> &RentalDraft {
        &self.draft
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Phases of the call-back dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Form,
    Submitted,
}

/// The "request a call" dialog opened from the header.
#[derive(Debug, Clone)]
pub struct CallModal {
    phase: CallPhase,
    draft: CallbackRequest,
    submitting: bool,
    error: Option<String>,
}

impl Default for CallModal {
    fn default() -> Self {
        Self::open()
    }
}

impl CallModal {
    #[must_use]
    pub fn open() -> Self {
        Self {
            phase: CallPhase::Form,
            draft: CallbackRequest::default(),
            submitting: false,
            error: None,
        }
    }

    pub fn update_draft(&mut self, draft: CallbackRequest) {
        if self.phase == CallPhase::Form && !self.submitting {
            self.draft = draft;
        }
    }

    pub fn begin_submit(&mut self) -> Option<CallbackRequest> {
        if self.phase != CallPhase::Form || self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(self.draft.clone())
    }

    pub fn finish_submit(&mut self, outcome: Result<(), String>, policy: MailFailurePolicy) {
        if !self.submitting {
            return;
        }
        self.submitting = false;
        match (outcome, policy) {
            (Ok(()), _) | (Err(_), MailFailurePolicy::ConfirmAnyway) => {
                self.phase = CallPhase::Submitted;
            }
            (Err(reason), MailFailurePolicy::ShowError) => self.error = Some(reason),
        }
    }

    #[must_use]
    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    #[must_use]
    pub fn draft(&self) -> &CallbackRequest {
        &self.draft
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
