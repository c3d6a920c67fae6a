//! Markup for the rental dialog and the call-back dialog.
//!
//! Each phase of [`LeadModal`] and [`CallModal`] maps to one view. The
//! dialogs are plain links and forms: choosing a contact method is a `GET`
//! with `via=`, submitting is a `POST`, and closing goes back to `/`.

use crate::content::{RENTAL_DESK_HOURS, RENTAL_DESK_PHONE};
use crate::html::{escape, fill};
use crate::lead::{CallModal, CallPhase, LeadModal, ModalPhase};
use crate::site::layout::tel_href;

/// Render the rental dialog for its current phase.
#[must_use]
pub fn render_lead_modal(modal: &LeadModal) -> String {
    let category = modal.category();
    let category_name = escape(category.name);
    let body = match modal.phase() {
        ModalPhase::ChoicePending => fill(RENTAL_CHOICE, &[("ID", category.id)]),
        ModalPhase::EmailForm => {
            let draft = modal.draft();
            let submitting = modal.is_submitting();
            fill(
                RENTAL_FORM,
                &[
                    ("ERROR", &error_banner(modal.error())),
                    ("ACTION", &format!("/rent/{}/", category.id)),
                    ("NAME", &escape(&draft.name)),
                    ("EMAIL", &escape(&draft.email)),
                    ("PHONE", &escape(&draft.phone)),
                    ("PERIOD", &escape(&draft.rental_period)),
                    ("MESSAGE", &escape(&draft.message)),
                    ("DISABLED", if submitting { " disabled" } else { "" }),
                    ("SUBMIT", if submitting { "Sending..." } else { "Submit Request" }),
                ],
            )
        }
        ModalPhase::PhoneInfo => fill(
            RENTAL_PHONE,
            &[
                ("TEL", &tel_href(RENTAL_DESK_PHONE)),
                ("PHONE", RENTAL_DESK_PHONE),
                ("HOURS", RENTAL_DESK_HOURS),
                ("ID", category.id),
                ("CATEGORY", &category_name),
            ],
        ),
        ModalPhase::Submitted => fill(RENTAL_SUBMITTED, &[("CATEGORY", &category_name)]),
    };

    fill(
        DIALOG,
        &[
            ("LABEL", "rental-modal"),
            ("HEADING", &format!("Rent {category_name}")),
            ("BODY", &body),
        ],
    )
}

/// Render the call-back dialog for its current phase.
#[must_use]
pub fn render_call_modal(modal: &CallModal) -> String {
    let body = match modal.phase() {
        CallPhase::Form => {
            let draft = modal.draft();
            fill(
                CALL_FORM,
                &[
                    ("ERROR", &error_banner(modal.error())),
                    ("NAME", &escape(&draft.name)),
                    ("PHONE", &escape(&draft.phone)),
                    ("EMAIL", &escape(&draft.email)),
                    ("MESSAGE", &escape(&draft.message)),
                ],
            )
        }
        CallPhase::Submitted => CALL_SUBMITTED.to_owned(),
    };

    fill(
        DIALOG,
        &[
            ("LABEL", "call-modal"),
            ("HEADING", "Request a Call Back"),
            ("BODY", &body),
        ],
    )
}

fn error_banner(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!(r#"<div class="modal-error" role="alert">{}</div>"#, escape(e))
    })
}

// ── Templates ────────────────────────────────────────────────────────

const DIALOG: &str = r##"<div class="modal-backdrop"><div class="modal" id="{{LABEL}}" role="dialog" aria-modal="true">
<div class="modal-header"><h2>{{HEADING}}</h2><a class="modal-close" href="/" aria-label="Close">&times;</a></div>
{{BODY}}
</div></div>
"##;

const RENTAL_CHOICE: &str = r##"<div class="modal-body">
<p>How would you like to contact us about renting this equipment?</p>
<div class="modal-choices">
<a class="modal-choice" href="/?rent={{ID}}&amp;via=email"><span>Via Email</span></a>
<a class="modal-choice" href="/?rent={{ID}}&amp;via=phone"><span>Via Phone</span></a>
</div>
</div>"##;

// The inline handler disables the button so one click posts once.
const RENTAL_FORM: &str = r##"<form class="modal-body" method="post" action="{{ACTION}}" onsubmit="this.querySelector('button[type=submit]').disabled=true">
{{ERROR}}
<label>Your Name<input type="text" name="name" value="{{NAME}}" required/></label>
<label>Email Address<input type="email" name="email" value="{{EMAIL}}" required/></label>
<label>Phone Number<input type="tel" name="phone" value="{{PHONE}}"/></label>
<label>Rental Period<input type="text" name="rentalPeriod" value="{{PERIOD}}" placeholder="e.g., 3 days, 1 week" required/></label>
<label>Additional Information<textarea name="message" rows="3">{{MESSAGE}}</textarea></label>
<button type="submit" class="btn btn-primary btn-block"{{DISABLED}}>{{SUBMIT}}</button>
</form>"##;

const RENTAL_PHONE: &str = r##"<div class="modal-body">
<h3>Contact us directly</h3>
<p>Call us at <a href="{{TEL}}">{{PHONE}}</a> to speak with our rental team about {{CATEGORY}}.</p>
<p>{{HOURS}}</p>
<a class="btn btn-secondary btn-block" href="/?rent={{ID}}">Back to options</a>
</div>"##;

const RENTAL_SUBMITTED: &str = r##"<div class="modal-body modal-success">
<div class="modal-check"><svg viewBox="0 0 24 24" width="24" height="24" fill="none" stroke="currentColor" stroke-width="2"><path stroke-linecap="round" stroke-linejoin="round" d="M5 13l4 4L19 7"/></svg></div>
<h3>Request Submitted!</h3>
<p>Thank you for your interest in renting {{CATEGORY}}. We'll get back to you shortly.</p>
<a class="btn btn-primary btn-block" href="/">Close</a>
</div>"##;

const CALL_FORM: &str = r##"<form class="modal-body" method="post" action="/request-call/" onsubmit="this.querySelector('button[type=submit]').disabled=true">
{{ERROR}}
<label>Your Name<input type="text" name="name" value="{{NAME}}" required/></label>
<label>Phone Number<input type="tel" name="phone" value="{{PHONE}}" required/></label>
<label>Email Address<input type="email" name="email" value="{{EMAIL}}" required/></label>
<label>How can we help you?<textarea name="message" rows="3">{{MESSAGE}}</textarea></label>
<button type="submit" class="btn btn-primary btn-block">Request Call Back</button>
</form>"##;

const CALL_SUBMITTED: &str = r##"<div class="modal-body modal-success">
<p>Thank you! We've received your request and will call you back shortly.</p>
<a class="btn btn-primary btn-block" href="/">Close</a>
</div>"##;
