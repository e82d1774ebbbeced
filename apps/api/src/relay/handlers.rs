//! Axum route handlers for the careers and contact forms.
//!
//! Each request runs one pipeline: validate, format, send once, respond.
//! Nothing is retried or deduplicated.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::mail::{parse_mailbox, MailError, OutboundEmail};
use crate::models::submission::{
    non_blank, ApplicationFields, ApplicationSubmission, ContactSubmission, RESUME_FIELD,
};
use crate::relay::position::format_position;
use crate::relay::template::{render_email, EmailContent, COMPANY_NAME, PLACEHOLDER};
use crate::state::AppState;
use crate::upload::{StoredUpload, UploadError, UploadStore};

const CAREERS_SENDER: &str = "Career Portal";
const CONTACT_SENDER: &str = "Website Contact";
const DEFAULT_CONTACT_SUBJECT: &str = "New Inquiry";

/// JSON envelope returned by both endpoints, on success and on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    pub message: String,
}

impl RelayResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Careers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/careers/apply
///
/// Multipart form with `name, email, phone, position, message` and the
/// `resume` file. Only the resume is required.
pub async fn handle_careers_apply(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            // Not a multipart body, so there cannot be a file in it.
            warn!("Careers request without multipart body: {rejection}");
            return Err(AppError::MissingResume);
        }
    };

    let (fields, resume) = read_application(&state.uploads, multipart).await?;
    let Some(resume) = resume else {
        return Err(AppError::MissingResume);
    };
    let submission = ApplicationSubmission { fields, resume };

    info!(
        name = ?submission.fields.name,
        position = ?submission.fields.position,
        resume = %submission.resume.original_name,
        size_bytes = submission.resume.size_bytes,
        "Careers application received"
    );

    let result = send_application(&state, &submission).await;
    if state.config.delete_uploads_after_send {
        state.uploads.discard(&submission.resume).await;
    }
    result.map_err(AppError::ApplicationSend)?;

    info!(to = %state.config.hr_email, "Application email sent");
    Ok(Json(RelayResponse::ok("Application submitted successfully")))
}

/// Drains the multipart body. A resume stored before a later failure is removed.
async fn read_application(
    uploads: &UploadStore,
    mut multipart: Multipart,
) -> Result<(ApplicationFields, Option<StoredUpload>), AppError> {
    let mut fields = ApplicationFields::default();
    let mut resume = None;

    if let Err(e) = collect_parts(uploads, &mut multipart, &mut fields, &mut resume).await {
        if let Some(stored) = &resume {
            uploads.discard(stored).await;
        }
        return Err(e);
    }

    Ok((fields, resume))
}

async fn collect_parts(
    uploads: &UploadStore,
    multipart: &mut Multipart,
    fields: &mut ApplicationFields,
    resume: &mut Option<StoredUpload>,
) -> Result<(), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            let value = field.text().await.map_err(UploadError::from)?;
            if !fields.set(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
            continue;
        };

        if name != RESUME_FIELD || resume.is_some() {
            return Err(UploadError::UnexpectedFile(name).into());
        }
        // browsers send an empty, unnamed part when no file was chosen
        if file_name.is_empty() {
            continue;
        }
        *resume = Some(uploads.store(field).await?);
    }
    Ok(())
}

async fn send_application(
    state: &AppState,
    submission: &ApplicationSubmission,
) -> Result<(), MailError> {
    let email = application_email(submission, &state.config.hr_email, Utc::now().year())?;
    state.mailer.send(&email).await
}

fn application_email(
    submission: &ApplicationSubmission,
    hr_email: &str,
    year: i32,
) -> Result<OutboundEmail, MailError> {
    let fields = &submission.fields;
    let position = format_position(display(&fields.position));

    let html = render_email(
        &EmailContent {
            heading: "New Job Application",
            rows: vec![
                ("Name", display(&fields.name)),
                ("Email", display(&fields.email)),
                ("Phone", display(&fields.phone)),
                ("Position", position),
            ],
            message: display(&fields.message),
        },
        year,
    );

    OutboundEmail::builder()
        .from_name(CAREERS_SENDER)
        .to(hr_email)
        .subject(format!("{COMPANY_NAME} New Job Application – {position}"))
        .html(html)
        .attach(
            submission.resume.original_name.clone(),
            submission.resume.stored_path.clone(),
        )
        .build()
}

/// Careers fields are shown as submitted; only absent ones get the placeholder.
fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/contact
///
/// JSON body; `name`, `email` and `message` are required. Replies to the
/// relayed email go straight to the submitter.
pub async fn handle_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let contact = match payload {
        Ok(Json(contact)) => contact,
        // a body that is not declared as JSON is read as an empty form
        Err(JsonRejection::MissingJsonContentType(_)) => ContactSubmission::default(),
        Err(rejection) => return Err(AppError::InvalidBody(rejection.body_text())),
    };

    if !contact.has_required_fields() {
        return Err(AppError::MissingFields);
    }
    // the address becomes Reply-To, so it has to parse before anything is sent
    let reply_to = non_blank(&contact.email).unwrap_or_default();
    parse_mailbox(reply_to).map_err(AppError::InvalidEmail)?;

    info!(
        name = ?contact.name,
        email = ?contact.email,
        subject = ?contact.subject,
        "Contact message received"
    );

    let email = contact_email(&contact, &state.config.hr_email, Utc::now().year())
        .map_err(AppError::ContactSend)?;
    state
        .mailer
        .send(&email)
        .await
        .map_err(AppError::ContactSend)?;

    info!(to = %state.config.hr_email, "Contact email sent");
    Ok(Json(RelayResponse::ok("Contact message sent successfully")))
}

fn contact_email(
    contact: &ContactSubmission,
    hr_email: &str,
    year: i32,
) -> Result<OutboundEmail, MailError> {
    let name = non_blank(&contact.name).unwrap_or_default();
    let email = non_blank(&contact.email).unwrap_or_default();
    let subject = non_blank(&contact.subject);

    let html = render_email(
        &EmailContent {
            heading: "New Contact Inquiry",
            rows: vec![
                ("Name", name),
                ("Email", email),
                ("Phone", non_blank(&contact.phone).unwrap_or(PLACEHOLDER)),
                (
                    "Preferred Contact",
                    non_blank(&contact.preferred_contact).unwrap_or(PLACEHOLDER),
                ),
                ("Subject", subject.unwrap_or(PLACEHOLDER)),
            ],
            message: contact.message.as_deref().unwrap_or_default(),
        },
        year,
    );

    OutboundEmail::builder()
        .from_name(CONTACT_SENDER)
        .to(hr_email)
        .reply_to(email)
        .subject(contact_subject(subject))
        .html(html)
        .build()
}

fn contact_subject(subject: Option<&str>) -> String {
    format!(
        "Contact Form: {}",
        subject.unwrap_or(DEFAULT_CONTACT_SUBJECT)
    )
}
