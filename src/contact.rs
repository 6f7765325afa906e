//! Contact form validation and email dispatch.
//!
//! Validation evaluates every rule independently so a submitter sees all
//! violations at once, not just the first. Dispatch posts to a
//! transactional email provider; any transport or API failure collapses
//! into a single `success: false` outcome with a generic message — field
//! errors are only ever produced by validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ureq::Agent;

use crate::config::ContactConfig;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "EMAIL_API_KEY";

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 5000;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("missing {API_KEY_ENV} environment variable")]
    MissingApiKey,
}

/// A contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation errors. A field absent from the map passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.subject.is_none()
            && self.message.is_none()
    }

    pub fn count(&self) -> usize {
        [
            self.name.is_some(),
            self.email.is_some(),
            self.subject.is_some(),
            self.message.is_some(),
        ]
        .iter()
        .filter(|v| **v)
        .count()
    }
}

/// Outcome surfaced to the form.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Validate a submission. Returns `None` when everything passes.
///
/// Rules: name 2-100 chars, email matches a basic pattern, optional
/// subject ≤200 chars, message 10-5000 chars. Lengths are measured after
/// trimming for the minimums (whitespace padding is not content) but on
/// the raw value for the maximums.
pub fn validate(submission: &Submission) -> Option<FieldErrors> {
    let mut errors = FieldErrors::default();

    if submission.name.trim().len() < NAME_MIN {
        errors.name = Some(format!("Name must be at least {NAME_MIN} characters"));
    } else if submission.name.len() > NAME_MAX {
        errors.name = Some(format!("Name must be less than {NAME_MAX} characters"));
    }

    if !is_valid_email(&submission.email) {
        errors.email = Some("Please enter a valid email address".to_string());
    }

    if let Some(subject) = &submission.subject {
        if subject.len() > SUBJECT_MAX {
            errors.subject = Some(format!("Subject must be less than {SUBJECT_MAX} characters"));
        }
    }

    if submission.message.trim().len() < MESSAGE_MIN {
        errors.message = Some(format!("Message must be at least {MESSAGE_MIN} characters"));
    } else if submission.message.len() > MESSAGE_MAX {
        errors.message = Some(format!("Message must be less than {MESSAGE_MAX} characters"));
    }

    if errors.is_empty() { None } else { Some(errors) }
}

/// Basic email shape check: something@something.something, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: String,
    html: String,
    text: String,
}

/// Validate and dispatch a submission to the email provider.
///
/// Validation failures return immediately with field errors and no network
/// call. A missing API key is a deployment error, not a user-facing one.
pub fn submit(
    agent: &Agent,
    config: &ContactConfig,
    submission: &Submission,
) -> Result<SubmitOutcome, ContactError> {
    if let Some(errors) = validate(submission) {
        return Ok(SubmitOutcome {
            success: false,
            error: None,
            errors: Some(errors),
        });
    }

    let api_key = std::env::var(API_KEY_ENV).map_err(|_| ContactError::MissingApiKey)?;

    let subject = submission
        .subject
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("New Contact Form Submission from {}", submission.name));

    let payload = EmailPayload {
        from: &config.from,
        to: [config.to.as_str()],
        reply_to: &submission.email,
        subject,
        html: render_html_body(submission),
        text: render_text_body(submission),
    };

    let response = agent
        .post(&config.endpoint)
        .header("Authorization", &format!("Bearer {api_key}"))
        .send_json(&payload);

    match response {
        Ok(r) if r.status().as_u16() < 400 => Ok(SubmitOutcome {
            success: true,
            error: None,
            errors: None,
        }),
        Ok(r) => {
            tracing::warn!(status = r.status().as_u16(), "email provider rejected send");
            Ok(failure_outcome())
        }
        Err(e) => {
            tracing::warn!(error = %e, "email dispatch failed");
            Ok(failure_outcome())
        }
    }
}

fn failure_outcome() -> SubmitOutcome {
    SubmitOutcome {
        success: false,
        error: Some("Failed to send message. Please try again later.".to_string()),
        errors: None,
    }
}

fn render_html_body(s: &Submission) -> String {
    let mut body = String::from("<h2>New Contact Form Submission</h2>\n");
    body.push_str(&format!("<p><strong>Name:</strong> {}</p>\n", escape(&s.name)));
    body.push_str(&format!("<p><strong>Email:</strong> {}</p>\n", escape(&s.email)));
    if let Some(subject) = s.subject.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("<p><strong>Subject:</strong> {}</p>\n", escape(subject)));
    }
    body.push_str("<p><strong>Message:</strong></p>\n");
    body.push_str(&format!("<p>{}</p>\n", escape(&s.message).replace('\n', "<br>")));
    body
}

fn render_text_body(s: &Submission) -> String {
    let mut body = format!(
        "New Contact Form Submission\n\nName: {}\nEmail: {}\n",
        s.name, s.email
    );
    if let Some(subject) = s.subject.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("Subject: {subject}\n"));
    }
    body.push_str(&format!("\nMessage:\n{}\n", s.message));
    body
}

/// Minimal HTML escaping for provider email bodies.
fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
