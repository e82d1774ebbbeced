use serde::Deserialize;

use crate::upload::StoredUpload;

/// Multipart field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";

/// Text fields of a careers application. None of them are validated; a
/// missing field stays `None` and is rendered with a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Position code, e.g. `chartered_accountant`.
    pub position: Option<String>,
    pub message: Option<String>,
}

impl ApplicationFields {
    /// Records a text field by its form name. Unknown names are ignored and
    /// reported back as `false`; a repeated name keeps the last value.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "position" => &mut self.position,
            "message" => &mut self.message,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub fields: ApplicationFields,
    pub resume: StoredUpload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub preferred_contact: Option<String>,
    pub message: Option<String>,
}

impl ContactSubmission {
    /// `name`, `email` and `message` must be present and not blank.
    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .into_iter()
            .all(|f| non_blank(f).is_some())
    }
}

/// Returns the trimmed value when it carries any text.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_and_unknown_fields() {
        let mut fields = ApplicationFields::default();
        assert!(fields.set("name", "Asha".into()));
        assert!(fields.set("position", "articleship".into()));
        assert!(!fields.set("favourite_colour", "blue".into()));

        assert_eq!(fields.name.as_deref(), Some("Asha"));
        assert_eq!(fields.position.as_deref(), Some("articleship"));
        assert_eq!(fields.email, None);
    }

    #[test]
    fn test_contact_deserializes_camel_case() {
        let contact: ContactSubmission = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","message":"hi","preferredContact":"phone"}"#,
        )
        .unwrap();
        assert_eq!(contact.preferred_contact.as_deref(), Some("phone"));
        assert_eq!(contact.subject, None);
        assert!(contact.has_required_fields());
    }

    #[test]
    fn test_contact_blank_required_field_fails() {
        let contact = ContactSubmission {
            name: Some("A".into()),
            email: Some("   ".into()),
            message: Some("hi".into()),
            ..Default::default()
        };
        assert!(!contact.has_required_fields());
    }

    #[test]
    fn test_contact_missing_message_fails() {
        let contact = ContactSubmission {
            name: Some("A".into()),
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(!contact.has_required_fields());
    }
}
