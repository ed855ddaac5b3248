use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Document, NodeId};

/// Class marking a field that failed validation.
pub const INVALID_CLASS: &str = "is-invalid";

const REQUIRED_TAGS: [&str; 3] = ["input", "select", "textarea"];

/// Declared kind of a form field, keying the format check applied to a
/// non-empty value. Unknown kinds get the presence check only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
}

impl FieldKind {
    pub fn from_type_attr(type_attr: Option<&str>) -> Self {
        match type_attr {
            Some("email") => FieldKind::Email,
            Some("tel") => FieldKind::Phone,
            _ => FieldKind::Text,
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?1?\d{9,15}$").unwrap())
}

/// `local@domain.tld` shape: no whitespace or extra `@` on either side,
/// and at least one dot in the domain part.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// 9 to 15 digits after stripping every non-digit character and an
/// optional leading country `1`.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    phone_regex().is_match(&digits)
}

/// Walks a form's required fields and applies presence plus kind-keyed
/// format checks, marking failures with [`INVALID_CLASS`]. The marking is
/// a side effect independent of the returned verdict; callers use the
/// verdict to decide whether to block submission.
pub struct FormValidator;

impl FormValidator {
    /// Validate every required field in the form. A missing form id
    /// yields `false` with no side effects.
    pub fn validate(doc: &mut Document, form_id: &str) -> bool {
        let Some(form) = doc.get_element_by_id(form_id) else {
            return false;
        };

        let mut all_valid = true;
        for field in Self::required_fields(doc, form) {
            if Self::check_field(doc, field) {
                doc.remove_class(field, INVALID_CLASS);
            } else {
                doc.add_class(field, INVALID_CLASS);
                all_valid = false;
            }
        }
        all_valid
    }

    /// Required inputs, selects and textareas under `form`, tree order.
    pub fn required_fields(doc: &Document, form: NodeId) -> Vec<NodeId> {
        doc.descendants(form)
            .into_iter()
            .filter(|n| {
                doc.get(*n)
                    .map(|el| {
                        REQUIRED_TAGS.contains(&el.tag.as_str()) && el.attr("required").is_some()
                    })
                    .unwrap_or(false)
            })
            .collect()
    }

    fn check_field(doc: &Document, field: NodeId) -> bool {
        let value = doc.value(field).trim().to_string();
        if value.is_empty() {
            return false;
        }
        match FieldKind::from_type_attr(doc.attr(field, "type")) {
            FieldKind::Email => is_valid_email(&value),
            FieldKind::Phone => is_valid_phone(&value),
            FieldKind::Text => true,
        }
    }

    /// Optimistic clear: drop the invalid mark as soon as the user edits
    /// the field, regardless of the new value. The next full validation
    /// re-checks it.
    pub fn clear_mark(doc: &mut Document, field: NodeId) {
        doc.remove_class(field, INVALID_CLASS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("user@@bad"));
        assert!(!is_valid_email("noatsign.com"));
        assert!(!is_valid_email("spaces in@local.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("+11234567890"));
        assert!(is_valid_phone("123456789")); // 9 digits: minimum boundary
        assert!(is_valid_phone("123456789012345")); // 15 digits: maximum
        assert!(is_valid_phone("(020) 1234-5678")); // punctuation stripped
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("12345678")); // 8 digits
        assert!(!is_valid_phone("2345678901234567")); // 16 digits, no leading 1
    }

    #[test]
    fn test_field_kind_defaults_to_text() {
        assert_eq!(FieldKind::from_type_attr(Some("email")), FieldKind::Email);
        assert_eq!(FieldKind::from_type_attr(Some("tel")), FieldKind::Phone);
        assert_eq!(FieldKind::from_type_attr(Some("range")), FieldKind::Text);
        assert_eq!(FieldKind::from_type_attr(None), FieldKind::Text);
    }

    fn form_with_fields(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
        let body = doc.body();
        let form = doc.create_element("form");
        doc.set_id(form, "patient-form");
        doc.append_child(body, form);

        let name = doc.create_element("input");
        doc.set_attr(name, "required", "");
        doc.append_child(form, name);

        let email = doc.create_element("input");
        doc.set_attr(email, "required", "");
        doc.set_attr(email, "type", "email");
        doc.append_child(form, email);

        (form, name, email)
    }

    #[test]
    fn test_missing_form_fails_closed() {
        let mut doc = Document::new();
        let (_, name, _) = form_with_fields(&mut doc);
        assert!(!FormValidator::validate(&mut doc, "no-such-form"));
        // Fail-closed must not have touched any field
        assert!(!doc.has_class(name, INVALID_CLASS));
    }

    #[test]
    fn test_empty_and_malformed_fields_are_marked() {
        let mut doc = Document::new();
        let (_, name, email) = form_with_fields(&mut doc);
        doc.set_value(email, "not-an-email");

        assert!(!FormValidator::validate(&mut doc, "patient-form"));
        assert!(doc.has_class(name, INVALID_CLASS));
        assert!(doc.has_class(email, INVALID_CLASS));
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut doc = Document::new();
        let (_, name, email) = form_with_fields(&mut doc);
        doc.set_value(name, "   ");
        doc.set_value(email, "user@example.com");

        assert!(!FormValidator::validate(&mut doc, "patient-form"));
        assert!(doc.has_class(name, INVALID_CLASS));
        assert!(!doc.has_class(email, INVALID_CLASS));
    }

    #[test]
    fn test_corrected_form_passes_and_unmarks() {
        let mut doc = Document::new();
        let (_, name, email) = form_with_fields(&mut doc);
        doc.set_value(email, "broken");
        FormValidator::validate(&mut doc, "patient-form");

        doc.set_value(name, "Asha");
        doc.set_value(email, "asha@example.com");
        assert!(FormValidator::validate(&mut doc, "patient-form"));
        assert!(!doc.has_class(name, INVALID_CLASS));
        assert!(!doc.has_class(email, INVALID_CLASS));
    }

    #[test]
    fn test_optional_fields_are_ignored() {
        let mut doc = Document::new();
        let (form, name, email) = form_with_fields(&mut doc);
        let note = doc.create_element("textarea");
        doc.append_child(form, note); // no required attr

        doc.set_value(name, "Asha");
        doc.set_value(email, "asha@example.com");
        assert!(FormValidator::validate(&mut doc, "patient-form"));
        assert!(!doc.has_class(note, INVALID_CLASS));
    }

    #[test]
    fn test_clear_mark_is_optimistic() {
        let mut doc = Document::new();
        let (_, name, _) = form_with_fields(&mut doc);
        FormValidator::validate(&mut doc, "patient-form");
        assert!(doc.has_class(name, INVALID_CLASS));

        // Still empty, but an edit clears the mark anyway
        FormValidator::clear_mark(&mut doc, name);
        assert!(!doc.has_class(name, INVALID_CLASS));
    }
}
