use crate::dom::{Document, ElementId, ElementSpec, Selector};
use crate::validate::{Field, FieldKind, FieldValidationResult, validate};

pub const FIELD_ERROR_CLASS: &str = "field-error";
pub const INVALID_CLASS: &str = "input-error";

/// Replaces any inline error next to `field` with `message`.
pub fn show_field_error(doc: &mut dyn Document, field: ElementId, message: &str) {
    clear_field_error(doc, field);
    let Some(parent) = doc.parent(field) else {
        return;
    };
    doc.append_child(
        parent,
        ElementSpec::new("div")
            .class(FIELD_ERROR_CLASS)
            .attr("role", "alert")
            .text(message),
    );
    doc.add_class(field, INVALID_CLASS);
    doc.set_attr(field, "aria-invalid", "true");
}

pub fn clear_field_error(doc: &mut dyn Document, field: ElementId) {
    if let Some(parent) = doc.parent(field) {
        for error in doc.query_within(parent, &Selector::class(FIELD_ERROR_CLASS)) {
            doc.remove(error);
        }
    }
    doc.remove_class(field, INVALID_CLASS);
    doc.remove_attr(field, "aria-invalid");
}

pub fn field_kind(doc: &dyn Document, field: ElementId) -> FieldKind {
    let tag = doc.tag(field).unwrap_or_default().to_ascii_lowercase();
    FieldKind::from_control(&tag, doc.attr(field, "type").as_deref())
}

/// Whether `field` takes part in validation at all: required controls always,
/// email/phone controls once they hold something.
pub fn is_checked(doc: &dyn Document, field: ElementId) -> bool {
    if doc.attr(field, "required").is_some() {
        return true;
    }
    let has_value = doc
        .value(field)
        .is_some_and(|value| !value.trim().is_empty());
    has_value && matches!(field_kind(doc, field), FieldKind::Email | FieldKind::Tel)
}

/// Validates one control and updates its inline error. Controls that are not
/// checked always pass and lose any stale error.
pub fn check_field(doc: &mut dyn Document, field: ElementId) -> FieldValidationResult {
    if !is_checked(doc, field) {
        clear_field_error(doc, field);
        return FieldValidationResult::ok();
    }

    let kind = field_kind(doc, field);
    let name = doc.attr(field, "name").unwrap_or_default();
    let value = doc.value(field).unwrap_or_default();
    let result = validate(&Field::new(kind, &name, &value));
    match &result.message {
        Some(message) => show_field_error(doc, field, message),
        None => clear_field_error(doc, field),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{FIELD_ERROR_CLASS, check_field, clear_field_error, show_field_error};
    use crate::dom::{Document, ElementId, ElementSpec, MemoryDocument, Selector};
    use crate::validate::{EMAIL_MESSAGE, REQUIRED_MESSAGE};

    fn field(doc: &mut MemoryDocument, spec: ElementSpec) -> ElementId {
        let body = doc.body();
        let group = doc
            .append_child(body, ElementSpec::new("div").class("form-group"))
            .expect("body exists");
        doc.append_child(group, spec).expect("group exists")
    }

    fn errors(doc: &MemoryDocument) -> Vec<String> {
        doc.query_all(&Selector::class(FIELD_ERROR_CLASS))
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect()
    }

    #[test]
    fn showing_twice_leaves_a_single_message() {
        let mut doc = MemoryDocument::new("/contact.html");
        let name = field(&mut doc, ElementSpec::new("input").attr("name", "name"));

        show_field_error(&mut doc, name, "first");
        show_field_error(&mut doc, name, "second");
        assert_eq!(errors(&doc), vec!["second".to_string()]);
        assert_eq!(doc.attr(name, "aria-invalid").as_deref(), Some("true"));

        clear_field_error(&mut doc, name);
        clear_field_error(&mut doc, name);
        assert!(errors(&doc).is_empty());
        assert_eq!(doc.attr(name, "aria-invalid"), None);
    }

    #[test]
    fn required_fields_fail_when_blank() {
        let mut doc = MemoryDocument::new("/contact.html");
        let name = field(
            &mut doc,
            ElementSpec::new("input")
                .attr("name", "name")
                .attr("required", ""),
        );
        doc.set_value(name, "   ");

        let result = check_field(&mut doc, name);
        assert!(!result.valid);
        assert_eq!(errors(&doc), vec![REQUIRED_MESSAGE.to_string()]);

        doc.set_value(name, "Thandi");
        assert!(check_field(&mut doc, name).valid);
        assert!(errors(&doc).is_empty());
    }

    #[test]
    fn optional_email_is_only_checked_when_filled() {
        let mut doc = MemoryDocument::new("/enquiry.html");
        let email = field(
            &mut doc,
            ElementSpec::new("input")
                .attr("name", "email")
                .attr("type", "email"),
        );

        assert!(check_field(&mut doc, email).valid);
        doc.set_value(email, "not-an-address");
        assert!(!check_field(&mut doc, email).valid);
        assert_eq!(errors(&doc), vec![EMAIL_MESSAGE.to_string()]);
    }

    #[test]
    fn select_message_names_the_field() {
        let mut doc = MemoryDocument::new("/contact.html");
        let subject = field(
            &mut doc,
            ElementSpec::new("select")
                .attr("name", "subject")
                .attr("required", ""),
        );
        let result = check_field(&mut doc, subject);
        assert_eq!(result.message.as_deref(), Some("Please select a subject"));
    }
}
