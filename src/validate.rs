use std::sync::LazyLock;

use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number with at least 10 digits";
pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    Textarea,
}

impl FieldKind {
    /// Classifies a form control from its tag and `type` attribute. Unknown
    /// input types validate like plain text.
    pub fn from_control(tag: &str, type_attr: Option<&str>) -> Self {
        match tag {
            "select" => Self::Select,
            "textarea" => Self::Textarea,
            _ => match type_attr {
                Some("email") => Self::Email,
                Some("tel") => Self::Tel,
                _ => Self::Text,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub kind: FieldKind,
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(kind: FieldKind, name: &'a str, value: &'a str) -> Self {
        Self { kind, name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

pub fn validate(field: &Field<'_>) -> FieldValidationResult {
    let value = field.value.trim();
    match field.kind {
        FieldKind::Text | FieldKind::Textarea if value.is_empty() => {
            FieldValidationResult::fail(REQUIRED_MESSAGE)
        }
        FieldKind::Select if value.is_empty() => {
            FieldValidationResult::fail(select_message(field.name))
        }
        FieldKind::Email if !is_valid_email(value) => FieldValidationResult::fail(EMAIL_MESSAGE),
        FieldKind::Tel if digit_count(value) < MIN_PHONE_DIGITS => {
            FieldValidationResult::fail(PHONE_MESSAGE)
        }
        _ => FieldValidationResult::ok(),
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

fn select_message(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "Please select an option".to_string()
    } else {
        format!("Please select a {}", name.replace(['-', '_'], " "))
    }
}
