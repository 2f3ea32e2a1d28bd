pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("store error for key {key}")]
    Store {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {what}")]
    Serialize {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("submission of {form} failed: {message}")]
    Submission { form: String, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn store(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Store {
            key: key.into(),
            source,
        }
    }

    pub fn serialize(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialize {
            what: what.into(),
            source,
        }
    }

    pub fn submission(form: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Submission {
            form: form.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn submission_error_names_form_and_reason() {
        let err = AppError::submission("contact-form", "endpoint unreachable");
        assert!(matches!(err, AppError::Submission { .. }));
        assert_eq!(
            err.to_string(),
            "submission of contact-form failed: endpoint unreachable"
        );
    }

    #[test]
    fn store_error_keeps_json_source() {
        let source = serde_json::from_str::<Vec<u8>>("{").expect_err("should not parse");
        let err = AppError::store("userInteractions", source);
        assert_eq!(err.to_string(), "store error for key userInteractions");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn serialize_error_is_not_a_store_error() {
        let source = serde_json::from_str::<Vec<u8>>("{").expect_err("should not parse");
        let err = AppError::serialize("structured data", source);
        assert!(matches!(err, AppError::Serialize { .. }));
        assert_eq!(err.to_string(), "failed to serialize structured data");
    }
}
