//! Standard errors used by all functions in the crate.

use crate::result::{FieldValue, ResultView};
use std::{fmt, ops::Deref};

/// Error collecting all possible failures of the gateway client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport error, passed through from reqwest.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// The gateway rejected the request.
    #[error("{0}")]
    GatewayError(#[from] GatewayError),
    /// The gateway rejected one or more fields of the request.
    #[error("{0}")]
    ValidationError(#[from] GatewayValidationError),
    /// A request parameter could not be converted into what the gateway expects.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The client configuration is not valid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl Error {
    /// The gateway response that caused this error, if the gateway answered at all.
    pub fn result(&self) -> Option<&ResultView> {
        match self {
            Error::GatewayError(e) => Some(e.result()),
            Error::ValidationError(e) => Some(e.result()),
            _ => None,
        }
    }

    /// Human readable messages returned by the gateway. Empty for non-gateway errors.
    pub fn error_messages(&self) -> &[String] {
        match self {
            Error::GatewayError(e) => e.error_messages(),
            Error::ValidationError(e) => e.error_messages(),
            _ => &[],
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

/// Turns an unsuccessful gateway response into the matching error.
///
/// A response counts as a validation failure when `validationHasFailed` is set, or, when that
/// flag is missing, when it carries a non-empty `validationFailures` list.
pub(crate) fn classify(result: ResultView) -> Error {
    let validation_has_failed = match result.get_bool("validation_has_failed") {
        Ok(flag) => flag,
        Err(_) if result.has_field("validation_has_failed") => false,
        Err(_) => result
            .get_list("validation_failures")
            .map_or(false, |failures| !failures.is_empty()),
    };

    if validation_has_failed {
        GatewayValidationError::new(result).into()
    } else {
        GatewayError::new(result).into()
    }
}

/// Error reported by the gateway in a response with `isSuccess` set to `false`.
#[derive(thiserror::Error, Debug, Clone)]
pub struct GatewayError {
    result: ResultView,
    error_messages: Vec<String>,
}

impl GatewayError {
    /// Builds an error from the `errorMessages` list of `result`.
    ///
    /// Every entry yields exactly one message. `null` entries become empty strings.
    pub fn new(result: ResultView) -> Self {
        let error_messages = result
            .get_list("error_messages")
            .unwrap_or_default()
            .iter()
            .map(|entry| message_text(entry).unwrap_or_default())
            .collect();

        Self {
            result,
            error_messages,
        }
    }

    /// Full view of the failed response.
    pub fn result(&self) -> &ResultView {
        &self.result
    }

    /// All the messages returned by the gateway.
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// First message returned by the gateway.
    pub fn summary(&self) -> &str {
        self.error_messages
            .first()
            .map_or("Unknown gateway error", String::as_str)
    }

    pub fn into_result(self) -> ResultView {
        self.result
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

/// Validation error reported by the gateway.
///
/// Dereferences to a [`GatewayError`] whose messages are the messages of the individual
/// [`ValidationFailure`]s.
#[derive(thiserror::Error, Debug, Clone)]
pub struct GatewayValidationError {
    error: GatewayError,
    validation_failures: Vec<ValidationFailure>,
}

impl GatewayValidationError {
    /// Builds an error from the `validationFailures` list of `result`.
    ///
    /// Every entry yields one failure, and one message.
    pub fn new(result: ResultView) -> Self {
        let validation_failures: Vec<ValidationFailure> = result
            .get_list("validation_failures")
            .unwrap_or_default()
            .iter()
            .map(ValidationFailure::from_field_value)
            .collect();

        let error_messages = validation_failures
            .iter()
            .map(|failure| failure.message.clone())
            .collect();

        Self {
            error: GatewayError {
                result,
                error_messages,
            },
            validation_failures,
        }
    }

    /// Per-field failures returned by the gateway.
    pub fn validation_failures(&self) -> &[ValidationFailure] {
        &self.validation_failures
    }

    pub fn into_gateway_error(self) -> GatewayError {
        self.error
    }
}

impl Deref for GatewayValidationError {
    type Target = GatewayError;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

impl fmt::Display for GatewayValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.error.summary())?;

        for failure in self.validation_failures.iter().skip(1) {
            write!(f, "\n- {}", failure)?;
        }

        Ok(())
    }
}

/// A single field rejected by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Human readable explanation.
    pub message: String,
    /// Name of the rejected field, when the gateway reports it.
    pub field: Option<String>,
}

impl ValidationFailure {
    fn from_field_value(value: &FieldValue) -> Self {
        match value {
            FieldValue::Object(view) => Self {
                message: view
                    .get_field("message")
                    .ok()
                    .and_then(|message| message_text(&message))
                    .unwrap_or_default(),
                field: view
                    .get_string("field")
                    .or_else(|_| view.get_string("key"))
                    .ok(),
            },
            other => Self {
                message: message_text(other).unwrap_or_default(),
                field: None,
            },
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(ref field) => write!(f, "{}: {}", field, self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn message_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Null => None,
        FieldValue::String(s) => Some(s.clone()),
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::Temporal(t) => Some(t.to_iso8601()),
        FieldValue::Object(view) => Some(serde_json::Value::Object(view.raw().clone()).to_string()),
        FieldValue::List(items) => Some(
            items
                .iter()
                .filter_map(message_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}
