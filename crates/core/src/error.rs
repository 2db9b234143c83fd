//! Object model error types.

use thiserror::Error;

/// Result type used across the object model.
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Errors raised by the structured object base.
///
/// The base only introduces two failure kinds of its own: mutation of a frozen object
/// and use of the owner handle when none is attached. Everything else wraps failures
/// that come from an entity's own (serde-derived) construction, which are propagated
/// unchanged.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Attempt to set or delete a public attribute on a frozen object.
    #[error("attribute `{attribute}` of class `{class}` can't be set or deleted: the object is immutable")]
    Frozen {
        attribute: String,
        class: &'static str,
    },

    /// Subscripting lookup for a name the type does not declare.
    #[error("`{class}` has no field named `{field}`")]
    NoSuchField { field: String, class: &'static str },

    /// The owner handle was never attached.
    #[error(
        "this `{class}` has no bot associated with it; shortcuts cannot be used. \
         Either attach one with `set_bot` or build the object through `from_mapping` with a bot"
    )]
    MissingBot { class: &'static str },

    /// The owner handle was attached, but the client has since been dropped.
    #[error("the bot associated with this `{class}` has been dropped")]
    BotDropped { class: &'static str },

    /// Input that should have been a JSON object was something else.
    #[error("expected a JSON object for `{class}`, found {found}")]
    NotAnObject { class: &'static str, found: &'static str },

    /// The entity's own construction rejected the data (missing field, wrong type).
    #[error("failed to construct `{class}`: {source}")]
    Construct {
        class: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Persisted state was produced by a different type.
    #[error("persisted state belongs to `{found}`, not `{expected}`")]
    StateMismatch { expected: &'static str, found: String },

    /// Invalid wire timestamp.
    #[error("timestamp {0} is out of range")]
    Timestamp(i64),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ObjectError {
    pub fn frozen(attribute: impl Into<String>, class: &'static str) -> Self {
        Self::Frozen {
            attribute: attribute.into(),
            class,
        }
    }

    pub fn no_such_field(field: impl Into<String>, class: &'static str) -> Self {
        Self::NoSuchField {
            field: field.into(),
            class,
        }
    }

    pub fn construct(class: &'static str, source: serde_json::Error) -> Self {
        Self::Construct { class, source }
    }

    pub fn not_an_object(class: &'static str, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            class,
            found: json_kind(value),
        }
    }
}

/// Errors surfaced through the owner-handle seam.
#[derive(Debug, Error)]
pub enum BotError {
    /// The client rejected or failed the call.
    #[error("`{method}` failed: {message}")]
    Request { method: String, message: String },

    /// The call succeeded but its result could not be turned into an object.
    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BotError {
    pub fn request(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            method: method.into(),
            message: message.into(),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
