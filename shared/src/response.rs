//! Unified API response envelope
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! {
//!   "code": "E0000",
//!   "message": "Success",
//!   "data": { ... }
//! }
//! ```
//!
//! `E0000` marks success; error codes are assigned by the server's error
//! type when it converts into a response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (`E0000` for success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: "E0000".to_string(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    /// Create a success response with a custom message
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: "E0000".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Whether this response carries a success code
    pub fn is_success(&self) -> bool {
        self.code == "E0000"
    }
}
