use serde::Deserialize;

/// Query parameters TikTok appends when redirecting back to the callback.
///
/// All fields are optional so validation can report exactly which one is
/// missing instead of a generic deserialization failure. `error` and
/// `error_description` appear when the user denied consent.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
