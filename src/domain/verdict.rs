use crate::domain::AuthorizedZone;
use serde::Serialize;

/// Outcome of a single location validation. Produced fresh per check and
/// handed to the form-submission layer as-is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub message: String,
    pub matched_zone: Option<AuthorizedZone>,
}

impl ValidationVerdict {
    pub fn valid(message: impl Into<String>, matched_zone: Option<AuthorizedZone>) -> Self {
        ValidationVerdict {
            valid: true,
            message: message.into(),
            matched_zone,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationVerdict {
            valid: false,
            message: message.into(),
            matched_zone: None,
        }
    }
}
