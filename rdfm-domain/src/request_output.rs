use serde::{Deserialize, Serialize};

/// Outcome of a mutating request, carrying a human-readable message on failure.
///
/// Serializes as `{"success":true}` or `{"success":false,"message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequestOutput", into = "RawRequestOutput")]
pub enum RequestOutput {
    Success,
    Failure { message: String },
}

impl RequestOutput {
    pub fn failure(message: impl Into<String>) -> Self {
        RequestOutput::Failure { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutput::Success)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RequestOutput::Success => None,
            RequestOutput::Failure { message } => Some(message),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawRequestOutput {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<RequestOutput> for RawRequestOutput {
    fn from(output: RequestOutput) -> Self {
        match output {
            RequestOutput::Success => RawRequestOutput { success: true, message: None },
            RequestOutput::Failure { message } => RawRequestOutput {
                success: false,
                message: Some(message),
            },
        }
    }
}

impl TryFrom<RawRequestOutput> for RequestOutput {
    type Error = String;

    fn try_from(raw: RawRequestOutput) -> Result<Self, Self::Error> {
        match raw {
            RawRequestOutput { success: true, .. } => Ok(RequestOutput::Success),
            RawRequestOutput {
                success: false,
                message: Some(message),
            } => Ok(RequestOutput::Failure { message }),
            RawRequestOutput { success: false, message: None } => Err("a failed request output requires a message".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_without_message() {
        let json = serde_json::to_string(&RequestOutput::Success).unwrap();

        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_failure_serializes_with_message() {
        let json = serde_json::to_string(&RequestOutput::failure("nope")).unwrap();

        assert_eq!(json, r#"{"success":false,"message":"nope"}"#);
    }

    #[test]
    fn test_failure_without_message_is_rejected() {
        let result = serde_json::from_str::<RequestOutput>(r#"{"success":false}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_accessors() {
        let failure = RequestOutput::failure("denied");

        assert!(!failure.is_success());
        assert_eq!(failure.message(), Some("denied"));
        assert!(RequestOutput::Success.is_success());
        assert_eq!(RequestOutput::Success.message(), None);
    }
}
