use serde::{Deserialize, Serialize};

/// Status object returned by every triggered invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl InvocationResponse {
    pub fn success(message: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: Some(message.into()),
                message_id: Some(message_id.into()),
                ..Default::default()
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::error(400, error)
    }

    pub fn server_error(error: impl Into<String>) -> Self {
        Self::error(500, error)
    }

    /// 500 for errors outside the dispatch taxonomy
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::error(500, format!("Internal server error: {}", detail))
    }

    fn error(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                error: Some(error.into()),
                ..Default::default()
            },
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
