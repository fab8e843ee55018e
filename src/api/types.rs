use serde::Serialize;

const SUCCESS: &str = "success";
const ERROR: &str = "error";

/// `{"message": "success", "body": ...}` or a bare `{"message": "error"}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(body: T) -> Self {
        Self {
            message: SUCCESS,
            body: Some(body),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            message: SUCCESS,
            body: None,
        }
    }

    pub fn error() -> Self {
        Self {
            message: ERROR,
            body: None,
        }
    }
}
