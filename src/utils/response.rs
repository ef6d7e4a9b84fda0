use serde::Serialize;

/// Unified API Response struct
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Error response
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(ApiError {
                code: "ERROR".to_string(),
                message: message.to_string(),
            }),
        }
    }
}
