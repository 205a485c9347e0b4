use serde::Serialize;
use serde_json::Value;

/// Pagination figures attached to paginated listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
}

/// The response envelope every endpoint speaks.
///
/// `status` is `"success"` or `"error"`; the optional fields appear
/// only when set, clients never see `"data": null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(message: &str) -> Self {
        ApiResponse {
            status: "success",
            message: message.to_string(),
            data: None,
            pagination: None,
            token: None,
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            status: "error",
            message: message.to_string(),
            data: None,
            pagination: None,
            token: None,
            error: None,
        }
    }

    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_error_detail(mut self, detail: &str) -> Self {
        self.error = Some(detail.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_unset_fields() {
        let body = serde_json::to_value(ApiResponse::success("User deleted successfully"))
            .expect("Failed to serialize");

        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "User deleted successfully");
        assert!(body.get("data").is_none());
        assert!(body.get("pagination").is_none());
        assert!(body.get("token").is_none());
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_pagination_uses_camel_case() {
        let response = ApiResponse::success("ok").with_pagination(Pagination {
            current_page: 2,
            total_pages: 5,
            total_users: 42,
        });
        let body = serde_json::to_value(response).expect("Failed to serialize");

        assert_eq!(body["pagination"]["currentPage"], 2);
        assert_eq!(body["pagination"]["totalPages"], 5);
        assert_eq!(body["pagination"]["totalUsers"], 42);
    }

    #[test]
    fn test_data_round_trips_serializable_values() {
        let response = ApiResponse::success("ok").with_data(&vec![1, 2, 3]);
        let body = serde_json::to_value(response).expect("Failed to serialize");
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
    }
}
