//! JSON envelope shared by every REST endpoint:
//! `{ "success": bool, "data"?: T, "error"?: string }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

use super::ApiResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Converts a 2xx envelope into its payload; `success: false` is a rejection.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| "request was not successful".into()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Decode("successful response carried no data".into()))
    }
}

impl ApiEnvelope<()> {
    /// Successful acknowledgement without a payload, as returned by deletes.
    pub fn ack() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Paginated list shape returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// List endpoints answer with either a bare array or a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Page(page) => page.items,
        }
    }
}

/// Decodes a raw response, treating non-2xx status and `success: false` as failures.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&response.body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| response.body.trim().to_string());
        return Err(ApiError::Status {
            status: response.status,
            message,
        });
    }
    let envelope: ApiEnvelope<T> = serde_json::from_str(&response.body)
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    envelope.into_result()
}

/// Like [`decode`] but for endpoints whose payload is irrelevant (deletes).
pub fn decode_ack(response: &ApiResponse) -> Result<(), ApiError> {
    if !response.is_success() {
        return decode::<serde_json::Value>(response).map(|_| ());
    }
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&response.body)
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(
            envelope.error.unwrap_or_else(|| "request was not successful".into()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn decodes_bare_array_and_page_shapes() {
        let bare: ListPayload<u32> =
            decode(&response(200, r#"{"success":true,"data":[1,2,3]}"#)).unwrap();
        assert_eq!(bare.into_items(), vec![1, 2, 3]);

        let paged: ListPayload<u32> = decode(&response(
            200,
            r#"{"success":true,"data":{"items":[4],"total":9,"page":2,"limit":1}}"#,
        ))
        .unwrap();
        assert_eq!(paged.into_items(), vec![4]);
    }

    #[test]
    fn success_false_is_rejection_even_with_2xx() {
        let err = decode::<u32>(&response(200, r#"{"success":false,"error":"Email taken"}"#))
            .unwrap_err();
        assert_eq!(err, ApiError::Rejected("Email taken".into()));
    }

    #[test]
    fn non_2xx_surfaces_envelope_error_message() {
        let err = decode::<u32>(&response(404, r#"{"success":false,"error":"Client not found"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Client not found".into()
            }
        );

        let err = decode::<u32>(&response(502, "Bad Gateway")).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = decode::<u32>(&response(200, "<html>")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn ack_ignores_payload() {
        assert!(decode_ack(&response(200, r#"{"success":true}"#)).is_ok());
        assert!(decode_ack(&response(200, r#"{"success":false}"#)).is_err());
    }
}
