//! XML document codec
//!
//! Request bodies are serialized with `quick-xml`'s serde support and always
//! carry the standard declaration line. Success bodies decode into the
//! caller's response shape; failure bodies decode into one of the two error
//! documents the service emits, or fall back to [`ClientError::MalformedErrorBody`].

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Declaration line prefixed to every encoded document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Content declaration of encoded bodies.
pub const CONTENT_TYPE: &str = "application/xml";

/// Serialize a request body, declaration first.
pub fn encode<B: Serialize>(body: &B) -> Result<String> {
    let document = quick_xml::se::to_string(body).map_err(|e| {
        log::error!("[route53] XML encode failed: {e}");
        ClientError::Encode {
            detail: e.to_string(),
        }
    })?;
    Ok(format!("{XML_DECLARATION}\n{document}"))
}

/// Deserialize a success body into `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    quick_xml::de::from_str(raw).map_err(|e| {
        log::error!("[route53] XML decode failed: {e}");
        log::error!("[route53] Raw response: {}", truncate_for_log(raw));
        ClientError::decode(e, raw)
    })
}

// ============ Error documents ============

/// `<ErrorResponse><Error>..</Error><RequestId>..</RequestId></ErrorResponse>`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    error: ErrorDetail,
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorDetail {
    #[serde(rename = "Type")]
    _error_type: Option<String>,
    code: String,
    #[serde(default)]
    message: String,
}

/// `<InvalidChangeBatch><Messages><Message>..</Message>..</Messages></InvalidChangeBatch>`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvalidChangeBatch {
    messages: BatchMessages,
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchMessages {
    #[serde(rename = "Message", default)]
    items: Vec<String>,
}

const INVALID_CHANGE_BATCH: &str = "InvalidChangeBatch";

/// Classify a failure response.
///
/// `header_request_id` (from `x-amzn-RequestId`) is used when the document
/// itself does not carry a request id.
pub fn decode_error(status: u16, raw: &str, header_request_id: Option<String>) -> ClientError {
    if let Ok(doc) = quick_xml::de::from_str::<ErrorResponse>(raw) {
        return ClientError::Api {
            status,
            code: doc.error.code,
            message: doc.error.message,
            request_id: doc.request_id.or(header_request_id),
        };
    }

    if raw.contains(INVALID_CHANGE_BATCH)
        && let Ok(doc) = quick_xml::de::from_str::<InvalidChangeBatch>(raw)
    {
        return ClientError::Api {
            status,
            code: INVALID_CHANGE_BATCH.to_string(),
            message: doc.messages.items.join("; "),
            request_id: doc.request_id.or(header_request_id),
        };
    }

    log::warn!(
        "[route53] HTTP {status} with unparseable error body: {}",
        truncate_for_log(raw)
    );
    ClientError::MalformedErrorBody {
        status,
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename = "GetThingRequest", rename_all = "PascalCase")]
    struct Thing {
        #[serde(rename = "@xmlns")]
        xmlns: String,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    }

    #[test]
    fn encode_prefixes_declaration() {
        let body = Thing {
            xmlns: "urn:test".to_string(),
            name: "www".to_string(),
            comment: None,
        };
        let xml = encode(&body).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<GetThingRequest xmlns="urn:test">"#));
        assert!(xml.contains("<Name>www</Name>"));
        assert!(!xml.contains("Comment"));
    }

    #[test]
    fn decode_success_body() {
        let raw = format!(
            r#"{XML_DECLARATION}
<GetThingRequest xmlns="urn:test"><Name>www</Name><Comment>hi</Comment></GetThingRequest>"#
        );
        let thing: Thing = decode(&raw).unwrap();
        assert_eq!(thing.name, "www");
        assert_eq!(thing.comment.as_deref(), Some("hi"));
    }

    #[test]
    fn decode_mismatch_keeps_raw_payload() {
        let raw = "<Other><Unrelated/></Other>";
        match decode::<Thing>(raw) {
            Err(ClientError::Decode { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn error_response_document() {
        let raw = r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
  <Error>
    <Type>Sender</Type>
    <Code>NoSuchHostedZone</Code>
    <Message>No hosted zone found with ID: Z123</Message>
  </Error>
  <RequestId>5a3e3e10-1111-2222-3333-444455556666</RequestId>
</ErrorResponse>"#;
        match decode_error(404, raw, None) {
            ClientError::Api {
                status,
                code,
                message,
                request_id,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "NoSuchHostedZone");
                assert_eq!(message, "No hosted zone found with ID: Z123");
                assert_eq!(
                    request_id.as_deref(),
                    Some("5a3e3e10-1111-2222-3333-444455556666")
                );
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn header_request_id_used_as_fallback() {
        let raw = "<ErrorResponse><Error><Code>Throttling</Code><Message>Rate exceeded</Message></Error></ErrorResponse>";
        let err = decode_error(400, raw, Some("hdr-id".to_string()));
        assert!(matches!(
            err,
            ClientError::Api { ref request_id, .. } if request_id.as_deref() == Some("hdr-id")
        ));
    }

    #[test]
    fn invalid_change_batch_document() {
        let raw = r#"<InvalidChangeBatch xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
  <Messages>
    <Message>Tried to create resource record set www.example.com. type A, but it already exists</Message>
    <Message>Second problem</Message>
  </Messages>
  <RequestId>req-9</RequestId>
</InvalidChangeBatch>"#;
        match decode_error(400, raw, None) {
            ClientError::Api { code, message, .. } => {
                assert_eq!(code, "InvalidChangeBatch");
                assert!(message.starts_with("Tried to create"));
                assert!(message.ends_with("; Second problem"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn malformed_error_body_keeps_raw() {
        let raw = "<html><body>Bad Gateway</body></html>";
        match decode_error(502, raw, None) {
            ClientError::MalformedErrorBody { status, raw: kept } => {
                assert_eq!(status, 502);
                assert_eq!(kept, raw);
            }
            other => panic!("expected MalformedErrorBody, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_error_body_is_malformed() {
        assert!(matches!(
            decode_error(503, "Service Unavailable", None),
            ClientError::MalformedErrorBody { status: 503, .. }
        ));
    }
}
