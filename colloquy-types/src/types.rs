//! Wire types for the chat endpoints.
//!
//! These mirror the JSON bodies exchanged with the remote endpoint
//! (`POST /api/chat` and `POST /api/chat/stream`). Field names follow the
//! server's camelCase where they differ from Rust convention.

use serde::{Deserialize, Serialize};

/// Outbound request body for the chat endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation identifier; lets the server correlate turns.
    #[serde(rename = "chatId", default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    /// The user's message text.
    pub message: String,
    /// Model identifier. The server rejects empty values, so the client
    /// substitutes its configured default when this is empty.
    pub model: String,
}

/// Reply body from the non-streaming `POST /api/chat` endpoint.
///
/// The server reports failures in-band with a 200 status, so both fields
/// are optional and at most one is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's full reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// A server-reported failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A tool call forwarded by the server as an out-of-band stream payload.
///
/// Kept opaque to the text-accumulation logic; sessions record these on a
/// side channel without touching turn content. All fields are optional
/// because the server forwards whatever the upstream model produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Tool call identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tool call kind (currently always `function`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The function being invoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ToolFunction>,
}

/// Function name and arguments of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFunction {
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments, passed through verbatim.
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_omits_absent_chat_id() {
        let request = ChatRequest {
            chat_id: None,
            message: "hi".into(),
            model: "gpt-4-turbo-preview".into(),
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert!(json.get("chatId").is_none());
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn chat_request_serializes_chat_id_as_camel_case() {
        let request = ChatRequest {
            chat_id: Some("abc-123".into()),
            message: "hi".into(),
            model: "gpt-4-turbo-preview".into(),
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["chatId"], "abc-123");
    }

    #[test]
    fn chat_response_parses_error_only_body() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"error":"Message and model are required"}"#)
                .expect("parses");
        assert_eq!(response.message, None);
        assert_eq!(
            response.error.as_deref(),
            Some("Message and model are required")
        );
    }

    #[test]
    fn tool_invocation_parses_wire_shape() {
        let tool: ToolInvocation = serde_json::from_str(
            r#"{"id":"call_1","type":"function","function":{"name":"search","arguments":"{\"q\":\"rust\"}"}}"#,
        )
        .expect("parses");
        assert_eq!(tool.id.as_deref(), Some("call_1"));
        assert_eq!(tool.kind.as_deref(), Some("function"));
        assert_eq!(tool.function.expect("function").name, "search");
    }

    #[test]
    fn tool_invocation_tolerates_missing_fields() {
        let tool: ToolInvocation = serde_json::from_str("{}").expect("parses");
        assert_eq!(tool.id, None);
        assert_eq!(tool.kind, None);
        assert_eq!(tool.function, None);
    }
}
