//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.
//!
//! This module turns the raw body of a streaming chat completion into a
//! stream of text increments.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

use crate::error::CompletionError;

/// One `data:` payload of a streaming chat completion.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// What a single SSE line contributed to the stream.
#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Text(String),
    Error(String),
    Done,
    Skip,
}

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// The stream ends at `data: [DONE]` or when the body ends. A transport
/// failure or an error event is yielded once and ends the stream.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, CompletionError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(CompletionError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            // A multibyte character may span chunks; only complete lines are decoded
            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = match String::from_utf8(raw) {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(CompletionError::Malformed(e.to_string()));
                        return;
                    }
                };

                match parse_sse_line(line.trim()) {
                    SseEvent::Text(content) => {
                        yield Ok(content);
                    }
                    SseEvent::Error(message) => {
                        yield Err(CompletionError::Api(message));
                        return;
                    }
                    SseEvent::Done => return,
                    SseEvent::Skip => {}
                }
            }
        }

        // Some servers omit the trailing newline on the last event
        match String::from_utf8(buffer) {
            Ok(rest) => {
                if let SseEvent::Text(content) = parse_sse_line(rest.trim()) {
                    yield Ok(content);
                }
            }
            Err(e) => {
                yield Err(CompletionError::Malformed(e.to_string()));
            }
        }
    }
}

/// Parses a single trimmed SSE line.
///
/// Comments, blank lines, non-data fields and payloads that fail to parse
/// are skipped.
fn parse_sse_line(line: &str) -> SseEvent {
    let Some(json_str) = line.strip_prefix("data:").map(str::trim_start) else {
        return SseEvent::Skip;
    };

    if json_str == "[DONE]" {
        return SseEvent::Done;
    }

    let Ok(response) = serde_json::from_str::<StreamResponse>(json_str) else {
        return SseEvent::Skip;
    };

    if let Some(error) = response.error {
        return SseEvent::Error(error.message);
    }

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .collect();

    if content.is_empty() {
        SseEvent::Skip
    } else {
        SseEvent::Text(content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};

    fn text(s: &str) -> SseEvent {
        SseEvent::Text(s.to_string())
    }

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_line(line), text("Hello"));
    }

    #[test]
    fn test_parse_sse_line_without_space() {
        let line = r#"data:{"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_line(line), text("Hello"));
    }

    #[test]
    fn test_parse_sse_line_with_empty_content() {
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_sse_line(line), SseEvent::Skip);
    }

    #[test]
    fn test_parse_sse_line_role_only_delta() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line), SseEvent::Skip);
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"Hello"}},{"delta":{"content":" World"}}]}"#;
        assert_eq!(parse_sse_line(line), text("Hello World"));
    }

    #[test]
    fn test_parse_sse_line_error_event() {
        let line = r#"data: {"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        assert_eq!(
            parse_sse_line(line),
            SseEvent::Error("You exceeded your current quota".to_string())
        );
    }

    #[test]
    fn test_parse_sse_line_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]"), SseEvent::Done);
    }

    #[test]
    fn test_parse_sse_line_skips_noise() {
        assert_eq!(parse_sse_line(""), SseEvent::Skip);
        assert_eq!(parse_sse_line(": keep-alive"), SseEvent::Skip);
        assert_eq!(parse_sse_line("event: message"), SseEvent::Skip);
        assert_eq!(parse_sse_line("data: not json"), SseEvent::Skip);
    }

    #[test]
    fn test_parse_sse_line_unicode_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"こんにちは"}}]}"#;
        assert_eq!(parse_sse_line(line), text("こんにちは"));
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = reqwest::Result<Bytes>> + Send {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_stream_joins_split_lines() {
        let body = chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Bon\"}}]}\n\ndata: {\"choi",
            "ces\":[{\"delta\":{\"content\":\"jour\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);

        let items: Vec<String> = sse_to_text_stream(body)
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(items, vec!["Bon", "jour"]);
    }

    #[tokio::test]
    async fn test_stream_keeps_characters_split_across_chunks() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"こんにちは\"}}]}\n\n".as_bytes();
        let split = body.iter().position(|&b| b == 0xE3).unwrap() + 1;
        let parts: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(&body[..split])),
            Ok(Bytes::copy_from_slice(&body[split..])),
        ];

        let items: Vec<String> = sse_to_text_stream(stream::iter(parts))
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(items, vec!["こんにちは"]);
    }

    #[tokio::test]
    async fn test_stream_rejects_invalid_utf8_line() {
        let parts: Vec<reqwest::Result<Bytes>> = vec![Ok(Bytes::from_static(b"data: \xff\xfe\n"))];

        let items: Vec<_> = sse_to_text_stream(stream::iter(parts)).collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(CompletionError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_stream_stops_at_done() {
        let body = chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hallo\"}}]}\n",
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
        ]);

        let items: Vec<String> = sse_to_text_stream(body)
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(items, vec!["Hallo"]);
    }

    #[tokio::test]
    async fn test_stream_error_event_ends_stream() {
        let body = chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hal\"}}]}\n",
            "data: {\"error\":{\"message\":\"server overloaded\"}}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
        ]);

        let items: Vec<_> = sse_to_text_stream(body).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "Hal");
        assert!(matches!(&items[1], Err(CompletionError::Api(m)) if m == "server overloaded"));
    }

    #[tokio::test]
    async fn test_stream_flushes_unterminated_last_line() {
        let body = chunks(&["data: {\"choices\":[{\"delta\":{\"content\":\"Ciao\"}}]}"]);

        let items: Vec<String> = sse_to_text_stream(body)
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(items, vec!["Ciao"]);
    }
}
