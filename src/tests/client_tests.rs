#[cfg(test)]
mod tests {
    use futures::stream;

    use crate::errors::ClientError;
    use crate::implementations::openai_client::{
        collect_stream,
        extract_message_content,
        parse_sse_line,
        SseLine,
    };
    use crate::models::stage::Stage;
    use crate::tests::support::{ setup, RecordingProgress };

    fn delta(text: &str) -> String {
        format!("data: {}\n\n", serde_json::json!({"choices": [{"index": 0, "delta": {"content": text}}]}))
    }

    async fn collect(chunks: Vec<Vec<u8>>, progress: &RecordingProgress) -> Result<String, ClientError> {
        let body = stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
        collect_stream(body, Stage::Flow, progress).await
    }

    #[test]
    fn content_delta_is_extracted() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":"{\"apis\""}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), SseLine::Chunk("{\"apis\"".to_string()));
    }

    #[test]
    fn role_only_delta_is_skipped() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), SseLine::Skip);
    }

    #[test]
    fn done_marker_ends_the_stream() {
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), SseLine::Done);
        assert_eq!(parse_sse_line("data: [DONE]\r").unwrap(), SseLine::Done);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert_eq!(parse_sse_line("").unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line("event: message").unwrap(), SseLine::Skip);
    }

    #[test]
    fn garbage_event_is_reported() {
        assert!(matches!(parse_sse_line("data: {not json"), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn message_content_is_read_from_first_choice() {
        let body =
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Olá"},"finish_reason":"stop"}]}"#;
        assert_eq!(extract_message_content(body).unwrap(), "Olá");
    }

    #[test]
    fn empty_choices_are_an_error() {
        assert!(matches!(extract_message_content(r#"{"choices":[]}"#), Err(ClientError::EmptyResponse)));
        assert!(
            matches!(extract_message_content(r#"{"error":"x"}"#), Err(ClientError::MalformedResponse(_)))
        );
        assert!(matches!(extract_message_content("<html>"), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn error_event_is_reported() {
        let line = r#"data: {"error":{"message":"The server had an error","type":"server_error"}}"#;
        match parse_sse_line(line) {
            Err(ClientError::MalformedResponse(message)) => assert!(message.contains("The server had an error")),
            other => panic!("expected an error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stream_lines_split_across_chunks_are_joined() {
        setup();
        let body = format!("{}{}data: [DONE]\n\n", delta("{\"fluxos\""), delta(": []}"));
        let bytes = body.into_bytes();
        let chunks: Vec<Vec<u8>> = bytes.chunks(7).map(|c| c.to_vec()).collect();

        let progress = RecordingProgress::default();
        let content = collect(chunks, &progress).await.unwrap();

        assert_eq!(content, "{\"fluxos\": []}");
        assert_eq!(progress.chunks(), vec!["{\"fluxos\"".to_string(), ": []}".to_string()]);
    }

    #[tokio::test]
    async fn multibyte_character_cut_between_chunks_is_decoded_whole() {
        setup();
        let body = delta("Descrição").into_bytes();
        let cut = body
            .iter()
            .position(|b| *b >= 0x80)
            .unwrap() + 1;
        let chunks = vec![body[..cut].to_vec(), body[cut..].to_vec()];

        let progress = RecordingProgress::default();
        let content = collect(chunks, &progress).await.unwrap();

        assert_eq!(content, "Descrição");
    }

    #[tokio::test]
    async fn nothing_after_done_is_read() {
        setup();
        let body = format!("{}data: [DONE]\n{}", delta("ok"), delta("late"));

        let progress = RecordingProgress::default();
        let content = collect(vec![body.into_bytes()], &progress).await.unwrap();

        assert_eq!(content, "ok");
        assert_eq!(progress.chunks(), vec!["ok".to_string()]);
    }

    #[tokio::test]
    async fn unterminated_last_line_is_kept() {
        setup();
        let mut body = delta("a").into_bytes();
        body.extend_from_slice(delta("b").trim_end().as_bytes());

        let progress = RecordingProgress::default();
        let content = collect(vec![body], &progress).await.unwrap();

        assert_eq!(content, "ab");
    }

    #[tokio::test]
    async fn error_event_mid_stream_fails_the_call() {
        setup();
        let body = format!("{}data: {{\"error\":{{\"message\":\"overloaded\"}}}}\n\n", delta("partial"));

        let progress = RecordingProgress::default();
        let result = collect(vec![body.into_bytes()], &progress).await;

        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        setup();
        let body = stream::iter(
            vec![
                Ok(delta("x").into_bytes()),
                Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
            ]
        );

        let progress = RecordingProgress::default();
        let result = collect_stream(body, Stage::ApiMap, &progress).await;

        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
