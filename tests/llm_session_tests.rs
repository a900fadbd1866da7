use archcouncil::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use archcouncil::LLMSession;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

// Reports a fixed usage for every call and remembers how many messages it got.
struct MockClient {
    usage: Mutex<Option<TokenUsage>>,
    reported_total: usize,
    last_message_count: Mutex<usize>,
}

impl MockClient {
    fn new(reported_total: usize) -> Self {
        Self {
            usage: Mutex::new(None),
            reported_total,
            last_message_count: Mutex::new(0),
        }
    }

    fn last_message_count(&self) -> usize {
        *self.last_message_count.lock().unwrap()
    }
}

#[async_trait]
impl ClientWrapper for MockClient {
    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError> {
        *self.last_message_count.lock().unwrap() = messages.len();
        *self.usage.lock().unwrap() = Some(TokenUsage {
            input_tokens: self.reported_total - 1,
            output_tokens: 1,
            total_tokens: self.reported_total,
        });
        Ok(Message {
            role: Role::Assistant,
            content: "ack".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.usage)
    }
}

#[tokio::test]
async fn test_complete_sends_system_prompt_and_history() {
    let client = Arc::new(MockClient::new(20));
    let mut session = LLMSession::new(client.clone(), "You are terse.".to_string(), 1_000);

    session.inject_message(Role::User, "first".to_string());
    session.inject_message(Role::User, "second".to_string());
    let (reply, usage) = session.complete().await.unwrap();

    assert_eq!(reply.content, "ack");
    assert_eq!(usage.map(|u| u.total_tokens), Some(20));
    assert_eq!(client.last_message_count(), 3);
    // The reply is kept, the system prompt is not part of the history.
    assert_eq!(session.get_conversation_history().len(), 3);
    assert_eq!(session.system_prompt_text(), "You are terse.");
}

#[tokio::test]
async fn test_usage_accumulates_across_calls() {
    let client = Arc::new(MockClient::new(20));
    let mut session = LLMSession::new(client, String::new(), 1_000);

    session.inject_message(Role::User, "one".to_string());
    session.complete().await.unwrap();
    session.inject_message(Role::User, "two".to_string());
    session.complete().await.unwrap();

    let usage = session.token_usage();
    assert_eq!(usage.total_tokens, 40);
    assert_eq!(usage.input_tokens, 38);
    assert_eq!(usage.output_tokens, 2);
}

#[tokio::test]
async fn test_history_is_trimmed_when_over_budget() {
    // Every call reports 100 tokens against a 50 token window.
    let client = Arc::new(MockClient::new(100));
    let mut session = LLMSession::new(client, String::new(), 50);

    for i in 0..5 {
        session.inject_message(Role::User, format!("message number {}", i));
    }
    session.complete().await.unwrap();

    let history = session.get_conversation_history();
    // Oldest messages were dropped; the newest reply is always kept.
    assert!(history.len() < 6);
    assert_eq!(history.last().map(|m| m.content.as_str()), Some("ack"));
}
