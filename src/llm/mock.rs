//! Mock LLM 客户端（用于测试，无需 API）
//!
//! 按顺序返回预设回复；脚本耗尽后重复最后一条。

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, Message};

/// Mock 客户端：回放预设回复，Err 项模拟后端故障
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<Vec<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
}

impl MockLlmClient {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            last: Mutex::new(None),
        }
    }

    /// 始终返回同一条回复
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(reply.into())])
    }

    /// 始终失败
    pub fn failing(error: impl Into<String>) -> Self {
        Self::new(vec![Err(error.into())])
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String, String> {
        let next = self.replies.lock().map_err(|e| e.to_string())?.pop();
        let mut last = self.last.lock().map_err(|e| e.to_string())?;
        match next {
            Some(reply) => {
                *last = Some(reply.clone());
                reply
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err("mock script is empty".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_replays_in_order_then_repeats_last() {
        let mock = MockLlmClient::new(vec![
            Ok("first".to_string()),
            Err("overloaded".to_string()),
            Ok("last".to_string()),
        ]);
        let messages = [Message::user("hi")];
        assert_eq!(mock.complete(&messages).await, Ok("first".to_string()));
        assert_eq!(mock.complete(&messages).await, Err("overloaded".to_string()));
        assert_eq!(mock.complete(&messages).await, Ok("last".to_string()));
        assert_eq!(mock.complete(&messages).await, Ok("last".to_string()));
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let mock = MockLlmClient::new(vec![]);
        assert!(mock.complete(&[Message::user("hi")]).await.is_err());
    }
}
