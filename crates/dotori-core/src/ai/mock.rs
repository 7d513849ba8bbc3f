//! Mock backend for testing
//!
//! Returns a fixed reply and can be scripted to fail the first N calls,
//! which is how the orchestrator retry/fallback paths are exercised
//! without a running LLM server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::TextGenerator;

/// Mock text-generation backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    healthy: bool,
    /// Reply returned by successful generate calls
    reply: String,
    /// Remaining calls that fail before generation starts succeeding
    fail_remaining: Arc<AtomicU32>,
    /// Total generate calls observed
    calls: Arc<AtomicU32>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, always succeeds)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: "이번 달 소비 패턴이 목표와 잘 맞아요! 현재 속도를 유지해보세요.".to_string(),
            fail_remaining: Arc::new(AtomicU32::new(0)),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a backend that fails the first `n` generate calls
    pub fn failing(n: u32) -> Self {
        Self {
            fail_remaining: Arc::new(AtomicU32::new(n)),
            ..Self::new()
        }
    }

    /// Override the reply text
    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    /// Number of generate calls made so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockBackend {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Generation("mock: scripted failure".to_string()));
        }

        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_script() {
        let mock = MockBackend::failing(2).with_reply("성공");

        assert!(mock.generate("s", "u").await.is_err());
        assert!(mock.generate("s", "u").await.is_err());
        assert_eq!(mock.generate("s", "u").await.unwrap(), "성공");
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_clone_shares_script() {
        let mock = MockBackend::failing(1);
        let clone = mock.clone();

        assert!(clone.generate("s", "u").await.is_err());
        // The original sees the script already consumed
        assert!(mock.generate("s", "u").await.is_ok());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_unhealthy() {
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
