//! LLM 执行器
//!
//! 专门化执行器的统一实现：system prompt + 任务文本经 LlmClient 补全，
//! 施加单次调用超时，失败与超时转为 ExecutorError；每次调用输出结构化审计日志（JSON）。
//! 执行器内部如何推理、是否调用外部工具对调度层不可见。

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::time::timeout;

use crate::executors::Executor;
use crate::llm::LlmClient;
use crate::memory::Message;
use crate::planning::ExecutorError;

/// LLM 执行器：名称 + system prompt + 客户端 + 超时
pub struct LlmExecutor {
    name: String,
    system_prompt: String,
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl LlmExecutor {
    pub fn new(
        name: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        system_prompt: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            llm,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl Executor for LlmExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    /// 超时返回 Timeout，LLM 返回 Err 则转为 Llm；输出 JSON 审计日志
    async fn run(&self, text: &str) -> Result<String, ExecutorError> {
        let start = Instant::now();
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(text.to_string()),
        ];

        let result = timeout(self.timeout, self.llm.complete(&messages)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "executor_audit",
            "executor": self.name,
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "text_preview": text_preview(text),
        });
        tracing::info!(audit = %audit.to_string(), "executor");

        match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err(ExecutorError::Llm(e)),
            Err(_) => Err(ExecutorError::Timeout(self.name.clone())),
        }
    }
}

fn text_preview(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}
