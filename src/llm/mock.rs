//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! 根据 system prompt 判断调用方：Planner 调用时返回单子任务的合法计划 JSON，
//! 执行器调用时回显任务文本，便于本地跑通完整编排流程。

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::{Message, Role};

/// Planner system prompt 的识别标记（与 executors::prompts::PLANNER_PROMPT 一致）
const PLANNER_MARKER: &str = "task planning assistant";

/// Mock 客户端：Planner 请求返回计划 JSON，其余请求回显用户消息
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User))
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");

        let is_planner = messages
            .first()
            .map(|m| matches!(m.role, Role::System) && m.content.contains(PLANNER_MARKER))
            .unwrap_or(false);

        if is_planner {
            let plan = serde_json::json!({
                "main_task": last_user,
                "subtasks": [
                    { "details": last_user, "capability": "general", "priority": 0, "dependencies": [] }
                ],
                "is_greeting": false,
                "requires_iteration": false,
            });
            return Ok(plan.to_string());
        }

        Ok(format!("Echo from Mock: {}", last_user))
    }
}
