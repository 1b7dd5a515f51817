//! Planner：规划服务边界与 LLM 实现
//!
//! PlanningService 把一条用户输入（加对话历史）变成结构化 Plan；LlmPlanner 将
//! schemars 生成的 Plan JSON Schema 注入 system prompt，调用 LLM 后从回复文本中
//! 提取 JSON（```json 围栏或首尾大括号）并反序列化。无法产出合法计划即为服务错误。

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema_for;

use crate::executors::prompts::{load_prompt, PLANNER_PROMPT};
use crate::llm::LlmClient;
use crate::memory::Message;
use crate::planning::error::PlanningError;
use crate::planning::plan::Plan;

/// 规划服务：input + history -> Plan
#[async_trait]
pub trait PlanningService: Send + Sync {
    async fn plan(&self, input: &str, history: &[Message]) -> Result<Plan, PlanningError>;
}

/// Plan 的 JSON Schema 字符串，拼入 Planner system prompt
pub fn plan_schema_json() -> String {
    let schema = schema_for!(Plan);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| String::new())
}

/// 从 LLM 回复中提取 JSON 并解析为 Plan：优先 ```json 围栏，其次首个 { 到末个 }
pub fn parse_plan_json(output: &str) -> Result<Plan, PlanningError> {
    let trimmed = output.trim();

    let json_str = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```")
            .map(|end| rest[..end].trim())
            .unwrap_or_else(|| rest.trim())
    } else if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            &trimmed[start..=end]
        } else {
            return Err(PlanningError::Parse(format!(
                "no JSON object in planner output: {}",
                preview(trimmed)
            )));
        }
    } else {
        return Err(PlanningError::Parse(format!(
            "no JSON object in planner output: {}",
            preview(trimmed)
        )));
    };

    let plan: Plan = serde_json::from_str(json_str)
        .map_err(|e| PlanningError::Parse(format!("{}: {}", e, preview(json_str))))?;

    if let Some(i) = plan
        .subtasks
        .iter()
        .position(|t| t.details.trim().is_empty())
    {
        return Err(PlanningError::Parse(format!(
            "subtask {} has empty details",
            i
        )));
    }

    Ok(plan)
}

fn preview(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}

/// LLM Planner：system prompt（含 Plan Schema）+ 历史 + 用户输入
pub struct LlmPlanner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        let template = load_prompt("planner", PLANNER_PROMPT);
        Self {
            llm,
            system_prompt: template.replace("{schema}", &plan_schema_json()),
        }
    }
}

#[async_trait]
impl PlanningService for LlmPlanner {
    async fn plan(&self, input: &str, history: &[Message]) -> Result<Plan, PlanningError> {
        let mut messages = vec![Message::system(self.system_prompt.clone())];
        messages.extend(history.iter().cloned());
        messages.push(Message::user(input.to_string()));

        let output = self
            .llm
            .complete(&messages)
            .await
            .map_err(PlanningError::Service)?;

        parse_plan_json(&output)
    }
}
