//! 执行器与 Planner 的 system prompt
//!
//! 内置英文 prompt 常量；config/prompts/<name>.txt 存在时优先使用文件内容，
//! 便于不改代码调整提示词。

/// Planner system prompt（开头的 "task planning assistant" 同时是 Mock 后端的识别标记）
pub const PLANNER_PROMPT: &str = "You are a task planning assistant. Decompose the user's request into subtasks.\n\
Respond with a single JSON object and nothing else. The JSON must follow this schema:\n\n{schema}\n\n\
Rules:\n\
- main_task restates the user's overall goal.\n\
- Each subtask names the capability that should handle it: code, knowledge, search, general or context.\n\
- dependencies lists zero-based indexes of subtasks that must complete first. Never reference a subtask's own index or an index outside the list.\n\
- Higher priority runs earlier among independent subtasks.\n\
- For a simple greeting or small talk, set is_greeting to true and leave subtasks empty.\n\
- Set requires_iteration to true only when the plan should be revised after seeing this round's results.";

pub const CODE_PROMPT: &str = "You are a coding assistant. Write, explain or fix code exactly as the task asks. Reply with the result only.";

pub const KNOWLEDGE_PROMPT: &str = "You are a knowledge assistant. Answer factual questions (dates, places, weather, definitions) concisely and accurately.";

pub const SEARCH_PROMPT: &str = "You are a research assistant. Gather the information the task asks for and present the findings as a short, sourced summary.";

pub const GENERAL_PROMPT: &str = "You are a helpful general assistant. Complete the task directly and keep the answer focused.";

pub const CONTEXT_PROMPT: &str = "You are a conversation-context assistant. The task text ends with the formatted conversation history; answer strictly based on it.";

/// 读取 config/prompts/<name>.txt，不存在时返回内置 fallback
pub fn load_prompt(name: &str, fallback: &str) -> String {
    [
        format!("config/prompts/{}.txt", name),
        format!("../config/prompts/{}.txt", name),
    ]
    .iter()
    .find_map(|p| std::fs::read_to_string(p).ok())
    .unwrap_or_else(|| fallback.to_string())
}
