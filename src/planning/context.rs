//! Context 执行器的历史格式化
//!
//! 将对话历史整理为按轮编号的纯文本，拼入 Context 能力子任务的分发文本；
//! 过长的助手回复截断，避免撑爆执行器上下文。

use crate::memory::{Message, Role};

/// 空历史时的固定占位文本
pub const EMPTY_HISTORY: &str = "暂无历史记录。";

/// 助手回复超过此字符数时截断
const RESPONSE_PREVIEW_CHARS: usize = 1000;

/// 将历史消息格式化为按轮编号的文本；每轮 = 一条用户消息及其后的助手回复
pub fn format_history(history: &[Message]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut turn = 0usize;
    let mut i = 0usize;

    while i < history.len() {
        let msg = &history[i];
        i += 1;

        match msg.role {
            Role::System => continue,
            Role::Assistant => continue,
            Role::User => {}
        }

        turn += 1;
        parts.push(format!("第 {} 轮对话：", turn));
        parts.push(format!("用户：{}", msg.content));

        // 收集该轮之后、下一条用户消息之前的助手回复
        let mut responses: Vec<&str> = Vec::new();
        while i < history.len() && !matches!(history[i].role, Role::User) {
            if matches!(history[i].role, Role::Assistant) {
                responses.push(history[i].content.as_str());
            }
            i += 1;
        }

        if responses.is_empty() {
            parts.push("助手：（无回复）".to_string());
        } else {
            parts.push(format!("助手：{}", truncate(&responses.join("\n"))));
        }
        parts.push(String::new());
    }

    if turn == 0 {
        return "历史记录为空或格式无法识别。".to_string();
    }

    parts.join("\n")
}

fn truncate(text: &str) -> String {
    if text.chars().count() > RESPONSE_PREVIEW_CHARS {
        let head: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
        format!("{}\n...（内容已截断）", head)
    } else {
        text.to_string()
    }
}
