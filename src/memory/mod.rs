//! 记忆层：对话历史（短期记忆）

pub mod conversation;

pub use conversation::{ConversationMemory, Message, Role};
