//! 执行器层：能力注册表与专门化 LLM 执行器

pub mod prompts;
pub mod registry;
pub mod worker;

pub use registry::{Executor, ExecutorRegistry};
pub use worker::LlmExecutor;
