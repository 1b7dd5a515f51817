//! Hive - Rust 任务规划编排系统
//!
//! 将一条自然语言请求分解为有序子任务，分发给各能力执行器，再汇总为最终回答；
//! 若计划声明需要迭代，则带着本轮结果重新规划（受轮次上限约束）。
//!
//! 模块划分：
//! - **agent**: 组件装配（从配置构建 LLM、执行器注册表与编排器）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **executors**: 能力注册表与专门化执行器（Code / Knowledge / Search / General / Context）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **memory**: 对话历史（短期记忆）
//! - **planning**: 计划模型、Planner、调度器、汇总器、主编排循环

pub mod agent;
pub mod config;
pub mod executors;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod planning;

pub use planning::{OrchestrationOutcome, PlanningOrchestrator};
