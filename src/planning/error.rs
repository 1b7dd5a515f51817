//! 规划流程错误类型
//!
//! 三类边界：计划校验错误（整轮致命、零执行）、执行器错误（局部恢复、记入 TaskResult）、
//! 规划服务错误（整轮致命、在编排器边界转为文本回答）。轮次预算用尽不是错误。

use thiserror::Error;

/// 计划依赖图校验错误：在任何执行器调用前检出，当轮不执行任何子任务
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("task {task} depends on itself")]
    SelfDependency { task: usize },

    #[error("task {task} depends on out-of-range index {dependency} (plan has {len} subtasks)")]
    IndexOutOfRange {
        task: usize,
        dependency: usize,
        len: usize,
    },

    #[error("cyclic dependency among tasks {tasks:?}")]
    Cycle { tasks: Vec<usize> },
}

/// 单个执行器失败：kind + message，记录为失败的 TaskResult 后继续执行其余任务
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("executor timeout: {0}")]
    Timeout(String),
}

/// 规划服务调用失败：无法产出合法计划
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("planning service error: {0}")]
    Service(String),

    #[error("invalid plan JSON: {0}")]
    Parse(String),
}
