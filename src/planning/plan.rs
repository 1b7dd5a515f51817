//! 计划模型：Plan / SubTask / Capability / TaskResult
//!
//! Planner 的结构化输出与调度层的交换数据。Plan 在一轮规划中产出一次，之后不可变；
//! 调度器据此推导执行顺序但从不修改它。派生 JsonSchema 以便将计划格式注入 Planner prompt。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::planning::error::ExecutorError;

/// 子任务能力类别：决定由哪个执行器家族处理
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// 代码相关任务（生成、修改、解释等）
    Code,
    /// 知识问答（事实、时间、天气等领域知识）
    Knowledge,
    /// 信息检索任务
    Search,
    /// 通用对话、问答任务
    General,
    /// 依赖对话历史的任务（分发前拼接格式化历史）
    Context,
    /// 兜底：未识别的类别一律按 Default 处理，解析到 General 执行器
    #[default]
    #[serde(other)]
    Default,
}

impl Capability {
    /// 汇总报告中展示的执行器名称
    pub fn label(&self) -> &'static str {
        match self {
            Capability::Code => "Code Agent",
            Capability::Knowledge => "Knowledge Agent",
            Capability::Search => "Search Agent",
            Capability::General => "General Agent",
            Capability::Context => "Context Agent",
            Capability::Default => "Default Agent",
        }
    }
}

/// 子任务：一条工作单元的描述、能力类别、优先级与依赖
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubTask {
    /// 子任务的详细描述，说明需要完成什么
    pub details: String,
    /// 分配给哪个专门化执行器处理
    #[serde(default)]
    pub capability: Capability,
    /// 任务优先级，数字越大越先执行。默认为 0
    #[serde(default)]
    pub priority: i32,
    /// 依赖的其他子任务索引（从 0 起、指向原始 subtasks 序列）。重复索引静默去重；
    /// 自引用或越界索引是计划构造错误，在任何执行器调用前检出
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

impl SubTask {
    pub fn new(details: impl Into<String>, capability: Capability) -> Self {
        Self {
            details: details.into(),
            capability,
            priority: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<usize>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// 任务计划：一条用户请求的结构化分解
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// 主任务描述，总结用户想要达成的整体目标
    pub main_task: String,
    /// 子任务列表，可为空
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    /// 是否是问候语或简单对话。为 true 时下游忽略 subtasks，直接由 General 执行器应答
    #[serde(default)]
    pub is_greeting: bool,
    /// 执行后是否需要根据结果重新规划
    #[serde(default)]
    pub requires_iteration: bool,
}

impl Plan {
    pub fn new(main_task: impl Into<String>, subtasks: Vec<SubTask>) -> Self {
        Self {
            main_task: main_task.into(),
            subtasks,
            is_greeting: false,
            requires_iteration: false,
        }
    }

    /// 构造问候计划（无子任务）
    pub fn greeting(main_task: impl Into<String>) -> Self {
        Self {
            main_task: main_task.into(),
            subtasks: Vec::new(),
            is_greeting: true,
            requires_iteration: false,
        }
    }
}

/// 子任务执行结果：每个 SubTask 恰好产出一条，顺序为调度器实际执行顺序
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// 对应的子任务
    pub task: SubTask,
    /// 是否成功
    pub success: bool,
    /// 执行输出（失败时为空）
    pub output: String,
    /// 错误负载（仅失败时存在，kind + message）
    pub error: Option<ExecutorError>,
}

impl TaskResult {
    pub fn ok(task: SubTask, output: impl Into<String>) -> Self {
        Self {
            task,
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(task: SubTask, error: ExecutorError) -> Self {
        Self {
            task,
            success: false,
            output: String::new(),
            error: Some(error),
        }
    }
}
