//! 组件装配
//!
//! 在进程启动时从配置显式构建全部组件：LLM 客户端、专门化执行器、能力注册表、
//! Planner 与编排器，依赖注入、无全局可变状态。注册表绑定装配后固定不变。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::executors::prompts::{
    load_prompt, CODE_PROMPT, CONTEXT_PROMPT, GENERAL_PROMPT, KNOWLEDGE_PROMPT, SEARCH_PROMPT,
};
use crate::executors::{ExecutorRegistry, LlmExecutor};
use crate::llm::{LlmClient, MockLlmClient, OpenAiClient};
use crate::planning::{Capability, LlmPlanner, PlanningOrchestrator};

/// 根据配置创建 LLM 客户端：provider = mock 时用 Mock，其余走 OpenAI 兼容端点
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    if cfg.llm.provider == "mock" {
        tracing::info!("using mock LLM backend");
        return Arc::new(MockLlmClient);
    }
    Arc::new(OpenAiClient::new(
        cfg.llm.base_url.as_deref(),
        &cfg.llm.model,
        None,
    ))
}

/// 构建能力注册表：General 兜底 + Code / Knowledge / Search / Context 专门化执行器
pub fn create_registry(llm: Arc<dyn LlmClient>, timeout_secs: u64) -> ExecutorRegistry {
    let general = Arc::new(LlmExecutor::new(
        "general",
        llm.clone(),
        load_prompt("general", GENERAL_PROMPT),
        timeout_secs,
    ));

    let mut registry = ExecutorRegistry::new(general);
    registry.register(
        Capability::Code,
        Arc::new(LlmExecutor::new(
            "code",
            llm.clone(),
            load_prompt("code", CODE_PROMPT),
            timeout_secs,
        )),
    );
    registry.register(
        Capability::Knowledge,
        Arc::new(LlmExecutor::new(
            "knowledge",
            llm.clone(),
            load_prompt("knowledge", KNOWLEDGE_PROMPT),
            timeout_secs,
        )),
    );
    registry.register(
        Capability::Search,
        Arc::new(LlmExecutor::new(
            "search",
            llm.clone(),
            load_prompt("search", SEARCH_PROMPT),
            timeout_secs,
        )),
    );
    registry.register(
        Capability::Context,
        Arc::new(LlmExecutor::new(
            "context",
            llm.clone(),
            load_prompt("context", CONTEXT_PROMPT),
            timeout_secs,
        )),
    );
    registry
}

/// 从配置装配编排器；同时返回共享 LLM 客户端（供 token 统计等）
pub fn create_orchestrator(cfg: &AppConfig) -> (PlanningOrchestrator, Arc<dyn LlmClient>) {
    let llm = create_llm_from_config(cfg);
    let registry = Arc::new(create_registry(
        llm.clone(),
        cfg.orchestrator.executor_timeout_secs,
    ));
    let planner = Arc::new(LlmPlanner::new(llm.clone()));
    (PlanningOrchestrator::new(planner, registry), llm)
}
