//! 能力注册表
//!
//! 所有执行器实现 Executor trait（name / run），由 ExecutorRegistry 按能力类别注册与解析。
//! Default 或未注册的能力一律解析到 General 执行器——这是构造上的兜底，不是运行时失败。
//! 注册表在进程启动时装配完成，运行期只读。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::planning::{Capability, ExecutorError};

/// 执行器 trait：将一段任务文本变成输出文本，或给出带类别的失败
#[async_trait]
pub trait Executor: Send + Sync {
    /// 执行器名称（用于日志与审计）
    fn name(&self) -> &str;

    /// 执行任务文本
    async fn run(&self, text: &str) -> Result<String, ExecutorError>;
}

/// 能力注册表：Capability -> Arc<dyn Executor>，General 作为兜底
pub struct ExecutorRegistry {
    executors: HashMap<Capability, Arc<dyn Executor>>,
    general: Arc<dyn Executor>,
}

impl ExecutorRegistry {
    /// General 执行器必须在构造时给出，兜底语义由此成立
    pub fn new(general: Arc<dyn Executor>) -> Self {
        let mut executors: HashMap<Capability, Arc<dyn Executor>> = HashMap::new();
        executors.insert(Capability::General, general.clone());
        Self { executors, general }
    }

    /// 注册某能力的执行器；对 Capability::Default 的注册不生效（Default 恒为兜底）
    pub fn register(&mut self, capability: Capability, executor: Arc<dyn Executor>) {
        if capability != Capability::Default {
            self.executors.insert(capability, executor);
        }
    }

    /// 解析能力到执行器；Default 与未注册能力返回 General
    pub fn resolve(&self, capability: Capability) -> Arc<dyn Executor> {
        match capability {
            Capability::Default => self.general.clone(),
            other => self
                .executors
                .get(&other)
                .cloned()
                .unwrap_or_else(|| self.general.clone()),
        }
    }

    /// General 执行器（问候语直接分发用）
    pub fn general(&self) -> Arc<dyn Executor> {
        self.general.clone()
    }
}
