//! 主编排循环
//!
//! 一轮 = 规划 -> （问候短路 | 调度执行 -> 汇总）-> 按需迭代；轮次受 max_iterations 约束。
//! 迭代时把本轮结果以不透明文本折叠进下一轮输入。规划服务、校验或问候分发抛出的
//! 任何错误都在此边界被捕获并转为描述性文本回答——调用方永远拿到字符串，不会收到裸错误。

use std::sync::Arc;

use crate::executors::ExecutorRegistry;
use crate::memory::Message;
use crate::planning::aggregator::ResultAggregator;
use crate::planning::plan::Plan;
use crate::planning::planner::PlanningService;
use crate::planning::scheduler::TaskScheduler;

/// 编排结果：最终回答文本 + 最后一次规划产物（供对话日志追加，内部结构对调用方不透明）
#[derive(Debug)]
pub struct OrchestrationOutcome {
    pub response: String,
    pub last_plan: Option<Plan>,
}

/// 主编排器：持有规划服务、调度器、汇总器与执行器注册表
pub struct PlanningOrchestrator {
    planner: Arc<dyn PlanningService>,
    registry: Arc<ExecutorRegistry>,
    scheduler: TaskScheduler,
    aggregator: ResultAggregator,
}

impl PlanningOrchestrator {
    pub fn new(planner: Arc<dyn PlanningService>, registry: Arc<ExecutorRegistry>) -> Self {
        Self {
            planner,
            scheduler: TaskScheduler::new(registry.clone()),
            aggregator: ResultAggregator::new(),
            registry,
        }
    }

    /// 执行用户请求（支持迭代规划）。max_iterations 下限为 1。
    pub async fn orchestrate(
        &self,
        input: &str,
        history: &[Message],
        max_iterations: usize,
    ) -> OrchestrationOutcome {
        let max_iterations = max_iterations.max(1);
        let mut input = input.to_string();
        let mut last_plan: Option<Plan> = None;

        for iteration in 1..=max_iterations {
            tracing::info!(iteration, max_iterations, "planning round");

            let plan = match self.planner.plan(&input, history).await {
                Ok(plan) => plan,
                Err(e) => {
                    return OrchestrationOutcome {
                        response: error_answer(&e),
                        last_plan,
                    }
                }
            };

            // 问候语：直接交给 General 执行器，不经过调度与汇总
            if plan.is_greeting {
                let response = match self.registry.general().run(&plan.main_task).await {
                    Ok(output) => output,
                    Err(e) => error_answer(&e),
                };
                return OrchestrationOutcome {
                    response,
                    last_plan: Some(plan),
                };
            }

            let results = match self.scheduler.execute_plan(&plan, history).await {
                Ok(results) => results,
                Err(e) => {
                    return OrchestrationOutcome {
                        response: error_answer(&e),
                        last_plan: Some(plan),
                    }
                }
            };

            let round_result = self.aggregator.aggregate(&plan.main_task, &results);

            if !plan.requires_iteration || iteration >= max_iterations {
                return OrchestrationOutcome {
                    response: round_result,
                    last_plan: Some(plan),
                };
            }

            input = format!(
                "{}\n\n当前执行结果：{}\n请根据结果调整计划。",
                input, round_result
            );
            last_plan = Some(plan);
        }

        // 每轮循环体要么返回要么续轮，最后一轮必然返回；保底与迭代上限语义一致
        OrchestrationOutcome {
            response: "执行完成".to_string(),
            last_plan,
        }
    }
}

fn error_answer(e: &impl std::fmt::Display) -> String {
    format!("执行 Planning 流程时发生错误：{}", e)
}
