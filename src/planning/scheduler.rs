//! 任务调度器
//!
//! 对计划的子任务做依赖校验与拓扑排序（入度表 + 就绪堆），再按规范顺序逐个分发执行。
//! 就绪集取任务的平手规则：优先级降序，原始索引升序——相同计划必然得到相同顺序。
//! 单个任务失败只记入其 TaskResult，不阻止其余任务（含其依赖方）执行；
//! 依赖只约束顺序，不约束成败。校验失败是整轮致命错误，任何执行器都不会被调用。

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};
use std::sync::Arc;

use crate::executors::ExecutorRegistry;
use crate::memory::Message;
use crate::planning::context::format_history;
use crate::planning::error::PlanValidationError;
use crate::planning::plan::{Capability, Plan, SubTask, TaskResult};

/// 任务调度器：持有执行器注册表，驱动一个计划的完整执行
pub struct TaskScheduler {
    registry: Arc<ExecutorRegistry>,
}

impl TaskScheduler {
    pub fn new(registry: Arc<ExecutorRegistry>) -> Self {
        Self { registry }
    }

    /// 执行计划：校验 -> 排序 -> 逐任务分发，每个子任务恰好产出一条 TaskResult。
    /// 问候计划或空子任务列表直接返回空结果，不触碰注册表。
    pub async fn execute_plan(
        &self,
        plan: &Plan,
        history: &[Message],
    ) -> Result<Vec<TaskResult>, PlanValidationError> {
        if plan.is_greeting || plan.subtasks.is_empty() {
            return Ok(Vec::new());
        }

        let order = run_order(&plan.subtasks)?;

        let mut results: Vec<TaskResult> = Vec::with_capacity(order.len());
        for index in order {
            let task = &plan.subtasks[index];
            let executor = self.registry.resolve(task.capability);
            let text = dispatch_text(task, history);

            match executor.run(&text).await {
                Ok(output) => {
                    results.push(TaskResult::ok(task.clone(), output));
                }
                Err(e) => {
                    tracing::warn!(task = index, error = %e, "subtask failed");
                    results.push(TaskResult::failed(task.clone(), e));
                }
            }
        }

        Ok(results)
    }
}

/// 构造分发文本：Context 能力的任务在描述后拼接格式化历史
fn dispatch_text(task: &SubTask, history: &[Message]) -> String {
    if task.capability == Capability::Context {
        format!(
            "{}\n\n对话历史记录：\n{}",
            task.details,
            format_history(history)
        )
    } else {
        task.details.clone()
    }
}

/// 计算规范执行顺序：先校验依赖（自引用、越界，重复静默去重），
/// 再做 Kahn 拓扑排序；就绪堆按（优先级, Reverse(索引)）取最大，
/// 即优先级降序、索引升序。排序无法覆盖全部任务即存在环。
pub fn run_order(subtasks: &[SubTask]) -> Result<Vec<usize>, PlanValidationError> {
    let len = subtasks.len();

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut in_degree: Vec<usize> = vec![0; len];

    for (index, task) in subtasks.iter().enumerate() {
        let mut deps: BTreeSet<usize> = BTreeSet::new();
        for &dep in &task.dependencies {
            if dep == index {
                return Err(PlanValidationError::SelfDependency { task: index });
            }
            if dep >= len {
                return Err(PlanValidationError::IndexOutOfRange {
                    task: index,
                    dependency: dep,
                    len,
                });
            }
            deps.insert(dep);
        }
        in_degree[index] = deps.len();
        for dep in deps {
            dependents[dep].push(index);
        }
    }

    let mut ready: BinaryHeap<(i32, Reverse<usize>)> = BinaryHeap::new();
    for (index, task) in subtasks.iter().enumerate() {
        if in_degree[index] == 0 {
            ready.push((task.priority, Reverse(index)));
        }
    }

    let mut order: Vec<usize> = Vec::with_capacity(len);
    while let Some((_, Reverse(index))) = ready.pop() {
        order.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push((subtasks[dependent].priority, Reverse(dependent)));
            }
        }
    }

    if order.len() < len {
        let tasks: Vec<usize> = (0..len).filter(|&i| in_degree[i] > 0).collect();
        return Err(PlanValidationError::Cycle { tasks });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::executors::Executor;
    use crate::planning::error::ExecutorError;

    /// 记录每次分发的文本，按需对指定任务文本返回失败
    struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
        count: AtomicUsize,
        fail_on: Option<String>,
    }

    impl RecordingExecutor {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                count: AtomicUsize::new(0),
                fail_on: None,
            })
        }

        fn failing_on(details: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                count: AtomicUsize::new(0),
                fail_on: Some(details.to_string()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for RecordingExecutor {
        fn name(&self) -> &str {
            "recording"
        }

        async fn run(&self, text: &str) -> Result<String, ExecutorError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(text.to_string());
            if let Some(fail_on) = &self.fail_on {
                if text.starts_with(fail_on.as_str()) {
                    return Err(ExecutorError::Llm(format!("forced failure: {}", text)));
                }
            }
            Ok(format!("done: {}", text))
        }
    }

    fn scheduler_with(executor: Arc<RecordingExecutor>) -> TaskScheduler {
        TaskScheduler::new(Arc::new(ExecutorRegistry::new(executor)))
    }

    fn task(details: &str) -> SubTask {
        SubTask::new(details, Capability::General)
    }

    #[test]
    fn test_order_respects_dependencies() {
        let subtasks = vec![
            task("c").with_dependencies(vec![1]),
            task("b").with_dependencies(vec![2]),
            task("a"),
        ];
        assert_eq!(run_order(&subtasks).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_tie_break_priority_desc_then_index_asc() {
        let subtasks = vec![
            task("p0"),
            task("p5-first").with_priority(5),
            task("p5-second").with_priority(5),
            task("p2").with_priority(2),
        ];
        assert_eq!(run_order(&subtasks).unwrap(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_dependency_outweighs_priority() {
        // 高优先级任务仍要等它依赖的低优先级任务
        let subtasks = vec![task("base"), task("urgent").with_priority(9).with_dependencies(vec![0])];
        assert_eq!(run_order(&subtasks).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_order_is_deterministic() {
        let subtasks = vec![
            task("x").with_priority(1),
            task("y").with_priority(1),
            task("z").with_dependencies(vec![0, 1]),
        ];
        let first = run_order(&subtasks).unwrap();
        for _ in 0..10 {
            assert_eq!(run_order(&subtasks).unwrap(), first);
        }
    }

    #[test]
    fn test_duplicate_dependencies_deduplicated() {
        let subtasks = vec![task("a"), task("b").with_dependencies(vec![0, 0, 0])];
        assert_eq!(run_order(&subtasks).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let subtasks = vec![task("a").with_dependencies(vec![0])];
        assert_eq!(
            run_order(&subtasks).unwrap_err(),
            PlanValidationError::SelfDependency { task: 0 }
        );
    }

    #[test]
    fn test_out_of_range_dependency_rejected() {
        let subtasks = vec![task("a"), task("b").with_dependencies(vec![5])];
        assert_eq!(
            run_order(&subtasks).unwrap_err(),
            PlanValidationError::IndexOutOfRange {
                task: 1,
                dependency: 5,
                len: 2
            }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let subtasks = vec![
            task("a").with_dependencies(vec![1]),
            task("b").with_dependencies(vec![0]),
            task("c"),
        ];
        assert_eq!(
            run_order(&subtasks).unwrap_err(),
            PlanValidationError::Cycle { tasks: vec![0, 1] }
        );
    }

    #[tokio::test]
    async fn test_execute_produces_one_result_per_task_in_run_order() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new(
            "目标",
            vec![
                task("late"),
                task("early").with_priority(3),
                task("after-early").with_dependencies(vec![1]),
            ],
        );

        let results = scheduler.execute_plan(&plan, &[]).await.unwrap();

        let details: Vec<&str> = results.iter().map(|r| r.task.details.as_str()).collect();
        assert_eq!(details, vec!["early", "after-early", "late"]);
        assert_eq!(executor.calls(), vec!["early", "after-early", "late"]);
        assert!(results.iter().all(|r| r.success));
    }

    #[tokio::test]
    async fn test_dependency_results_exist_before_dependent_runs() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new(
            "目标",
            vec![
                task("sink").with_dependencies(vec![1, 2]),
                task("src-a"),
                task("src-b"),
            ],
        );

        scheduler.execute_plan(&plan, &[]).await.unwrap();

        let calls = executor.calls();
        let sink = calls.iter().position(|c| c == "sink").unwrap();
        assert!(calls.iter().position(|c| c == "src-a").unwrap() < sink);
        assert!(calls.iter().position(|c| c == "src-b").unwrap() < sink);
    }

    #[tokio::test]
    async fn test_malformed_plan_invokes_no_executor() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new("目标", vec![task("a").with_dependencies(vec![0])]);

        assert!(scheduler.execute_plan(&plan, &[]).await.is_err());
        assert_eq!(executor.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_siblings_or_dependents() {
        let executor = RecordingExecutor::failing_on("broken");
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new(
            "目标",
            vec![
                task("broken"),
                task("sibling"),
                task("dependent-of-broken").with_dependencies(vec![0]),
            ],
        );

        let results = scheduler.execute_plan(&plan, &[]).await.unwrap();

        assert_eq!(results.len(), 3);
        let broken = results.iter().find(|r| r.task.details == "broken").unwrap();
        assert!(!broken.success);
        assert!(broken.output.is_empty());
        assert!(matches!(broken.error, Some(ExecutorError::Llm(_))));
        assert!(results.iter().any(|r| r.task.details == "sibling" && r.success));
        assert!(results
            .iter()
            .any(|r| r.task.details == "dependent-of-broken" && r.success));
    }

    #[tokio::test]
    async fn test_greeting_and_empty_plans_execute_nothing() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());

        let mut greeting = Plan::greeting("你好");
        greeting.subtasks.push(task("ignored"));
        assert!(scheduler.execute_plan(&greeting, &[]).await.unwrap().is_empty());

        let empty = Plan::new("无事可做", vec![]);
        assert!(scheduler.execute_plan(&empty, &[]).await.unwrap().is_empty());

        assert_eq!(executor.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_context_task_receives_formatted_history() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new(
            "目标",
            vec![SubTask::new("总结我们聊过什么", Capability::Context)],
        );
        let history = vec![Message::user("第一问"), Message::assistant("第一答")];

        scheduler.execute_plan(&plan, &history).await.unwrap();

        let calls = executor.calls();
        assert!(calls[0].starts_with("总结我们聊过什么"));
        assert!(calls[0].contains("对话历史记录："));
        assert!(calls[0].contains("用户：第一问"));
    }

    #[tokio::test]
    async fn test_context_task_with_empty_history_gets_placeholder() {
        let executor = RecordingExecutor::new();
        let scheduler = scheduler_with(executor.clone());
        let plan = Plan::new("目标", vec![SubTask::new("回顾", Capability::Context)]);

        scheduler.execute_plan(&plan, &[]).await.unwrap();

        assert!(executor.calls()[0].contains("暂无历史记录。"));
    }
}
