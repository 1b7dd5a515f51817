//! 结果汇总器
//!
//! 将一轮的 TaskResult 序列（按调度器给出的顺序）拼接为一份人类可读的 Markdown 报告。
//! 纯函数，无副作用、无跨调用状态；措辞固定，测试按字节断言。

use crate::planning::plan::TaskResult;

/// 结果汇总器
#[derive(Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 汇总结果：空结果返回固定提示；否则输出主任务标题、每个子任务的编号块与总结行
    pub fn aggregate(&self, main_task: &str, results: &[TaskResult]) -> String {
        if results.is_empty() {
            return format!("任务 '{}' 没有需要执行的子任务。", main_task);
        }

        let success_count = results.iter().filter(|r| r.success).count();
        let fail_count = results.len() - success_count;

        let mut parts: Vec<String> = Vec::new();
        parts.push(format!("## 任务：{}\n", main_task));

        for (i, result) in results.iter().enumerate() {
            parts.push(format!(
                "### {}. [{}] {}",
                i + 1,
                result.task.capability.label(),
                result.task.details
            ));
            if result.success {
                parts.push("✅ 执行成功".to_string());
                parts.push(format!("{}\n", result.output));
            } else {
                parts.push("❌ 执行失败".to_string());
                match &result.error {
                    Some(error) => parts.push(format!("错误：{}\n", error)),
                    None => parts.push("\n".to_string()),
                }
            }
        }

        if fail_count > 0 {
            parts.push(format!(
                "\n---\n**总结**：共 {} 个子任务，成功 {} 个，失败 {} 个。",
                results.len(),
                success_count,
                fail_count
            ));
        } else {
            parts.push(format!(
                "\n---\n**总结**：所有 {} 个子任务执行成功。",
                results.len()
            ));
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::error::ExecutorError;
    use crate::planning::plan::{Capability, SubTask};

    fn aggregator() -> ResultAggregator {
        ResultAggregator::new()
    }

    #[test]
    fn test_empty_results_fixed_notice() {
        let text = aggregator().aggregate("整理周报", &[]);
        assert_eq!(text, "任务 '整理周报' 没有需要执行的子任务。");
    }

    #[test]
    fn test_all_success_report() {
        let results = vec![
            TaskResult::ok(
                SubTask::new("查询北京天气", Capability::Knowledge),
                "Beijing: sunny",
            ),
            TaskResult::ok(SubTask::new("写打印脚本", Capability::Code), "print(...)"),
        ];
        let text = aggregator().aggregate("Weather+Script", &results);

        assert!(text.contains("## 任务：Weather+Script"));
        assert!(text.contains("### 1. [Knowledge Agent] 查询北京天气"));
        assert!(text.contains("Beijing: sunny"));
        assert!(text.contains("### 2. [Code Agent] 写打印脚本"));
        assert!(text.contains("print(...)"));
        assert!(text.contains("✅ 执行成功"));
        assert!(text.ends_with("**总结**：所有 2 个子任务执行成功。"));
    }

    #[test]
    fn test_failure_report_carries_error_text_and_counts() {
        let results = vec![TaskResult::failed(
            SubTask::new("taskX", Capability::Search),
            ExecutorError::Llm("timeout".to_string()),
        )];
        let text = aggregator().aggregate("检索资料", &results);

        assert!(text.contains("### 1. [Search Agent] taskX"));
        assert!(text.contains("❌ 执行失败"));
        assert!(text.contains("timeout"));
        assert!(text.ends_with("**总结**：共 1 个子任务，成功 0 个，失败 1 个。"));
    }

    #[test]
    fn test_mixed_report_counts() {
        let results = vec![
            TaskResult::ok(SubTask::new("a", Capability::General), "out-a"),
            TaskResult::failed(
                SubTask::new("b", Capability::General),
                ExecutorError::Timeout("general".to_string()),
            ),
            TaskResult::ok(SubTask::new("c", Capability::General), "out-c"),
        ];
        let text = aggregator().aggregate("混合", &results);
        assert!(text.contains("**总结**：共 3 个子任务，成功 2 个，失败 1 个。"));
    }

    #[test]
    fn test_results_reported_in_given_order() {
        let results = vec![
            TaskResult::ok(SubTask::new("second-in-plan", Capability::General), "x"),
            TaskResult::ok(SubTask::new("first-in-plan", Capability::General), "y"),
        ];
        let text = aggregator().aggregate("顺序", &results);
        let a = text.find("### 1. [General Agent] second-in-plan").unwrap();
        let b = text.find("### 2. [General Agent] first-in-plan").unwrap();
        assert!(a < b);
    }
}
