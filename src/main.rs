//! Hive - Rust 任务规划编排系统
//!
//! 入口：初始化日志、从配置装配编排器，跑一个 stdin REPL 主循环：
//! 读入一条请求 -> orchestrate -> 打印最终回答 -> 将本轮对话写入历史。

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use hive::agent::create_orchestrator;
use hive::config::{load_config, AppConfig};
use hive::memory::{ConversationMemory, Message};
use hive::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|_| AppConfig::default());
    let app_name = cfg.app.name.clone().unwrap_or_else(|| "hive".to_string());
    let (orchestrator, llm) = create_orchestrator(&cfg);
    let mut history = ConversationMemory::new(cfg.app.max_context_turns);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{} 已就绪，输入请求（exit 退出）", app_name);
    loop {
        stdout.write_all(b"> ").await.context("write prompt")?;
        stdout.flush().await.context("flush prompt")?;

        let Some(line) = lines.next_line().await.context("read input")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let outcome = orchestrator
            .orchestrate(input, history.messages(), cfg.orchestrator.max_iterations)
            .await;
        println!("{}\n", outcome.response);

        history.push(Message::user(input));
        history.push(Message::assistant(outcome.response));
    }

    let (prompt_tokens, completion_tokens, total_tokens) = llm.token_usage();
    tracing::info!(prompt_tokens, completion_tokens, total_tokens, "token usage");

    Ok(())
}
