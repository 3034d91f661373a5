//! 交互式 REPL
//!
//! 逐行读取用户请求，每行独立交给编排器处理并打印聚合结果；exit / quit 退出。
//! 意图识别失败只打印错误，不退出循环。

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::Orchestrator;

pub const PROMPT: &str = "Your query> ";

fn is_exit(text: &str) -> bool {
    text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit")
}

/// 运行 REPL 直到输入结束或用户退出
pub async fn run_repl<R, W>(orchestrator: &Orchestrator, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer
        .write_all("Trip Planner REPL (type 'exit' to quit)\n\n".as_bytes())
        .await?;
    let mut lines = reader.lines();

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if is_exit(text) {
            break;
        }

        let out = match orchestrator.handle(text).await {
            Ok(response) => format!("{response}\n\n"),
            Err(e) => format!("\nError: {e}\n\n"),
        };
        writer.write_all(out.as_bytes()).await?;
    }

    writer.flush().await
}
