use crate::application::router::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Conversation id used for the local terminal session.
pub const LOCAL_SENDER: &str = "local";

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

enum LoopControl {
    Continue,
    Exit,
}

pub async fn run<P>(orchestrator: Arc<Orchestrator<P>>, sender: &str) -> Result<(), StdioError>
where
    P: ModelProvider + 'static,
{
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    run_with(orchestrator.as_ref(), sender, stdin, stdout).await
}

/// Drive a chat session over arbitrary line input and text output.
pub async fn run_with<P, R, W>(
    orchestrator: &Orchestrator<P>,
    sender: &str,
    input: R,
    mut output: W,
) -> Result<(), StdioError>
where
    P: ModelProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    print_banner(&mut output, orchestrator).await?;

    loop {
        output.write_all(b"you> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            write_line(&mut output, "\nInput closed. Leaving chat.").await?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match handle_command(input, orchestrator, sender, &mut output).await? {
                LoopControl::Continue => continue,
                LoopControl::Exit => break,
            }
        }

        info!(sender, "Processing interactive chat message");
        let response = orchestrator.route(sender, input).await;
        write_line(&mut output, "").await?;
        write_line(&mut output, "Assistant:").await?;
        write_line(&mut output, &response).await?;
        write_line(&mut output, "").await?;
    }

    output.flush().await?;
    Ok(())
}

async fn handle_command<P, W>(
    input: &str,
    orchestrator: &Orchestrator<P>,
    sender: &str,
    output: &mut W,
) -> Result<LoopControl, StdioError>
where
    P: ModelProvider,
    W: AsyncWrite + Unpin,
{
    let name = input
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    debug!(command = %name, "Processing chat command");

    match name.as_str() {
        "help" | "?" => {
            print_help(output).await?;
            Ok(LoopControl::Continue)
        }
        "clear" | "reset" => {
            let message = if orchestrator.clear(sender).await {
                "History cleared."
            } else {
                "No history found."
            };
            write_line(output, message).await?;
            Ok(LoopControl::Continue)
        }
        "workers" => {
            let names = orchestrator.worker_names().join(", ");
            write_line(output, &format!("Workers: {names}")).await?;
            Ok(LoopControl::Continue)
        }
        "quit" | "exit" | "q" => {
            write_line(output, "Goodbye.").await?;
            Ok(LoopControl::Exit)
        }
        other => {
            write_line(
                output,
                &format!("Unknown command '/{other}'. Type /help for the list."),
            )
            .await?;
            Ok(LoopControl::Continue)
        }
    }
}

async fn print_banner<P, W>(output: &mut W, orchestrator: &Orchestrator<P>) -> io::Result<()>
where
    P: ModelProvider,
    W: AsyncWrite + Unpin,
{
    write_line(output, "Flub travel assistant. Ask about flights, weather or travel disruptions.")
        .await?;
    write_line(
        output,
        &format!("Workers: {}", orchestrator.worker_names().join(", ")),
    )
    .await?;
    write_line(output, "Type /help for commands.").await
}

async fn print_help<W: AsyncWrite + Unpin>(output: &mut W) -> io::Result<()> {
    write_line(output, "\nCommands:").await?;
    write_line(output, "  /help      Show this help").await?;
    write_line(output, "  /workers   List the available workers").await?;
    write_line(output, "  /clear     Forget the conversation so far").await?;
    write_line(output, "  /quit      Leave the chat").await
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{StubModel, last_content, toolbox};
    use crate::config::AppConfig;
    use crate::infrastructure::model::ModelResponse;

    fn orchestrator() -> Orchestrator<StubModel> {
        let model = StubModel::new(|request| {
            if last_content(request).starts_with("Analyze this message") {
                Ok(ModelResponse::new("NONE"))
            } else {
                Ok(ModelResponse::new("Happy to help."))
            }
        });
        Orchestrator::from_config(&AppConfig::default(), Arc::new(model), toolbox(Vec::new()))
    }

    async fn session(orchestrator: &Orchestrator<StubModel>, script: &str) -> String {
        let mut output = Vec::new();
        run_with(orchestrator, LOCAL_SENDER, script.as_bytes(), &mut output)
            .await
            .expect("session runs");
        String::from_utf8(output).expect("utf8 output")
    }

    #[tokio::test]
    async fn chat_answers_and_records_history() {
        let orchestrator = orchestrator();
        let transcript = session(&orchestrator, "hello there\n/quit\nignored\n").await;

        assert!(transcript.contains("Assistant:\nHappy to help."));
        assert!(transcript.contains("Goodbye."));
        assert_eq!(orchestrator.store().turns(LOCAL_SENDER).await.len(), 2);
    }

    #[tokio::test]
    async fn clear_command_forgets_history() {
        let orchestrator = orchestrator();
        let transcript = session(&orchestrator, "hi\n/clear\n/clear\n").await;

        assert!(transcript.contains("History cleared."));
        assert!(transcript.contains("No history found."));
        assert!(transcript.contains("Input closed."));
        assert_eq!(orchestrator.active_conversations().await, 0);
    }

    #[tokio::test]
    async fn unknown_commands_are_not_routed() {
        let orchestrator = orchestrator();
        let transcript = session(&orchestrator, "/frobnicate\n").await;

        assert!(transcript.contains("Unknown command '/frobnicate'"));
        assert!(orchestrator.store().turns(LOCAL_SENDER).await.is_empty());
    }
}
