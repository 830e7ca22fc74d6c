//! Line-oriented chat loop.
//!
//! Reads one user turn per line, prints the model's answer, and keeps the
//! conversation history for the lifetime of the session. Generic over the
//! reader and writer so sessions can be driven from memory in tests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tutor_core::Entry;
use tutor_runtime::ChatService;

/// Banner printed when a session starts.
pub const WELCOME: &str = "Welcome to the Chat Service! Type 'exit' to quit.";
/// Prompt printed before each read.
pub const PROMPT: &str = "You: ";
/// Prefix of each printed answer.
pub const ANSWER_PREFIX: &str = "Gemini: ";
/// Printed when the user leaves.
pub const GOODBYE: &str = "Goodbye!";

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Run a chat session until EOF, `exit`/`quit`, or cancellation.
///
/// Failed turns print `Error: ...` and the session continues with the
/// history unchanged. Returns the session's history.
pub async fn run<R, W>(
    service: &ChatService,
    input: R,
    output: &mut W,
    cancel: &CancellationToken,
) -> std::io::Result<Vec<Entry>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut history = Vec::new();
    let mut lines = input.lines();

    output.write_all(format!("{WELCOME}\n").as_bytes()).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = cancel.cancelled() => {
                output.write_all(format!("\n{GOODBYE}\n").as_bytes()).await?;
                break;
            }
        };
        let Some(line) = line else {
            info!("input closed");
            break;
        };

        let user_input = line.trim();
        if is_exit_command(user_input) {
            output.write_all(format!("{GOODBYE}\n").as_bytes()).await?;
            break;
        }
        if user_input.is_empty() {
            continue;
        }

        match service.reply(&mut history, user_input).await {
            Ok(answer) => {
                output
                    .write_all(format!("{ANSWER_PREFIX}{answer}\n").as_bytes())
                    .await?;
            }
            Err(err) => {
                warn!(error = %err, "turn failed");
                output.write_all(format!("Error: {err}\n").as_bytes()).await?;
                if cancel.is_cancelled() {
                    output.write_all(format!("{GOODBYE}\n").as_bytes()).await?;
                    break;
                }
            }
        }
    }

    output.flush().await?;
    Ok(history)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
