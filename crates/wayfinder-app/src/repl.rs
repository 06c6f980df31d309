//! Interactive host loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;
use wayfinder_agent::Orchestrator;

pub const WELCOME: &str = "Wayfinder travel assistant. Ask about the weather or places to visit. \
                           Type '/clear' to start over, 'exit' or 'quit' to leave.";
const PROMPT: &str = "You: ";

/// One line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Clear,
    Skip,
    Ask(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Skip;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Command::Exit;
        }
        if line == "/clear" {
            return Command::Clear;
        }
        Command::Ask(line)
    }
}

/// Read questions until `exit`, `quit`, or end of input.
pub async fn run<R, W>(
    orchestrator: &mut Orchestrator,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("{WELCOME}\n").as_bytes()).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        match Command::parse(&line) {
            Command::Exit => break,
            Command::Skip => continue,
            Command::Clear => {
                orchestrator.reset_session();
                info!(session = %orchestrator.session().id(), "session cleared");
                output.write_all(b"AI: Conversation cleared.\n").await?;
            }
            Command::Ask(question) => {
                let reply = orchestrator.handle(question).await;
                output.write_all(format!("AI: {reply}\n").as_bytes()).await?;
            }
        }
    }

    output.write_all(b"Goodbye!\n").await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use wayfinder_agent::CapabilityRegistry;
    use wayfinder_ai::{AiClient, AiError, AiResponse, Message, ToolDefinition};

    /// Engine that answers with queued final answers.
    struct Canned(Mutex<VecDeque<&'static str>>);

    #[async_trait]
    impl AiClient for Canned {
        async fn send_message(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<AiResponse, AiError> {
            let answer = self.0.lock().unwrap().pop_front().unwrap_or("done");
            Ok(AiResponse {
                content: format!("Final Answer: {answer}"),
                ..Default::default()
            })
        }
    }

    fn orchestrator(answers: &[&'static str]) -> Orchestrator {
        let engine = Canned(Mutex::new(answers.iter().copied().collect()));
        Orchestrator::new(Arc::new(engine), Arc::new(CapabilityRegistry::new()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  QUIT "), Command::Exit);
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("/clear"), Command::Clear);
        assert_eq!(Command::parse("   "), Command::Skip);
        assert_eq!(Command::parse(" Rome? "), Command::Ask("Rome?"));
    }

    #[tokio::test]
    async fn answers_until_exit() {
        let mut orch = orchestrator(&["Sunny.", "Unused."]);
        let mut out = Vec::new();

        run(&mut orch, &b"Weather in Rome?\n\nexit\nignored\n"[..], &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(WELCOME));
        assert!(text.contains("AI: Sunny.\n"));
        assert!(!text.contains("Unused."));
        assert!(text.ends_with("Goodbye!\n"));
        assert_eq!(orch.session().len(), 2);
    }

    #[tokio::test]
    async fn clear_resets_history_and_eof_ends() {
        let mut orch = orchestrator(&["One.", "Two."]);
        let mut out = Vec::new();

        run(&mut orch, &b"first\n/clear\nsecond\n"[..], &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AI: Conversation cleared.\n"));
        assert!(text.contains("AI: Two.\n"));
        assert_eq!(orch.session().len(), 2);
        assert_eq!(orch.session().last_reply(), Some("Two."));
    }
}
