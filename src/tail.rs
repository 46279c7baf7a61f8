use std::io::{self, Write};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{ApiCommand, ApiEvent, ChatMessage, ThreadId};

/// Remembers the last printed thread so unchanged polls print nothing.
#[derive(Default)]
struct ThreadPrinter {
    last: Option<Vec<ChatMessage>>,
}

impl ThreadPrinter {
    fn render(&mut self, messages: Vec<ChatMessage>) -> Option<String> {
        if self.last.as_ref() == Some(&messages) {
            return None;
        }
        let mut out = String::new();
        for message in &messages {
            out.push_str(&message.display_line());
            out.push('\n');
        }
        self.last = Some(messages);
        Some(out)
    }
}

/// Follow one chat thread in the terminal until Ctrl-C or the session ends.
pub async fn run(
    thread: ThreadId,
    commands: mpsc::Sender<ApiCommand>,
    mut events: mpsc::Receiver<ApiEvent>,
) -> io::Result<()> {
    let subscription = Uuid::new_v4();
    if commands
        .send(ApiCommand::OpenChat {
            subscription,
            thread: thread.clone(),
        })
        .await
        .is_err()
    {
        log::error!("API worker is not running");
        return Ok(());
    }

    let mut printer = ThreadPrinter::default();
    let mut stdout = io::stdout();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                log::info!("Interrupted, leaving chat {thread}");
                break;
            }
            event = events.recv() => match event {
                Some(ApiEvent::MessagesLoaded { subscription: got, messages }) if got == subscription => {
                    if let Some(block) = printer.render(messages) {
                        writeln!(stdout, "--- chat #{thread} ---")?;
                        stdout.write_all(block.as_bytes())?;
                        stdout.flush()?;
                    }
                }
                Some(ApiEvent::SessionInvalidated) => {
                    eprintln!("Session expired; log in again from the app.");
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
    }

    if let Err(err) = commands.send(ApiCommand::CloseChat { subscription }).await {
        log::debug!("Close command dropped: {err}");
    }
    Ok(())
}
