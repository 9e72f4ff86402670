//! Line-oriented event script driving the headless runtime.
//!
//! ```text
//! # comments and blank lines are ignored
//! next latest
//! resize 600
//! wait 200
//! select 2
//! swipe 300 120
//! key left
//! field bio Second year student.
//! validate
//! upload image/png 204800
//! open editAccountModal
//! key escape
//! faq 1
//! search wifi
//! compare 7 Qwetu Hostel
//! quit
//! ```

use core_events::{
    AsyncEventSource, CHANNEL_SEND_FAILURES, CommandEvent, Event, INPUT_EVENTS_TOTAL,
    InputEvent, NavDirection, NavKey,
};
use core_forms::Field;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Emit(InputEvent),
    Wait(Duration),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects {expected}")]
    BadArguments {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: too many arguments")]
    TooManyArguments { line: usize },
}

fn number<T: std::str::FromStr>(
    arg: Option<&str>,
    line: usize,
    command: &'static str,
    expected: &'static str,
) -> Result<T, ScriptError> {
    arg.and_then(|a| a.parse().ok())
        .ok_or(ScriptError::BadArguments {
            line,
            command,
            expected,
        })
}

/// First word and the trimmed remainder.
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (text, ""),
    }
}

/// Commands whose last argument runs to the end of the line.
fn parse_text_command(
    command: &str,
    rest: &str,
    line: usize,
) -> Option<Result<ScriptCommand, ScriptError>> {
    let input = match command {
        "field" => {
            let (name, value) = split_word(rest);
            match name.parse::<Field>() {
                Ok(field) => InputEvent::Field {
                    name: field.as_str().to_string(),
                    value: value.to_string(),
                },
                Err(_) => {
                    return Some(Err(ScriptError::BadArguments {
                        line,
                        command: "field",
                        expected: "a profile field name and its value",
                    }));
                }
            }
        }
        "search" => InputEvent::FaqSearch(rest.to_string()),
        "compare" => {
            let (id, name) = split_word(rest);
            if id.is_empty() {
                return Some(Err(ScriptError::BadArguments {
                    line,
                    command: "compare",
                    expected: "a hostel id and optional name",
                }));
            }
            let name = if name.is_empty() { id } else { name };
            InputEvent::Compare {
                id: id.to_string(),
                name: name.to_string(),
            }
        }
        _ => return None,
    };
    Some(Ok(ScriptCommand::Emit(input)))
}

/// Parse one script line. `line` is 1-based and only used for error reports.
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(text: &str, line: usize) -> Result<Option<ScriptCommand>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = split_word(text);
    if let Some(parsed) = parse_text_command(head, rest, line) {
        return parsed.map(Some);
    }

    let mut parts = text.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let first = parts.next();
    let second = parts.next();
    if parts.next().is_some() {
        return Err(ScriptError::TooManyArguments { line });
    }

    let nav = |direction: NavDirection, command: &'static str| match (first, second) {
        (Some(id), None) => Ok(ScriptCommand::Emit(InputEvent::Nav {
            carousel: id.to_string(),
            direction,
        })),
        _ => Err(ScriptError::BadArguments {
            line,
            command,
            expected: "a carousel id",
        }),
    };

    let cmd = match command {
        "next" => nav(NavDirection::Next, "next")?,
        "prev" => nav(NavDirection::Prev, "prev")?,
        "resize" => ScriptCommand::Emit(InputEvent::Resize(number(
            first,
            line,
            "resize",
            "a width in pixels",
        )?)),
        "select" => ScriptCommand::Emit(InputEvent::Thumbnail(number(
            first,
            line,
            "select",
            "a thumbnail index",
        )?)),
        "swipe" => ScriptCommand::Emit(InputEvent::Swipe {
            start_x: number(first, line, "swipe", "start and end x coordinates")?,
            end_x: number(second, line, "swipe", "start and end x coordinates")?,
        }),
        "key" => {
            let key = match first {
                Some("left") => NavKey::ArrowLeft,
                Some("right") => NavKey::ArrowRight,
                Some("escape") => NavKey::Escape,
                Some(other) if other.chars().count() == 1 => {
                    NavKey::Other(other.chars().next().unwrap_or(' '))
                }
                _ => {
                    return Err(ScriptError::BadArguments {
                        line,
                        command: "key",
                        expected: "`left`, `right`, `escape` or a single character",
                    });
                }
            };
            ScriptCommand::Emit(InputEvent::Key(key))
        }
        "wait" => ScriptCommand::Wait(Duration::from_millis(number(
            first,
            line,
            "wait",
            "a duration in milliseconds",
        )?)),
        "validate" => ScriptCommand::Emit(InputEvent::Validate),
        "upload" => match first {
            Some(mime) => ScriptCommand::Emit(InputEvent::Upload {
                mime: mime.to_string(),
                size: number(second, line, "upload", "a MIME type and a size in bytes")?,
            }),
            None => {
                return Err(ScriptError::BadArguments {
                    line,
                    command: "upload",
                    expected: "a MIME type and a size in bytes",
                });
            }
        },
        "faq" => ScriptCommand::Emit(InputEvent::FaqToggle(number(
            first,
            line,
            "faq",
            "an item index",
        )?)),
        "open" | "close" => {
            let Some(id) = first.filter(|_| second.is_none()) else {
                return Err(ScriptError::BadArguments {
                    line,
                    command: if command == "open" { "open" } else { "close" },
                    expected: "a modal id",
                });
            };
            let id = id.to_string();
            ScriptCommand::Emit(if command == "open" {
                InputEvent::ModalOpen(id)
            } else {
                InputEvent::ModalClose(id)
            })
        }
        "overlay" => ScriptCommand::Emit(InputEvent::OverlayClick),
        "quit" => ScriptCommand::Quit,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(Some(cmd))
}

/// Where the script is read from.
#[derive(Debug, Clone)]
pub enum ScriptInput {
    Stdin,
    File(PathBuf),
    #[cfg(test)]
    Inline(String),
}

/// Event source replaying a script into the runtime channel. Sends
/// `Event::Shutdown` when the script ends without `quit`.
pub struct ScriptEventSource {
    input: ScriptInput,
}

impl ScriptEventSource {
    pub fn new(input: ScriptInput) -> Self {
        Self { input }
    }
}

async fn open(input: ScriptInput) -> std::io::Result<Box<dyn AsyncBufRead + Send + Unpin>> {
    Ok(match input {
        ScriptInput::Stdin => Box::new(BufReader::new(tokio::io::stdin())),
        ScriptInput::File(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        #[cfg(test)]
        ScriptInput::Inline(text) => Box::new(std::io::Cursor::new(text.into_bytes())),
    })
}

async fn send(tx: &Sender<Event>, event: Event) -> bool {
    if tx.send(event).await.is_err() {
        CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
        return false;
    }
    true
}

impl AsyncEventSource for ScriptEventSource {
    fn name(&self) -> &'static str {
        "script"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let reader = match open(self.input).await {
                Ok(reader) => reader,
                Err(err) => {
                    error!(target: "runtime.events", %err, "script_open_failed");
                    send(&tx, Event::Shutdown).await;
                    return;
                }
            };

            let mut lines = LinesStream::new(reader.lines());
            let mut line_no = 0usize;
            while let Some(next) = lines.next().await {
                line_no += 1;
                let text = match next {
                    Ok(text) => text,
                    Err(err) => {
                        error!(target: "runtime.events", line = line_no, %err, "script_read_failed");
                        break;
                    }
                };
                match parse_line(&text, line_no) {
                    Ok(None) => {}
                    Ok(Some(ScriptCommand::Emit(input))) => {
                        debug!(target: "runtime.events", line = line_no, ?input, "script_event");
                        if !send(&tx, Event::Input(input)).await {
                            return;
                        }
                        INPUT_EVENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(Some(ScriptCommand::Wait(dur))) => tokio::time::sleep(dur).await,
                    Ok(Some(ScriptCommand::Quit)) => {
                        info!(target: "runtime.events", line = line_no, "script_quit");
                        send(&tx, Event::Command(CommandEvent::Quit)).await;
                        return;
                    }
                    Err(err) => warn!(target: "runtime.events", %err, "script_line_rejected"),
                }
            }

            info!(target: "runtime.events", lines = line_no, "script_finished");
            send(&tx, Event::Shutdown).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn emit(input: InputEvent) -> Option<ScriptCommand> {
        Some(ScriptCommand::Emit(input))
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_line("next latest", 1),
            Ok(emit(InputEvent::Nav {
                carousel: "latest".into(),
                direction: NavDirection::Next
            }))
        );
        assert_eq!(
            parse_line("  prev more ", 1),
            Ok(emit(InputEvent::Nav {
                carousel: "more".into(),
                direction: NavDirection::Prev
            }))
        );
        assert_eq!(parse_line("resize 600", 1), Ok(emit(InputEvent::Resize(600))));
        assert_eq!(parse_line("select 2", 1), Ok(emit(InputEvent::Thumbnail(2))));
        assert_eq!(
            parse_line("swipe 300 120.5", 1),
            Ok(emit(InputEvent::Swipe {
                start_x: 300.0,
                end_x: 120.5
            }))
        );
        assert_eq!(
            parse_line("key left", 1),
            Ok(emit(InputEvent::Key(NavKey::ArrowLeft)))
        );
        assert_eq!(
            parse_line("key q", 1),
            Ok(emit(InputEvent::Key(NavKey::Other('q'))))
        );
        assert_eq!(
            parse_line("wait 250", 1),
            Ok(Some(ScriptCommand::Wait(Duration::from_millis(250))))
        );
        assert_eq!(parse_line("quit", 1), Ok(Some(ScriptCommand::Quit)));
    }

    #[test]
    fn parses_page_commands() {
        assert_eq!(
            parse_line("field bio  Second year, Block 7 ", 1),
            Ok(emit(InputEvent::Field {
                name: "bio".into(),
                value: "Second year, Block 7".into()
            }))
        );
        assert_eq!(
            parse_line("field town", 1),
            Ok(emit(InputEvent::Field {
                name: "town".into(),
                value: String::new()
            }))
        );
        assert_eq!(parse_line("validate", 1), Ok(emit(InputEvent::Validate)));
        assert_eq!(
            parse_line("upload image/png 2048", 1),
            Ok(emit(InputEvent::Upload {
                mime: "image/png".into(),
                size: 2048
            }))
        );
        assert_eq!(parse_line("faq 2", 1), Ok(emit(InputEvent::FaqToggle(2))));
        assert_eq!(
            parse_line("search Wi Fi", 1),
            Ok(emit(InputEvent::FaqSearch("Wi Fi".into())))
        );
        assert_eq!(parse_line("search", 1), Ok(emit(InputEvent::FaqSearch(String::new()))));
        assert_eq!(
            parse_line("compare 7 Qwetu Hostel", 1),
            Ok(emit(InputEvent::Compare {
                id: "7".into(),
                name: "Qwetu Hostel".into()
            }))
        );
        assert_eq!(
            parse_line("compare 9", 1),
            Ok(emit(InputEvent::Compare {
                id: "9".into(),
                name: "9".into()
            }))
        );
        assert_eq!(
            parse_line("open editAccountModal", 1),
            Ok(emit(InputEvent::ModalOpen("editAccountModal".into())))
        );
        assert_eq!(
            parse_line("close editAccountModal", 1),
            Ok(emit(InputEvent::ModalClose("editAccountModal".into())))
        );
        assert_eq!(parse_line("overlay", 1), Ok(emit(InputEvent::OverlayClick)));
        assert_eq!(
            parse_line("key escape", 1),
            Ok(emit(InputEvent::Key(NavKey::Escape)))
        );
    }

    #[test]
    fn page_command_errors() {
        assert_eq!(
            parse_line("field age 21", 3),
            Err(ScriptError::BadArguments {
                line: 3,
                command: "field",
                expected: "a profile field name and its value"
            })
        );
        assert!(parse_line("field", 3).is_err());
        assert!(parse_line("compare", 3).is_err());
        assert!(parse_line("upload image/png", 3).is_err());
        assert!(parse_line("upload", 3).is_err());
        assert!(parse_line("faq first", 3).is_err());
        assert!(parse_line("open", 3).is_err());
        assert!(parse_line("close a b", 3).is_err());
    }

    #[test]
    fn skips_comments_and_blanks() {
        assert_eq!(parse_line("", 1), Ok(None));
        assert_eq!(parse_line("   ", 1), Ok(None));
        assert_eq!(parse_line("# next latest", 1), Ok(None));
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(
            parse_line("jump 3", 7),
            Err(ScriptError::UnknownCommand {
                line: 7,
                command: "jump".into()
            })
        );
        let err = parse_line("resize wide", 4).unwrap_err();
        assert_eq!(err.to_string(), "line 4: `resize` expects a width in pixels");
        assert!(parse_line("next", 2).is_err());
        assert!(parse_line("swipe 10", 2).is_err());
        assert!(parse_line("key up", 2).is_err());
        assert!(parse_line("resize -5", 2).is_err());
        assert_eq!(
            parse_line("swipe 1 2 3", 9),
            Err(ScriptError::TooManyArguments { line: 9 })
        );
    }

    #[tokio::test]
    async fn replays_inline_script_then_shuts_down() {
        let (tx, mut rx) = mpsc::channel(16);
        let script = "next latest\nbogus\n# note\nresize 700\n";
        let handle = Box::new(ScriptEventSource::new(ScriptInput::Inline(script.into()))).spawn(tx);

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        handle.await.unwrap();
        assert_eq!(
            events,
            vec![
                Event::Input(InputEvent::Nav {
                    carousel: "latest".into(),
                    direction: NavDirection::Next
                }),
                Event::Input(InputEvent::Resize(700)),
                Event::Shutdown,
            ]
        );
    }

    #[tokio::test]
    async fn quit_stops_replay() {
        let (tx, mut rx) = mpsc::channel(16);
        let script = "quit\nnext latest\n";
        Box::new(ScriptEventSource::new(ScriptInput::Inline(script.into())))
            .spawn(tx)
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(Event::Command(CommandEvent::Quit)));
        assert_eq!(rx.recv().await, None);
    }
}
