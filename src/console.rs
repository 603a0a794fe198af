use crate::api::{BattleApi, Side};
use crate::errors::SessionError;
use crate::render;
use crate::session::ratings::Dimension;
use crate::session::store::ConnectionStatus;
use crate::session::{BattleSession, Notification};
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

const HELP: &str = "\
Commands:
  status                                  show backend connection status
  retry                                   reconnect to the backend
  models                                  list available models
  use <1|2> <model-id>                    pick the model for fighter 1 or 2
  samples                                 list sample texts
  sample <id>                             load a listed sample text
  fetch <id>                              fetch a sample text from the backend
  text <content>                          replace the input text
  paste                                   enter multi-line text, end with a line holding only '.'
  clear                                   clear the input text
  input                                   show input text statistics
  battle                                  compare summaries from both models
  results                                 show the last battle results
  rate <1|2> <dimension> <1-5>            rate clarity, accuracy or conciseness
  prefer <1|2>                            pick the overall winner
  chart                                   show the rating comparison
  clear-cache                             ask the backend to drop its model cache
  quit                                    exit
";

const USE_USAGE: &str = "use <1|2> <model-id>";
const RATE_USAGE: &str = "rate <1|2> <clarity|accuracy|conciseness> <1-5>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Retry,
    Models,
    Use(Side, String),
    Samples,
    Sample(u32),
    Fetch(u32),
    Text(String),
    Paste,
    Clear,
    Input,
    Battle,
    Results,
    Rate(Side, Dimension, u8),
    Prefer(Side),
    Chart,
    ClearCache,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
}

fn parse_side(raw: &str) -> Result<Side, CommandError> {
    raw.parse().map_err(CommandError::Invalid)
}

fn parse_id(raw: &str, usage: &'static str) -> Result<u32, CommandError> {
    raw.parse().map_err(|_| CommandError::Usage(usage))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "status" => Ok(Command::Status),
            "retry" => Ok(Command::Retry),
            "models" => Ok(Command::Models),
            "use" => match args.as_slice() {
                [s, id] => Ok(Command::Use(parse_side(s)?, id.to_string())),
                _ => Err(CommandError::Usage(USE_USAGE)),
            },
            "samples" => Ok(Command::Samples),
            "sample" => match args.as_slice() {
                [id] => Ok(Command::Sample(parse_id(id, "sample <id>")?)),
                _ => Err(CommandError::Usage("sample <id>")),
            },
            "fetch" => match args.as_slice() {
                [id] => Ok(Command::Fetch(parse_id(id, "fetch <id>")?)),
                _ => Err(CommandError::Usage("fetch <id>")),
            },
            "text" if rest.is_empty() => Err(CommandError::Usage("text <content>")),
            "text" => Ok(Command::Text(rest.to_string())),
            "paste" => Ok(Command::Paste),
            "clear" => Ok(Command::Clear),
            "input" => Ok(Command::Input),
            "battle" | "compare" => Ok(Command::Battle),
            "results" => Ok(Command::Results),
            "rate" => match args.as_slice() {
                [s, dim, value] => {
                    let dim = dim.parse::<Dimension>().map_err(CommandError::Invalid)?;
                    let value = value.parse::<u8>().map_err(|_| {
                        CommandError::Invalid(format!("rating must be a number from 1 to 5, got '{value}'"))
                    })?;
                    Ok(Command::Rate(parse_side(s)?, dim, value))
                }
                _ => Err(CommandError::Usage(RATE_USAGE)),
            },
            "prefer" => match args.as_slice() {
                [s] => Ok(Command::Prefer(parse_side(s)?)),
                _ => Err(CommandError::Usage("prefer <1|2>")),
            },
            "chart" => Ok(Command::Chart),
            "clear-cache" => Ok(Command::ClearCache),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Collects lines until a lone `.` or end of input. Read failures are only
/// logged and leave the input text untouched.
async fn read_paste<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Option<String> {
    let mut block: Vec<String> = Vec::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim_end() == "." => break,
            Ok(Some(line)) => block.push(line),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read pasted text");
                return None;
            }
        }
    }
    Some(block.join("\n"))
}

pub struct Console<A, W> {
    session: BattleSession<A>,
    out: W,
    prompt: bool,
}

impl<A: BattleApi, W: Write> Console<A, W> {
    pub fn new(session: BattleSession<A>, out: W, prompt: bool) -> Self {
        Self {
            session,
            out,
            prompt,
        }
    }

    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        self.connect().await?;
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(self.out, "battle> ")?;
                self.out.flush()?;
            }
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(error = ?e, "stdin closed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(c) => c,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
            };
            tracing::debug!(?command, "command received");
            match command {
                Command::Quit => break,
                Command::Paste => {
                    // Refused pastes leave the block unread.
                    match self.session.ensure_editable() {
                        Err(SessionError::NotConnected) => writeln!(
                            self.out,
                            "{}",
                            render::connection_gate(self.session.state())
                        )?,
                        Err(e) => self.report(e)?,
                        Ok(()) => {
                            if let Some(text) = read_paste(&mut lines).await {
                                self.execute(Command::Text(text)).await?;
                            }
                        }
                    }
                }
                other => self.execute(other).await?,
            }
            self.out.flush()?;
        }
        self.out.flush()?;
        Ok(())
    }

    async fn connect(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Connecting to Battle API...")?;
        self.out.flush()?;
        let outcome = self.session.initialize().await;
        tracing::debug!(ok = outcome.is_ok(), "initialization finished");
        writeln!(self.out, "{}", render::connection_gate(self.session.state()))?;
        self.out.flush()
    }

    fn report(&mut self, err: SessionError) -> std::io::Result<()> {
        writeln!(self.out, "error: {err}")
    }

    fn after_text_change(&mut self, outcome: Result<(), SessionError>) -> std::io::Result<()> {
        match outcome {
            Ok(()) => write!(self.out, "{}", render::text_input(self.session.state())),
            Err(e) => self.report(e),
        }
    }

    fn after_rating_change(&mut self, outcome: Result<(), SessionError>) -> std::io::Result<()> {
        match outcome {
            Ok(()) => write!(self.out, "{}", render::rating_chart(self.session.state())),
            Err(e) => self.report(e),
        }
    }

    async fn execute(&mut self, command: Command) -> std::io::Result<()> {
        let gated = !matches!(
            command,
            Command::Help | Command::Status | Command::Retry
        );
        if gated && self.session.state().connection() != ConnectionStatus::Connected {
            return writeln!(
                self.out,
                "{}",
                render::connection_gate(self.session.state())
            );
        }

        match command {
            Command::Help => write!(self.out, "{HELP}"),
            Command::Status => writeln!(
                self.out,
                "{}",
                render::connection_gate(self.session.state())
            ),
            Command::Retry => self.connect().await,
            Command::Models => {
                write!(self.out, "{}", render::model_list(self.session.state().catalog()))?;
                write!(self.out, "{}", render::selection(self.session.state()))
            }
            Command::Use(side, id) => match self.session.select_model(side, &id) {
                Ok(()) => {
                    write!(self.out, "{}", render::selection(self.session.state()))?;
                    if self.session.can_compare() {
                        writeln!(self.out, "Ready to battle!")?;
                    }
                    Ok(())
                }
                Err(e) => self.report(e),
            },
            Command::Samples => write!(
                self.out,
                "{}",
                render::sample_list(self.session.state().samples())
            ),
            Command::Sample(id) => {
                let outcome = self.session.select_sample(id);
                self.after_text_change(outcome)
            }
            Command::Fetch(id) => {
                let outcome = self.session.load_sample(id).await;
                self.after_text_change(outcome)
            }
            Command::Text(text) => {
                let outcome = self.session.set_input_text(&text);
                self.after_text_change(outcome)
            }
            Command::Clear => {
                let outcome = self.session.clear_text();
                self.after_text_change(outcome)
            }
            Command::Input => {
                write!(self.out, "{}", render::text_preview(self.session.state()))?;
                write!(self.out, "{}", render::text_input(self.session.state()))
            }
            Command::Battle => {
                writeln!(self.out, "Battle in progress...")?;
                self.out.flush()?;
                match self.session.compare().await {
                    Ok(()) => write!(self.out, "{}", render::results_panel(self.session.state())),
                    Err(e) => self.report(e),
                }
            }
            Command::Results => {
                write!(self.out, "{}", render::results_panel(self.session.state()))?;
                if let Some(err) = self.session.state().error() {
                    writeln!(self.out, "error: {err}")?;
                }
                Ok(())
            }
            Command::Rate(side, dimension, value) => {
                let outcome = self.session.rate(side, dimension, value);
                self.after_rating_change(outcome)
            }
            Command::Prefer(side) => {
                let outcome = self.session.set_preference(side);
                self.after_rating_change(outcome)
            }
            Command::Chart => match render::rating_chart(self.session.state()) {
                chart if chart.is_empty() => writeln!(self.out, "No results to chart yet"),
                chart => write!(self.out, "{chart}"),
            },
            Command::ClearCache => match self.session.clear_cache().await {
                Notification::Success(msg) => writeln!(self.out, "{msg}"),
                Notification::Failure(msg) => writeln!(self.out, "error: {msg}"),
            },
            Command::Paste | Command::Quit => Ok(()),
        }
    }
}
