use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::application::UploadWidget;
use crate::domain::submission::Severity;
use crate::domain::ui_state::UiState;
use crate::domain::upload::FileCandidate;
use crate::interfaces::view::WidgetView;

pub const HELP: &str = "\
commands:
  pick <path>     choose a file as if from the file picker
  drop <path>     drop a file onto the upload zone
  source <name>   set the source column name
  dest <name>     set the destination column name
  submit          send the file for processing
  state           show the current form state
  help            show this help
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Pick(PathBuf),
    Drop(PathBuf),
    Source(String),
    Dest(String),
    Submit,
    State,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Blank lines parse to `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "pick" => ConsoleCommand::Pick(require_path(verb, rest)?),
            "drop" => ConsoleCommand::Drop(require_path(verb, rest)?),
            // column text is stored raw; the widget trims on use
            "source" => ConsoleCommand::Source(rest.to_string()),
            "dest" => ConsoleCommand::Dest(rest.to_string()),
            "submit" => ConsoleCommand::Submit,
            "state" => ConsoleCommand::State,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(format!("unknown command {:?}, try `help`", other)),
        };
        Ok(Some(command))
    }
}

fn require_path(verb: &str, rest: &str) -> Result<PathBuf, String> {
    if rest.is_empty() {
        Err(format!("`{}` needs a file path", verb))
    } else {
        Ok(PathBuf::from(rest))
    }
}

/// Renders the widget as text on a writer (stdout by default).
pub struct ConsoleView<W: Write> {
    out: W,
    last: Option<UiState>,
}

impl ConsoleView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_state(&mut self, state: &UiState) -> std::io::Result<()> {
        if let Some(label) = state.selected_file_label() {
            writeln!(self.out, "{}", label)?;
        }
        if state.is_loading() {
            writeln!(self.out, "Processing...")?;
        }
        if let Some(message) = state.message() {
            let marker = match message.severity {
                Severity::Info => "[info]",
                Severity::Error => "[error]",
                Severity::Success => "[ok]",
            };
            writeln!(self.out, "{} {}", marker, message.text)?;
        }
        writeln!(
            self.out,
            "submit: {}",
            if state.is_submit_enabled() { "ready" } else { "disabled" }
        )?;
        self.out.flush()
    }

    fn show(&mut self, state: &UiState) {
        if let Err(err) = self.print_state(state) {
            warn!(error = %err, "Failed to write console output");
        }
    }
}

impl<W: Write> WidgetView for ConsoleView<W> {
    fn render(&mut self, state: &UiState) {
        // the console has no drop-zone highlight, so skip frames that only toggle it
        let unchanged = self.last.as_ref().is_some_and(|last| {
            last.message() == state.message()
                && last.is_loading() == state.is_loading()
                && last.selected_file_label() == state.selected_file_label()
                && last.is_submit_enabled() == state.is_submit_enabled()
        });
        self.last = Some(state.clone());
        if !unchanged {
            self.show(state);
        }
    }
}

/// Feeds console commands into the widget until `quit` or end of input.
pub async fn run_console<R>(
    widget: &mut UploadWidget<ConsoleView<std::io::Stdout>>,
    input: R,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        debug!(command = ?command, "Console command");

        match command {
            ConsoleCommand::Pick(path) => {
                let candidate = load_candidate(&path).await;
                widget.on_file_chosen(candidate);
            }
            ConsoleCommand::Drop(path) => {
                let candidate = load_candidate(&path).await;
                widget.on_drag_enter();
                widget.on_drop(candidate);
            }
            ConsoleCommand::Source(value) => widget.on_source_column_changed(value),
            ConsoleCommand::Dest(value) => widget.on_dest_column_changed(value),
            ConsoleCommand::Submit => widget.on_submit_clicked().await,
            ConsoleCommand::State => {
                println!(
                    "source column: {:?}, destination column: {:?}",
                    widget.source_column(),
                    widget.dest_column()
                );
                let state = widget.state().clone();
                widget.view_mut().show(&state);
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }
    Ok(())
}

/// An unreadable path behaves like a picker that returned nothing.
async fn load_candidate(path: &std::path::Path) -> Option<FileCandidate> {
    match FileCandidate::from_path(path).await {
        Ok(candidate) => Some(candidate),
        Err(err) => {
            warn!(error = %err, path = %path.display(), "Could not read file");
            None
        }
    }
}
