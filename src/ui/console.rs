//! Line-oriented shell. Parses typed commands into [`Command`]s and renders
//! the reactor's snapshot. It owns no state of its own.

use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use thiserror::Error;
use tracing::{debug, warn};

use crate::actor::capture::CaptureState;
use crate::actor::notification_center::{Notification, Presenter};
use crate::actor::reactor::{Command, Reactor};
use crate::common::config::ArrangeSettings;
use crate::layout_engine::GridPlan;
use crate::model::snapshot::Snapshot;
use crate::model::store::MoveDirection;
use crate::sys::window_system::WindowSystem;

pub const USAGE: &str = "\
commands:
  capture N                       click N windows to capture them (Esc cancels)
  title TEXT...                   capture every window titled TEXT
  restore                         put captured windows back where they were
  clear                           forget captured windows
  arrange [MON [X [Y [SPACING]]]] tile captured windows on monitor MON
  up N | down N                   move list entry N
  focus N                         bring list entry N to the front
  monitors                        re-enumerate monitors
  monitor INDEX                   select the monitor the hotkey arranges on
  list                            show captured windows and monitors
  help                            show this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    UnknownCommand(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{argument} must be a number, got `{value}`")]
    InvalidNumber { argument: &'static str, value: String },

    #[error("list entries are numbered from 1")]
    InvalidOrdinal,

    #[error("{}", USAGE)]
    Help,
}

/// What the reader thread hands to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Line(String),
    Closed,
}

fn number<T: std::str::FromStr>(argument: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber { argument, value: value.to_string() })
}

/// Turns a typed 1-based list entry into a list position.
fn ordinal(command: &'static str, value: Option<&str>) -> Result<usize, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument { command, argument: "an entry number" })?;
    let ordinal: usize = number("entry", value)?;
    ordinal.checked_sub(1).ok_or(ParseError::InvalidOrdinal)
}

/// Parses one line. Arrange arguments that are left out keep their value
/// from `current`. Blank lines are `Ok(None)`.
pub fn parse_line(line: &str, current: ArrangeSettings) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let cmd = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "capture" => {
            let count = args.next().ok_or(ParseError::MissingArgument {
                command: "capture",
                argument: "a window count",
            })?;
            Command::BeginCapture { count: number("count", count)? }
        }
        // Titles may contain spaces; an empty title is left for the reactor to reject.
        "title" => Command::CaptureByTitle { title: rest.to_string() },
        "restore" => Command::Restore,
        "clear" => Command::Clear,
        "arrange" => {
            let mut settings = current;
            if let Some(v) = args.next() {
                settings.monitor = number("monitor", v)?;
            }
            if let Some(v) = args.next() {
                settings.offset_x = number("x offset", v)?;
            }
            if let Some(v) = args.next() {
                settings.offset_y = number("y offset", v)?;
            }
            if let Some(v) = args.next() {
                settings.min_spacing_y = number("spacing", v)?;
            }
            Command::arrange(settings)
        }
        "up" => Command::Move {
            position: ordinal("up", args.next())?,
            direction: MoveDirection::Up,
        },
        "down" => Command::Move {
            position: ordinal("down", args.next())?,
            direction: MoveDirection::Down,
        },
        "focus" => Command::Focus { position: ordinal("focus", args.next())? },
        "monitors" => Command::RefreshMonitors,
        "monitor" => {
            let index = args.next().ok_or(ParseError::MissingArgument {
                command: "monitor",
                argument: "a monitor index",
            })?;
            Command::SelectMonitor { index: number("monitor", index)? }
        }
        "list" | "ls" => Command::List,
        "quit" | "exit" => Command::Quit,
        "help" | "?" => return Err(ParseError::Help),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

/// Parses `line` against the reactor's current settings and dispatches it.
pub fn apply_line<S: WindowSystem>(reactor: &mut Reactor<S>, line: &str) -> Result<(), ParseError> {
    if let Some(cmd) = parse_line(line, reactor.settings())? {
        reactor.dispatch(cmd);
    }
    Ok(())
}

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.windows.is_empty() {
        out.push_str("no captured windows\n");
    } else {
        let _ = writeln!(out, "{:>3}  {:<18}  {:<20}  title", "#", "handle", "frame");
        for row in &snapshot.windows {
            let _ = writeln!(
                out,
                "{:>3}  {:<18}  {:<20}  {}",
                row.ordinal,
                row.handle,
                row.frame.to_string(),
                row.title
            );
        }
    }

    for monitor in &snapshot.monitors {
        let marker = if monitor.index == snapshot.selected_monitor { '*' } else { ' ' };
        let _ = writeln!(out, "{marker}{:>2}  {}", monitor.index, monitor.label);
    }
    if snapshot.monitors.is_empty() {
        out.push_str("no monitors\n");
    }

    match snapshot.capture_state {
        CaptureState::Idle => {}
        CaptureState::Capturing { target, captured } => {
            let _ = writeln!(out, "capturing {captured}/{target}");
        }
        state => {
            let _ = writeln!(out, "capture {state:?}, finishing");
        }
    }
    out
}

pub fn render_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        warn!(%err, "Could not serialize");
        String::from("{}")
    })
}

pub fn render_plan(plan: &GridPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} rows x {} columns, spacing {}",
        plan.shape.rows, plan.shape.columns, plan.spacing
    );
    let _ = writeln!(out, "row heights: {:?}", plan.row_heights);
    let _ = writeln!(out, "column widths: {:?}", plan.column_widths);
    for (i, cell) in plan.cells.iter().enumerate() {
        let _ = writeln!(out, "{:>3}  {cell}", i + 1);
    }
    out
}

/// Prints notifications on stdout, or as JSON lines.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    pub json: bool,
}

impl ConsolePresenter {
    pub fn format(&self, notification: &Notification) -> String {
        if self.json {
            serde_json::to_string(notification).unwrap_or_default()
        } else {
            format!("[{}] {}", notification.caption, notification.message)
        }
    }
}

impl Presenter for ConsolePresenter {
    fn present(&mut self, notification: &Notification) { println!("{}", self.format(notification)); }
}

/// Reads stdin on its own thread and forwards each line. `wake` is called
/// after every send so a loop blocked on OS messages notices.
pub fn spawn_reader<W>(tx: Sender<ConsoleInput>, wake: W) -> io::Result<JoinHandle<()>>
where
    W: Fn() + Send + 'static,
{
    thread::Builder::new().name("console".to_string()).spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "stdin read failed");
                    break;
                }
            };
            if tx.send(ConsoleInput::Line(line)).is_err() {
                return;
            }
            wake();
        }
        debug!("stdin closed");
        let _ = tx.send(ConsoleInput::Closed);
        wake();
    })
}
