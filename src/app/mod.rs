//! Interactive front end
//!
//! A line-oriented prompt over a [`Session`]. The session owns the blocks
//! and their run state; this module only turns typed input into session
//! calls and redraws headers and output from block events.

mod input;
mod view;

use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use runmd::ansi::{Painter, Style};
use runmd::error::Error;
use runmd::events::{BlockEvent, EventReceiver};
use runmd::execution::StreamType;
use runmd::models::BlockState;
use runmd::session::Session;

use input::{parse_action, Action, HELP};

/// Prompt printed while waiting for input
const PROMPT: &str = "runmd> ";

/// Interactive application state
pub struct InteractiveApp {
    /// Document name shown in the title
    name: String,
    session: Session,
    events: EventReceiver,
    painter: Painter,
}

impl InteractiveApp {
    /// Create the application over an opened session
    pub fn new(name: String, session: Session, events: EventReceiver) -> Self {
        Self {
            name,
            session,
            events,
            painter: Painter::auto(),
        }
    }

    /// Run until the user quits or stdin closes
    pub async fn run(mut self) -> io::Result<()> {
        println!(
            "{}  {}",
            self.painter.paint(&self.name, Style::Bold),
            self.painter
                .paint(format!("{} shell blocks, h for help", self.session.len()), Style::Dim)
        );
        println!("{}", view::listing(&self.session, &self.painter));
        prompt()?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    if !self.handle_line(&line) {
                        break;
                    }
                    prompt()?;
                }
                Some(envelope) = self.events.recv() => {
                    self.handle_event(envelope.event)?;
                }
            }
        }

        self.wait_for_running().await
    }

    /// Apply one line of input, returning `false` to quit
    fn handle_line(&mut self, line: &str) -> bool {
        let action = match parse_action(line) {
            Ok(action) => action,
            Err(e) => {
                println!("{}", self.painter.paint(e.to_string(), Style::Red));
                return true;
            }
        };

        match action {
            Action::Quit => return false,
            Action::Help => println!("{}", HELP),
            Action::List => println!("{}", view::listing(&self.session, &self.painter)),
            Action::Next => {
                self.session.focus_next();
                self.print_focused();
            }
            Action::Prev => {
                self.session.focus_prev();
                self.print_focused();
            }
            Action::Jump(index) => match self.session.set_focus(index) {
                Ok(()) => self.print_focused(),
                Err(e) => println!("{}", self.painter.paint(e.to_string(), Style::Red)),
            },
            Action::Show => {
                if let Some(block) = self.session.focused() {
                    println!("{}", view::details(block, &self.painter));
                }
            }
            Action::Run => self.trigger_focused(),
        }

        true
    }

    fn trigger_focused(&mut self) {
        // The spawned task reports back through block events
        match self.session.trigger_focused() {
            Ok(_handle) => {}
            Err(Error::BlockAlreadyRunning { index }) => {
                debug!("Block {} already running, ignoring trigger", index);
            }
            Err(e @ Error::SessionBusy { .. }) => {
                println!("{}", self.painter.paint(e.to_string(), Style::Yellow));
            }
            Err(e) => warn!("Could not run block: {}", e),
        }
    }

    fn handle_event(&mut self, event: BlockEvent) -> io::Result<()> {
        match event {
            BlockEvent::OutputChanged { chunk, .. } => {
                let mut stdout = io::stdout().lock();
                match chunk.stream {
                    StreamType::Stdout => write!(stdout, "{}", chunk.text)?,
                    StreamType::Stderr => {
                        write!(stdout, "{}", self.painter.paint(&chunk.text, Style::Red))?
                    }
                }
                stdout.flush()?;
            }
            BlockEvent::HeaderChanged { index, state, .. } => {
                let Some(block) = self.session.block(index) else {
                    return Ok(());
                };
                let focused = self.session.focus() == Some(index);
                println!("{}", view::header(block, focused, &self.painter));

                if state == BlockState::Done {
                    if let Some(pretty) = view::finished_output(&block.state()) {
                        println!("{}", pretty);
                    }
                    prompt()?;
                }
            }
        }
        Ok(())
    }

    /// Let a run started before quitting finish and print its result
    async fn wait_for_running(&mut self) -> io::Result<()> {
        while self.session.running().is_some() {
            match self.events.recv().await {
                Some(envelope) => self.handle_event(envelope.event)?,
                None => break,
            }
        }
        Ok(())
    }

    fn print_focused(&self) {
        if let Some(block) = self.session.focused() {
            println!("{}", view::header(block, true, &self.painter));
        }
    }
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()
}
