//! Interactive game list editor.
//!
//! A line-oriented front end over the store, the supervisor and the shortcut
//! writer. Launches run in the background; their results are printed before
//! the next prompt, and quitting waits for games that are still running so
//! their helpers get stopped.

use crate::launches::{ActiveLaunches, LaunchResult};
use crate::notify::{self, GAME_NOT_FOUND};
use anyhow::Result;
use gamewrap_core::{GameStore, LaunchSupervisor, ShortcutWriter};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  list                 show the game list
  add [name]           add a game (prompts for the executable path)
  launch <name>        start a game with its helper
  shortcut <name>      create a desktop shortcut for a game
  running              show games being supervised
  help                 show this help
  quit                 exit (waits for running games)";

enum Flow {
    Continue,
    Quit,
}

/// The interactive editor session.
pub struct Editor<R, W> {
    store: GameStore,
    supervisor: LaunchSupervisor,
    shortcuts: ShortcutWriter,
    launches: ActiveLaunches,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Editor<R, W> {
    pub fn new(
        store: GameStore,
        supervisor: LaunchSupervisor,
        shortcuts: ShortcutWriter,
        launches: ActiveLaunches,
        input: R,
        output: W,
    ) -> Self {
        Self {
            store,
            supervisor,
            shortcuts,
            launches,
            input,
            output,
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "gamewrap - game launcher with helper")?;
        writeln!(self.output, "Helper: {}", self.supervisor.config().helper_path.display())?;
        self.print_list()?;
        writeln!(self.output, "Type 'help' for commands.")?;

        loop {
            self.report_finished()?;
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };

            match self.dispatch(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    warn!("Command failed: {:#}", e);
                    writeln!(self.output, "Error: {:#}", e)?;
                }
            }
        }

        self.finish()
    }

    fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, unquote(rest.trim())),
            None => (line, ""),
        };
        debug!("Editor command {:?} {:?}", command, rest);

        match command.to_lowercase().as_str() {
            "list" | "ls" => self.print_list()?,
            "add" => self.add(rest)?,
            "launch" | "run" => self.launch(rest)?,
            "shortcut" => self.shortcut(rest)?,
            "running" => self.print_running()?,
            "help" | "?" => writeln!(self.output, "{}", HELP)?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => {
                writeln!(self.output, "Unknown command '{}'.", other)?;
                writeln!(self.output, "{}", HELP)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn print_list(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.output, "No games added yet.")?;
            return Ok(());
        }

        let width = self
            .store
            .entries()
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0);

        for entry in self.store.entries() {
            writeln!(
                self.output,
                "  {:<width$}  {}",
                entry.name,
                entry.executable.display(),
                width = width
            )?;
        }
        Ok(())
    }

    fn add(&mut self, name_arg: &str) -> Result<()> {
        let name = if name_arg.is_empty() {
            self.prompt("Enter game name: ")?.unwrap_or_default()
        } else {
            name_arg.to_string()
        };
        if name.is_empty() {
            writeln!(self.output, "No name given; nothing added.")?;
            return Ok(());
        }

        let path = self.prompt("Game executable path: ")?.unwrap_or_default();
        if path.is_empty() {
            writeln!(self.output, "No executable given; nothing added.")?;
            return Ok(());
        }

        match self.store.add(name.clone(), path)? {
            Some(_) => writeln!(self.output, "Updated '{}'.", name)?,
            None => writeln!(self.output, "Added '{}'.", name)?,
        }
        self.print_list()
    }

    fn launch(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            writeln!(self.output, "Usage: launch <name>")?;
            return Ok(());
        }
        let Some(entry) = self.store.get(name) else {
            writeln!(self.output, "{}", GAME_NOT_FOUND)?;
            return Ok(());
        };

        let handle = self.supervisor.launch(&entry.name, &entry.executable)?;
        self.launches.push(handle);
        writeln!(self.output, "Launching '{}'...", entry.name)?;
        Ok(())
    }

    fn shortcut(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            writeln!(self.output, "Usage: shortcut <name>")?;
            return Ok(());
        }
        if self.store.get(name).is_none() {
            writeln!(self.output, "{}", GAME_NOT_FOUND)?;
            return Ok(());
        }

        let path = self.shortcuts.create(name)?;
        writeln!(
            self.output,
            "Shortcut for '{}' created on Desktop: {}",
            name,
            path.display()
        )?;
        Ok(())
    }

    fn print_running(&mut self) -> Result<()> {
        let running = self.launches.running();
        if running.is_empty() {
            writeln!(self.output, "No games running.")?;
        } else {
            for game in running {
                writeln!(self.output, "  {}", game)?;
            }
        }
        Ok(())
    }

    fn report_finished(&mut self) -> Result<()> {
        for result in self.launches.take_finished() {
            self.print_result(&result)?;
        }
        Ok(())
    }

    fn print_result(&mut self, result: &LaunchResult) -> Result<()> {
        let text = match result {
            Ok(report) => notify::describe_report(report),
            Err(e) => notify::describe_error(e),
        };
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Wait for running launches so every helper is stopped before exit.
    fn finish(&mut self) -> Result<()> {
        let running = self.launches.running();
        if !running.is_empty() {
            writeln!(
                self.output,
                "Waiting for {} running game(s) to exit: {}",
                running.len(),
                running.join(", ")
            )?;
            self.output.flush()?;
        }

        self.launches.wait_idle(Duration::from_millis(100));
        for result in self.launches.take_finished() {
            self.print_result(&result)?;
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| unquote(line.trim()).to_string()))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"Space Quest\""), "Space Quest");
        assert_eq!(unquote("'Go'"), "Go");
        assert_eq!(unquote("Chess"), "Chess");
        assert_eq!(unquote("\"unbalanced"), "\"unbalanced");
    }
}
