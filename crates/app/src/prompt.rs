use std::io::Write;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal,
};

use crate::error::Result;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Asks a yes/no question on stderr; only `y` confirms.
pub fn confirm(question: &str) -> Result<bool> {
    let mut out = std::io::stderr();
    execute!(out, Print(format!("{question} [y/N] ")))?;
    out.flush()?;

    let answer = {
        let _raw = RawModeGuard::enter()?;
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break false,
                KeyCode::Char('y') | KeyCode::Char('Y') => break true,
                _ => break false,
            }
        }
    };

    execute!(out, Print(if answer { "y\r\n" } else { "n\r\n" }))?;
    out.flush()?;
    Ok(answer)
}
