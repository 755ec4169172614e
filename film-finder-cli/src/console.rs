//! Terminal implementation of the interactive console.
//!
//! Everything a session shows is written straight to the terminal, so
//! `--quiet` only silences status and log lines, never the screens.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use film_finder_lib::Console;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout as StdoutStream;

/// Reads answers line by line from `input` and writes screens to `out`.
pub(crate) struct TerminalConsole<R = StdinLock<'static>, W = Stdout> {
    input: R,
    out: W,
}

impl TerminalConsole {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub(crate) fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Writer for multi-line output such as result tables.
    pub(crate) fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// One plain line of screen output.
    pub(crate) fn say(&mut self, message: impl std::fmt::Display) {
        self.write_line(message);
    }

    fn write_line(&mut self, message: impl std::fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            log::warn!("Failed to write to the terminal: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn prompt(&mut self, message: &str) -> Option<String> {
        write!(
            self.out,
            "{}",
            message.if_supports_color(StdoutStream, |t| t.green())
        )
        .ok()?;
        self.out.flush().ok()?;

        let mut input = String::new();
        match self.input.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input.trim().to_string()),
            Err(e) => {
                log::warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    fn notice(&mut self, message: &str) {
        self.write_line(message.if_supports_color(StdoutStream, |t| t.bright_yellow()));
    }

    fn error(&mut self, message: &str) {
        self.write_line(message.if_supports_color(StdoutStream, |t| t.red()));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn console(input: &str) -> TerminalConsole<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(console: TerminalConsole<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(strip_ansi_escapes::strip(console.out)).unwrap()
    }

    #[test]
    fn screens_do_not_depend_on_the_log_level() {
        log::set_max_level(log::LevelFilter::Off);
        let mut c = console("");
        c.say("1. Find another film");
        c.notice("There are 3 results.");
        c.error("Page size must be an integer.");
        assert_eq!(
            written(c),
            "1. Find another film\nThere are 3 results.\nPage size must be an integer.\n"
        );
    }

    #[test]
    fn prompt_reads_trimmed_lines_until_input_ends() {
        let mut c = console("  alien \n2\n");
        assert_eq!(c.prompt("Title: ").as_deref(), Some("alien"));
        assert_eq!(c.prompt("Choice: ").as_deref(), Some("2"));
        assert_eq!(c.prompt("Choice: "), None);
        assert_eq!(written(c), "Title: Choice: Choice: ");
    }
}
