//! Line-oriented terminal input for board prompts.

use lokoboard_core::InputSource;
use log::warn;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Typing this alone on a line cancels the current prompt.
pub const CANCEL_TOKEN: &str = "-";

/// `InputSource` over any reader/writer pair.
///
/// End of input and read errors count as a cancelled prompt or a "no".
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Writes one line of output.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        if let Err(err) = write!(self.writer, "{question}").and_then(|()| self.writer.flush()) {
            warn!("event=console_write module=cli status=error error={err}");
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!("event=console_read module=cli status=error error={err}");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> InputSource for Console<R, W> {
    fn prompt(&mut self, label: &str, default: Option<&str>) -> Option<String> {
        let question = match default {
            Some(value) if !value.is_empty() => format!("{label} [{value}]: "),
            _ => format!("{label}: "),
        };
        let answer = self.ask(&question)?;
        if answer.trim() == CANCEL_TOKEN {
            return None;
        }
        match default {
            Some(value) if answer.trim().is_empty() => Some(value.to_string()),
            _ => Some(answer),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]: "))
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn alert(&mut self, message: &str) {
        if let Err(err) = writeln!(self.writer, "! {message}") {
            warn!("event=console_write module=cli status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Console;
    use lokoboard_core::InputSource;
    use std::io::Cursor;

    fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn prompt_returns_line_without_newline() {
        let mut console = console("Depot\r\n");
        assert_eq!(console.prompt("Column title", None).as_deref(), Some("Depot"));
        let output = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(output, "Column title: ");
    }

    #[test]
    fn blank_answer_takes_default() {
        let mut console = console("\n");
        assert_eq!(
            console.prompt("Service number", Some("TN-1")).as_deref(),
            Some("TN-1")
        );
        let output = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(output, "Service number [TN-1]: ");
    }

    #[test]
    fn cancel_token_and_eof_cancel() {
        let mut console = console("-\n");
        assert_eq!(console.prompt("Name", Some("x")), None);
        assert_eq!(console.prompt("Name", None), None);
    }

    #[test]
    fn confirm_needs_explicit_yes() {
        let mut console = console("y\nYES\nno\n\n");
        assert!(console.confirm("Delete?"));
        assert!(console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
        assert!(!console.confirm("Delete?"));
    }

    #[test]
    fn alert_is_marked() {
        let mut console = console("");
        console.alert("Invalid card type");
        let output = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(output, "! Invalid card type\n");
    }
}
