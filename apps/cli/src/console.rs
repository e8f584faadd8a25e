//! Terminal input and output.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use cfgdeploy_protocol::{Event, EventSink};

/// Prints log lines with their markers.
///
/// Writes to stderr when stdout is reserved for the JSON report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    to_stderr: bool,
}

impl ConsoleSink {
    pub fn new(to_stderr: bool) -> Self {
        Self { to_stderr }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: Event) {
        match event {
            Event::Log(line) if self.to_stderr => eprintln!("{line}"),
            Event::Log(line) => println!("{line}"),
            other => tracing::debug!(event = ?other, "state changed"),
        }
    }
}

/// Line-oriented questions to the user.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Where questions are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    /// Stderr when stdout carries the JSON report, so prompts never mix
    /// into it.
    pub fn for_report(json: bool) -> Self {
        if json {
            OutputStream::Stderr
        } else {
            OutputStream::Stdout
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Stdout => io::stdout().write(buf),
            OutputStream::Stderr => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout => io::stdout().flush(),
            OutputStream::Stderr => io::stderr().flush(),
        }
    }
}

/// Prompter on the process's stdin, printing to stdout or, with `json`,
/// to stderr.
pub fn stdio(json: bool) -> Prompter<io::StdinLock<'static>, OutputStream> {
    Prompter::new(io::stdin().lock(), OutputStream::for_report(json))
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks a question and returns the trimmed answer; `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    /// Asks for a single path. Surrounding quotes are stripped; a blank
    /// answer is `None`.
    pub fn ask_path(&mut self, question: &str) -> io::Result<Option<PathBuf>> {
        Ok(self
            .ask(question)?
            .map(|a| a.trim_matches('"').trim().to_string())
            .filter(|a| !a.is_empty())
            .map(PathBuf::from))
    }

    /// Yes/no question, repeated until answered. End of input means no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) = self.ask(&format!("{question} [Y/N]"))? else {
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer Y or N.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_trims_and_detects_eof() {
        let mut p = prompter("  hello \n");
        assert_eq!(p.ask("Name?").unwrap().as_deref(), Some("hello"));
        assert_eq!(p.ask("Again?").unwrap(), None);
        assert_eq!(String::from_utf8(p.output).unwrap(), "Name? Again? ");
    }

    #[test]
    fn ask_path_strips_quotes() {
        let mut p = prompter("\"C:\\Program Files (x86)\\Steam\"\n\n");
        assert_eq!(
            p.ask_path("Root?").unwrap(),
            Some(PathBuf::from("C:\\Program Files (x86)\\Steam"))
        );
        assert_eq!(p.ask_path("Root?").unwrap(), None);
    }

    #[test]
    fn confirm_repeats_until_answered() {
        let mut p = prompter("maybe\nY\n");
        assert!(p.confirm("Continue?").unwrap());
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("Please answer Y or N."));
    }

    #[test]
    fn json_mode_prompts_on_stderr() {
        assert_eq!(OutputStream::for_report(true), OutputStream::Stderr);
        assert_eq!(OutputStream::for_report(false), OutputStream::Stdout);
        assert_eq!(stdio(true).output, OutputStream::Stderr);
    }

    #[test]
    fn confirm_defaults_to_no_at_eof() {
        let mut p = prompter("n\n");
        assert!(!p.confirm("Continue?").unwrap());
        assert!(!p.confirm("Continue?").unwrap());
    }
}
