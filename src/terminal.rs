//! Operator-facing terminal: messages, yes/no gates, and free-text answers.
use std::fmt::Display;
use std::io::{self, BufRead, Write};

const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[1;1H";

/// Answer used when the operator just presses enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAnswer {
    Yes,
    No,
}

impl DefaultAnswer {
    /// Suffix shown after the question, capitalizing the default.
    pub fn indicator(self) -> &'static str {
        match self {
            DefaultAnswer::Yes => "[Y/n]",
            DefaultAnswer::No => "[y/N]",
        }
    }
}

/// Resolve one line of operator input against a prompt's default.
///
/// Only a case-insensitive `y` means yes; anything else that is not empty
/// means no, without re-prompting.
pub fn resolve_answer(reply: &str, default: DefaultAnswer) -> bool {
    let reply = reply.trim();
    if reply.is_empty() {
        return default == DefaultAnswer::Yes;
    }
    reply.eq_ignore_ascii_case("y")
}

pub struct Terminal<'a> {
    input: Box<dyn BufRead + 'a>,
    output: Box<dyn Write + 'a>,
    clear_enabled: bool,
}

impl Terminal<'static> {
    /// Terminal bound to the process's stdin and stdout.
    pub fn stdio(clear_enabled: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), clear_enabled)
    }
}

impl<'a> Terminal<'a> {
    pub fn new(input: impl BufRead + 'a, output: impl Write + 'a, clear_enabled: bool) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            clear_enabled,
        }
    }

    /// Print one line. Terminal write failures are not actionable and are dropped.
    pub fn say(&mut self, message: impl Display) {
        writeln!(self.output, "{message}").ok();
    }

    pub fn blank(&mut self) {
        writeln!(self.output).ok();
    }

    pub fn clear(&mut self) {
        if self.clear_enabled {
            write!(self.output, "{CLEAR_SEQUENCE}").ok();
            self.output.flush().ok();
        }
    }

    /// Ask a yes/no question; see [`resolve_answer`].
    pub fn confirm(&mut self, question: &str, default: DefaultAnswer) -> bool {
        let reply = self.ask(&format!("{question} {}", default.indicator()));
        let answer = resolve_answer(&reply, default);
        tracing::debug!(question, reply = %reply, answer, "confirmation");
        answer
    }

    /// Prompt on the same line and read one trimmed line of input.
    ///
    /// End of input or a read error counts as an empty answer.
    pub fn ask(&mut self, question: &str) -> String {
        write!(self.output, "{question}: ").ok();
        self.output.flush().ok();
        let mut line = String::new();
        if let Err(err) = self.input.read_line(&mut line) {
            tracing::debug!(error = %err, "failed to read operator input");
            line.clear();
        }
        line.trim().to_string()
    }
}
