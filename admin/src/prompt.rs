use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::AdminError;

/// Asks the operator a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool, AdminError>;
}

/// Reads answers from a console. Accepts "y", "yes", "n" and "no" in any case, and asks again
/// on anything else. End of input counts as "no".
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        ConsolePrompt::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, AdminError> {
        loop {
            write!(self.output, "{} (y/n): ", question)?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }
}

/// Answers "yes" to everything. Used for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> Result<bool, AdminError> {
        log::info!("{} (y/n): y [--yes]", question);
        Ok(true)
    }
}
