use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::error::Result;

/// The token that backs out of any prompt.
pub const QUIT: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Line(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
    Quit,
}

/// Line-oriented prompter. Input ending is treated as the quit token so a
/// closed stdin can never spin a prompt loop.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, msg: impl Display) -> Result<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask(&mut self, prompt: &str) -> Result<Reply> {
        Ok(match self.read_line(prompt)? {
            Some(line) if !line.eq_ignore_ascii_case(QUIT) => Reply::Line(line),
            _ => Reply::Quit,
        })
    }

    /// Ask a yes/no question until the answer is recognised.
    pub fn confirm(&mut self, prompt: &str) -> Result<Confirm> {
        loop {
            let Reply::Line(answer) = self.ask(&format!("{prompt} (y/n): "))? else {
                return Ok(Confirm::Quit);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(Confirm::Yes),
                "n" | "no" => return Ok(Confirm::No),
                _ => self.say("Please answer 'y' or 'n' (or 'q' to quit).")?,
            }
        }
    }

    pub fn pause(&mut self, prompt: &str) -> Result<()> {
        self.read_line(prompt)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
pub(crate) fn scripted(script: &str) -> Console<&[u8], Vec<u8>> {
    Console::new(script.as_bytes(), Vec::new())
}

#[cfg(test)]
pub(crate) fn transcript(console: Console<&[u8], Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}
