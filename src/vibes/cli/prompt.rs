//! Line-oriented prompts over any `BufRead`/`Write` pair.
//!
//! Every question returns `None` when input is exhausted, which the menu treats as
//! the end of the session.

use std::io::{BufRead, Write};
use vibes::error::Result;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `text` as-is, adding a newline only if it lacks one.
    pub fn say(&mut self, text: &str) -> Result<()> {
        if text.ends_with('\n') {
            write!(self.output, "{}", text)?;
        } else {
            writeln!(self.output, "{}", text)?;
        }
        Ok(())
    }

    /// Asks a free-form question. Bare enter yields `default`, or `""` without one.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Result<Option<String>> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{} ({}): ", question, d)?,
            _ => write!(self.output, "{}: ", question)?,
        }
        self.output.flush()?;

        let line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line.is_empty() {
            return Ok(Some(default.unwrap_or_default().to_string()));
        }
        Ok(Some(line))
    }

    /// Asks until the answer is one of `choices`.
    pub fn choose(&mut self, question: &str, choices: &[&str], default: &str) -> Result<Option<String>> {
        let question = format!("{} [{}]", question, choices.join("/"));
        loop {
            let answer = match self.ask(&question, Some(default))? {
                Some(a) => a,
                None => return Ok(None),
            };
            if choices.contains(&answer.as_str()) {
                return Ok(Some(answer));
            }
            self.say("Please select one of the available options")?;
        }
    }

    /// Asks a yes/no question until it gets a yes or a no.
    ///
    /// Bare enter takes `default`; without one it asks again.
    pub fn confirm(&mut self, question: &str, default: Option<bool>) -> Result<Option<bool>> {
        let hint = match default {
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
            None => "[y/n]",
        };
        loop {
            write!(self.output, "{} {}: ", question, hint)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.to_ascii_lowercase().as_str() {
                "" if default.is_some() => return Ok(default),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.say("Please enter Y or N")?,
            }
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Keep the transcript readable when input ends mid-prompt.
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
