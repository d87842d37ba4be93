//! Operator prompt surface.
//!
//! Stage logic depends only on the [`Prompter`] trait; the terminal
//! implementation renders numbered menus on stdout and reads stdin.

use anyhow::{anyhow, Result};
use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Present choices and return the selected index.
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize>;
    /// Free-text input, trimmed.
    fn input(&mut self, message: &str) -> Result<String>;
}

/// Free-text input falling back to a default when the operator enters nothing.
pub fn input_or(prompter: &mut dyn Prompter, message: &str, default: &str) -> Result<String> {
    let value = prompter.input(&format!("{message} (default {default})"))?;
    if value.is_empty() {
        return Ok(default.to_string());
    }
    Ok(value)
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        if choices.is_empty() {
            return Err(anyhow!("no choices to present for: {message}"));
        }
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            println!("{message}");
            for (index, choice) in choices.iter().enumerate() {
                println!("  {}) {}", index + 1, choice);
            }
            print!("Select [1-{}]: ", choices.len());
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Err(anyhow!("stdin closed while waiting for a selection"));
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=choices.len()).contains(&choice) => return Ok(choice - 1),
                _ => println!("Enter a number between 1 and {}.", choices.len()),
            }
        }
    }

    fn input(&mut self, message: &str) -> Result<String> {
        print!("{message}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(anyhow!("stdin closed while waiting for input"));
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Prompter;
    use anyhow::{anyhow, Result};
    use std::collections::VecDeque;

    /// Scripted prompter: selections and inputs are served in push order;
    /// prompt messages are recorded for assertions.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompter {
        selections: VecDeque<usize>,
        inputs: VecDeque<String>,
        pub(crate) transcript: Vec<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn new() -> Self {
            ScriptedPrompter::default()
        }

        pub(crate) fn choose(mut self, index: usize) -> Self {
            self.selections.push_back(index);
            self
        }

        pub(crate) fn type_in(mut self, value: &str) -> Self {
            self.inputs.push_back(value.to_string());
            self
        }

        pub(crate) fn exhausted(&self) -> bool {
            self.selections.is_empty() && self.inputs.is_empty()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
            self.transcript.push(format!("select: {message}"));
            let index = self
                .selections
                .pop_front()
                .ok_or_else(|| anyhow!("no scripted selection for: {message}"))?;
            if index >= choices.len() {
                return Err(anyhow!(
                    "scripted selection {index} out of range for {} choices",
                    choices.len()
                ));
            }
            Ok(index)
        }

        fn input(&mut self, message: &str) -> Result<String> {
            self.transcript.push(format!("input: {message}"));
            self.inputs
                .pop_front()
                .ok_or_else(|| anyhow!("no scripted input for: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;

    #[test]
    fn input_or_falls_back_on_empty() {
        let mut prompter = ScriptedPrompter::new().type_in("").type_in("custom");
        assert_eq!(input_or(&mut prompter, "Revision", "HEAD").unwrap(), "HEAD");
        assert_eq!(
            input_or(&mut prompter, "Revision", "HEAD").unwrap(),
            "custom"
        );
    }
}
