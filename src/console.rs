//! Console interaction.
//!
//! Commands talk to the user through [`Console`] so the interactive flow can
//! be driven by [`ScriptedConsole`] in tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Console {
    /// Write one line.
    fn print(&self, text: &str);

    /// Show `prompt` and read one line. `None` on end of input.
    fn read_line(&self, prompt: &str) -> Option<String>;

    /// Ask a y/n question. Only `y` (any case) confirms.
    fn confirm(&self, prompt: &str) -> bool {
        self.read_line(&format!("{} (y/n): ", prompt))
            .map(|answer| answer.trim().eq_ignore_ascii_case("y"))
            .unwrap_or(false)
    }

    /// Wait for Enter.
    fn pause(&self) {
        let _ = self.read_line("Press Enter to exit...");
    }
}

/// Stdin/stdout console.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&self, text: &str) {
        println!("{}", text);
    }

    fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                tracing::debug!("Reading stdin failed: {}", e);
                None
            }
        }
    }
}

/// Console with canned answers that records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: RefCell<VecDeque<String>>,
    output: RefCell<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            output: RefCell::new(Vec::new()),
        }
    }

    /// Printed lines and prompts, in order.
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    /// Everything shown, joined with newlines.
    pub fn transcript(&self) -> String {
        self.output.borrow().join("\n")
    }
}

impl Console for ScriptedConsole {
    fn print(&self, text: &str) {
        self.output.borrow_mut().push(text.to_string());
    }

    fn read_line(&self, prompt: &str) -> Option<String> {
        self.output.borrow_mut().push(prompt.to_string());
        self.answers.borrow_mut().pop_front()
    }
}
