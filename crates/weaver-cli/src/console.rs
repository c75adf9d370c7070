//! Console helpers for the line-oriented prompt/response surface

use std::io::{self, BufRead, Write};
use weaver_core::Result;
use weaver_planning::UserIo;

/// Print an assistant-prefixed message
pub fn say(message: &str) {
    println!("\nAI ASSISTANT: {}", message);
}

/// Stdin/stdout implementation of the interview's I/O surface
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl UserIo for Console {
    fn say(&mut self, message: &str) {
        say(message);
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        say(prompt);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
