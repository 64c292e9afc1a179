use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Source of interactive answers, the last layer of configuration.
pub trait Prompt {
    /// Ask for a line of text. `None` at end of input.
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> io::Result<bool>;
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for Prompter<R, W> {
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> io::Result<bool> {
        let mut input = String::new();

        loop {
            input.clear();

            match default {
                Some(true) => write!(self.output, "{} (Y/n): ", prompt)?,
                Some(false) | None => write!(self.output, "{} (y/N): ", prompt)?,
            }
            self.output.flush()?;

            if self.input.read_line(&mut input)? == 0 {
                return Ok(default.unwrap_or(false));
            }

            match input.trim().to_uppercase().as_str() {
                "Y" | "YES" => return Ok(true),
                "N" | "NO" => return Ok(false),
                "" => match default {
                    Some(default) => return Ok(default),
                    None => continue,
                },
                _ => continue,
            }
        }
    }
}

/// Keep asking for the database path until it names an existing file.
/// `-1` or end of input gives up.
pub fn database_path(prompt: &mut dyn Prompt) -> io::Result<Option<PathBuf>> {
    let mut question =
        "Could not automatically find the Plex database. Please enter the full path (-1 to cancel)"
            .to_string();

    loop {
        let answer = match prompt.line(&question)? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        if answer == "-1" {
            return Ok(None);
        }

        let path = PathBuf::from(&answer);
        if path.is_file() {
            return Ok(Some(path));
        }
        question = format!(
            "Could not find database file {}. Please enter the full path (-1 to cancel)",
            answer
        );
    }
}
