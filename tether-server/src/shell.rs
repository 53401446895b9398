//! The built-in command interpreter.
//!
//! One instance lives per connection; `cd` moves the instance's working
//! directory, never the process-wide one, so concurrent sessions stay
//! isolated. Every command produces exactly one reply string and filesystem
//! failures become reply text rather than dropped connections.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tether_core::CLEAR_SEQUENCE;

/// Per-connection command interpreter.
#[derive(Debug, Clone)]
pub struct Shell {
    cwd: PathBuf,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Creates a shell rooted at the server's working directory.
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self { cwd }
    }

    /// Creates a shell rooted at an explicit directory.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// The shell's current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Executes one command line and returns the reply payload.
    pub fn execute(&mut self, input: &str) -> String {
        let input = input.trim();
        match input {
            "hello" => "Hello, user!".to_string(),
            "date" => format!("Today's date is {}", Local::now().format("%Y-%m-%d")),
            "time" => format!("The current time is {}", Local::now().format("%H:%M:%S")),
            "clear" => CLEAR_SEQUENCE.to_string(),
            "pwd" => self.cwd.display().to_string(),
            "ls" => self.ls(),
            "whoami" => whoami(),
            "help" => help().to_string(),
            _ => self.execute_with_args(input),
        }
    }

    fn execute_with_args(&mut self, input: &str) -> String {
        if let Some(message) = input.strip_prefix("echo ") {
            message.to_string()
        } else if let Some(file) = input.strip_prefix("cat ") {
            self.cat(file)
        } else if let Some(file) = input.strip_prefix("touch ") {
            self.touch(file)
        } else if let Some(file) = input.strip_prefix("rm ") {
            self.rm(file)
        } else if let Some(args) = input.strip_prefix("write ") {
            self.write(args)
        } else if let Some(dir) = input.strip_prefix("cd ") {
            self.cd(dir)
        } else {
            format!("Unknown command: {input}")
        }
    }

    /// Resolves a user-supplied path against the shell's working directory.
    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    fn ls(&self) -> String {
        match fs::read_dir(&self.cwd) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names.join("\n")
            }
            Err(e) => format!("Error listing files: {e}"),
        }
    }

    fn cat(&self, filename: &str) -> String {
        match fs::read_to_string(self.resolve(filename)) {
            Ok(contents) => contents,
            Err(e) => format!("Error reading file: {e}"),
        }
    }

    fn touch(&self, filename: &str) -> String {
        match fs::File::create(self.resolve(filename)) {
            Ok(_) => format!("Created file: {filename}"),
            Err(e) => format!("Error creating file: {e}"),
        }
    }

    fn rm(&self, filename: &str) -> String {
        match fs::remove_file(self.resolve(filename)) {
            Ok(()) => format!("Deleted file: {filename}"),
            Err(e) => format!("Error deleting file: {e}"),
        }
    }

    fn write(&self, args: &str) -> String {
        let mut parts = args.splitn(2, ' ');
        let filename = parts.next().unwrap_or("");
        let content = parts.next().unwrap_or("");

        if filename.is_empty() || content.is_empty() {
            return "Usage: write <filename> <text>".to_string();
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.resolve(filename))
        {
            Ok(mut file) => match writeln!(file, "{content}") {
                Ok(()) => format!("Text written to {filename}"),
                Err(e) => format!("Error writing to file: {e}"),
            },
            Err(e) => format!("Error opening file: {e}"),
        }
    }

    fn cd(&mut self, path: &str) -> String {
        let target = self.resolve(path);
        match target.canonicalize() {
            Ok(dir) if dir.is_dir() => {
                self.cwd = dir;
                String::new()
            }
            Ok(_) => format!("Error changing directory: {path} is not a directory"),
            Err(e) => format!("Error changing directory: {e}"),
        }
    }
}

fn whoami() -> String {
    match env::var("USER").or_else(|_| env::var("USERNAME")) {
        Ok(user) => format!("Current user: {user}"),
        Err(_) => "Could not retrieve username".to_string(),
    }
}

fn help() -> &'static str {
    concat!(
        "Available commands:\n",
        "  hello        - Greets the user.\n",
        "  date         - Shows the current date.\n",
        "  time         - Shows the current time.\n",
        "  clear        - Clears the screen.\n",
        "  pwd          - Prints the current working directory.\n",
        "  ls           - Lists files in the current directory.\n",
        "  whoami       - Displays the current username.\n",
        "  help         - Shows this list.\n",
        "  echo [msg]   - Displays the message entered.\n",
        "  cat [file]   - Displays the contents of a file.\n",
        "  touch [file] - Creates an empty file.\n",
        "  rm [file]    - Deletes the specified file.\n",
        "  write [file] [text] - Appends text to a file, creating it if needed.\n",
        "  cd [dir]     - Changes the current directory.",
    )
}
