use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Largest input accepted by one-shot translation.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Reads one-shot translation input from a file or stdin.
pub struct InputReader;

impl InputReader {
    /// Reads `path`, or stdin when no path is given.
    pub fn read(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                Self::read_limited(file, &path.display().to_string())
            }
            None => Self::read_limited(io::stdin().lock(), "stdin"),
        }
    }

    /// Reads at most [`MAX_INPUT_SIZE`] bytes of UTF-8 text from `reader`.
    pub fn read_limited(reader: impl Read, source: &str) -> Result<String> {
        let mut buffer = Vec::new();
        reader
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read from {source}"))?;

        if buffer.len() > MAX_INPUT_SIZE {
            bail!(
                "Input from {source} exceeds the maximum allowed size (1 MB).\n\n\
                 Consider splitting it into smaller parts."
            );
        }

        String::from_utf8(buffer).with_context(|| format!("Input from {source} is not valid UTF-8"))
    }
}
