//! Splitting a raw input line into words.

use std::error::Error as StdError;

/// Error type returned by a [`WordSplitter`].
pub type SplitError = Box<dyn StdError + Send + Sync>;

/// Turns an input line into the word sequence the parser scans.
///
/// Quoting and escaping rules belong to the implementation. Closures of
/// the form `Fn(&str) -> Result<Vec<String>, E>` implement this trait.
pub trait WordSplitter {
    /// Splits `line` into words.
    fn split(&self, line: &str) -> Result<Vec<String>, SplitError>;
}

impl<F, E> WordSplitter for F
where
    F: Fn(&str) -> Result<Vec<String>, E>,
    E: Into<SplitError>,
{
    fn split(&self, line: &str) -> Result<Vec<String>, SplitError> {
        self(line).map_err(Into::into)
    }
}

/// Splits on Unicode whitespace. Never fails and knows nothing of quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Whitespace;

impl WordSplitter for Whitespace {
    fn split(&self, line: &str) -> Result<Vec<String>, SplitError> {
        Ok(line.split_whitespace().map(str::to_string).collect())
    }
}
