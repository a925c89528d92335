use thiserror::Error;

pub use config::ConfigError;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for waxlog.")]
    Config,
    #[error("Unable to find the data directory for waxlog.")]
    Data,
}

/// A page change that landed outside `1..=total_pages`.
///
/// The view is left as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Page {requested} is out of range (there are {total_pages} pages).")]
pub struct PageOutOfRange {
    pub requested: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case(DirectoryError::Config.to_string(), "Unable to find the config directory for waxlog.")]
    #[case(DirectoryError::Data.to_string(), "Unable to find the data directory for waxlog.")]
    #[case(
        PageOutOfRange { requested: 3, total_pages: 2 }.to_string(),
        "Page 3 is out of range (there are 2 pages)."
    )]
    fn test_error_messages(#[case] actual: String, #[case] expected: &str) {
        assert_str_eq!(actual, expected);
    }
}
