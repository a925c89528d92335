use std::{path::PathBuf, time::Duration};

use directories::ProjectDirs;

use errors::DirectoryError;

pub mod config;
pub mod errors;
pub mod logger;
pub mod projection;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;

/// Get the location of the waxlog configuration directory
/// (e.g. `~/.config/waxlog` on linux).
///
/// # Errors
///
/// Returns an error if the home directory of the current user cannot be determined.
#[inline]
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Get the location of the waxlog data directory
/// (e.g. `~/.local/share/waxlog` on linux), where the session token is kept.
///
/// # Errors
///
/// Returns an error if the home directory of the current user cannot be determined.
#[inline]
pub fn get_data_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(DirectoryError::Data)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "waxlog")
}

/// Format a duration as `seconds.millis`, used for log timestamps.
#[must_use]
#[inline]
pub fn format_duration(duration: &Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_millis(0), "0.000")]
    #[case(Duration::from_millis(1_042), "1.042")]
    #[case(Duration::from_secs(75), "75.000")]
    fn test_format_duration(#[case] input: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&input), expected);
    }

    #[test]
    fn test_dirs_are_named_after_the_project() {
        // CI containers may not have a home directory
        if let (Ok(config), Ok(data)) = (get_config_dir(), get_data_dir()) {
            assert!(config.ends_with("waxlog"));
            assert!(data.ends_with("waxlog"));
        }
    }
}
