//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use env_logger::fmt::style::Style;
use log::info;
use once_cell::sync::Lazy;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Returns the seconds since [`INIT_INSTANT`].
#[cfg(not(tarpaulin_include))]
#[must_use]
#[inline]
pub fn uptime() -> u64 {
    INIT_INSTANT.elapsed().as_secs()
}

/// The filter used when `RUST_LOG` isn't set: silence every dependency,
/// and log the waxlog crates at `filter`.
#[must_use]
#[inline]
pub fn default_filter(filter: log::LevelFilter) -> String {
    format!("off,waxlog={filter}")
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `waxlog`.
///
/// Functionality is provided by [`log`]; `tracing` spans and events emitted by the client are
/// forwarded to it.
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
#[inline]
pub fn init_logger(filter: log::LevelFilter) {
    use crate::format_duration;

    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    // `RUST_LOG` wins over the flag.
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    let filters = if env.is_empty() {
        default_filter(filter)
    } else {
        env.clone()
    };

    let dimmed = Style::new().dimmed();

    env_logger::Builder::new()
        .format(move |buf, record| {
            let style = buf.default_level_style(record.level()).bold();
            let level = match record.level() {
                log::Level::Debug => "D",
                log::Level::Trace => "T",
                log::Level::Info => "I",
                log::Level::Warn => "W",
                log::Level::Error => "E",
            };
            writeln!(
                buf,
                // Longest PATH in the repo: `client/src/test_utils.rs` - `24` characters
                // Longest file in the repo: `client/src/lib.rs`        - `4` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {style}{level}{style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >24} @ {: <4}{dimmed:#} | {}",
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto)
        .parse_filters(&filters)
        .init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }
}
