use core::fmt;
use std::io::{self, BufRead, IsTerminal};

use anyhow::Context as _;
use waxlog_core::projection::{ListView, Searchable, SortMode};

use super::ListArgs;

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)
    }
}

pub trait StdIn: Send + Sync {
    fn is_terminal(&self) -> bool;
    fn lines(&self) -> impl Iterator<Item = io::Result<String>>;
}

impl StdIn for io::Stdin {
    fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }
    fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
        io::BufReader::new(self.lock()).lines()
    }
}

/// Take secrets from the flags, falling back to one line of stdin each, in order.
///
/// Passwords are read from stdin so they stay out of the shell history, e.g.
/// `pass show waxlog | waxlog login --email me@example.com`.
pub fn secrets<const N: usize, I: StdIn>(
    flags: [Option<&String>; N],
    stdin: &I,
) -> anyhow::Result<[String; N]> {
    let mut lines = stdin.lines();
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, flag) in out.iter_mut().zip(flags) {
        *slot = match flag {
            Some(value) => value.clone(),
            None => lines
                .next()
                .transpose()
                .context("Failed to read from stdin")?
                .unwrap_or_default(),
        };
    }
    Ok(out)
}

/// Apply the search, sort and page flags of a list command to `view`.
///
/// An empty result is fine on page 1, anything else has to exist.
pub fn apply_list_args<T, S>(
    view: &mut ListView<T, S>,
    args: &ListArgs,
    sort: Option<S>,
) -> anyhow::Result<()>
where
    T: Searchable,
    S: SortMode<T>,
{
    view.set_search(args.search.trim());
    if let Some(sort) = sort {
        view.set_sort(sort);
    }
    if args.page != 1 || view.total_pages() > 0 {
        view.go_to_page(args.page)?;
    }
    Ok(())
}
