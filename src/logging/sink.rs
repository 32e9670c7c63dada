//! Output sinks for the logger

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Closed set of log destinations.
#[derive(Debug, Clone)]
pub(crate) enum Sink {
    /// Write to stdout
    Console,
    /// Append to a file, opened per emit
    File { path: PathBuf },
}

impl Sink {
    /// Write one rendered line.
    ///
    /// Best effort: a failing sink never takes the logging call down with
    /// it, so file errors are discarded here.
    pub(crate) fn emit(&self, line: &str) {
        match self {
            Sink::Console => println!("{line}"),
            Sink::File { path } => {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "{line}");
                }
            }
        }
    }
}
