use std::io::{self, Write};

use msd_search::{ProgressSink, StepProgress};

const CLEAR_WIDTH: usize = 60;

/// Carriage-return progress line on stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn step(&mut self, progress: &StepProgress) {
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\rMutate: {:7}/{:5} | Score: {:7.4} | NOS: {:.5e}{}",
            progress.step,
            progress.total,
            progress.score,
            progress.solutions as f64,
            " ".repeat(20)
        );
        let _ = stderr.flush();
    }

    fn finish(&mut self) {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r{}\r", " ".repeat(CLEAR_WIDTH));
        let _ = stderr.flush();
    }
}
