//! Progress sinks for long renders and searches.

use std::io::{self, Write};
use std::time::Instant;

use crate::system::Progress;

/// Prints a dot per report, bracketed by `[` and `]`.  Suits runs whose
/// report count is not worth a full bar.
pub struct DotProgress;

impl Progress for DotProgress {
    fn begin(&mut self) {
        print!("[");
        let _ = io::stdout().flush();
    }
    fn progress(&mut self, _value: f64) {
        print!(".");
        let _ = io::stdout().flush();
    }
    fn end(&mut self) {
        print!("] ");
        let _ = io::stdout().flush();
    }
}

/// Prints a ten-segment bar with a percentage on each report.
pub struct BarProgress;

impl BarProgress {
    fn bar(numerator: usize, denominator: usize) -> String {
        let filled = "#".repeat(numerator);
        let rest = "-".repeat(denominator.saturating_sub(numerator));
        format!("{}{}", filled, rest)
    }
}

impl Progress for BarProgress {
    fn begin(&mut self) {}
    fn progress(&mut self, value: f64) {
        let s = BarProgress::bar((value * 10.0) as usize, 10);
        println!("[{}]{:.1}%", s, value * 100.0);
    }
    fn end(&mut self) {}
}

/// Wraps another sink and appends the elapsed wall-clock time when the
/// run ends.
pub struct TimedProgress<P: Progress> {
    inner: P,
    start: Instant,
}

impl<P: Progress> TimedProgress<P> {
    pub fn new(inner: P) -> TimedProgress<P> {
        TimedProgress {
            inner,
            start: Instant::now(),
        }
    }
}

impl<P: Progress> Progress for TimedProgress<P> {
    fn begin(&mut self) {
        self.inner.begin();
        self.start = Instant::now();
    }
    fn progress(&mut self, value: f64) {
        self.inner.progress(value);
    }
    fn end(&mut self) {
        self.inner.end();
        print!("({:.2}s) ", self.start.elapsed().as_secs_f64());
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_renders_both_ends() {
        assert_eq!(BarProgress::bar(0, 10), "----------");
        assert_eq!(BarProgress::bar(4, 10), "####------");
        assert_eq!(BarProgress::bar(10, 10), "##########");
    }
}
