use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

/// Step display on stderr. A non-interactive instance records nothing and
/// prints nothing.
pub struct Progress {
    interactive: bool,
    spinner: Option<ProgressBar>,
    started: Instant,
    step_started: Instant,
    step: u8,
    total: u8,
}

impl Progress {
    pub fn new(interactive: bool, total: u8) -> Self {
        let now = Instant::now();
        Self {
            interactive,
            spinner: None,
            started: now,
            step_started: now,
            step: 0,
            total,
        }
    }

    pub fn step(&mut self, label: &str) {
        if !self.interactive {
            return;
        }
        self.clear();
        self.step += 1;
        self.step_started = Instant::now();

        let style = ProgressStyle::with_template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICKS);
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(format!("({}/{}) {}", self.step, self.total, label));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Replaces the spinner with a completed line and the listed details.
    pub fn done(&mut self, label: &str, details: &[String]) {
        if !self.interactive {
            return;
        }
        self.clear();

        let mut stderr = io::stderr().lock();
        let secs = self.step_started.elapsed().as_secs_f64();
        let _ = writeln!(stderr, "  \x1b[32m✓\x1b[0m {label:<46} {secs:>6.2}s");
        for detail in details {
            let _ = writeln!(stderr, "      \x1b[2m{detail}\x1b[0m");
        }
    }

    pub fn finish(mut self, summary: &str) {
        if !self.interactive {
            return;
        }
        self.clear();

        let mut stderr = io::stderr().lock();
        let total = format!("{:.2}s", self.started.elapsed().as_secs_f64());
        let _ = writeln!(stderr);
        let _ = writeln!(stderr, "  \x1b[1m{summary}\x1b[0m  \x1b[2m({total})\x1b[0m");
        let _ = writeln!(stderr);
    }

    fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
