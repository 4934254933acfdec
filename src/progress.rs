//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a progress bar in the terminal while the fuzzy scan runs.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for long-running phases.
///
/// Implement this trait to receive progress updates during
/// the fuzzy duplicate scan.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "fuzzy")
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called each time an item finishes.
    ///
    /// # Arguments
    ///
    /// * `completed` - Number of items finished so far
    fn on_progress(&self, completed: usize);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use datadupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message(format!("Comparing ({phase})"));
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_progress(&self, completed: usize) {
        if self.quiet {
            return;
        }
        if let Ok(bar) = self.bar.lock() {
            if let Some(ref pb) = *bar {
                pb.set_position(completed as u64);
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if self.quiet {
            return;
        }
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_progress_is_noop() {
        let progress = Progress::new(true);
        progress.on_phase_start("fuzzy", 10);
        progress.on_progress(5);
        progress.on_phase_end("fuzzy");
        assert!(progress.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_progress_lifecycle() {
        let progress = Progress::new(false);
        progress.on_phase_start("fuzzy", 3);
        assert!(progress.bar.lock().unwrap().is_some());
        progress.on_progress(3);
        progress.on_phase_end("fuzzy");
        assert!(progress.bar.lock().unwrap().is_none());
    }
}
