//! Render progress shared between band workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "Rendering {bar:40} {percent:>3}% ETA: {eta}";

/// Completed-pixel counter with an optional progress bar.
///
/// Workers only bump the atomic counter; whoever wins the `try_lock`
/// moves the bar, everyone else carries on without waiting.
pub struct Progress {
    completed: AtomicUsize,
    total: usize,
    bar: Mutex<ProgressBar>,
}

impl Progress {
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(ProgressStyle::with_template(BAR_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            completed: AtomicUsize::new(0),
            total,
            bar: Mutex::new(bar),
        }
    }

    /// Record `count` finished pixels.
    pub fn advance(&self, count: usize) {
        let done = self.completed.fetch_add(count, Ordering::Relaxed) + count;
        if let Ok(bar) = self.bar.try_lock() {
            // Positions only move forward, a late writer must not rewind the bar
            if done as u64 > bar.position() {
                bar.set_position(done as u64);
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Position the bar on the final count and stop it.
    pub fn finish(&self) {
        if let Ok(bar) = self.bar.lock() {
            bar.set_position(self.completed() as u64);
            bar.finish();
        }
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.lock().map(|bar| bar.position()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_accumulates_across_threads() {
        let progress = Progress::new(4000, false);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        progress.advance(10);
                    }
                });
            }
        });

        assert_eq!(progress.completed(), progress.total());
    }

    #[test]
    fn test_bar_tracks_counter() {
        let progress = Progress::new(100, false);
        progress.advance(30);
        assert_eq!(progress.position(), 30);

        progress.advance(70);
        progress.finish();
        assert_eq!(progress.position(), 100);
        assert_eq!(progress.completed(), 100);
    }
}
