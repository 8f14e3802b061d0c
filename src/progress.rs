// src/progress.rs

//! Progress reporting for plan construction.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress updates while files are being classified.
///
/// The planner calls `set_length` once with the number of dispatched files,
/// then `set_position` and `set_message` from worker threads as files finish.
///
/// # Examples
///
/// ```
/// use docsort::progress::ProgressReporter;
/// use std::sync::Mutex;
///
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl ProgressReporter for Recorder {
///     fn set_length(&self, _len: u64) {}
///     fn set_position(&self, _pos: u64) {}
///     fn set_message(&self, msg: String) {
///         self.0.lock().unwrap().push(msg);
///     }
///     fn finish(&self) {}
///     fn finish_with_message(&self, msg: String) {
///         self.set_message(msg);
///     }
/// }
///
/// let recorder = Recorder(Mutex::new(Vec::new()));
/// recorder.set_message("classified invoice.pdf".to_string());
/// recorder.finish_with_message("done".to_string());
/// assert_eq!(recorder.0.lock().unwrap().len(), 2);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Sets the total number of files to classify.
    fn set_length(&self, len: u64);
    /// Sets the number of files finished so far.
    fn set_position(&self, pos: u64);
    /// Describes the file that just finished.
    fn set_message(&self, msg: String);
    /// Finishes reporting.
    fn finish(&self);
    /// Finishes reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that discards every update.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn set_length(&self, _len: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// A terminal progress bar backed by `indicatif`.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a hidden-until-used progress bar drawn on stderr.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn set_length(&self, len: u64) {
        self.bar.set_length(len);
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
