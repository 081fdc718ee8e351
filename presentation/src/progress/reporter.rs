//! Progress reporting for batch assessment

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use triage_application::BatchProgressNotifier;
use triage_domain::{BatchReport, PlanOutcome};

/// Progress bar advanced as each request in a batch finishes
pub struct BatchProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BatchProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for BatchProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressNotifier for BatchProgressReporter {
    fn on_batch_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Assessing");
        pb.set_message("Starting...");
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_item_complete(&self, index: usize, outcome: &PlanOutcome) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            let status = if outcome.success {
                format!("{} #{}", "v".green(), index + 1)
            } else {
                format!("{} #{}", "x".red(), index + 1)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_batch_complete(&self, report: &BatchReport) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            pb.finish_with_message(format!(
                "{} ({} failed)",
                "done".green(),
                report.failed
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleBatchProgress;

impl BatchProgressNotifier for SimpleBatchProgress {
    fn on_batch_start(&self, total: usize) {
        eprintln!("{} {} ({} requests)", "->".cyan(), "Assessing batch".bold(), total);
    }

    fn on_item_complete(&self, index: usize, outcome: &PlanOutcome) {
        if outcome.success {
            eprintln!("  {} #{}", "v".green(), index + 1);
        } else {
            eprintln!("  {} #{} (failed)", "x".red(), index + 1);
        }
    }
}
