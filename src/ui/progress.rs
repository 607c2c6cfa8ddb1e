use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::ui::icons::SEARCH;
use crate::util::truncate_chars;

/// Spinner shown while a claim runs through the pipeline.
///
/// Hidden when stderr is not a terminal, so piped output stays clean.
pub struct VerifyUI {
    spinner: ProgressBar,
}

impl VerifyUI {
    pub fn start(claim: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .expect("progress bar template is a valid static string"),
        );
        let excerpt = truncate_chars(claim, 60);
        let ellipsis = if excerpt.len() < claim.len() { "..." } else { "" };
        spinner.set_message(format!(
            "{}Verifying {}",
            SEARCH,
            style(format!("\"{}{}\"", excerpt, ellipsis)).bold()
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for VerifyUI {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
