#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the cinedata binary.
//!
//! [`init_logger`] routes `log` output through `indicatif-log-bridge` so log
//! lines do not tear the crawl progress bar, and [`IndicatifProgress`] draws
//! that bar behind the crawl's [`ProgressCallback`].

use std::sync::Arc;
use std::time::Duration;

use cinedata_assemble::ProgressCallback;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Crawl progress drawn as an `indicatif` bar.
///
/// Starts as a spinner while the listing page loads and becomes a bar over
/// the listed movies once their number is known.
pub struct IndicatifProgress {
    bar: ProgressBar,
    bar_style: ProgressStyle,
}

impl IndicatifProgress {
    fn from_bar(bar: ProgressBar) -> Self {
        let bar_style = ProgressStyle::with_template(
            "{wide_bar:.cyan/dim} {pos}/{len} movies [{elapsed_precise}] {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        Self { bar, bar_style }
    }

    /// A spinner labelled `message`, added to `multi`.
    #[must_use]
    pub fn movies_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_owned());
        Arc::new(Self::from_bar(bar))
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(self.bar_style.clone());
        self.bar.set_length(total);
        self.bar.reset();
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Asks for a genre on the terminal.
///
/// # Errors
///
/// Returns [`dialoguer::Error`] if the terminal cannot be read.
pub fn prompt_genre() -> Result<String, dialoguer::Error> {
    let genre: String = Input::new()
        .with_prompt("Enter Genre")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("genre must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(genre.trim().to_owned())
}

/// Log filter used when `RUST_LOG` is unset: crawl progress from the
/// cinedata crates, warnings from everything else.
pub const DEFAULT_LOG_FILTER: &str = "warn,cinedata=info";

/// Installs `pretty_env_logger` behind `indicatif-log-bridge`, so log lines
/// are printed above the progress bars instead of through them.
///
/// `RUST_LOG` replaces [`DEFAULT_LOG_FILTER`] when set. Returns the
/// [`MultiProgress`] every progress bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let logger = pretty_env_logger::formatted_builder()
        .parse_filters(&filter)
        .build();
    let max_level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_turns_the_spinner_into_a_bar() {
        let bar = ProgressBar::hidden();
        let progress = IndicatifProgress::from_bar(bar.clone());

        progress.set_total(3);
        progress.inc(1);
        progress.inc(1);
        progress.set_message("Processing movie 3".to_owned());

        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "Processing movie 3");

        progress.finish("3 of 3 movies assembled, 0 failed".to_owned());
        assert!(bar.is_finished());
    }
}
