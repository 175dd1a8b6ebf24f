//! Terminal progress spinner.
//!
//! [`Spinner`] is a scoped handle: it starts ticking when created and clears
//! itself from the terminal when dropped, whether the run succeeded or not.
//! It draws on stderr and stays invisible when stderr is not a terminal.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use report::{Phase, ProgressObserver};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const TICK_CHARS: &str = "\\|/- ";

pub struct Spinner {
    bar: ProgressBar,
    headline: String,
}

impl Spinner {
    /// Starts a spinner showing `headline`; `visible == false` draws nothing.
    pub fn start(headline: String, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(style("{spinner} {msg}"));
        bar.set_message(headline.clone());
        bar.enable_steady_tick(TICK_INTERVAL);
        Self { bar, headline }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICK_CHARS)
}

impl ProgressObserver for Spinner {
    fn phase(&self, phase: Phase) {
        let total = match phase {
            Phase::ListingRepositories => None,
            Phase::FetchingCommits { repositories } => Some(repositories),
            Phase::FetchingStats { commits } => Some(commits),
        };
        match total {
            Some(total) => {
                self.bar.set_style(style("{spinner} {msg} [{pos}/{len}]"));
                self.bar.set_length(total as u64);
            }
            None => self.bar.set_style(style("{spinner} {msg}")),
        }
        self.bar.set_position(0);
        self.bar.set_message(format!("{}: {phase}", self.headline));
    }

    fn item_done(&self) {
        self.bar.inc(1);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
