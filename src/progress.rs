//! Terminal progress indicators.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos:>6}/{len:6} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_track_progress() {
        let pb = create_progress_bar(10, "Testing".to_string());
        pb.inc(4);

        assert_eq!(pb.length(), Some(10));
        assert_eq!(pb.position(), 4);
        pb.finish_and_clear();
    }
}
