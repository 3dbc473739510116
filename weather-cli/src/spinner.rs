use indicatif::{ProgressBar, ProgressStyle};
use weather_compare_core::Progress;

/// `Progress` backed by an indicatif spinner. Hidden when stderr is not a terminal.
#[derive(Debug)]
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn stderr() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    pub fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        Self { bar }
    }
}

impl Progress for Spinner {
    fn start(&mut self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.tick();
    }

    fn tick(&mut self) {
        self.bar.tick();
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
