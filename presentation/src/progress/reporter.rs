//! Progress reporting while a discussion is generated and revealed

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use panel_application::{DiscussionObserver, Notice, NoticeLevel};
use panel_domain::{ConsensusSummary, DiscussionPhase, PanelOpinion, Speaker};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner for the current speaker and prints opinions as they land
pub struct RevealReporter {
    spinner: Mutex<Option<ProgressBar>>,
    print_opinions: bool,
}

impl RevealReporter {
    /// `print_opinions` streams each opinion to stdout as it is revealed
    pub fn new(print_opinions: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            print_opinions,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let mut guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        f(pb);
    }

    fn finish(&self) {
        let mut guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn print_above(&self, text: &str) {
        let guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(pb) => pb.suspend(|| print!("{}", text)),
            None => print!("{}", text),
        }
    }
}

impl Default for RevealReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DiscussionObserver for RevealReporter {
    fn on_phase_change(&self, phase: DiscussionPhase) {
        match phase {
            DiscussionPhase::Generating => self.with_spinner(|pb| {
                pb.set_prefix("Panel");
                pb.set_message("Convening analysts...");
            }),
            DiscussionPhase::Revealing => self.with_spinner(|pb| {
                pb.set_prefix("Panel");
                pb.set_message("Discussion in progress");
            }),
            _ if phase.is_settled() => self.finish(),
            _ => {}
        }
    }

    fn on_speaker(&self, speaker: &Speaker) {
        let name = match speaker.persona() {
            Some(persona) => ConsoleFormatter::paint(persona.display_name(), persona.color()),
            None => speaker.name().normal(),
        };
        self.with_spinner(|pb| {
            pb.set_prefix("Speaking");
            pb.set_message(format!("{} is typing...", name));
        });
    }

    fn on_opinion_revealed(&self, index: usize, opinion: &PanelOpinion) {
        if self.print_opinions {
            self.print_above(&ConsoleFormatter::format_opinion(index, opinion));
        }
    }

    fn on_consensus(&self, _consensus: &ConsensusSummary) {
        self.finish();
    }

    fn on_notice(&self, notice: &Notice) {
        self.finish();
        match notice.level {
            NoticeLevel::Success => eprintln!("{} {}", "v".green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "x".red(), notice.message.red()),
        }
    }
}

/// Plain line-based progress (no spinner), used with `--quiet` or non-tty output
pub struct SimpleReveal {
    print_opinions: bool,
}

impl SimpleReveal {
    pub fn new(print_opinions: bool) -> Self {
        Self { print_opinions }
    }
}

impl DiscussionObserver for SimpleReveal {
    fn on_speaker(&self, speaker: &Speaker) {
        if self.print_opinions {
            eprintln!("{} {}", "->".cyan(), speaker.name().bold());
        }
    }

    fn on_opinion_revealed(&self, index: usize, opinion: &PanelOpinion) {
        if self.print_opinions {
            print!("{}", ConsoleFormatter::format_opinion(index, opinion));
        }
    }

    fn on_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => eprintln!("  {} {}", "v".green(), notice.message),
            NoticeLevel::Error => eprintln!("  {} {}", "x".red(), notice.message),
        }
    }
}
