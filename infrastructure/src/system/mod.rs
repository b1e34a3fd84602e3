//! Adapters for the host environment: time, locale and timers.

mod clock;
mod delay;
mod locale;

pub use clock::SystemClock;
pub use delay::{DEFAULT_REVEAL_DELAY, TokioRevealDelay};
pub use locale::FixedLocale;
