//! Staged reveal
//!
//! Turns an ordered list of opinions into a stream that announces each
//! speaker, waits, then reveals their opinion.

use crate::ports::reveal_delay::RevealDelay;
use futures::Stream;
use futures::stream;
use panel_domain::{PanelOpinion, Speaker};
use std::collections::VecDeque;

/// One step of the staged reveal
#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    /// The speaker of the opinion at `index` is about to talk
    Speaking { index: usize, speaker: Speaker },
    /// The opinion at `index` is now visible
    Revealed { index: usize, opinion: PanelOpinion },
}

struct RevealState {
    queue: VecDeque<PanelOpinion>,
    index: usize,
    announced: bool,
}

/// Stream the opinions one at a time, in the given order.
///
/// Events strictly alternate `Speaking` then `Revealed` for each opinion.
/// The delay runs between the two, so a consumer sees the speaker
/// indicator for the length of the delay. Nothing is reordered, filtered
/// or deduplicated.
pub fn staged_reveal<'a>(
    opinions: Vec<PanelOpinion>,
    delay: &'a dyn RevealDelay,
) -> impl Stream<Item = RevealEvent> + Send + 'a {
    let state = RevealState {
        queue: opinions.into(),
        index: 0,
        announced: false,
    };

    stream::unfold(state, move |mut state| async move {
        if !state.announced {
            let speaker = Speaker::from_model(&state.queue.front()?.model);
            state.announced = true;
            let event = RevealEvent::Speaking {
                index: state.index,
                speaker,
            };
            return Some((event, state));
        }

        delay.wait(state.index).await;
        let opinion = state.queue.pop_front()?;
        let event = RevealEvent::Revealed {
            index: state.index,
            opinion,
        };
        state.index += 1;
        state.announced = false;
        Some((event, state))
    })
}
