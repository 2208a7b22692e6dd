use std::time::Instant;

use crate::engine::charset::CharIndex;
use crate::session::cancel::CancelToken;
use crate::session::drill::{DrillPhase, DrillState};

/// Key that starts the clock while the drill is waiting.
pub const START_KEY: char = ' ';

pub fn process_char(drill: &mut DrillState<'_>, ch: char) {
    process_char_at(drill, ch, Instant::now());
}

/// Feeds one key to the drill at time `now`.
///
/// Waiting drills only react to [`START_KEY`]. While typing, keys outside
/// the printable range are dropped without touching the record. Only the
/// first attempt at a position records the typed key and its time.
pub fn process_char_at(drill: &mut DrillState<'_>, ch: char, now: Instant) {
    match drill.phase {
        DrillPhase::AwaitingStart => {
            if ch == START_KEY {
                drill.phase = DrillPhase::Typing;
                drill.last_accepted_at = Some(now);
            }
            return;
        }
        DrillPhase::Completed | DrillPhase::Canceled => return,
        DrillPhase::Typing => {}
    }

    let Some(typed) = CharIndex::from_char(ch) else {
        return;
    };
    let Some(expected) = drill.expected() else {
        return;
    };
    let pos = drill.cursor;

    if !drill.retrying {
        drill.typed[pos] = Some(typed);
        drill.time_ms[pos] = drill.current_key_ms(now);
    }

    if typed == expected {
        drill.retrying = false;
        drill.last_accepted_at = Some(now);
        if !drill.advance() {
            drill.phase = DrillPhase::Completed;
        }
    } else {
        drill.retrying = true;
        if !drill.errored[pos] {
            drill.errored[pos] = true;
            drill.errors += 1;
        }
    }
}

/// Cancels a drill that has not completed. Repeated calls are no-ops.
pub fn cancel(drill: &mut DrillState<'_>) {
    if !drill.phase.is_terminal() {
        drill.phase = DrillPhase::Canceled;
    }
}

/// Applies a pending cancellation request. Returns true once the drill is
/// canceled.
pub fn poll_cancel(drill: &mut DrillState<'_>, token: &CancelToken) -> bool {
    if token.is_canceled() {
        cancel(drill);
    }
    drill.phase == DrillPhase::Canceled
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::text::layout::TextLayout;
    use crate::text::word_list::WordList;

    fn layout(text: &str) -> TextLayout {
        let words = WordList::parse(text);
        let indices: Vec<usize> = (0..words.len()).collect();
        TextLayout::new(&words, &indices, 24, 80, 10).unwrap()
    }

    fn started(layout: &TextLayout) -> (DrillState<'_>, Instant) {
        let mut drill = DrillState::new(layout);
        let t0 = Instant::now();
        process_char_at(&mut drill, START_KEY, t0);
        (drill, t0)
    }

    #[test]
    fn only_the_start_key_begins_typing() {
        let layout = layout("abc");
        let mut drill = DrillState::new(&layout);
        process_char(&mut drill, 'a');
        assert_eq!(drill.phase, DrillPhase::AwaitingStart);
        assert_eq!(drill.cursor, 0);
        assert!(drill.typed[0].is_none());

        process_char(&mut drill, START_KEY);
        assert_eq!(drill.phase, DrillPhase::Typing);
        assert!(drill.last_accepted_at.is_some());
        // The start key itself is not recorded at position 0.
        assert_eq!(drill.cursor, 0);
        assert!(drill.typed[0].is_none());
    }

    #[test]
    fn unprintable_keys_are_ignored() {
        let layout = layout("abc");
        let (mut drill, t0) = started(&layout);
        process_char_at(&mut drill, '\n', t0);
        process_char_at(&mut drill, '\u{7f}', t0);
        process_char_at(&mut drill, 'é', t0);
        assert!(!drill.retrying);
        assert_eq!(drill.cursor, 0);
        assert_eq!(drill.errors, 0);
        assert!(drill.typed[0].is_none());
    }

    #[test]
    fn repeated_mismatch_counts_once() {
        let layout = layout("abc");
        let (mut drill, t0) = started(&layout);

        process_char_at(&mut drill, 'x', t0);
        assert_eq!(drill.errors, 1);
        assert!(drill.errored[0]);

        process_char_at(&mut drill, 'y', t0);
        assert_eq!(drill.errors, 1);
        assert_eq!(drill.cursor, 0);
        assert_eq!(drill.typed[0].map(|c| c.to_char()), Some('x'));
    }

    #[test]
    fn retry_keeps_first_recorded_time() {
        let layout = layout("ab");
        let (mut drill, t0) = started(&layout);
        process_char_at(&mut drill, 'q', t0 + Duration::from_millis(90));
        process_char_at(&mut drill, 'a', t0 + Duration::from_millis(400));
        assert!((drill.time_ms[0] - 90.0).abs() < 1e-6);
        assert!(drill.errored[0]);

        process_char_at(&mut drill, 'b', t0 + Duration::from_millis(520));
        assert!((drill.time_ms[1] - 120.0).abs() < 1e-6);
        assert!(!drill.errored[1]);
        assert_eq!(drill.phase, DrillPhase::Completed);
    }

    #[test]
    fn typing_the_whole_text_completes() {
        let layout = layout("cat dog bat");
        let (mut drill, t0) = started(&layout);
        for (i, ch) in "cat dog bat".chars().enumerate() {
            process_char_at(&mut drill, ch, t0 + Duration::from_millis(100 * (i as u64 + 1)));
        }
        assert_eq!(drill.phase, DrillPhase::Completed);
        assert_eq!(drill.errors, 0);
        assert!(drill.typed.iter().all(Option::is_some));

        process_char_at(&mut drill, 'x', t0);
        assert_eq!(drill.phase, DrillPhase::Completed);
        assert_eq!(drill.errors, 0);
    }

    #[test]
    fn cancel_is_idempotent_and_final() {
        let layout = layout("abc");
        let (mut drill, t0) = started(&layout);
        process_char_at(&mut drill, 'a', t0);

        let token = CancelToken::new();
        assert!(!poll_cancel(&mut drill, &token));
        token.cancel();
        token.cancel();
        assert!(poll_cancel(&mut drill, &token));
        assert!(poll_cancel(&mut drill, &token));
        assert_eq!(drill.phase, DrillPhase::Canceled);

        process_char_at(&mut drill, 'b', t0);
        assert_eq!(drill.cursor, 1);
        assert!(drill.typed[1].is_none());
    }

    #[test]
    fn cancel_does_not_undo_completion() {
        let layout = layout("a");
        let (mut drill, t0) = started(&layout);
        process_char_at(&mut drill, 'a', t0);
        cancel(&mut drill);
        assert_eq!(drill.phase, DrillPhase::Completed);
    }
}
