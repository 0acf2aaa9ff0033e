use contactbook_core::mask::{advance, format_display, EditOutcome, MaskState, PhoneMask};

#[test]
fn eleven_digits_render_the_full_mask() {
    let outcome = advance(MaskState::Idle, "11999998888");
    assert_eq!(outcome.buffer, "(11) 99999-8888");
    assert_eq!(outcome.caret, 15);
    assert!(!outcome.rejected);
    assert_eq!(outcome.state, MaskState::Reformatting);
}

#[test]
fn typing_digit_by_digit_converges_on_the_masked_form() {
    let mut mask = PhoneMask::new();
    let mut buffer = String::new();

    for digit in "11999998888".chars() {
        buffer.push(digit);
        let outcome = mask.on_edit(&buffer);
        assert!(!outcome.rejected);
        assert_eq!(outcome.caret, outcome.buffer.chars().count());

        if outcome.buffer != buffer {
            // The widget applies the replacement and echoes it back; the
            // engine must not treat that echo as a fresh edit.
            let echo = mask.on_edit(&outcome.buffer);
            assert_eq!(echo.buffer, outcome.buffer);
            assert!(!echo.rejected);
        }
        buffer = outcome.buffer;
    }

    assert_eq!(buffer, "(11) 99999-8888");
}

#[test]
fn twelfth_digit_is_rejected_by_truncating_the_buffer() {
    let mut mask = PhoneMask::new();

    let outcome = mask.on_edit("(11) 99999-88889");
    assert!(outcome.rejected);
    assert_eq!(outcome.buffer, "(11) 99999-8888");
    assert_eq!(outcome.caret, 15);

    // The truncated buffer comes back as a fresh edit and is stable.
    let follow_up = mask.on_edit(&outcome.buffer);
    assert!(!follow_up.rejected);
    assert_eq!(follow_up.buffer, "(11) 99999-8888");
    assert_eq!(follow_up.state, MaskState::Idle);
}

#[test]
fn rejection_drops_the_last_raw_character_without_reformatting() {
    let outcome = advance(MaskState::Idle, "119999988881234");
    assert!(outcome.rejected);
    assert_eq!(outcome.buffer, "11999998888123");
    assert_eq!(outcome.state, MaskState::Idle);
}

#[test]
fn engine_is_idempotent_on_its_own_output() {
    let first = advance(MaskState::Idle, "11999998888");
    let second = advance(MaskState::Idle, &first.buffer);
    assert_eq!(second.buffer, first.buffer);
    assert!(!second.rejected);
    assert_eq!(second.state, MaskState::Idle);
}

#[test]
fn reformatting_pass_is_suppressed() {
    let outcome = advance(MaskState::Reformatting, "(11) 9");
    assert_eq!(
        outcome,
        EditOutcome {
            buffer: "(11) 9".to_string(),
            caret: 6,
            rejected: false,
            state: MaskState::Idle,
        }
    );
}

#[test]
fn empty_buffer_stays_empty_and_idle() {
    let outcome = advance(MaskState::Idle, "");
    assert_eq!(outcome.buffer, "");
    assert_eq!(outcome.caret, 0);
    assert!(!outcome.rejected);
    assert_eq!(outcome.state, MaskState::Idle);
}

#[test]
fn deleting_a_digit_reflows_the_remaining_digits() {
    // User removed one digit from the middle of a masked number.
    let outcome = advance(MaskState::Idle, "(11) 9999-8888");
    assert_eq!(outcome.buffer, "(11) 99998-888");
    assert_eq!(outcome.state, MaskState::Reformatting);
}

#[test]
fn display_format_pads_trailing_literals_unlike_the_entry_mask() {
    assert_eq!(format_display("11999998888"), "(11) 99999-8888");
    assert_eq!(format_display("11"), "(11) ");

    let entry = advance(MaskState::Idle, "11");
    assert_eq!(entry.buffer, "(11");
}
