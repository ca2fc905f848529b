//! Property-based tests for talkpack.
//!
//! These tests generate random event sequences to check the editing and
//! formatting laws.

use chrono::NaiveDate;
use proptest::prelude::*;

use talkpack::core::{ExtractionStats, OutputConfig, day_ranges, move_event, rename_speaker};
use talkpack::transcript::{format_at, format_range_at};
use talkpack::{ConversationEvent, Labels};

/// Generate a random event using fast strategies (no regex!)
fn arb_event() -> impl Strategy<Value = ConversationEvent> {
    let date = prop::sample::select(vec![
        "2024-01-01".to_string(),
        "2024. 1. 2 (Tue)".to_string(),
        "1月3日(水)".to_string(),
    ])
    .prop_map(ConversationEvent::date_marker);

    let notice = prop::sample::select(vec![
        "Kim joined.".to_string(),
        "Alex left.".to_string(),
    ])
    .prop_map(ConversationEvent::system_notice);

    let message = (
        prop::sample::select(vec![
            ("Me".to_string(), true),
            ("Alex".to_string(), false),
            ("Counterpart".to_string(), false),
            ("Иван".to_string(), false),
        ]),
        prop::sample::select(vec![String::new(), "09:00".to_string(), "23:59".to_string()]),
        prop::sample::select(vec![
            "hi".to_string(),
            "line one\nline two".to_string(),
            "(sticker)".to_string(),
            "(file: report.pdf)".to_string(),
            "Special;chars\"here".to_string(),
            "🎉🔥 emoji".to_string(),
        ]),
    )
        .prop_map(|((speaker, is_self), time, body)| {
            ConversationEvent::message(speaker, is_self, time, body)
        });

    prop_oneof![1 => date, 1 => notice, 4 => message]
}

/// Generate a vector of random events
fn arb_events(max_len: usize) -> impl Strategy<Value = Vec<ConversationEvent>> {
    prop::collection::vec(arb_event(), 0..max_len)
}

fn at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Events with speaker names blanked, for comparing everything but speakers
fn without_speakers(events: &[ConversationEvent]) -> Vec<ConversationEvent> {
    let mut events = events.to_vec();
    for msg in events.iter_mut().filter_map(ConversationEvent::as_message_mut) {
        msg.speaker.clear();
    }
    events
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // RENAME PROPERTIES
    // ============================================

    /// Renaming touches nothing but matching speakers
    #[test]
    fn rename_preserves_everything_else(events in arb_events(30)) {
        let mut renamed = events.clone();
        let count = rename_speaker(&mut renamed, "Alex", "Alex Kim");

        prop_assert_eq!(renamed.len(), events.len());
        prop_assert_eq!(without_speakers(&renamed), without_speakers(&events));

        let expected = events
            .iter()
            .filter_map(ConversationEvent::as_message)
            .filter(|m| m.speaker == "Alex")
            .count();
        prop_assert_eq!(count, expected);
        prop_assert!(renamed
            .iter()
            .filter_map(ConversationEvent::as_message)
            .all(|m| m.speaker != "Alex"));
    }

    /// Renaming to a fresh name and back is the identity
    #[test]
    fn rename_round_trip(events in arb_events(30)) {
        let mut renamed = events.clone();
        rename_speaker(&mut renamed, "Alex", "__unused__");
        rename_speaker(&mut renamed, "__unused__", "Alex");
        prop_assert_eq!(renamed, events);
    }

    // ============================================
    // MOVE PROPERTIES
    // ============================================

    /// Moving an event and moving it back restores the sequence
    #[test]
    fn move_is_reversible(events in arb_events(30), a in 0usize..30, b in 0usize..30) {
        prop_assume!(!events.is_empty());
        let from = a % events.len();
        let to = b % events.len();

        let mut moved = events.clone();
        move_event(&mut moved, from, to).unwrap();
        prop_assert_eq!(&moved[to], &events[from]);

        move_event(&mut moved, to, from).unwrap();
        prop_assert_eq!(moved, events);
    }

    /// Out-of-range moves fail and leave the sequence untouched
    #[test]
    fn move_out_of_range_is_rejected(events in arb_events(10), extra in 0usize..5) {
        let mut moved = events.clone();
        let len = events.len();
        prop_assert!(move_event(&mut moved, len + extra, 0).is_err());
        prop_assert!(move_event(&mut moved, 0, len + extra).is_err());
        prop_assert_eq!(moved, events);
    }

    // ============================================
    // DAY RANGE PROPERTIES
    // ============================================

    /// Day ranges tile the sequence after the first date marker
    #[test]
    fn day_ranges_tile_sequence(events in arb_events(40)) {
        let ranges = day_ranges(&events);
        let leading = events
            .iter()
            .position(ConversationEvent::is_date_marker)
            .unwrap_or(events.len());

        let covered: usize = ranges.iter().map(|r| r.len).sum();
        prop_assert_eq!(leading + covered, events.len());

        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].index + pair[0].len, pair[1].index);
        }
    }

    /// A day's transcript is the full transcript of exactly that day
    #[test]
    fn format_range_matches_slice(events in arb_events(40)) {
        let labels = Labels::default();
        for range in day_ranges(&events) {
            let day = &events[range.index..range.index + range.len];
            let text = format_range_at(&events, range.index, &labels, at()).unwrap();
            prop_assert_eq!(text, format_at(day, &labels, at()));
        }
    }

    // ============================================
    // FORMAT PROPERTIES
    // ============================================

    /// Formatting is a pure function of events and timestamp
    #[test]
    fn format_is_deterministic(events in arb_events(30)) {
        let labels = Labels::default();
        prop_assert_eq!(format_at(&events, &labels, at()), format_at(&events, &labels, at()));
    }

    /// Every event contributes exactly one paragraph
    #[test]
    fn format_one_paragraph_per_event(events in arb_events(30)) {
        let text = format_at(&events, &Labels::default(), at());
        let header_end = text.find("\n\n").unwrap() + 2;
        let body = &text[header_end..];

        let quotes = body.matches('「').count();
        let messages = events.iter().filter(|e| e.as_message().is_some()).count();
        prop_assert_eq!(quotes, messages);

        let notices = body.matches("[System] ").count();
        let expected = events
            .iter()
            .filter(|e| matches!(e, ConversationEvent::SystemNotice { .. }))
            .count();
        prop_assert_eq!(notices, expected);
    }

    // ============================================
    // STATS AND OUTPUT PROPERTIES
    // ============================================

    /// Stats account for every event
    #[test]
    fn stats_total_matches_len(events in arb_events(40)) {
        let stats = ExtractionStats::from_events(&events);
        prop_assert_eq!(stats.total(), events.len());
        prop_assert!(stats.self_messages <= stats.messages);
        prop_assert!((0.0..=100.0).contains(&stats.self_ratio()));
    }

    /// Include flags only ever drop the kinds they name
    #[test]
    fn output_config_select(events in arb_events(40)) {
        let config = OutputConfig::new().without_dates();
        let selected = config.select(&events);
        let dates = events.iter().filter(|e| e.is_date_marker()).count();
        prop_assert_eq!(selected.len(), events.len() - dates);
        prop_assert!(selected.iter().all(|e| !e.is_date_marker()));
    }
}

#[cfg(feature = "json-output")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// JSON output parses back into the same events
    #[test]
    fn json_output_parses_back(events in arb_events(30)) {
        let json = talkpack::core::to_json(&events, &OutputConfig::new()).unwrap();
        let parsed: Vec<ConversationEvent> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, events);
    }

    /// JSONL writes one line per selected event
    #[test]
    fn jsonl_one_line_per_event(events in arb_events(30)) {
        let jsonl = talkpack::core::to_jsonl(&events, &OutputConfig::new().without_notices()).unwrap();
        let notices = events
            .iter()
            .filter(|e| matches!(e, ConversationEvent::SystemNotice { .. }))
            .count();
        prop_assert_eq!(jsonl.lines().count(), events.len() - notices);
    }
}
