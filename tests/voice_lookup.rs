//! End-to-end voice lookup tests: recognizer → tokenize → catalog.

use std::sync::Arc;
use std::time::Duration;
use wesign::voice::{MockRecognizer, VoiceEvent, VoiceSession, VoiceState, lookup_signs};

#[tokio::test]
async fn spoken_greeting_maps_to_two_signs() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let recognizer = Arc::new(MockRecognizer::new().with_utterance("Kamusta ka"));
    let mut session = VoiceSession::new(recognizer).with_event_sender(tx);

    session.start().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let recognized = rx
        .try_iter()
        .find_map(|e| match e {
            VoiceEvent::Recognized {
                transcript,
                matches,
            } => Some((transcript, matches)),
            _ => None,
        })
        .expect("expected a Recognized event");

    assert_eq!(recognized.0, "kamusta ka");
    let words: Vec<&str> = recognized.1.iter().map(|m| m.word.as_str()).collect();
    assert_eq!(words, vec!["kamusta", "ka"]);
}

#[tokio::test]
async fn unknown_utterance_yields_single_no_match_entry() {
    let matches = lookup_signs("magandang hapon sa inyo");
    // "magandang" is in the catalog, the rest is dropped.
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].word, "magandang");

    let none = lookup_signs("completely unknown phrase");
    assert_eq!(none.len(), 1);
    assert_eq!(none[0].word, "No matching sign found");
}

#[tokio::test]
async fn repeated_word_emitted_once() {
    let matches = lookup_signs("po po");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].word, "po");
    assert_eq!(matches[0].sign.display_name, "PO");
}

#[tokio::test]
async fn stopping_mid_recognition_leaves_session_idle_with_no_result() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let recognizer = Arc::new(
        MockRecognizer::new()
            .with_utterance("salamat")
            .with_delay(Duration::from_millis(60)),
    );
    let mut session = VoiceSession::new(recognizer).with_event_sender(tx);

    session.start().unwrap();
    assert_eq!(session.state(), VoiceState::Listening);
    session.stop();
    assert_eq!(session.state(), VoiceState::Idle);

    tokio::time::sleep(Duration::from_millis(120)).await;
    let late_results: Vec<VoiceEvent> = rx
        .try_iter()
        .filter(|e| matches!(e, VoiceEvent::Recognized { .. }))
        .collect();
    assert!(late_results.is_empty(), "late recognition must be discarded");
}
