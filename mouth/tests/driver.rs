use mouth::{Granularity, MouthDriver, MouthState};
use prosody::{Analyzer, Strategy, WordTiming};
use std::time::Duration;
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tokio::time::Instant;

fn timings(strategy: Strategy, text: &str) -> Vec<WordTiming> {
    Analyzer::new(strategy).analyze(text, 0.8)
}

/// Collect snapshots until the mouth goes idle.
async fn until_idle(rx: &mut Receiver<MouthState>) -> Vec<MouthState> {
    let mut seen = Vec::new();
    loop {
        let state = rx.recv().await.unwrap();
        let done = !state.is_animating;
        seen.push(state);
        if done {
            return seen;
        }
    }
}

fn labels(states: &[MouthState]) -> Vec<(String, u32)> {
    states
        .iter()
        .map(|s| (s.current_word.clone(), s.current_syllable))
        .collect()
}

async fn assert_quiet(rx: &mut Receiver<MouthState>) {
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn starts_idle() {
    let driver = MouthDriver::default();
    assert_eq!(driver.state(), MouthState::idle());
    assert!(!driver.is_animating());
    assert!(!driver.has_pending_step());
}

#[tokio::test(start_paused = true)]
async fn empty_sequence_stays_idle() {
    let driver = MouthDriver::new(Granularity::PerWord);
    let mut rx = driver.subscribe();
    driver.start(Vec::new());
    assert!(!driver.is_animating());
    assert_eq!(rx.recv().await.unwrap(), MouthState::idle());
    assert!(!driver.has_pending_step());
}

#[tokio::test(start_paused = true)]
async fn per_word_steps_follow_durations() {
    let seq = timings(Strategy::Consonants, "hello world");
    let driver = MouthDriver::new(Granularity::PerWord);
    let mut rx = driver.subscribe();
    let began = Instant::now();
    driver.start(seq.clone());

    let first = rx.recv().await.unwrap();
    assert!(first.is_animating);
    assert_eq!(first.current_word, "hello");
    assert_eq!(first.intensity, seq[0].intensity());
    assert_eq!(first.current_syllable, 0);
    assert!(driver.has_pending_step());

    let second = rx.recv().await.unwrap();
    assert_eq!(second.current_word, "world");
    let waited = began.elapsed().as_secs_f64() * 1000.0;
    assert!((waited - seq[0].duration_ms).abs() <= 2.0, "waited {waited}ms");

    let idle = rx.recv().await.unwrap();
    assert_eq!(idle, MouthState::idle());
    let waited = began.elapsed().as_secs_f64() * 1000.0;
    let expected = seq[0].duration_ms + seq[1].duration_ms;
    assert!((waited - expected).abs() <= 3.0, "waited {waited}ms");

    assert!(!driver.has_pending_step());
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn per_syllable_steps_split_words() {
    let seq = timings(Strategy::Syllables, "hello world");
    let driver = MouthDriver::new(Granularity::PerSyllable);
    let mut rx = driver.subscribe();
    driver.start(seq.clone());

    let seen = until_idle(&mut rx).await;
    assert_eq!(
        labels(&seen),
        vec![
            ("hello".to_string(), 1),
            ("hello".to_string(), 2),
            ("world".to_string(), 1),
            (String::new(), 0),
        ]
    );
    assert_eq!(seen[0].intensity, seen[1].intensity);
    assert_eq!(seen[0].intensity, seq[0].intensity());
    assert_eq!(seen[2].intensity, seq[1].intensity());
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn word_without_letters_takes_one_step() {
    let seq = timings(Strategy::Syllables, "ok ...");
    let driver = MouthDriver::new(Granularity::PerSyllable);
    let mut rx = driver.subscribe();
    driver.start(seq);
    let seen = until_idle(&mut rx).await;
    assert_eq!(
        labels(&seen),
        vec![
            ("ok".to_string(), 1),
            ("...".to_string(), 1),
            (String::new(), 0),
        ]
    );
    assert_eq!(seen[1].intensity, 0.0);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_previous_run() {
    let driver = MouthDriver::new(Granularity::PerWord);
    let mut rx = driver.subscribe();
    driver.start(timings(Strategy::Consonants, "alpha beta gamma"));
    driver.start(timings(Strategy::Consonants, "one two"));
    assert!(driver.has_pending_step());

    let seen = until_idle(&mut rx).await;
    assert_eq!(
        labels(&seen),
        vec![
            ("alpha".to_string(), 0),
            ("one".to_string(), 0),
            ("two".to_string(), 0),
            (String::new(), 0),
        ]
    );
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn restart_mid_word_drops_old_schedule() {
    let first = timings(Strategy::Consonants, "alpha beta gamma");
    let driver = MouthDriver::new(Granularity::PerWord);
    let mut rx = driver.subscribe();
    driver.start(first.clone());
    tokio::time::sleep(Duration::from_secs_f64(
        (first[0].duration_ms + first[1].duration_ms / 2.0) / 1000.0,
    ))
    .await;
    driver.start(timings(Strategy::Consonants, "hi"));

    let seen = until_idle(&mut rx).await;
    assert_eq!(
        labels(&seen),
        vec![
            ("alpha".to_string(), 0),
            ("beta".to_string(), 0),
            ("hi".to_string(), 0),
            (String::new(), 0),
        ]
    );
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let driver = MouthDriver::default();
    let mut rx = driver.subscribe();
    driver.stop();
    driver.stop();
    assert_eq!(rx.recv().await.unwrap(), MouthState::idle());
    assert_eq!(rx.recv().await.unwrap(), MouthState::idle());
    assert!(!driver.is_animating());
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_pending_step() {
    let driver = MouthDriver::default();
    let mut rx = driver.subscribe();
    driver.start(timings(Strategy::Syllables, "a long sentence to say"));
    assert!(rx.recv().await.unwrap().is_animating);
    driver.stop();
    assert_eq!(rx.recv().await.unwrap(), MouthState::idle());
    assert!(!driver.has_pending_step());
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn dropping_driver_cancels_steps() {
    let driver = MouthDriver::new(Granularity::PerWord);
    let mut rx = driver.subscribe();
    driver.start(timings(Strategy::Consonants, "never finished words"));
    assert!(rx.recv().await.unwrap().is_animating);
    drop(driver);
    assert!(rx.recv().await.is_err());
}

#[test]
fn state_serializes_in_camel_case() {
    let json = serde_json::to_value(MouthState::idle()).unwrap();
    assert_eq!(json["isAnimating"], false);
    assert_eq!(json["currentWord"], "");
    assert_eq!(json["currentSyllable"], 0);
}
