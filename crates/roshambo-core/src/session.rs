//! The async round driver.
//!
//! `GameSession` owns the turn controller plus the two external
//! collaborators and drives one round at a time: countdown sleeps, one frame
//! snapshot, one classifier call, then the outcome. Progress is reported
//! through a channel of [`RoundEvent`]s so the presentation layer can render
//! without sharing any mutable state.

use crate::boundary::{Detection, FrameSource, GestureClassifier};
use crate::controller::{COUNTDOWN_START, RoundToken, TickOutcome, TurnController};
use crate::error::{Result, RoshamboError};
use crate::gesture::Gesture;
use crate::round::RoundResult;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Progress notifications emitted while a round is played.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    /// Countdown value to display (3, 2, 1, 0).
    CountdownTick { remaining: u8 },
    /// The frame is being snapshotted from the camera feed.
    Capturing,
    /// The frame was sent to the classifier; waiting for its answer.
    Classifying,
    /// The round completed with a recorded outcome.
    Finished { result: RoundResult },
    /// The round failed; `message` is what the player sees.
    Failed { message: String },
}

/// Drives rounds against the injected camera and classifier. At most one
/// round is in flight at a time, enforced by `&mut self`.
pub struct GameSession {
    controller: TurnController,
    frames: Arc<dyn FrameSource>,
    classifier: Arc<dyn GestureClassifier>,
    tick: Duration,
}

impl GameSession {
    pub fn new(frames: Arc<dyn FrameSource>, classifier: Arc<dyn GestureClassifier>) -> Self {
        Self {
            controller: TurnController::new(),
            frames,
            classifier,
            tick: Duration::from_secs(1),
        }
    }

    /// Overrides the countdown tick length (tests use a near-zero tick).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// Acquires the camera stream once at startup and flips the camera flag
    /// on success. On failure the flag stays off, which blocks rounds from
    /// starting, and the error is returned for the banner.
    pub async fn start_camera(&mut self) -> Result<()> {
        match self.frames.acquire().await {
            Ok(()) => {
                self.controller.set_camera(true);
                Ok(())
            }
            Err(err) => {
                self.controller.set_camera(false);
                Err(err)
            }
        }
    }

    /// Results/Error -> Idle so the next round can start.
    pub fn play_again(&mut self) -> Result<()> {
        self.controller.play_again()
    }

    /// Plays one full round: countdown, capture, classify, outcome.
    ///
    /// Classifier transport failures and unrecognized gestures both land in
    /// the Error state; neither appends a log entry and nothing is retried.
    /// The returned `Result` is `Err` only for programming errors (a
    /// transition attempted from the wrong state), never for a failed round.
    pub async fn play_round(&mut self, events: UnboundedSender<RoundEvent>) -> Result<()> {
        self.controller.start_round()?;
        let _ = events.send(RoundEvent::CountdownTick {
            remaining: COUNTDOWN_START,
        });

        let token = self.run_countdown(&events).await?;
        let _ = events.send(RoundEvent::Capturing);

        let frame = match self.frames.snapshot().await {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "frame capture failed");
                return self.fail_round(token, &err, &events);
            }
        };

        let _ = events.send(RoundEvent::Classifying);
        let detection = match self.classifier.classify(&frame).await {
            Ok(detection) => detection,
            Err(err) => {
                // Transport failures fold into the unrecognized path: same
                // user-visible outcome, no retry.
                warn!(error = %err, "classifier call failed");
                Detection::Unrecognized
            }
        };

        match detection {
            Detection::Gesture(user) => {
                let computer: Gesture = rand::random();
                let result = *self.controller.resolve(token, user, computer)?;
                info!(
                    user = %result.user,
                    computer = %result.computer,
                    winner = ?result.winner,
                    "round finished",
                );
                let _ = events.send(RoundEvent::Finished { result });
                Ok(())
            }
            Detection::Unrecognized => {
                self.fail_round(token, &RoshamboError::GestureUnrecognized, &events)
            }
        }
    }

    /// Sleeps between ticks until the controller demands a capture. The
    /// final tick out of Countdown(0) fires immediately, so a round spends
    /// exactly `COUNTDOWN_START` tick intervals counting down.
    async fn run_countdown(
        &mut self,
        events: &UnboundedSender<RoundEvent>,
    ) -> Result<RoundToken> {
        loop {
            tokio::time::sleep(self.tick).await;
            match self.controller.tick()? {
                TickOutcome::Continue { remaining } => {
                    let _ = events.send(RoundEvent::CountdownTick { remaining });
                    if remaining == 0 {
                        let TickOutcome::Capture { token } = self.controller.tick()? else {
                            return Err(RoshamboError::Internal(
                                "countdown did not hand over to capture".to_string(),
                            ));
                        };
                        return Ok(token);
                    }
                }
                TickOutcome::Capture { token } => return Ok(token),
            }
        }
    }

    fn fail_round(
        &mut self,
        token: RoundToken,
        err: &RoshamboError,
        events: &UnboundedSender<RoundEvent>,
    ) -> Result<()> {
        let message = err.user_message();
        self.controller.fail(token, message.clone())?;
        let _ = events.send(RoundEvent::Failed { message });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Frame;
    use crate::outcome::Winner;
    use crate::state::GameState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct StaticFrames;

    #[async_trait]
    impl FrameSource for StaticFrames {
        async fn acquire(&self) -> Result<()> {
            Ok(())
        }

        async fn snapshot(&self) -> Result<Frame> {
            Ok(Frame::jpeg(vec![0xff, 0xd8, 0xff]))
        }
    }

    struct BrokenFrames;

    #[async_trait]
    impl FrameSource for BrokenFrames {
        async fn acquire(&self) -> Result<()> {
            Err(RoshamboError::camera_unavailable("permission denied"))
        }

        async fn snapshot(&self) -> Result<Frame> {
            Err(RoshamboError::camera_unavailable("stream went away"))
        }
    }

    /// Classifier stub that counts calls and returns a fixed answer.
    struct FixedClassifier {
        answer: Result<Detection>,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(answer: Result<Detection>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GestureClassifier for FixedClassifier {
        async fn classify(&self, _frame: &Frame) -> Result<Detection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    fn session(classifier: Arc<FixedClassifier>) -> GameSession {
        GameSession::new(Arc::new(StaticFrames), classifier).with_tick(Duration::from_millis(1))
    }

    async fn collect(
        session: &mut GameSession,
    ) -> (Result<()>, Vec<RoundEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = session.play_round(tx).await;
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        (outcome, events)
    }

    #[tokio::test]
    async fn recognized_gesture_finishes_the_round() {
        let classifier = FixedClassifier::new(Ok(Detection::Gesture(Gesture::Paper)));
        let mut session = session(classifier.clone());
        session.start_camera().await.unwrap();

        let (outcome, events) = collect(&mut session).await;
        outcome.unwrap();

        assert_eq!(session.controller().state(), GameState::Results);
        assert_eq!(session.controller().log().len(), 1);
        assert_eq!(classifier.calls(), 1);

        let result = session.controller().last_result().unwrap();
        assert_eq!(result.user, Gesture::Paper);
        assert_eq!(result.winner, decide_against(result.computer));

        let ticks: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                RoundEvent::CountdownTick { remaining } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![3, 2, 1, 0]);
        assert!(matches!(events.last(), Some(RoundEvent::Finished { .. })));
    }

    fn decide_against(computer: Gesture) -> Winner {
        crate::outcome::decide(Gesture::Paper, computer)
    }

    #[tokio::test]
    async fn unrecognized_gesture_lands_in_error_without_logging() {
        let classifier = FixedClassifier::new(Ok(Detection::Unrecognized));
        let mut session = session(classifier.clone());
        session.start_camera().await.unwrap();

        let (outcome, events) = collect(&mut session).await;
        outcome.unwrap();

        assert_eq!(session.controller().state(), GameState::Error);
        assert!(session.controller().log().is_empty());
        assert_eq!(classifier.calls(), 1);
        assert!(matches!(events.last(), Some(RoundEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn transport_failure_reads_like_unrecognized() {
        let classifier =
            FixedClassifier::new(Err(RoshamboError::classifier("connection refused")));
        let mut session = session(classifier);
        session.start_camera().await.unwrap();

        let (outcome, events) = collect(&mut session).await;
        outcome.unwrap();

        assert_eq!(session.controller().state(), GameState::Error);
        assert!(session.controller().log().is_empty());
        let Some(RoundEvent::Failed { message }) = events.last() else {
            panic!("expected a failure event");
        };
        assert_eq!(message, &RoshamboError::GestureUnrecognized.user_message());
    }

    #[tokio::test]
    async fn capture_failure_skips_the_classifier() {
        let classifier = FixedClassifier::new(Ok(Detection::Gesture(Gesture::Rock)));
        let mut session = GameSession::new(Arc::new(BrokenFrames), classifier.clone())
            .with_tick(Duration::from_millis(1));
        // Pretend acquisition succeeded earlier and the stream died later.
        session.controller.set_camera(true);

        let (outcome, events) = collect(&mut session).await;
        outcome.unwrap();

        assert_eq!(session.controller().state(), GameState::Error);
        assert_eq!(classifier.calls(), 0);
        assert!(matches!(events.last(), Some(RoundEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn camera_failure_blocks_round_start() {
        let classifier = FixedClassifier::new(Ok(Detection::Gesture(Gesture::Rock)));
        let mut session = GameSession::new(Arc::new(BrokenFrames), classifier);

        assert!(session.start_camera().await.is_err());
        assert!(!session.controller().camera_on());

        let (tx, _rx) = mpsc::unbounded_channel();
        let err = session.play_round(tx).await.unwrap_err();
        assert!(matches!(err, RoshamboError::CameraUnavailable { .. }));
    }

    #[tokio::test]
    async fn one_classifier_call_per_round_across_rounds() {
        let classifier = FixedClassifier::new(Ok(Detection::Gesture(Gesture::Scissors)));
        let mut session = session(classifier.clone());
        session.start_camera().await.unwrap();

        let (outcome, _) = collect(&mut session).await;
        outcome.unwrap();
        session.play_again().unwrap();
        let (outcome, _) = collect(&mut session).await;
        outcome.unwrap();

        assert_eq!(classifier.calls(), 2);
        assert_eq!(session.controller().log().len(), 2);
    }
}
