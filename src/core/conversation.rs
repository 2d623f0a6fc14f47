//! Turn sequencing between the transcript and the calculation service.
//!
//! A turn is: append the user's message, put up the typing indicator, post
//! one request on a background task, then, when the task reports back through
//! the [`TurnEvent`] channel, take the indicator down and append the bot's
//! answer. Only one turn may be outstanding at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::api::{FundService, FundServiceError};
use crate::core::constants::{CALCULATION_FAILED, DEFAULT_REPLY_DELAY, FALLBACK_REPLY, GREETING};
use crate::core::message::Message;
use crate::core::transcript::Transcript;
use crate::core::typing::{TypingHandle, TypingIndicator};

pub type TurnId = u64;

#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// Minimum time between a request starting and its reply being shown.
    pub reply_delay: Duration,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }
}

/// What [`ConversationController::submit`] did with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank after trimming; nothing happened.
    Empty,
    /// A turn is already outstanding; nothing happened.
    Busy,
    /// The user message was appended and a request is on its way.
    Started(TurnId),
}

#[derive(Debug)]
pub enum TurnOutcome {
    /// The service answered. Holds its `reply` field as received.
    Replied(Option<String>),
    Failed(FundServiceError),
}

/// Sent by the request task once the service has answered (and the reply
/// delay has passed) or the request has failed.
#[derive(Debug)]
pub struct TurnEvent {
    pub turn_id: TurnId,
    pub outcome: TurnOutcome,
}

/// How a finished turn was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResolution {
    pub message: Message,
    pub failed: bool,
}

struct PendingTurn {
    id: TurnId,
    indicator: TypingHandle,
}

pub struct ConversationController {
    transcript: Transcript,
    indicator: TypingIndicator,
    service: Arc<dyn FundService>,
    settings: ConversationSettings,
    pending: Option<PendingTurn>,
    next_turn_id: TurnId,
    tx: mpsc::UnboundedSender<TurnEvent>,
}

impl ConversationController {
    pub fn new(
        service: Arc<dyn FundService>,
        settings: ConversationSettings,
    ) -> (Self, mpsc::UnboundedReceiver<TurnEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            transcript: Transcript::new(),
            indicator: TypingIndicator::new(),
            service,
            settings,
            pending: None,
            next_turn_id: 0,
            tx,
        };
        (controller, rx)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn indicator(&self) -> &TypingIndicator {
        &self.indicator
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance the indicator animation, if one is showing.
    pub fn tick_indicator(&mut self) -> bool {
        self.indicator.tick()
    }

    pub fn greet(&mut self) -> &Message {
        self.transcript.push(Message::bot(GREETING))
    }

    /// Start a turn for `raw`. Must be called from within a tokio runtime.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let text = raw.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }
        if let Some(pending) = &self.pending {
            debug!(pending = pending.id, "turn already in flight; ignoring submission");
            return SubmitOutcome::Busy;
        }

        self.next_turn_id += 1;
        let turn_id = self.next_turn_id;

        self.transcript.push(Message::user(text));
        let indicator = self.indicator.start();
        self.pending = Some(PendingTurn {
            id: turn_id,
            indicator,
        });

        info!(turn = turn_id, "submitting fund question");
        self.spawn_request(turn_id, text.to_string());
        SubmitOutcome::Started(turn_id)
    }

    fn spawn_request(&self, turn_id: TurnId, text: String) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let reply_delay = self.settings.reply_delay;

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = match service.calculate(&text).await {
                Ok(reply) => {
                    tokio::time::sleep_until(started + reply_delay).await;
                    TurnOutcome::Replied(reply.reply)
                }
                Err(err) => TurnOutcome::Failed(err),
            };
            let _ = tx.send(TurnEvent { turn_id, outcome });
        });
    }

    /// Resolve the pending turn. Events for any other turn are dropped.
    pub fn finish(&mut self, event: TurnEvent) -> Option<TurnResolution> {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == event.turn_id => pending,
            other => {
                self.pending = other;
                debug!(turn = event.turn_id, "dropping event for a turn that is not pending");
                return None;
            }
        };

        // The marker must be gone before the answer is appended.
        self.indicator.stop(pending.indicator);

        let (text, failed) = match event.outcome {
            TurnOutcome::Replied(Some(reply)) if !reply.is_empty() => (reply, false),
            TurnOutcome::Replied(_) => {
                debug!(turn = event.turn_id, "service sent no reply text");
                (FALLBACK_REPLY.to_string(), false)
            }
            TurnOutcome::Failed(err) => {
                error!(turn = event.turn_id, error = %err, "fund calculation failed");
                (CALCULATION_FAILED.to_string(), true)
            }
        };

        let message = self.transcript.push(Message::bot(text)).clone();
        Some(TurnResolution { message, failed })
    }

    /// Submit `raw` and wait for its answer. Returns `None` when the input
    /// was blank, a turn was already pending, or the channel closed.
    pub async fn run_turn(
        &mut self,
        rx: &mut mpsc::UnboundedReceiver<TurnEvent>,
        raw: &str,
    ) -> Option<TurnResolution> {
        let SubmitOutcome::Started(turn_id) = self.submit(raw) else {
            return None;
        };
        while let Some(event) = rx.recv().await {
            if event.turn_id == turn_id {
                return self.finish(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::MockFundService;

    fn controller_with(
        service: Arc<MockFundService>,
        reply_delay: Duration,
    ) -> (ConversationController, mpsc::UnboundedReceiver<TurnEvent>) {
        ConversationController::new(service, ConversationSettings { reply_delay })
    }

    #[tokio::test]
    async fn whitespace_input_is_ignored() {
        let service = Arc::new(MockFundService::replying(Some("unused")));
        let (mut controller, _rx) = controller_with(service.clone(), Duration::ZERO);

        for raw in ["", "   ", "\t\n", " \u{3000} "] {
            assert_eq!(controller.submit(raw), SubmitOutcome::Empty);
        }

        tokio::task::yield_now().await;
        assert!(controller.transcript().is_empty());
        assert!(!controller.indicator().is_active());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn one_user_entry_then_one_bot_entry() {
        let service = Arc::new(MockFundService::replying(Some("Save ₹15,000/month")));
        let (mut controller, mut rx) = controller_with(service.clone(), Duration::ZERO);

        let outcome = controller.submit("  How much should I save?  ");
        assert!(matches!(outcome, SubmitOutcome::Started(_)));
        assert_eq!(controller.transcript().len(), 1);
        let user = controller.transcript().last().expect("user entry");
        assert_eq!(user.text, "How much should I save?");
        assert!(!user.is_from_bot);

        let event = rx.recv().await.expect("turn event");
        let resolution = controller.finish(event).expect("pending turn");

        assert!(!resolution.failed);
        assert_eq!(resolution.message.text, "Save ₹15,000/month");
        assert_eq!(controller.transcript().user_count(), 1);
        assert_eq!(controller.transcript().bot_count(), 1);
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.messages(), ["How much should I save?"]);
    }

    #[tokio::test]
    async fn indicator_never_overlaps_the_answer() {
        let service = Arc::new(MockFundService::replying(Some("done")));
        let (mut controller, mut rx) = controller_with(service, Duration::ZERO);

        controller.submit("question");
        assert!(controller.indicator().is_active());

        let event = rx.recv().await.expect("turn event");
        // Still showing until the event is applied, and no answer yet.
        assert!(controller.indicator().is_active());
        assert_eq!(controller.transcript().bot_count(), 0);

        controller.finish(event);
        assert!(!controller.indicator().is_active());
        assert!(controller.transcript().last().expect("answer").is_from_bot);
    }

    #[tokio::test]
    async fn missing_reply_uses_fallback() {
        let service = Arc::new(MockFundService::replying(None));
        let (mut controller, mut rx) = controller_with(service, Duration::ZERO);

        let resolution = controller
            .run_turn(&mut rx, "question")
            .await
            .expect("resolution");
        assert_eq!(resolution.message.text, FALLBACK_REPLY);
        assert!(!resolution.failed);
    }

    #[tokio::test]
    async fn empty_reply_uses_fallback() {
        let service = Arc::new(MockFundService::replying(Some("")));
        let (mut controller, mut rx) = controller_with(service, Duration::ZERO);

        let resolution = controller
            .run_turn(&mut rx, "question")
            .await
            .expect("resolution");
        assert_eq!(resolution.message.text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn failure_reports_fixed_error_and_clears_indicator() {
        let service = Arc::new(MockFundService::failing());
        let (mut controller, mut rx) = controller_with(service, Duration::ZERO);

        let resolution = controller
            .run_turn(&mut rx, "question")
            .await
            .expect("resolution");
        assert!(resolution.failed);
        assert_eq!(resolution.message.text, CALCULATION_FAILED);
        assert!(resolution.message.is_from_bot);
        assert!(!controller.indicator().is_active());
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_rejected() {
        let service = Arc::new(MockFundService::replying(Some("first")));
        let (mut controller, mut rx) = controller_with(service.clone(), Duration::ZERO);

        let first = controller.submit("first");
        assert!(matches!(first, SubmitOutcome::Started(_)));
        assert_eq!(controller.submit("second"), SubmitOutcome::Busy);
        assert_eq!(controller.transcript().len(), 1);

        let event = rx.recv().await.expect("turn event");
        controller.finish(event);
        assert_eq!(service.call_count(), 1);

        assert!(matches!(controller.submit("third"), SubmitOutcome::Started(_)));
    }

    #[tokio::test]
    async fn events_for_other_turns_are_dropped() {
        let service = Arc::new(MockFundService::replying(Some("real")));
        let (mut controller, mut rx) = controller_with(service, Duration::ZERO);

        let SubmitOutcome::Started(turn_id) = controller.submit("question") else {
            panic!("turn should start");
        };
        let stray = TurnEvent {
            turn_id: turn_id + 41,
            outcome: TurnOutcome::Replied(Some("stray".to_string())),
        };
        assert!(controller.finish(stray).is_none());
        assert!(controller.is_pending());
        assert!(controller.indicator().is_active());

        let event = rx.recv().await.expect("turn event");
        let resolution = controller.finish(event).expect("pending turn");
        assert_eq!(resolution.message.text, "real");
    }

    #[tokio::test(start_paused = true)]
    async fn reply_waits_for_minimum_display_delay() {
        let service = Arc::new(MockFundService::replying(Some("later")));
        let (mut controller, mut rx) = controller_with(service, Duration::from_millis(1000));

        let start = Instant::now();
        controller.submit("question");
        let event = rx.recv().await.expect("turn event");
        assert!(start.elapsed() >= Duration::from_millis(1000));
        controller.finish(event);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_reported_without_waiting() {
        let service = Arc::new(MockFundService::failing());
        let (mut controller, mut rx) = controller_with(service, Duration::from_millis(1000));

        let start = Instant::now();
        controller.submit("question");
        let event = rx.recv().await.expect("turn event");
        assert!(start.elapsed() < Duration::from_millis(1000));
        assert!(matches!(event.outcome, TurnOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn greeting_is_a_bot_message() {
        let service = Arc::new(MockFundService::replying(None));
        let (mut controller, _rx) = controller_with(service, Duration::ZERO);

        let greeting = controller.greet();
        assert!(greeting.is_from_bot);
        assert_eq!(greeting.text, GREETING);
    }
}
