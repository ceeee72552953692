//! Per-target delivery worker applying the send reliability policy.

use crate::endpoint::Endpoint;
use crate::gateway::{ChatGateway, SendError};
use crate::observability::{events, fields};
use crate::render::{OutboundPayload, RenderedBroadcast};
use std::time::Duration;
use tracing::{debug, warn};

const COMPONENT: &str = "delivery";

/// Terminal state of one target's delivery attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeliveryOutcome {
    /// The primary message reached the target; counts how many attachment
    /// follow-ups also made it.
    Delivered { attachments_forwarded: usize },
    /// The target endpoint no longer exists; abandoned without retry and
    /// without touching the directory.
    TargetGone,
    /// An unexpected platform failure; logged and abandoned for this target
    /// only.
    Failed,
}

/// Reliability knobs applied to every send inside one delivery task.
#[derive(Clone, Debug)]
pub(crate) struct DeliveryPolicy {
    /// Pause after each successful send, easing pressure on platform-wide
    /// rate ceilings.
    pub(crate) send_pacing: Duration,
}

enum SendFailure {
    TargetGone,
    Fatal,
}

/// Runs one send under the reliability policy.
///
/// A rate-limit signal blocks only this task: sleep the platform-provided
/// duration and retry the same payload, indefinitely. A not-found signal
/// abandons the target. Anything else is logged and abandoned.
async fn send_with_retry(
    gateway: &dyn ChatGateway,
    target: Endpoint,
    payload: &OutboundPayload,
    policy: &DeliveryPolicy,
) -> Result<(), SendFailure> {
    loop {
        debug!(
            event = events::DELIVERY_SEND_ATTEMPT,
            component = COMPONENT,
            target = %target,
            "attempting send"
        );
        match gateway.send(target, payload).await {
            Ok(()) => {
                debug!(
                    event = events::DELIVERY_SEND_OK,
                    component = COMPONENT,
                    target = %target,
                    "send succeeded"
                );
                if !policy.send_pacing.is_zero() {
                    tokio::time::sleep(policy.send_pacing).await;
                }
                return Ok(());
            }
            Err(SendError::RateLimited { retry_after }) => {
                debug!(
                    event = events::DELIVERY_RATE_LIMITED,
                    component = COMPONENT,
                    target = %target,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "rate limited, waiting before retry"
                );
                tokio::time::sleep(retry_after).await;
            }
            Err(SendError::NotFound) => {
                debug!(
                    event = events::DELIVERY_TARGET_GONE,
                    component = COMPONENT,
                    target = %target,
                    reason = fields::REASON_TARGET_NOT_FOUND,
                    "target endpoint gone, abandoning delivery"
                );
                return Err(SendFailure::TargetGone);
            }
            Err(err @ SendError::Other(_)) => {
                warn!(
                    event = events::DELIVERY_SEND_FAILED,
                    component = COMPONENT,
                    target = %target,
                    err = %err,
                    "send failed, abandoning delivery"
                );
                return Err(SendFailure::Fatal);
            }
        }
    }
}

/// Delivers one rendered broadcast to one target: the primary message first,
/// then each attachment as its own follow-up send.
///
/// An attachment failure never retracts the already-delivered primary; a
/// vanished target aborts the remaining follow-ups only.
pub(crate) async fn deliver_to_target(
    gateway: &dyn ChatGateway,
    target: Endpoint,
    broadcast: &RenderedBroadcast,
    policy: &DeliveryPolicy,
) -> DeliveryOutcome {
    let primary = OutboundPayload::Message(broadcast.primary.clone());
    match send_with_retry(gateway, target, &primary, policy).await {
        Ok(()) => {}
        Err(SendFailure::TargetGone) => return DeliveryOutcome::TargetGone,
        Err(SendFailure::Fatal) => return DeliveryOutcome::Failed,
    }

    let mut attachments_forwarded = 0;
    for attachment in &broadcast.follow_ups {
        let payload = OutboundPayload::Attachment(attachment.clone());
        match send_with_retry(gateway, target, &payload, policy).await {
            Ok(()) => attachments_forwarded += 1,
            Err(SendFailure::TargetGone) => {
                warn!(
                    event = events::ATTACHMENT_FORWARD_ABANDONED,
                    component = COMPONENT,
                    target = %target,
                    attachments_forwarded,
                    "target vanished mid-sequence, abandoning remaining attachments"
                );
                break;
            }
            Err(SendFailure::Fatal) => {
                warn!(
                    event = events::ATTACHMENT_FORWARD_FAILED,
                    component = COMPONENT,
                    target = %target,
                    url = attachment.url.as_str(),
                    "attachment forward failed, continuing with the rest"
                );
            }
        }
    }
    DeliveryOutcome::Delivered {
        attachments_forwarded,
    }
}

#[cfg(test)]
mod tests {
    use super::{deliver_to_target, DeliveryOutcome, DeliveryPolicy};
    use crate::endpoint::Endpoint;
    use crate::gateway::{ChatGateway, SendError};
    use crate::message::Attachment;
    use crate::render::{OutboundPayload, RenderedBroadcast, RenderedMessage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<Result<(), SendError>>>,
        attempts: Mutex<Vec<OutboundPayload>>,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<Result<(), SendError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<OutboundPayload> {
            self.attempts.lock().expect("attempts lock").clone()
        }
    }

    #[async_trait]
    impl ChatGateway for ScriptedGateway {
        async fn send(
            &self,
            _target: Endpoint,
            payload: &OutboundPayload,
        ) -> Result<(), SendError> {
            self.attempts
                .lock()
                .expect("attempts lock")
                .push(payload.clone());
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    fn no_pacing() -> DeliveryPolicy {
        DeliveryPolicy {
            send_pacing: Duration::ZERO,
        }
    }

    fn broadcast(follow_ups: Vec<Attachment>) -> RenderedBroadcast {
        RenderedBroadcast {
            primary: RenderedMessage {
                author_label: "Alice@Origin Community".to_string(),
                body: "hi".to_string(),
                image_url: None,
            },
            follow_ups,
        }
    }

    #[tokio::test]
    async fn rate_limited_send_is_retried_with_the_same_payload() {
        let gateway = ScriptedGateway::new(vec![
            Err(SendError::RateLimited {
                retry_after: Duration::from_millis(25),
            }),
            Ok(()),
        ]);
        let started = Instant::now();

        let outcome = deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(Vec::new()),
            &no_pacing(),
        )
        .await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                attachments_forwarded: 0
            }
        );
        let attempts = gateway.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0], attempts[1]);
        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test]
    async fn vanished_target_is_abandoned_without_retry() {
        let gateway = ScriptedGateway::new(vec![Err(SendError::NotFound)]);

        let outcome = deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(Vec::new()),
            &no_pacing(),
        )
        .await;

        assert_eq!(outcome, DeliveryOutcome::TargetGone);
        assert_eq!(gateway.attempts().len(), 1);
    }

    #[tokio::test]
    async fn unexpected_failure_abandons_the_delivery() {
        let gateway = ScriptedGateway::new(vec![Err(SendError::Other("boom".to_string()))]);

        let outcome = deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(Vec::new()),
            &no_pacing(),
        )
        .await;

        assert_eq!(outcome, DeliveryOutcome::Failed);
    }

    #[tokio::test]
    async fn attachment_failure_keeps_the_primary_and_the_rest() {
        let first = Attachment::new("https://cdn.example/1.bin", None);
        let second = Attachment::new("https://cdn.example/2.bin", None);
        let gateway = ScriptedGateway::new(vec![
            Ok(()),
            Err(SendError::Other("boom".to_string())),
            Ok(()),
        ]);

        let outcome = deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(vec![first, second.clone()]),
            &no_pacing(),
        )
        .await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                attachments_forwarded: 1
            }
        );
        let attempts = gateway.attempts();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[2], OutboundPayload::Attachment(second));
    }

    #[tokio::test]
    async fn target_vanishing_mid_sequence_stops_remaining_attachments() {
        let first = Attachment::new("https://cdn.example/1.bin", None);
        let second = Attachment::new("https://cdn.example/2.bin", None);
        let gateway = ScriptedGateway::new(vec![Ok(()), Err(SendError::NotFound)]);

        let outcome = deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(vec![first, second]),
            &no_pacing(),
        )
        .await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                attachments_forwarded: 0
            }
        );
        assert_eq!(gateway.attempts().len(), 2);
    }

    #[tokio::test]
    async fn successful_sends_are_paced() {
        let gateway = ScriptedGateway::new(vec![Ok(()), Ok(())]);
        let policy = DeliveryPolicy {
            send_pacing: Duration::from_millis(20),
        };
        let started = Instant::now();

        deliver_to_target(
            &gateway,
            Endpoint::new(2, 20),
            &broadcast(vec![Attachment::new("https://cdn.example/1.bin", None)]),
            &policy,
        )
        .await;

        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
