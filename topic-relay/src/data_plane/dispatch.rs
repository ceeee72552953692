//! Bounded-concurrency dispatch of one resolved fan-out plan.

use crate::data_plane::delivery::{deliver_to_target, DeliveryOutcome, DeliveryPolicy};
use crate::endpoint::Endpoint;
use crate::gateway::ChatGateway;
use crate::observability::events;
use crate::render::RenderedBroadcast;
use crate::routing::fanout_resolution::FanoutPlan;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

const COMPONENT: &str = "dispatch";

/// Delivery result for one `(topic, target)` pair of a broadcast.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetReport {
    pub topic: String,
    pub target: Endpoint,
    pub outcome: DeliveryOutcome,
}

/// Summary of one inbound message's fan-out, for logging and tests; delivery
/// failures are terminal here and never reach the original sender.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BroadcastReport {
    /// The whole broadcast was suppressed by the global ban.
    pub sender_banned: bool,
    /// Topics skipped because the sender is muted in them.
    pub muted_topics: Vec<String>,
    pub deliveries: Vec<TargetReport>,
}

impl BroadcastReport {
    pub fn delivered_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|report| matches!(report.outcome, DeliveryOutcome::Delivered { .. }))
            .count()
    }
}

/// Executes fan-out plans against the gateway.
///
/// All deliveries, across all in-flight messages, share one permit pool so a
/// single slow or rate-limited target blocks only its own task while the
/// process as a whole respects the platform-wide ceiling.
pub(crate) struct FanoutDispatcher {
    gateway: Arc<dyn ChatGateway>,
    permits: Arc<Semaphore>,
    policy: DeliveryPolicy,
}

impl FanoutDispatcher {
    pub(crate) fn new(
        gateway: Arc<dyn ChatGateway>,
        max_in_flight_sends: usize,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            gateway,
            permits: Arc::new(Semaphore::new(max_in_flight_sends)),
            policy,
        }
    }

    /// Delivers one rendered broadcast to every target in the plan,
    /// concurrently, and collects per-target outcomes.
    pub(crate) async fn dispatch(
        &self,
        plan: FanoutPlan,
        broadcast: &RenderedBroadcast,
    ) -> BroadcastReport {
        let mut report = BroadcastReport {
            sender_banned: plan.sender_banned,
            muted_topics: plan.muted_topics,
            deliveries: Vec::new(),
        };

        let pairs: Vec<(String, Endpoint)> = plan
            .topics
            .into_iter()
            .flat_map(|fanout| {
                let topic = fanout.topic;
                fanout
                    .targets
                    .into_iter()
                    .map(move |target| (topic.clone(), target))
            })
            .collect();

        if pairs.is_empty() {
            return report;
        }
        debug!(
            event = events::FANOUT_DISPATCH_START,
            component = COMPONENT,
            targets = pairs.len(),
            "dispatching broadcast"
        );

        let deliveries = pairs.into_iter().map(|(topic, target)| async move {
            let outcome = match self.permits.acquire().await {
                Ok(_permit) => {
                    deliver_to_target(self.gateway.as_ref(), target, broadcast, &self.policy)
                        .await
                }
                // The permit pool is never closed while the dispatcher is alive.
                Err(_) => DeliveryOutcome::Failed,
            };
            TargetReport {
                topic,
                target,
                outcome,
            }
        });
        report.deliveries = join_all(deliveries).await;

        debug!(
            event = events::FANOUT_DISPATCH_DONE,
            component = COMPONENT,
            delivered = report.delivered_count(),
            targets = report.deliveries.len(),
            "broadcast dispatched"
        );
        report
    }
}
