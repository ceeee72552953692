use relay_test_utils::{MemoryRelayStore, RecordingGateway};
use std::sync::Arc;
use topic_relay::{RelayConfig, TopicRelay};

pub(crate) async fn make_relay(
    gateway: Arc<RecordingGateway>,
    store: Arc<MemoryRelayStore>,
) -> TopicRelay {
    relay_test_utils::init_logging();

    TopicRelay::new(
        "test-relay",
        RelayConfig {
            max_in_flight_sends: 8,
            send_pacing_ms: 0,
        },
        store,
        gateway,
    )
    .await
    .expect("relay creation should succeed")
}

#[allow(dead_code)]
pub(crate) async fn make_default_relay(gateway: Arc<RecordingGateway>) -> TopicRelay {
    make_relay(gateway, Arc::new(MemoryRelayStore::default())).await
}
