use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use adoptsignal_common::{SourceId, SourceStatus};

use crate::adapters::SourceAdapter;

/// Budget for one reachability probe.
const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe every adapter: unconfigured sources are reported without touching
/// the network, the rest get a bounded ping.
pub async fn check_api_status(
    adapters: &[Box<dyn SourceAdapter>],
) -> BTreeMap<SourceId, SourceStatus> {
    let probes = adapters.iter().map(|adapter| async move {
        let source = adapter.source();
        if !adapter.configured() {
            return (
                source,
                SourceStatus {
                    configured: false,
                    reachable: false,
                },
            );
        }

        let reachable = match tokio::time::timeout(PING_TIMEOUT, adapter.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(%source, error = %e, "Ping failed");
                false
            }
            Err(_) => {
                debug!(%source, "Ping timed out");
                false
            }
        };

        (
            source,
            SourceStatus {
                configured: true,
                reachable,
            },
        )
    });

    join_all(probes).await.into_iter().collect()
}
