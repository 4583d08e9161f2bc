use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pollsync::testing::poll_p1;
use pollsync::Config;
use pretty_assertions::assert_eq;

use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// The periodic fetch picks up votes cast by other clients.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn tick_refresh() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let config = Arc::new(
        Config {
            poll_interval: 50,
            ..Default::default()
        }
        .validate()?,
    );

    let view = setup.open(config);
    view.wait(timeout()).loaded("initial load").await?;

    tracing::info!("--- other clients vote for b");
    setup.backend.add_votes("p1", "b", 2);

    let st = view
        .wait(timeout())
        .state(
            |s| s.snapshot.as_ref().map(|x| x.options["b"].votes) == Some(3),
            "tick fetches b:3",
        )
        .await?;
    assert_eq!(Some(50.0), st.snapshot.as_ref().and_then(|x| x.percent("b")));

    tracing::info!("--- disable tick, no more fetches");
    view.enable_tick(false);
    // Let a tick already in flight land.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let before = setup.backend.request_counts().latest;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(before, setup.backend.request_counts().latest);

    view.shutdown().await?;
    Ok(())
}
