use anyhow::Result;
use pollsync::errors::Fatal;
use pollsync::testing::poll_p1;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// After shutdown every call returns `Fatal::Stopped`.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn shutdown_stops_view() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;
    assert!(view.is_running());

    view.shutdown().await?;
    assert!(!view.is_running());

    assert_eq!(Err(Fatal::Stopped), view.refresh().await);
    assert_eq!(Err(Fatal::Stopped), view.vote("a").await);

    let st = view.current();
    assert_eq!(Err(Fatal::Stopped), st.running_state);
    assert_eq!(Some(poll_p1()), st.snapshot, "state is kept");

    tracing::info!("--- shutdown again is harmless");
    view.shutdown().await?;

    assert_eq!(0, setup.backend.request_counts().vote);
    Ok(())
}

/// A clone of a view sees the same shutdown.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn shutdown_seen_by_clone() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    let view2 = view.clone();

    let waiting = {
        let view2 = view2.clone();
        tokio::spawn(async move {
            view2.wait(None).state(|s| s.running_state.is_err(), "stopped").await
        })
    };

    view.shutdown().await?;

    let st = waiting.await??;
    assert_eq!(Err(Fatal::Stopped), st.running_state);
    assert_eq!(Err(Fatal::Stopped), view2.refresh().await);
    Ok(())
}

/// Clones shutting down at the same time all wait for the one core join and
/// agree on the result.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn concurrent_shutdown() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;

    let handles = (0..4)
        .map(|_| {
            let view = view.clone();
            tokio::spawn(async move { view.shutdown().await })
        })
        .collect::<Vec<_>>();

    for h in handles {
        assert_eq!(Ok(()), h.await?);
    }

    assert!(!view.is_running());
    assert_eq!(Err(Fatal::Stopped), view.refresh().await);
    Ok(())
}
