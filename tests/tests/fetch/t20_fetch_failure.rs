use std::sync::Arc;

use anyhow::Result;
use pollsync::errors::PollError;
use pollsync::render::Rendered;
use pollsync::render::FAILURE_MESSAGE;
use pollsync::testing::poll_p1;
use pollsync::Config;
use pollsync::FailurePolicy;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// A failed fetch keeps the last good snapshot and is recorded, not raised.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn fetch_failure_keeps_stale() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;
    let before = view.render();

    tracing::info!("--- take the service offline, then refresh");
    setup.backend.set_offline(true);
    view.refresh().await?;

    let st = view
        .wait(timeout())
        .fetch_failed_at_least(1, "offline fetch")
        .await?;

    assert_eq!(Some(poll_p1()), st.snapshot);
    assert!(matches!(st.last_error, Some(PollError::Network(_))));
    assert_eq!(before, view.render(), "KeepStale renders the last snapshot");

    tracing::info!("--- back online, the error is cleared");
    setup.backend.set_offline(false);
    view.refresh().await?;

    let st = view
        .wait(timeout())
        .fetch_succeeded_at_least(2, "recovered")
        .await?;
    assert_eq!(None, st.last_error);
    assert_eq!(1, st.fetch_failed);

    view.shutdown().await?;
    Ok(())
}

/// Under `ShowMessage` a failing fetch replaces the poll with a fixed message.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn fetch_failure_show_message() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let config = Arc::new(
        Config {
            enable_tick: false,
            failure_policy: FailurePolicy::ShowMessage,
            ..Default::default()
        }
        .validate()?,
    );

    let view = setup.open(config);
    view.wait(timeout()).loaded("initial load").await?;
    assert!(matches!(view.render(), Rendered::Poll(_)));

    setup.backend.set_offline(true);
    view.refresh().await?;
    view.wait(timeout())
        .fetch_failed_at_least(1, "offline fetch")
        .await?;

    assert_eq!(
        Rendered::Failed {
            message: FAILURE_MESSAGE
        },
        view.render()
    );

    setup.backend.set_offline(false);
    view.refresh().await?;
    view.wait(timeout())
        .state(|s| s.last_error.is_none(), "recovered")
        .await?;
    assert!(matches!(view.render(), Rendered::Poll(_)));

    view.shutdown().await?;
    Ok(())
}
