use anyhow::Result;
use pollsync::errors::PollError;
use pollsync::errors::Rejected;
use pollsync::render::Rendered;
use pollsync::testing::poll_p1;
use pollsync::VoteGuard;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// The view loads the latest poll once at start.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn initial_load() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);

    tracing::info!("--- wait for the first load");
    let st = view.wait(timeout()).loaded("initial load").await?;

    assert_eq!(Some(poll_p1()), st.snapshot);
    assert_eq!(VoteGuard::Unvoted, st.guard);
    assert_eq!(1, st.fetch_succeeded);
    assert_eq!(None, st.last_error);

    tracing::info!("--- render percents of {{a:3, b:1}}");
    let Rendered::Poll(r) = view.render() else {
        panic!("expect a rendered poll");
    };
    assert_eq!(4, r.total);
    assert_eq!(vec![75.0, 25.0], r.rows.iter().map(|x| x.percent).collect::<Vec<_>>());
    assert!(r.rows.iter().all(|x| x.button.enabled));

    view.shutdown().await?;
    Ok(())
}

/// Before any poll exists the service answers 404; the view keeps rendering
/// the placeholder.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn initial_load_no_poll() -> Result<()> {
    let setup = PollSetup::new();
    let view = setup.open(manual_config()?);

    let st = view
        .wait(timeout())
        .fetch_failed_at_least(1, "404 on first load")
        .await?;

    assert_eq!(None, st.snapshot);
    assert_eq!(
        Some(PollError::from(Rejected::new(404, "no polls"))),
        st.last_error
    );
    assert_eq!(Rendered::Loading, view.render());

    tracing::info!("--- a poll is created, refresh loads it");
    setup.backend.add_poll(poll_p1());
    view.refresh().await?;

    let st = view.wait(timeout()).loaded("load after refresh").await?;
    assert_eq!(None, st.last_error);

    view.shutdown().await?;
    Ok(())
}
