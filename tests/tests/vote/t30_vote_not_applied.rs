use anyhow::Result;
use pollsync::errors::NetworkError;
use pollsync::errors::PollError;
use pollsync::errors::Rejected;
use pollsync::errors::Suppressed;
use pollsync::testing::poll_p1;
use pollsync::VoteGuard;
use pollsync::VoteOutcome;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// A vote rejected by the service leaves the snapshot and the guard as they
/// were, and the vote can be retried.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn vote_rejected() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;

    setup.backend.fail_next(Rejected::new(500, "internal error"));

    let outcome = view.vote("a").await?;
    assert_eq!(
        VoteOutcome::Failed(PollError::from(Rejected::new(500, "internal error"))),
        outcome
    );

    let st = view.current();
    assert_eq!(Some(poll_p1()), st.snapshot);
    assert_eq!(VoteGuard::Unvoted, st.guard);
    assert!(!st.vote_in_flight);
    assert_eq!(None, setup.lock_of("p1"));

    tracing::info!("--- a network failure is not applied either");
    setup.backend.set_offline(true);
    let VoteOutcome::Failed(err) = view.vote("a").await? else {
        anyhow::bail!("expect a failed vote");
    };
    assert!(NetworkError::try_from(err).is_ok());
    assert_eq!(VoteGuard::Unvoted, view.current().guard);
    setup.backend.set_offline(false);

    tracing::info!("--- retry succeeds");
    assert!(view.vote("a").await?.is_voted());
    assert_eq!(Some("a".to_string()), setup.lock_of("p1"));
    assert_eq!(3, setup.backend.request_counts().vote);

    view.shutdown().await?;
    Ok(())
}

/// Votes that can not be valid are refused before any request.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn vote_suppressed_before_request() -> Result<()> {
    let setup = PollSetup::new();

    let view = setup.open(manual_config()?);
    view.wait(timeout())
        .fetch_failed_at_least(1, "no poll yet")
        .await?;

    assert_eq!(
        VoteOutcome::Suppressed(Suppressed::NotLoaded),
        view.vote("a").await?
    );

    setup.backend.add_poll(poll_p1());
    view.refresh().await?;
    view.wait(timeout()).loaded("load p1").await?;

    assert_eq!(
        VoteOutcome::Suppressed(Suppressed::UnknownOption("z".to_string())),
        view.vote("z").await?
    );

    assert_eq!(0, setup.backend.request_counts().vote);
    assert_eq!(0, view.current().votes_sent);

    view.shutdown().await?;
    Ok(())
}
