use std::time::Duration;

use anyhow::Result;
use pollsync::storage::LockStorageExt;
use pollsync::testing::poll_p1;
use pollsync::testing::snapshot;
use pollsync::VoteGuard;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// When a newer poll becomes the latest, the guard is derived from the lock
/// of the new poll.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn poll_switch_reloads_guard() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    // This client voted on p2 in an earlier session.
    setup.lock_store.clone().write_vote_lock("p2", "y").await?;

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;

    tracing::info!("--- vote on p1");
    let outcome = view.vote("a").await?;
    assert!(outcome.is_voted());
    assert_eq!(VoteGuard::Voted("a".to_string()), view.current().guard);

    tracing::info!("--- p2 becomes the latest");
    setup.backend.add_poll(snapshot("p2", "Next?", &[("x", "X", 0), ("y", "Y", 7)]));
    view.refresh().await?;

    let st = view.wait(timeout()).poll_id("p2", "switch to p2").await?;
    assert_eq!(VoteGuard::Voted("y".to_string()), st.guard);

    tracing::info!("--- p3 was never voted on");
    setup.backend.add_poll(snapshot("p3", "Last?", &[("m", "M", 0), ("n", "N", 0)]));
    view.refresh().await?;

    let st = view.wait(timeout()).poll_id("p3", "switch to p3").await?;
    assert_eq!(VoteGuard::Unvoted, st.guard);

    assert_eq!(Some("a".to_string()), setup.lock_of("p1"));
    assert_eq!(None, setup.lock_of("p3"));

    view.shutdown().await?;
    Ok(())
}

/// A vote on p1 that completes after a fetch already switched the view to p2
/// locks p1, not p2. The vote response is the last write, so the view shows
/// p1 until the next fetch.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn vote_response_after_poll_switch() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;

    setup.backend.set_delay(Some(Duration::from_millis(500)));

    let voting = {
        let view = view.clone();
        tokio::spawn(async move { view.vote("a").await })
    };

    view.wait(timeout())
        .state(|s| s.vote_in_flight, "vote in flight")
        .await?;

    tracing::info!("--- p2 becomes the latest while the vote is in flight");
    setup.backend.set_delay(None);
    setup.backend.add_poll(snapshot("p2", "Next?", &[("x", "X", 0), ("y", "Y", 2)]));
    view.refresh().await?;

    let st = view.wait(timeout()).poll_id("p2", "switch to p2").await?;
    assert_eq!(VoteGuard::Unvoted, st.guard);
    assert!(st.vote_in_flight);

    tracing::info!("--- the vote on p1 completes");
    let outcome = voting.await??;
    assert!(outcome.is_voted());

    let st = view.current();
    assert_eq!(Some("p1"), st.snapshot.as_ref().map(|x| x.id.as_str()));
    assert_eq!(Some(4), st.snapshot.map(|x| x.options["a"].votes));
    assert_eq!(VoteGuard::Voted("a".to_string()), st.guard);
    assert_eq!(Some("a".to_string()), setup.lock_of("p1"));
    assert_eq!(None, setup.lock_of("p2"));

    tracing::info!("--- the next fetch shows p2, not voted");
    view.refresh().await?;
    let st = view.wait(timeout()).poll_id("p2", "back to p2").await?;
    assert_eq!(VoteGuard::Unvoted, st.guard);
    assert_eq!(1, setup.backend.request_counts().vote);

    view.shutdown().await?;
    Ok(())
}
