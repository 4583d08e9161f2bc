use anyhow::Result;
use maplit::btreemap;
use pollsync::errors::Suppressed;
use pollsync::render::Rendered;
use pollsync::testing::poll_p1;
use pollsync::testing::snapshot;
use pollsync::VoteGuard;
use pollsync::VoteOutcome;
use pretty_assertions::assert_eq;

use crate::fixtures::manual_config;
use crate::fixtures::timeout;
use crate::fixtures::ut_harness;
use crate::fixtures::PollSetup;

/// A successful vote replaces the snapshot with the server's, locks the guard
/// and persists the lock; later votes are not sent.
#[tracing::instrument]
#[test_harness::test(harness = ut_harness)]
async fn vote_persists_lock() -> Result<()> {
    let setup = PollSetup::new();
    setup.backend.add_poll(poll_p1());

    let view = setup.open(manual_config()?);
    view.wait(timeout()).loaded("initial load").await?;

    tracing::info!("--- vote for a");
    let outcome = view.vote("a").await?;

    let want = snapshot("p1", "Tabs or spaces?", &[("a", "Tabs", 4), ("b", "Spaces", 1)]);
    assert_eq!(VoteOutcome::Voted(want.clone()), outcome);

    let st = view.current();
    assert_eq!(Some(want), st.snapshot);
    assert_eq!(VoteGuard::Voted("a".to_string()), st.guard);
    assert!(!st.vote_in_flight);
    assert_eq!(1, st.votes_sent);

    assert_eq!(
        btreemap! {"poll-vote-p1".to_string() => "a".to_string()},
        setup.lock_store.entries()
    );

    tracing::info!("--- the vote buttons are disabled, a is highlighted");
    let Rendered::Poll(r) = view.render() else {
        panic!("expect a rendered poll");
    };
    assert_eq!(5, r.total);
    assert_eq!(
        vec![("a", false, true), ("b", false, false)],
        r.rows
            .iter()
            .map(|x| (x.key.as_str(), x.button.enabled, x.button.highlighted))
            .collect::<Vec<_>>()
    );

    tracing::info!("--- further votes produce no request");
    for key in ["a", "b", "a"] {
        let outcome = view.vote(key).await?;
        assert_eq!(
            VoteOutcome::Suppressed(Suppressed::AlreadyVoted("a".to_string())),
            outcome
        );
    }
    assert_eq!(1, setup.backend.request_counts().vote);
    assert_eq!(1, view.current().votes_sent);

    view.shutdown().await?;
    Ok(())
}
