//! The one-vote-per-client rule.

mod vote_guard;


pub use vote_guard::VoteGuard;
