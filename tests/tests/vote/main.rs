#![allow(clippy::single_component_path_imports)]

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod t10_vote_persists_lock;
mod t30_vote_not_applied;
