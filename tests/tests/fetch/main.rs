#![allow(clippy::single_component_path_imports)]

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod t10_initial_load;
mod t20_fetch_failure;
mod t30_tick_refresh;
mod t40_poll_switch;
