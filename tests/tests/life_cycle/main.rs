#![allow(clippy::single_component_path_imports)]

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod t10_shutdown;
