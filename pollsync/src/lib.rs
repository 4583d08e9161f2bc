#![doc = include_str!("lib_readme.md")]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::bool_comparison)]
#![allow(clippy::result_large_err)]
#![deny(unused_qualifications)]

macro_rules! func_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let n = &name[..name.len() - 3];
        let nn = n.replace("::{{closure}}", "");
        nn
    }};
}

pub extern crate openraft_macros;

mod config;
mod core;

pub mod backend;
pub mod base;
pub mod errors;
pub mod guard;
pub mod poll;
pub mod render;
pub mod state;
pub mod storage;
pub mod testing;
pub mod view;

pub use anyerror;
pub use anyerror::AnyError;
pub use openraft_macros::add_async_trait;

pub use crate::backend::Backend;
pub use crate::config::Config;
pub use crate::config::ConfigError;
pub use crate::guard::VoteGuard;
pub use crate::poll::NewPoll;
pub use crate::poll::OptionKey;
pub use crate::poll::OptionState;
pub use crate::poll::PollDraft;
pub use crate::poll::PollId;
pub use crate::poll::PollSnapshot;
pub use crate::render::FailurePolicy;
pub use crate::state::ViewState;
pub use crate::storage::LockStorage;
pub use crate::storage::LockStorageExt;
pub use crate::view::PollView;
pub use crate::view::VoteOutcome;
