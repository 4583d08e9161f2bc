//! Poll view runtime configuration.

use std::time::Duration;

use anyerror::AnyError;
use clap::Parser;

use crate::config::errors::ConfigError;
use crate::render::FailurePolicy;

/// The runtime configuration for a [`PollView`](crate::PollView).
///
/// The defaults match the poll page this client was built for: the service
/// is expected at `http://localhost:8000/api` and the latest poll is fetched
/// every 3 seconds.
///
/// A request should normally complete well within one poll interval. Nothing
/// breaks if it does not: every tick issues a new fetch regardless of
/// in-flight ones and whichever response lands last wins.
#[derive(Clone, Debug, Parser)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Base URL of the poll service API, without a trailing slash
    #[clap(long, default_value = "http://localhost:8000/api")]
    pub api_url: String,

    /// The interval in milliseconds between two fetches of the latest poll
    #[clap(long, default_value = "3000")]
    pub poll_interval: u64,

    /// Timeout in milliseconds of a single request to the poll service
    #[clap(long, default_value = "5000")]
    pub request_timeout: u64,

    /// Enable or disable tick.
    ///
    /// If ticking is disabled, the view fetches once at start and then only
    /// when [`PollView::refresh()`](crate::PollView::refresh) is called.
    ///
    /// - being absent: true
    /// - `--enable-tick`: true
    /// - `--enable-tick=true`: true
    /// - `--enable-tick=false`: false
    // clap 4 requires `num_args = 0..=1`, or it complains about missing arg
    // error https://github.com/clap-rs/clap/discussions/4374
    #[clap(long,
           default_value_t = true,
           action = clap::ArgAction::Set,
           num_args = 0..=1,
           default_missing_value = "true"
    )]
    pub enable_tick: bool,

    /// What to render while the most recent fetch is failing
    #[clap(long, value_enum, default_value_t = FailurePolicy::KeepStale)]
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        <Self as Parser>::parse_from(Vec::<&'static str>::new())
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    /// Build a `Config` instance from a series of command line arguments.
    ///
    /// The first element in `args` must be the application name.
    pub fn build(args: &[&str]) -> Result<Config, ConfigError> {
        let config = <Self as Parser>::try_parse_from(args).map_err(|e| {
            ConfigError::ParseError {
                source: AnyError::from(&e),
                args: args.iter().map(|x| x.to_string()).collect(),
            }
        })?;
        config.validate()
    }

    /// Validate the state of this config.
    pub fn validate(self) -> Result<Config, ConfigError> {
        if self.poll_interval == 0 {
            return Err(ConfigError::PollInterval);
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::RequestTimeout);
        }

        let url = self.api_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ApiUrl {
                url: self.api_url.clone(),
            });
        }

        Ok(self)
    }
}
