use anyerror::AnyError;

/// Error variants related to configuration.
#[derive(Debug, thiserror::Error)]
#[derive(PartialEq, Eq)]
pub enum ConfigError {
    #[error("ParseError: {source} while parsing ({args:?})")]
    ParseError { source: AnyError, args: Vec<String> },

    #[error("poll_interval must be > 0")]
    PollInterval,

    #[error("request_timeout must be > 0")]
    RequestTimeout,

    /// The api url is not an absolute http or https url.
    #[error("api_url({url}) must start with http:// or https://")]
    ApiUrl { url: String },
}
