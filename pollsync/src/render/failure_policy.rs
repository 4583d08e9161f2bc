/// The fixed message shown by [`FailurePolicy::ShowMessage`].
pub const FAILURE_MESSAGE: &str = "Could not load the poll.";

/// What a view renders while its most recent fetch is failing.
///
/// Each use case picks one explicitly. The poll page keeps the last good
/// snapshot; pages such as the guestbook show a fixed error message instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(clap::ValueEnum)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep rendering the last successfully fetched snapshot.
    #[default]
    KeepStale,

    /// Render [`FAILURE_MESSAGE`] instead of the poll.
    ShowMessage,
}
