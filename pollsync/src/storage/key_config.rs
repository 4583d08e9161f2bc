/// The key under which the option this client voted for on `poll_id` is
/// stored: `poll-vote-{poll_id}`.
pub fn vote_lock_key(poll_id: &str) -> String {
    format!("poll-vote-{}", poll_id)
}
