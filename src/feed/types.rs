use std::time::Duration;

/// Parameters for driving the group feed page
#[derive(Debug, Clone)]
pub struct FeedParams {
    /// URL of the group feed to watch
    pub group_url: String,
    /// Session cookie granting access to the group
    pub session_cookie: String,
    /// Account cookie paired with the session cookie
    pub c_user_cookie: String,
    /// How many scroll rounds to perform before giving up on new posts
    pub scroll_rounds: u32,
    /// How long to let the page settle after each interaction
    pub settle_delay: Duration,
}

impl FeedParams {
    pub fn new(group_url: &str, session_cookie: &str, c_user_cookie: &str) -> Self {
        Self {
            group_url: group_url.to_string(),
            session_cookie: session_cookie.to_string(),
            c_user_cookie: c_user_cookie.to_string(),
            scroll_rounds: 6,
            settle_delay: Duration::from_secs(2),
        }
    }
}
