use crate::domain::{AuthToken, FeedItem};
use crate::errors::NotifierResult;

#[cfg_attr(test, mockall::automock)]
pub trait ReaderApi {
    /// Exchange credentials for a bearer token.
    fn login(&self, username: &str, password: &str) -> NotifierResult<AuthToken>;

    /// Fetch one page of the reading list and keep only unread items, in server order.
    fn fetch_unread(&self, token: &AuthToken, limit: usize) -> NotifierResult<Vec<FeedItem>>;
}
