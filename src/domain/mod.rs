pub mod item;
pub mod notification;
pub mod session;

pub use item::{FeedItem, Link};
pub use notification::Notification;
pub use session::{AuthToken, SeenSet};
