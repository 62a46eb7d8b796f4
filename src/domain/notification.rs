use super::FeedItem;

pub const PLACEHOLDER_TITLE: &str = "No title";
pub const PLACEHOLDER_CATEGORY: &str = "Uncategorized";

const RULE: &str = "---------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn from_item(item: &FeedItem) -> Self {
        let title = item
            .title
            .as_deref()
            .unwrap_or(PLACEHOLDER_TITLE)
            .trim()
            .to_string();
        let category = item.display_category().unwrap_or(PLACEHOLDER_CATEGORY);

        let body = format!(
            "{rule}\nURL: {url}\n\nCategory: {category}\n{rule}",
            rule = RULE,
            url = item.primary_link(),
            category = category,
        );

        Self { title, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::READ_MARKER;

    #[test]
    fn test_notification_from_full_item() {
        let item = FeedItem::new("1".to_string())
            .with_title(Some("  New Rust Features \n".to_string()))
            .with_link(" https://example.com/post ")
            .with_categories(vec![
                "user/-/state/com.google/reading-list".to_string(),
                "user/-/label/Programming".to_string(),
            ]);

        let notification = Notification::from_item(&item);

        assert_eq!(notification.title, "New Rust Features");
        assert_eq!(
            notification.body,
            "---------\nURL: https://example.com/post\n\nCategory: user/-/label/Programming\n---------"
        );
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let item = FeedItem::new("1".to_string()).with_link("http://x");
        let notification = Notification::from_item(&item);
        assert_eq!(notification.title, "No title");
    }

    #[test]
    fn test_missing_link_and_category() {
        let item = FeedItem::new("1".to_string()).with_title(Some("A".to_string()));
        let notification = Notification::from_item(&item);

        assert!(notification.body.contains("URL: \n"));
        assert!(notification.body.contains("Category: Uncategorized"));
    }

    #[test]
    fn test_category_after_read_marker() {
        let item = FeedItem::new("1".to_string())
            .with_categories(vec![READ_MARKER.to_string(), "folder/Tech".to_string()]);
        let notification = Notification::from_item(&item);
        assert!(notification.body.contains("Category: folder/Tech"));
    }
}
