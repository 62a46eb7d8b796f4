use std::time::Duration;

use crate::domain::{AuthToken, FeedItem, Notification, SeenSet};
use crate::errors::NotifierResult;
use crate::reader::ReaderApi;
use crate::services::notification_service::Dispatcher;

/// Items requested per reading-list call.
pub const PAGE_SIZE: usize = 20;

/// Outcome of one fetch/filter/dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub fetched: usize,
    pub new: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct PollService<R: ReaderApi, D: Dispatcher> {
    reader: R,
    dispatcher: D,
    token: AuthToken,
    seen: SeenSet,
}

impl<R: ReaderApi, D: Dispatcher> PollService<R, D> {
    /// Authenticate once; the returned service owns the token for its lifetime.
    pub fn start(reader: R, dispatcher: D, username: &str, password: &str) -> NotifierResult<Self> {
        let token = reader.login(username, password)?;
        tracing::info!(username, "Logged in, got auth token");

        Ok(Self {
            reader,
            dispatcher,
            token,
            seen: SeenSet::new(),
        })
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Fetch the unread set and notify every item not seen yet.
    ///
    /// A failed fetch counts as an empty cycle. A failed dispatch is logged and
    /// the item is still recorded, so it is never retried in this run.
    pub fn poll(&mut self) -> PollReport {
        let items = match self.reader.fetch_unread(&self.token, PAGE_SIZE) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        };

        let mut report = PollReport {
            fetched: items.len(),
            ..PollReport::default()
        };

        for item in &items {
            if self.seen.contains(&item.id) {
                continue;
            }

            report.new += 1;
            if self.notify(item) {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
            self.seen.insert(&item.id);
        }

        report
    }

    fn notify(&self, item: &FeedItem) -> bool {
        let notification = Notification::from_item(item);
        tracing::info!(id = %item.id, "Sending notification: {}", notification.title);

        match self.dispatcher.send(&notification) {
            Ok(()) => {
                tracing::debug!(id = %item.id, "Notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(id = %item.id, "{}", e);
                false
            }
        }
    }

    /// Run the startup pass, then poll every `interval` forever.
    pub fn run(&mut self, interval: Duration) {
        self.run_with(interval, None, std::thread::sleep);
    }

    /// Startup pass followed by at most `max_polls` scheduled polls
    /// (unbounded when `None`), sleeping through `sleep` between them.
    pub fn run_with<S>(&mut self, interval: Duration, max_polls: Option<u64>, mut sleep: S)
    where
        S: FnMut(Duration),
    {
        let report = self.poll();
        tracing::info!(
            fetched = report.fetched,
            delivered = report.delivered,
            failed = report.failed,
            "Fetched {} unread items on startup",
            report.fetched
        );

        if max_polls != Some(0) {
            tracing::info!("Polling every {:?}", interval);
        }

        let mut polls = 0u64;
        while max_polls.map_or(true, |max| polls < max) {
            sleep(interval);
            polls += 1;

            let report = self.poll();
            tracing::info!(
                new = report.new,
                delivered = report.delivered,
                failed = report.failed,
                seen = self.seen.len(),
                "Polled and found {} unread items",
                report.fetched
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::predicate::eq;
    use mockall::Sequence;

    use super::*;
    use crate::errors::NotifierError;
    use crate::reader::traits::MockReaderApi;
    use crate::services::notification_service::MockDispatcher;

    #[derive(Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<Notification>>,
    }

    impl RecordingDispatcher {
        fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Dispatcher for &RecordingDispatcher {
        fn send(&self, notification: &Notification) -> NotifierResult<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn item(id: &str, title: &str) -> FeedItem {
        FeedItem::new(id.to_string())
            .with_title(Some(title.to_string()))
            .with_link("http://x")
    }

    fn logged_in_reader() -> MockReaderApi {
        let mut reader = MockReaderApi::new();
        reader
            .expect_login()
            .with(eq("alice"), eq("secret"))
            .times(1)
            .returning(|_, _| Ok(AuthToken::new("u/tok")));
        reader
    }

    #[test]
    fn test_start_fails_on_auth_error() {
        let mut reader = MockReaderApi::new();
        reader
            .expect_login()
            .returning(|_, _| Err(NotifierError::Auth("401 Unauthorized".to_string())));
        reader.expect_fetch_unread().never();

        let recorder = RecordingDispatcher::default();
        let result = PollService::start(reader, &recorder, "alice", "wrong");

        assert!(matches!(result, Err(NotifierError::Auth(_))));
        assert!(recorder.sent().is_empty());
    }

    #[test]
    fn test_same_item_notified_once_across_polls() {
        let mut reader = logged_in_reader();
        reader
            .expect_fetch_unread()
            .withf(|token, limit| token.as_str() == "u/tok" && *limit == PAGE_SIZE)
            .times(2)
            .returning(|_, _| Ok(vec![item("1", "A")]));

        let recorder = RecordingDispatcher::default();
        let mut service = PollService::start(reader, &recorder, "alice", "secret").unwrap();

        let first = service.poll();
        let second = service.poll();

        assert_eq!(first.new, 1);
        assert_eq!(second.fetched, 1);
        assert_eq!(second.new, 0);

        let sent = recorder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "A");
        assert!(sent[0].body.contains("URL: http://x"));
        assert!(sent[0].body.contains("Category: Uncategorized"));
    }

    #[test]
    fn test_only_new_items_are_dispatched_in_server_order() {
        let mut reader = logged_in_reader();
        let mut seq = Sequence::new();
        reader
            .expect_fetch_unread()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![item("1", "A"), item("2", "B")]));
        reader
            .expect_fetch_unread()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![item("3", "C"), item("2", "B"), item("1", "A")]));

        let recorder = RecordingDispatcher::default();
        let mut service = PollService::start(reader, &recorder, "alice", "secret").unwrap();
        service.poll();
        let report = service.poll();

        assert_eq!(report.new, 1);
        let titles: Vec<String> = recorder.sent().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(service.seen().len(), 3);
    }

    #[test]
    fn test_already_seen_item_is_noop() {
        let mut reader = logged_in_reader();
        reader
            .expect_fetch_unread()
            .returning(|_, _| Ok(vec![item("42", "Answer")]));

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_send().times(1).returning(|_| Ok(()));

        let mut service = PollService::start(reader, dispatcher, "alice", "secret").unwrap();
        service.poll();
        for _ in 0..3 {
            assert_eq!(service.poll().new, 0);
        }
        assert!(service.seen().contains("42"));
    }

    #[test]
    fn test_dispatch_failure_still_marks_seen() {
        let mut reader = logged_in_reader();
        reader
            .expect_fetch_unread()
            .times(2)
            .returning(|_, _| Ok(vec![item("1", "A")]));

        let mut dispatcher = MockDispatcher::new();
        dispatcher
            .expect_send()
            .times(1)
            .returning(|_| Err(NotifierError::Dispatch("exit status: 1".to_string())));

        let mut service = PollService::start(reader, dispatcher, "alice", "secret").unwrap();
        let first = service.poll();
        let second = service.poll();

        assert_eq!(first.failed, 1);
        assert_eq!(first.delivered, 0);
        assert_eq!(second.new, 0);
        assert!(service.seen().contains("1"));
    }

    #[test]
    fn test_fetch_failure_is_empty_cycle() {
        let mut reader = logged_in_reader();
        reader
            .expect_fetch_unread()
            .returning(|_, _| Err(NotifierError::Fetch("500 Internal Server Error".to_string())));

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_send().never();

        let mut service = PollService::start(reader, dispatcher, "alice", "secret").unwrap();
        assert_eq!(service.poll(), PollReport::default());
    }

    #[test]
    fn test_loop_survives_fetch_failure() {
        let mut reader = logged_in_reader();
        let mut seq = Sequence::new();
        reader
            .expect_fetch_unread()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![item("1", "A")]));
        reader
            .expect_fetch_unread()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(NotifierError::Fetch("500 Internal Server Error".to_string())));
        reader
            .expect_fetch_unread()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![item("1", "A"), item("2", "B")]));

        let recorder = RecordingDispatcher::default();
        let mut service = PollService::start(reader, &recorder, "alice", "secret").unwrap();

        let mut sleeps = Vec::new();
        service.run_with(Duration::from_secs(60), Some(2), |d| sleeps.push(d));

        assert_eq!(sleeps, vec![Duration::from_secs(60); 2]);
        let titles: Vec<String> = recorder.sent().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_run_with_zero_polls_only_runs_startup_pass() {
        let mut reader = logged_in_reader();
        reader
            .expect_fetch_unread()
            .times(1)
            .returning(|_, _| Ok(vec![item("1", "A"), item("2", "B")]));

        let recorder = RecordingDispatcher::default();
        let mut service = PollService::start(reader, &recorder, "alice", "secret").unwrap();

        let mut slept = false;
        service.run_with(Duration::from_secs(60), Some(0), |_| slept = true);

        assert!(!slept);
        assert_eq!(recorder.sent().len(), 2);
    }
}
