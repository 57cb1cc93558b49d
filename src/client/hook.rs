//! Finance hook
//!
//! Drives `FinanceState` from a UI: fetch, save and clear the signed-in
//! user's finance record, publish every state change on a `watch` channel,
//! and report user-initiated outcomes as notifications.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::FinanceData;

use super::{FinanceApi, FinanceState, Notification, Session};

/// Client-side state container for the finance screen.
///
/// Operations are not mutually exclusive: a save may start while a fetch is
/// still in flight, and nothing is cancelled or de-duplicated.
#[derive(Clone)]
pub struct FinanceHook {
    api: Arc<dyn FinanceApi>,
    session: watch::Receiver<Option<Session>>,
    state: Arc<watch::Sender<FinanceState>>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl FinanceHook {
    pub fn new(
        api: Arc<dyn FinanceApi>,
        session: watch::Receiver<Option<Session>>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        let (state, _) = watch::channel(FinanceState::default());
        Self {
            api,
            session,
            state: Arc::new(state),
            notifications,
        }
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<FinanceState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FinanceState {
        self.state.borrow().clone()
    }

    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn transition(&self, next: impl FnOnce(&FinanceState) -> FinanceState) {
        self.state.send_modify(|state| *state = next(&*state));
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            tracing::debug!("Notification dropped: no listener");
        }
    }

    /// Load the signed-in user's record. Does nothing without a session.
    ///
    /// Failures land in `error` only; no notification is raised.
    pub async fn fetch_data(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        self.transition(FinanceState::fetch_started);

        match self.api.fetch(&session.access_token).await {
            Ok(data) => self.transition(|s| s.fetch_succeeded(data)),
            Err(e) => {
                tracing::warn!(user_id = %session.user_id, "Failed to fetch finance data: {}", e);
                self.transition(|s| s.fetch_failed(e.to_string()));
            }
        }
    }

    /// Save `data` as the user's record. Returns whether it was stored.
    pub async fn save_data(&self, data: FinanceData) -> bool {
        let Some(session) = self.current_session() else {
            self.notify(Notification::error(
                "Not signed in",
                "Please log in to save your finance data",
            ));
            return false;
        };

        self.transition(FinanceState::save_started);

        match self.api.save(&session.access_token, &data).await {
            Ok(record) => {
                self.transition(|s| s.save_succeeded(record, Utc::now()));
                self.notify(Notification::success(
                    "Saved",
                    "Your finance data has been saved",
                ));
                true
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(user_id = %session.user_id, "Failed to save finance data: {}", message);
                self.transition(|s| s.save_failed(message.clone()));
                self.notify(Notification::error("Failed to save finance data", message));
                false
            }
        }
    }

    /// Delete the user's record. Returns whether the server confirmed it.
    pub async fn clear_data(&self) -> bool {
        let Some(session) = self.current_session() else {
            self.notify(Notification::error(
                "Not signed in",
                "Please log in to clear your finance data",
            ));
            return false;
        };

        self.transition(FinanceState::clear_started);

        match self.api.clear(&session.access_token).await {
            Ok(()) => {
                self.transition(FinanceState::clear_succeeded);
                self.notify(Notification::success(
                    "Cleared",
                    "Your finance data has been cleared",
                ));
                true
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(user_id = %session.user_id, "Failed to clear finance data: {}", message);
                self.transition(|s| s.clear_failed(message.clone()));
                self.notify(Notification::error("Failed to clear finance data", message));
                false
            }
        }
    }

    /// Fetch whenever a user signs in or the signed-in user changes.
    ///
    /// Token refreshes for the same user do not refetch. The task ends when
    /// the session sender is dropped.
    pub fn watch_auth(&self) -> JoinHandle<()> {
        let hook = self.clone();
        let mut session = self.session.clone();

        tokio::spawn(async move {
            let mut previous: Option<Uuid> = None;
            loop {
                let current = session.borrow_and_update().as_ref().map(|s| s.user_id);
                if current.is_some() && current != previous {
                    hook.fetch_data().await;
                }
                previous = current;

                if session.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, NotificationLevel};
    use crate::domain::{ExpenseCategory, FinanceRecord};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-process stand-in for the endpoint
    #[derive(Default)]
    struct MockApi {
        record: Mutex<Option<FinanceRecord>>,
        fail_with: Option<String>,
        calls: AtomicUsize,
        fetches: AtomicUsize,
    }

    impl MockApi {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(ClientError::Api {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl FinanceApi for MockApi {
        async fn fetch(&self, _: &str) -> Result<Option<FinanceRecord>, ClientError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.record.lock().unwrap().clone())
        }

        async fn save(&self, _: &str, data: &FinanceData) -> Result<FinanceRecord, ClientError> {
            self.check()?;
            let record = FinanceRecord {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                data: data.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            *self.record.lock().unwrap() = Some(record.clone());
            Ok(record)
        }

        async fn clear(&self, _: &str) -> Result<(), ClientError> {
            self.check()?;
            *self.record.lock().unwrap() = None;
            Ok(())
        }
    }

    struct Fixture {
        hook: FinanceHook,
        api: Arc<MockApi>,
        session: watch::Sender<Option<Session>>,
        notifications: mpsc::UnboundedReceiver<Notification>,
    }

    fn fixture(api: MockApi, signed_in: bool) -> Fixture {
        let api = Arc::new(api);
        let initial = signed_in.then(|| Session::new(Uuid::new_v4(), "token"));
        let (session, session_rx) = watch::channel(initial);
        let (tx, notifications) = mpsc::unbounded_channel();
        let hook = FinanceHook::new(api.clone(), session_rx, tx);
        Fixture {
            hook,
            api,
            session,
            notifications,
        }
    }

    fn seeds() -> FinanceData {
        FinanceData::new(vec![ExpenseCategory::new("1", "Seeds", dec!(100)).required()])
            .with_total_expense(dec!(100))
    }

    #[tokio::test]
    async fn test_save_without_session_notifies_and_fails() {
        let mut f = fixture(MockApi::default(), false);

        assert!(!f.hook.save_data(seeds()).await);

        let notification = f.notifications.try_recv().unwrap();
        assert!(notification.is_error());
        assert!(notification.description.contains("log in"));
        assert_eq!(f.api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.hook.state(), FinanceState::default());
    }

    #[tokio::test]
    async fn test_save_success_updates_state() {
        let mut f = fixture(MockApi::default(), true);

        assert!(f.hook.save_data(seeds()).await);

        let state = f.hook.state();
        assert!(!state.saving);
        assert!(state.last_saved.is_some());
        assert_eq!(state.data.unwrap().data, seeds());
        assert_eq!(f.notifications.try_recv().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_save_failure_surfaces_message() {
        let mut f = fixture(MockApi::failing("Database error: disk full"), true);

        assert!(!f.hook.save_data(seeds()).await);

        let state = f.hook.state();
        assert!(!state.saving);
        assert_eq!(state.error.as_deref(), Some("Database error: disk full"));
        assert!(state.last_saved.is_none());

        let notification = f.notifications.try_recv().unwrap();
        assert!(notification.is_error());
        assert_eq!(notification.description, "Database error: disk full");
    }

    #[tokio::test]
    async fn test_fetch_without_session_is_noop() {
        let f = fixture(MockApi::default(), false);

        f.hook.fetch_data().await;

        assert_eq!(f.api.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(f.hook.state(), FinanceState::default());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_silent() {
        let mut f = fixture(MockApi::failing("Store unavailable"), true);

        f.hook.fetch_data().await;

        let state = f.hook.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Store unavailable"));
        assert!(f.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_clear_success() {
        let mut f = fixture(MockApi::default(), true);
        f.hook.save_data(seeds()).await;
        let _ = f.notifications.try_recv();

        assert!(f.hook.clear_data().await);

        assert!(f.hook.state().data.is_none());
        assert_eq!(f.notifications.try_recv().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_clear_failure_notifies() {
        let mut f = fixture(MockApi::failing("Database error: locked"), true);

        assert!(!f.hook.clear_data().await);

        assert_eq!(f.hook.state().error.as_deref(), Some("Database error: locked"));
        let notification = f.notifications.try_recv().unwrap();
        assert!(notification.is_error());
        assert_eq!(notification.description, "Database error: locked");
    }

    #[tokio::test]
    async fn test_sign_in_triggers_fetch() {
        let api = MockApi::default();
        *api.record.lock().unwrap() = Some(FinanceRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            data: seeds(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let f = fixture(api, false);
        let mut states = f.hook.subscribe();
        let listener = f.hook.watch_auth();

        let user_id = Uuid::new_v4();
        f.session.send(Some(Session::new(user_id, "token-1"))).unwrap();

        tokio::time::timeout(Duration::from_secs(2), states.wait_for(|s| s.data.is_some()))
            .await
            .expect("fetch was not triggered")
            .unwrap();
        assert_eq!(f.api.fetches.load(Ordering::SeqCst), 1);

        // Same user with a refreshed token does not refetch
        f.session.send(Some(Session::new(user_id, "token-2"))).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(f.api.fetches.load(Ordering::SeqCst), 1);

        drop(f.session);
        tokio::time::timeout(Duration::from_secs(2), listener)
            .await
            .expect("listener did not stop")
            .unwrap();
    }
}
