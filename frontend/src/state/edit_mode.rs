//! In-page CMS editing session for one browser tab.
//!
//! The store is the only owner of the pending-change list. Backend calls are
//! awaited without holding any borrow of the state, and the state is only
//! touched once a call has succeeded, so a failed verify/start/save can
//! always be retried.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

use crate::api::error::ApiError;
use crate::api::models::{ChangeRecord, PreviewPayload};
use crate::api::traits::CmsApi;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeType {
    Update,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Update => "update",
        }
    }
}

/// An edit that has been staged but not persisted yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingChange {
    /// Assigned by the store when the change is staged.
    pub id: u64,
    pub section_id: i64,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
    pub change_type: ChangeType,
}

impl PendingChange {
    pub fn update(section_id: i64, field_name: impl Into<String>, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            id: 0,
            section_id,
            field_name: field_name.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
            change_type: ChangeType::Update,
        }
    }

    pub fn to_record(&self) -> ChangeRecord {
        ChangeRecord {
            section_id: self.section_id,
            field_name: self.field_name.clone(),
            old_value: self.old_value.clone(),
            new_value: self.new_value.clone(),
            change_type: self.change_type.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct EditModeState {
    pub is_edit_mode: bool,
    /// Sticky for the lifetime of the tab once set.
    pub is_password_verified: bool,
    pub pending_changes: Vec<PendingChange>,
    /// Bumped after every successful save; content fetchers re-pull on change.
    pub refresh_trigger: u64,
    pub is_saving: bool,
    pub page_slug: Option<String>,
}

impl EditModeState {
    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending_changes.is_empty()
    }

    pub fn can_edit(&self) -> bool {
        self.is_edit_mode && self.is_password_verified
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditModeError {
    #[error("Please enter the admin password")]
    EmptyPassword,

    #[error("Incorrect admin password")]
    InvalidPassword,

    #[error("Admin password has not been verified")]
    NotVerified,

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error(transparent)]
    Api(#[from] ApiError),
}

type Subscriber = Rc<dyn Fn()>;

/// Shared handle to the tab's edit-mode session. Clones share state.
#[derive(Clone)]
pub struct EditModeStore {
    state: Rc<RefCell<EditModeState>>,
    api: Rc<dyn CmsApi>,
    subscribers: Rc<RefCell<Vec<(usize, Subscriber)>>>,
    next_subscriber: Rc<RefCell<usize>>,
    next_change_id: Rc<Cell<u64>>,
}

impl PartialEq for EditModeStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl EditModeStore {
    pub fn new(api: Rc<dyn CmsApi>) -> Self {
        Self {
            state: Rc::new(RefCell::new(EditModeState::default())),
            api,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber: Rc::new(RefCell::new(0)),
            next_change_id: Rc::new(Cell::new(1)),
        }
    }

    pub fn snapshot(&self) -> EditModeState {
        self.state.borrow().clone()
    }

    /// Register a callback run after every state change. Returns an id for
    /// `unsubscribe`.
    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) -> usize {
        let mut next = self.next_subscriber.borrow_mut();
        let id = *next;
        *next += 1;
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: usize) {
        self.subscribers.borrow_mut().retain(|(sub_id, _)| *sub_id != id);
    }

    fn update<R>(&self, f: impl FnOnce(&mut EditModeState) -> R) -> R {
        let result = f(&mut self.state.borrow_mut());
        self.notify();
        result
    }

    fn notify(&self) {
        // Copy out so a subscriber may (un)subscribe while being notified
        let subscribers: Vec<Subscriber> = self.subscribers.borrow().iter().map(|(_, s)| s.clone()).collect();
        for subscriber in subscribers {
            subscriber();
        }
    }

    pub async fn verify_password(&self, password: &str) -> Result<(), EditModeError> {
        if password.trim().is_empty() {
            return Err(EditModeError::EmptyPassword);
        }
        match self.api.verify_password(password).await {
            Ok(true) => {
                log::info!("Admin password verified");
                self.update(|s| s.is_password_verified = true);
                Ok(())
            }
            Ok(false) => {
                log::warn!("Admin password rejected");
                Err(EditModeError::InvalidPassword)
            }
            Err(e) => {
                log::error!("Password verification failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn start_edit_mode(&self, page_slug: &str) -> Result<(), EditModeError> {
        if !self.state.borrow().is_password_verified {
            return Err(EditModeError::NotVerified);
        }
        if let Err(e) = self.api.start_edit_session(page_slug).await {
            log::error!("Failed to start edit mode on {}: {}", page_slug, e);
            return Err(e.into());
        }
        log::info!("Edit mode started on {}", page_slug);
        let slug = page_slug.to_string();
        self.update(move |s| {
            s.is_edit_mode = true;
            s.page_slug = Some(slug);
        });
        Ok(())
    }

    /// Stage a change. Returns false when the value did not actually change.
    pub fn add_change(&self, mut change: PendingChange) -> bool {
        if change.new_value == change.old_value {
            return false;
        }
        change.id = self.next_change_id.get();
        self.next_change_id.set(change.id + 1);
        log::debug!("Staged change for section {} field {}", change.section_id, change.field_name);
        self.update(move |s| s.pending_changes.push(change));
        true
    }

    pub fn remove_change(&self, index: usize) -> Option<PendingChange> {
        if index >= self.state.borrow().pending_changes.len() {
            return None;
        }
        Some(self.update(|s| s.pending_changes.remove(index)))
    }

    /// Persist every pending change in one batch. Returns how many were saved.
    pub async fn save_changes(&self) -> Result<usize, EditModeError> {
        let (records, sent_ids): (Vec<ChangeRecord>, Vec<u64>) = {
            let state = self.state.borrow();
            if state.is_saving {
                return Err(EditModeError::SaveInProgress);
            }
            state
                .pending_changes
                .iter()
                .map(|c| (c.to_record(), c.id))
                .unzip()
        };
        if records.is_empty() {
            return Ok(0);
        }

        self.update(|s| s.is_saving = true);
        let result = self.api.save_changes(&records).await;
        let saved = records.len();
        match result {
            Ok(()) => {
                log::info!("Saved {} CMS change(s)", saved);
                self.update(|s| {
                    // Anything staged, cleared or re-staged while the request
                    // was in flight is left alone
                    s.pending_changes.retain(|c| !sent_ids.contains(&c.id));
                    s.refresh_trigger += 1;
                    s.is_saving = false;
                });
                Ok(saved)
            }
            Err(e) => {
                log::error!("Failed to save CMS changes: {}", e);
                self.update(|s| s.is_saving = false);
                Err(e.into())
            }
        }
    }

    pub async fn preview_changes(&self) -> Result<Option<PreviewPayload>, EditModeError> {
        let records: Vec<ChangeRecord> = self
            .state
            .borrow()
            .pending_changes
            .iter()
            .map(PendingChange::to_record)
            .collect();
        if records.is_empty() {
            return Ok(None);
        }
        match self.api.preview_changes(&records).await {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                log::error!("Failed to preview CMS changes: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn clear_changes(&self) {
        self.update(|s| s.pending_changes.clear());
    }

    pub fn end_edit_mode(&self) {
        log::info!("Leaving edit mode");
        self.update(|s| {
            s.is_edit_mode = false;
            s.page_slug = None;
            s.pending_changes.clear();
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::models::CmsPage;
    use async_trait::async_trait;
    use std::cell::Cell;

    #[derive(Default)]
    pub(crate) struct FakeCms {
        pub password: String,
        pub fail_start: Cell<bool>,
        pub fail_save: Cell<bool>,
        pub saved_batches: RefCell<Vec<Vec<ChangeRecord>>>,
        pub verify_calls: Cell<usize>,
        pub start_calls: Cell<usize>,
        /// While set, `save_changes` waits before answering.
        pub hold_save: Cell<bool>,
    }

    impl FakeCms {
        pub(crate) fn with_password(password: &str) -> Rc<Self> {
            Rc::new(Self {
                password: password.to_string(),
                ..Default::default()
            })
        }
    }

    #[async_trait(?Send)]
    impl CmsApi for FakeCms {
        async fn fetch_page(&self, _slug: &str) -> Result<CmsPage, ApiError> {
            Ok(CmsPage::default())
        }

        async fn verify_password(&self, password: &str) -> Result<bool, ApiError> {
            self.verify_calls.set(self.verify_calls.get() + 1);
            Ok(password == self.password)
        }

        async fn start_edit_session(&self, _page_slug: &str) -> Result<(), ApiError> {
            self.start_calls.set(self.start_calls.get() + 1);
            if self.fail_start.get() {
                return Err(ApiError::Network("offline".into()));
            }
            Ok(())
        }

        async fn save_changes(&self, changes: &[ChangeRecord]) -> Result<(), ApiError> {
            while self.hold_save.get() {
                tokio::task::yield_now().await;
            }
            if self.fail_save.get() {
                return Err(ApiError::Http { status: 500, message: "boom".into() });
            }
            self.saved_batches.borrow_mut().push(changes.to_vec());
            Ok(())
        }

        async fn preview_changes(&self, changes: &[ChangeRecord]) -> Result<PreviewPayload, ApiError> {
            Ok(PreviewPayload {
                preview_url: Some(format!("/preview/{}", changes.len())),
                html: None,
            })
        }
    }

    async fn unlocked(api: &Rc<FakeCms>) -> EditModeStore {
        let store = EditModeStore::new(api.clone());
        store.verify_password("hunter2").await.unwrap();
        store.start_edit_mode("home").await.unwrap();
        store
    }

    #[tokio::test]
    async fn start_requires_verified_password() {
        let api = FakeCms::with_password("hunter2");
        let store = EditModeStore::new(api.clone());

        let before = store.snapshot();
        assert_eq!(store.start_edit_mode("home").await, Err(EditModeError::NotVerified));
        assert_eq!(store.start_edit_mode("").await, Err(EditModeError::NotVerified));
        assert_eq!(store.snapshot(), before);
        assert_eq!(api.start_calls.get(), 0);
    }

    #[tokio::test]
    async fn verify_does_not_enable_edit_mode() {
        let api = FakeCms::with_password("hunter2");
        let store = EditModeStore::new(api.clone());

        assert_eq!(store.verify_password("wrong").await, Err(EditModeError::InvalidPassword));
        assert!(!store.snapshot().is_password_verified);

        store.verify_password("hunter2").await.unwrap();
        let state = store.snapshot();
        assert!(state.is_password_verified);
        assert!(!state.is_edit_mode);
        assert!(!state.can_edit());
    }

    #[tokio::test]
    async fn empty_password_never_reaches_backend() {
        let api = FakeCms::with_password("hunter2");
        let store = EditModeStore::new(api.clone());
        assert_eq!(store.verify_password("   ").await, Err(EditModeError::EmptyPassword));
        assert_eq!(api.verify_calls.get(), 0);
    }

    #[tokio::test]
    async fn failed_start_leaves_edit_mode_off() {
        let api = FakeCms::with_password("hunter2");
        api.fail_start.set(true);
        let store = EditModeStore::new(api.clone());
        store.verify_password("hunter2").await.unwrap();

        assert!(matches!(store.start_edit_mode("home").await, Err(EditModeError::Api(_))));
        assert!(!store.snapshot().is_edit_mode);
    }

    #[tokio::test]
    async fn unchanged_values_are_not_staged() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;

        for value in ["", "Hello", "multi\nline"] {
            assert!(!store.add_change(PendingChange::update(1, "content", value, value)));
        }
        assert!(store.snapshot().pending_changes.is_empty());
        assert!(!store.snapshot().has_unsaved_changes());
    }

    #[tokio::test]
    async fn repeated_edits_keep_commit_order() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;

        store.add_change(PendingChange::update(1, "content", "a", "b"));
        store.add_change(PendingChange::update(2, "title", "x", "y"));
        store.add_change(PendingChange::update(1, "content", "b", "c"));

        let values: Vec<_> = store.snapshot().pending_changes.into_iter().map(|c| c.new_value).collect();
        assert_eq!(values, vec!["b", "y", "c"]);
    }

    #[tokio::test]
    async fn successful_save_clears_and_bumps_refresh() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        store.add_change(PendingChange::update(4, "content", "old", "new"));
        store.add_change(PendingChange::update(5, "imageUrl", "/a.png", "/b.png"));
        let before = store.snapshot().refresh_trigger;

        assert_eq!(store.save_changes().await, Ok(2));

        let state = store.snapshot();
        assert!(state.pending_changes.is_empty());
        assert!(state.refresh_trigger > before);
        assert!(!state.is_saving);
        let batches = api.saved_batches.borrow();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].section_id, 4);
        assert_eq!(batches[0][0].change_type, "update");
        assert_eq!(batches[0][1].field_name, "imageUrl");
    }

    #[tokio::test]
    async fn failed_save_keeps_pending_changes() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        store.add_change(PendingChange::update(4, "content", "old", "new"));
        let before = store.snapshot();

        api.fail_save.set(true);
        assert!(matches!(store.save_changes().await, Err(EditModeError::Api(_))));
        assert_eq!(store.snapshot(), before);

        api.fail_save.set(false);
        assert_eq!(store.save_changes().await, Ok(1));
        assert!(store.snapshot().pending_changes.is_empty());
    }

    #[tokio::test]
    async fn empty_save_is_a_no_op() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        assert_eq!(store.save_changes().await, Ok(0));
        assert_eq!(store.snapshot().refresh_trigger, 0);
        assert!(api.saved_batches.borrow().is_empty());
    }

    #[tokio::test]
    async fn preview_does_not_touch_state() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        assert_eq!(store.preview_changes().await, Ok(None));

        store.add_change(PendingChange::update(4, "content", "old", "new"));
        let before = store.snapshot();
        let preview = store.preview_changes().await.unwrap().unwrap();
        assert_eq!(preview.preview_url.as_deref(), Some("/preview/1"));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn clear_remove_and_exit() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        store.add_change(PendingChange::update(1, "content", "a", "b"));
        store.add_change(PendingChange::update(2, "content", "c", "d"));

        assert_eq!(store.remove_change(5), None);
        assert_eq!(store.remove_change(0).map(|c| c.section_id), Some(1));
        assert_eq!(store.snapshot().pending_changes.len(), 1);

        store.clear_changes();
        assert!(store.snapshot().pending_changes.is_empty());
        assert!(store.snapshot().is_edit_mode);

        store.add_change(PendingChange::update(3, "content", "e", "f"));
        store.end_edit_mode();
        let state = store.snapshot();
        assert!(!state.is_edit_mode);
        assert!(state.pending_changes.is_empty());
        // Verification survives leaving edit mode
        assert!(state.is_password_verified);
        store.start_edit_mode("home").await.unwrap();
        assert!(store.snapshot().is_edit_mode);
    }

    #[tokio::test]
    async fn save_only_removes_the_changes_it_sent() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        store.add_change(PendingChange::update(1, "content", "a", "b"));
        store.add_change(PendingChange::update(2, "content", "c", "d"));

        api.hold_save.set(true);
        let save = store.save_changes();
        let meanwhile = async {
            tokio::task::yield_now().await;
            store.end_edit_mode();
            store.start_edit_mode("home").await.unwrap();
            store.add_change(PendingChange::update(3, "content", "e", "f"));
            api.hold_save.set(false);
        };
        let (saved, ()) = tokio::join!(save, meanwhile);

        assert_eq!(saved, Ok(2));
        let sent: Vec<i64> = api.saved_batches.borrow()[0].iter().map(|c| c.section_id).collect();
        assert_eq!(sent, vec![1, 2]);
        let pending: Vec<i64> = store.snapshot().pending_changes.iter().map(|c| c.section_id).collect();
        assert_eq!(pending, vec![3]);
        assert!(!store.snapshot().is_saving);
    }

    #[tokio::test]
    async fn edits_staged_during_a_save_stay_pending() {
        let api = FakeCms::with_password("hunter2");
        let store = unlocked(&api).await;
        store.add_change(PendingChange::update(1, "content", "a", "b"));

        api.hold_save.set(true);
        let save = store.save_changes();
        let meanwhile = async {
            tokio::task::yield_now().await;
            store.add_change(PendingChange::update(1, "content", "b", "c"));
            api.hold_save.set(false);
        };
        let (saved, ()) = tokio::join!(save, meanwhile);

        assert_eq!(saved, Ok(1));
        let pending = store.snapshot().pending_changes;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].new_value, "c");
    }

    #[tokio::test]
    async fn subscribers_see_every_mutation() {
        let api = FakeCms::with_password("hunter2");
        let store = EditModeStore::new(api.clone());
        let hits = Rc::new(Cell::new(0));
        let id = {
            let hits = hits.clone();
            store.subscribe(move || hits.set(hits.get() + 1))
        };

        store.verify_password("hunter2").await.unwrap();
        store.start_edit_mode("home").await.unwrap();
        assert_eq!(hits.get(), 2);

        store.unsubscribe(id);
        store.add_change(PendingChange::update(1, "content", "a", "b"));
        assert_eq!(hits.get(), 2);
    }
}
