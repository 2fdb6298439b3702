use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::api::error::ApiError;
use crate::api::models::Translation;
use crate::api::traits::TranslationApi;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TranslationState {
    /// Last fetched translations per section, only while a manager is open.
    pub by_section: HashMap<i64, Vec<Translation>>,
    pub loading: HashSet<i64>,
}

impl TranslationState {
    pub fn is_loading(&self, section_id: i64) -> bool {
        self.loading.contains(&section_id)
    }
}

/// Shared handle over the translation endpoints plus a per-section cache.
#[derive(Clone)]
pub struct TranslationStore {
    state: Rc<RefCell<TranslationState>>,
    api: Rc<dyn TranslationApi>,
    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl PartialEq for TranslationStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl TranslationStore {
    pub fn new(api: Rc<dyn TranslationApi>) -> Self {
        Self {
            state: Rc::new(RefCell::new(TranslationState::default())),
            api,
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn snapshot(&self) -> TranslationState {
        self.state.borrow().clone()
    }

    pub fn set_on_change<F: Fn() + 'static>(&self, callback: F) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn clear_on_change(&self) {
        *self.on_change.borrow_mut() = None;
    }

    fn update(&self, f: impl FnOnce(&mut TranslationState)) {
        f(&mut self.state.borrow_mut());
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn cached(&self, section_id: i64) -> Option<Vec<Translation>> {
        self.state.borrow().by_section.get(&section_id).cloned()
    }

    async fn tracked<T>(
        &self,
        section_id: i64,
        call: impl std::future::Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        self.update(|s| {
            s.loading.insert(section_id);
        });
        let result = call.await;
        self.update(|s| {
            s.loading.remove(&section_id);
        });
        if let Err(e) = &result {
            log::error!("Translation request for section {} failed: {}", section_id, e);
        }
        result
    }

    /// Machine-translate one field into every supported language.
    pub async fn generate_all(&self, section_id: i64, field_name: &str) -> Result<Vec<Translation>, ApiError> {
        let generated = self.tracked(section_id, self.api.generate_all(section_id, field_name)).await?;
        log::info!("Generated {} translation(s) for section {}", generated.len(), section_id);
        let fresh = generated.clone();
        self.update(|s| {
            let cached = s.by_section.entry(section_id).or_default();
            for translation in fresh {
                upsert(cached, translation);
            }
        });
        Ok(generated)
    }

    pub async fn fetch_for_section(&self, section_id: i64) -> Result<Vec<Translation>, ApiError> {
        if let Some(cached) = self.cached(section_id) {
            return Ok(cached);
        }
        let fetched = self.tracked(section_id, self.api.fetch_for_section(section_id)).await?;
        let stored = fetched.clone();
        self.update(|s| {
            s.by_section.insert(section_id, stored);
        });
        Ok(fetched)
    }

    pub async fn update_translation(&self, section_id: i64, translation_id: i64, content: &str) -> Result<Translation, ApiError> {
        let updated = self.tracked(section_id, self.api.update(translation_id, content)).await?;
        self.store_one(section_id, updated.clone());
        Ok(updated)
    }

    pub async fn regenerate(&self, section_id: i64, translation_id: i64) -> Result<Translation, ApiError> {
        let regenerated = self.tracked(section_id, self.api.regenerate(translation_id)).await?;
        self.store_one(section_id, regenerated.clone());
        Ok(regenerated)
    }

    fn store_one(&self, section_id: i64, translation: Translation) {
        self.update(|s| {
            if let Some(cached) = s.by_section.get_mut(&section_id) {
                upsert(cached, translation);
            }
        });
    }

    /// Drop the cache for a section, e.g. when its manager closes.
    pub fn invalidate(&self, section_id: i64) {
        self.update(|s| {
            s.by_section.remove(&section_id);
        });
    }
}

fn upsert(list: &mut Vec<Translation>, translation: Translation) {
    match list.iter_mut().find(|t| t.id == translation.id) {
        Some(existing) => *existing = translation,
        None => list.push(translation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;

    fn translation(id: i64, language: &str, content: &str) -> Translation {
        Translation {
            id,
            language: language.to_string(),
            translated_content: content.to_string(),
            is_auto_generated: true,
            is_manual_override: false,
            updated_at: None,
            field_name: "content".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeTranslations {
        fetch_calls: Cell<usize>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl TranslationApi for FakeTranslations {
        async fn generate_all(&self, _section_id: i64, _field_name: &str) -> Result<Vec<Translation>, ApiError> {
            Ok(vec![translation(1, "fr", "Bonjour"), translation(3, "es", "Hola")])
        }

        async fn fetch_for_section(&self, _section_id: i64) -> Result<Vec<Translation>, ApiError> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            if self.fail.get() {
                return Err(ApiError::Network("offline".into()));
            }
            Ok(vec![translation(1, "fr", "Salut"), translation(2, "de", "Hallo")])
        }

        async fn update(&self, translation_id: i64, content: &str) -> Result<Translation, ApiError> {
            let mut t = translation(translation_id, "fr", content);
            t.is_auto_generated = false;
            t.is_manual_override = true;
            Ok(t)
        }

        async fn regenerate(&self, translation_id: i64) -> Result<Translation, ApiError> {
            Ok(translation(translation_id, "fr", "Bonjour (auto)"))
        }
    }

    #[tokio::test]
    async fn fetch_is_cached_until_invalidated() {
        let api = Rc::new(FakeTranslations::default());
        let store = TranslationStore::new(api.clone());

        assert_eq!(store.fetch_for_section(9).await.unwrap().len(), 2);
        store.fetch_for_section(9).await.unwrap();
        assert_eq!(api.fetch_calls.get(), 1);

        store.invalidate(9);
        assert!(store.cached(9).is_none());
        store.fetch_for_section(9).await.unwrap();
        assert_eq!(api.fetch_calls.get(), 2);
    }

    #[tokio::test]
    async fn update_and_regenerate_replace_cached_rows() {
        let store = TranslationStore::new(Rc::new(FakeTranslations::default()));
        store.fetch_for_section(9).await.unwrap();

        let updated = store.update_translation(9, 1, "Bonsoir").await.unwrap();
        assert!(updated.is_manual_override);
        let cached = store.cached(9).unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].translated_content, "Bonsoir");

        store.regenerate(9, 1).await.unwrap();
        assert_eq!(store.cached(9).unwrap()[0].translated_content, "Bonjour (auto)");
    }

    #[tokio::test]
    async fn generate_merges_into_cache() {
        let store = TranslationStore::new(Rc::new(FakeTranslations::default()));
        store.fetch_for_section(9).await.unwrap();
        store.generate_all(9, "content").await.unwrap();

        let ids: Vec<i64> = store.cached(9).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!store.snapshot().is_loading(9));
    }

    #[tokio::test]
    async fn failures_clear_loading_and_leave_cache_alone() {
        let api = Rc::new(FakeTranslations::default());
        api.fail.set(true);
        let store = TranslationStore::new(api.clone());

        assert!(store.fetch_for_section(4).await.is_err());
        assert!(!store.snapshot().is_loading(4));
        assert!(store.cached(4).is_none());
    }
}
