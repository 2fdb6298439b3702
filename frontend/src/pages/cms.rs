use yew::prelude::*;

use crate::api::client::HttpClient;
use crate::api::models::{CmsPage, CmsSection};
use crate::api::traits::CmsApi;
use crate::components::providers::use_edit_mode;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

#[derive(Clone, PartialEq)]
pub enum PageContent {
    Loading,
    Loaded(CmsPage),
    Failed(String),
}

impl PageContent {
    pub fn section(&self, key: &str) -> Option<&CmsSection> {
        match self {
            PageContent::Loaded(page) => page.section(key),
            _ => None,
        }
    }
}

/// Public CMS content for `slug`, re-fetched after every successful save.
/// The last loaded page stays on screen while a refresh is in flight.
#[hook]
pub fn use_cms_page(slug: &str) -> PageContent {
    let edit = use_edit_mode();
    let content = use_state(|| PageContent::Loading);
    let token = use_cancel_token();

    {
        let content = content.clone();
        use_effect_with_deps(
            move |(slug, refresh): &(String, u64)| {
                log::debug!("Fetching CMS page {} (refresh {})", slug, refresh);
                let slug = slug.clone();
                spawn_cancellable(
                    &token,
                    async move { HttpClient::stored().fetch_page(&slug).await },
                    move |result| match result {
                        Ok(page) => content.set(PageContent::Loaded(page)),
                        Err(e) => {
                            log::error!("Failed to load CMS page: {}", e);
                            if !matches!(*content, PageContent::Loaded(_)) {
                                content.set(PageContent::Failed(e.to_string()));
                            }
                        }
                    },
                );
                || ()
            },
            (slug.to_string(), edit.state.refresh_trigger),
        );
    }

    (*content).clone()
}
