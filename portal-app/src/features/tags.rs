//! Теги: админский справочник.

use portal_api::{Paginated, Tag, TagInput};
use portal_client::{PortalClient, PortalResult};

use crate::cache::CacheKey;
use crate::hooks::{Hooks, Mutated};

/// Путь списка тегов в админском дашборде.
pub const LIST_PATH: &str = "/admin/dashboard/tags";

/// Операции над тегами.
#[derive(Clone)]
pub struct Tags {
    client: PortalClient,
    hooks: Hooks,
}

impl Tags {
    /// Связывает модуль с клиентом и хуками.
    pub fn new(client: PortalClient, hooks: Hooks) -> Self {
        Self { client, hooks }
    }

    /// Страница тегов: из кэша либо с сервера.
    pub async fn page(&self, page: u64, per_page: u64) -> PortalResult<Paginated<Tag>> {
        self.hooks
            .fetch_page(page, || self.client.list_tags(page, per_page))
            .await
    }

    /// Создаёт тег.
    pub async fn create(&self, input: &TagInput) -> PortalResult<Mutated<Tag>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Tags,
                "Тег создан",
                Some(LIST_PATH),
                self.client.create_tag(input),
            )
            .await
    }

    /// Обновляет тег.
    pub async fn update(&self, id: i64, input: &TagInput) -> PortalResult<Mutated<Tag>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Tags,
                "Тег обновлён",
                Some(LIST_PATH),
                self.client.update_tag(id, input),
            )
            .await
    }

    /// Удаляет тег.
    pub async fn delete(&self, id: i64) -> PortalResult<Mutated<()>> {
        self.hooks
            .mutate(
                CacheKey::Tags,
                "Тег удалён",
                None,
                self.client.delete_tag(id),
            )
            .await
    }
}
