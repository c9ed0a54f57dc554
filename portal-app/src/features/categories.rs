//! Категории: админский справочник.

use portal_api::{Category, CategoryInput, Paginated};
use portal_client::{PortalClient, PortalResult};

use crate::cache::CacheKey;
use crate::hooks::{Hooks, Mutated};

/// Путь списка категорий в админском дашборде.
pub const LIST_PATH: &str = "/admin/dashboard/categories";

/// Операции над категориями.
#[derive(Clone)]
pub struct Categories {
    client: PortalClient,
    hooks: Hooks,
}

impl Categories {
    /// Связывает модуль с клиентом и хуками.
    pub fn new(client: PortalClient, hooks: Hooks) -> Self {
        Self { client, hooks }
    }

    /// Страница категорий: из кэша либо с сервера.
    pub async fn page(&self, page: u64, per_page: u64) -> PortalResult<Paginated<Category>> {
        self.hooks
            .fetch_page(page, || self.client.list_categories(page, per_page))
            .await
    }

    /// Создаёт категорию.
    pub async fn create(&self, input: &CategoryInput) -> PortalResult<Mutated<Category>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Categories,
                "Категория создана",
                Some(LIST_PATH),
                self.client.create_category(input),
            )
            .await
    }

    /// Обновляет категорию.
    pub async fn update(&self, id: i64, input: &CategoryInput) -> PortalResult<Mutated<Category>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Categories,
                "Категория обновлена",
                Some(LIST_PATH),
                self.client.update_category(id, input),
            )
            .await
    }

    /// Удаляет категорию.
    pub async fn delete(&self, id: i64) -> PortalResult<Mutated<()>> {
        self.hooks
            .mutate(
                CacheKey::Categories,
                "Категория удалена",
                None,
                self.client.delete_category(id),
            )
            .await
    }
}
