//! Пользователи: управление из админского дашборда.

use portal_api::{Paginated, User, UserInput};
use portal_client::{PortalClient, PortalResult};

use crate::cache::CacheKey;
use crate::hooks::{Hooks, Mutated};

/// Путь списка пользователей в админском дашборде.
pub const LIST_PATH: &str = "/admin/dashboard/users";

/// Операции над пользователями.
#[derive(Clone)]
pub struct Users {
    client: PortalClient,
    hooks: Hooks,
}

impl Users {
    /// Связывает модуль с клиентом и хуками.
    pub fn new(client: PortalClient, hooks: Hooks) -> Self {
        Self { client, hooks }
    }

    /// Страница пользователей: из кэша либо с сервера.
    pub async fn page(&self, page: u64, per_page: u64) -> PortalResult<Paginated<User>> {
        self.hooks
            .fetch_page(page, || self.client.list_users(page, per_page))
            .await
    }

    /// Пользователь по идентификатору.
    pub async fn get(&self, id: i64) -> PortalResult<User> {
        self.client.get_user(id).await
    }

    /// Создаёт пользователя.
    pub async fn create(&self, input: &UserInput) -> PortalResult<Mutated<User>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Users,
                "Пользователь создан",
                Some(LIST_PATH),
                self.client.create_user(input),
            )
            .await
    }

    /// Обновляет пользователя.
    pub async fn update(&self, id: i64, input: &UserInput) -> PortalResult<Mutated<User>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Users,
                "Пользователь обновлён",
                Some(LIST_PATH),
                self.client.update_user(id, input),
            )
            .await
    }

    /// Удаляет пользователя.
    pub async fn delete(&self, id: i64) -> PortalResult<Mutated<()>> {
        self.hooks
            .mutate(
                CacheKey::Users,
                "Пользователь удалён",
                None,
                self.client.delete_user(id),
            )
            .await
    }
}
