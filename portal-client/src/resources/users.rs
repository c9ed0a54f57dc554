use reqwest::Method;

use portal_api::{Paginated, User, UserInput};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

impl PortalClient {
    /// Страница пользователей (дашборд администратора).
    pub async fn list_users(&self, page: u64, per_page: u64) -> PortalResult<Paginated<User>> {
        let path = format!("/protected/users?page={page}&perPage={per_page}");
        self.execute(Method::GET, &path, None::<&()>, Auth::Bearer)
            .await
    }

    /// Пользователь по идентификатору.
    pub async fn get_user(&self, id: i64) -> PortalResult<User> {
        self.execute(
            Method::GET,
            &format!("/protected/users/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Создание пользователя.
    pub async fn create_user(&self, input: &UserInput) -> PortalResult<User> {
        self.execute(Method::POST, "/protected/users", Some(input), Auth::Bearer)
            .await
    }

    /// Обновление пользователя.
    pub async fn update_user(&self, id: i64, input: &UserInput) -> PortalResult<User> {
        self.execute(
            Method::PATCH,
            &format!("/protected/users/{id}"),
            Some(input),
            Auth::Bearer,
        )
        .await
    }

    /// Удаление пользователя.
    pub async fn delete_user(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/users/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }
}
