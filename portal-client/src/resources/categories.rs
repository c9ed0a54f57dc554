use reqwest::Method;

use portal_api::{Category, CategoryInput, Paginated};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

impl PortalClient {
    /// Страница категорий.
    pub async fn list_categories(
        &self,
        page: u64,
        per_page: u64,
    ) -> PortalResult<Paginated<Category>> {
        let path = format!("/protected/categories?page={page}&perPage={per_page}");
        self.execute(Method::GET, &path, None::<&()>, Auth::Bearer)
            .await
    }

    /// Создание категории.
    pub async fn create_category(&self, input: &CategoryInput) -> PortalResult<Category> {
        self.execute(
            Method::POST,
            "/protected/categories",
            Some(input),
            Auth::Bearer,
        )
        .await
    }

    /// Обновление категории.
    pub async fn update_category(&self, id: i64, input: &CategoryInput) -> PortalResult<Category> {
        self.execute(
            Method::PATCH,
            &format!("/protected/categories/{id}"),
            Some(input),
            Auth::Bearer,
        )
        .await
    }

    /// Удаление категории.
    pub async fn delete_category(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/categories/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }
}
