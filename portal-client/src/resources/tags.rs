use reqwest::Method;

use portal_api::{Paginated, Tag, TagInput};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

impl PortalClient {
    /// Страница тегов.
    pub async fn list_tags(&self, page: u64, per_page: u64) -> PortalResult<Paginated<Tag>> {
        let path = format!("/protected/tags?page={page}&perPage={per_page}");
        self.execute(Method::GET, &path, None::<&()>, Auth::Bearer)
            .await
    }

    /// Создание тега.
    pub async fn create_tag(&self, input: &TagInput) -> PortalResult<Tag> {
        self.execute(Method::POST, "/protected/tags", Some(input), Auth::Bearer)
            .await
    }

    /// Обновление тега.
    pub async fn update_tag(&self, id: i64, input: &TagInput) -> PortalResult<Tag> {
        self.execute(
            Method::PATCH,
            &format!("/protected/tags/{id}"),
            Some(input),
            Auth::Bearer,
        )
        .await
    }

    /// Удаление тега.
    pub async fn delete_tag(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/tags/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }
}
