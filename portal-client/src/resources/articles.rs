use reqwest::Method;

use portal_api::{Article, ArticleInput, Paginated};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

impl PortalClient {
    /// Страница статей.
    pub async fn list_articles(&self, page: u64, per_page: u64) -> PortalResult<Paginated<Article>> {
        let path = format!("/protected/articles?page={page}&perPage={per_page}");
        self.execute(Method::GET, &path, None::<&()>, Auth::Bearer)
            .await
    }

    /// Статья по идентификатору.
    pub async fn get_article(&self, id: i64) -> PortalResult<Article> {
        self.execute(
            Method::GET,
            &format!("/protected/articles/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Создание статьи.
    pub async fn create_article(&self, input: &ArticleInput) -> PortalResult<Article> {
        self.execute(Method::POST, "/protected/articles", Some(input), Auth::Bearer)
            .await
    }

    /// Обновление статьи.
    pub async fn update_article(&self, id: i64, input: &ArticleInput) -> PortalResult<Article> {
        self.execute(
            Method::PATCH,
            &format!("/protected/articles/{id}"),
            Some(input),
            Auth::Bearer,
        )
        .await
    }

    /// Удаление статьи.
    pub async fn delete_article(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/articles/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }
}
