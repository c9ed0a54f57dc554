use reqwest::Method;
use serde::Deserialize;

use portal_api::{Comment, CommentInput, Like, Paginated};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Статус «нравится» текущего пользователя для комментария.
pub struct LikeStatus {
    /// Отметка, если она есть.
    pub like: Option<Like>,
}

impl PortalClient {
    /// Страница корневых комментариев статьи.
    pub async fn list_comments(
        &self,
        article_id: i64,
        page: u64,
        per_page: u64,
    ) -> PortalResult<Paginated<Comment>> {
        let path =
            format!("/protected/comments?articleId={article_id}&page={page}&perPage={per_page}");
        self.execute(Method::GET, &path, None::<&()>, Auth::Bearer)
            .await
    }

    /// Ответы на комментарий (плоский список).
    pub async fn list_replies(&self, parent_id: i64) -> PortalResult<Paginated<Comment>> {
        self.execute(
            Method::GET,
            &format!("/protected/comments/{parent_id}/replies"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Создание комментария или ответа.
    pub async fn create_comment(&self, input: &CommentInput) -> PortalResult<Comment> {
        self.execute(Method::POST, "/protected/comments", Some(input), Auth::Bearer)
            .await
    }

    /// Удаление комментария.
    pub async fn delete_comment(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/comments/{id}"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Ставит «нравится».
    pub async fn like_comment(&self, id: i64) -> PortalResult<Like> {
        self.execute(
            Method::POST,
            &format!("/protected/comments/{id}/like"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Снимает «нравится».
    pub async fn unlike_comment(&self, id: i64) -> PortalResult<()> {
        self.execute_ack(
            Method::DELETE,
            &format!("/protected/comments/{id}/like"),
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }

    /// Текущий статус «нравится» для комментария.
    pub async fn comment_like_status(&self, id: i64) -> PortalResult<Option<Like>> {
        let status: LikeStatus = self
            .execute(
                Method::GET,
                &format!("/protected/comments/{id}/like"),
                None::<&()>,
                Auth::Bearer,
            )
            .await?;
        Ok(status.like)
    }
}
