//! Оптимистичная подсистема комментариев.
//!
//! Любая мутация идёт по одному протоколу: снимок затронутого ключа,
//! оптимистичная правка кэша строго до запроса, затем запрос; на
//! ошибке — точный откат к снимку, и в любом случае — инвалидация,
//! чтобы следующая загрузка сверилась с сервером (счётчики ответов
//! локально не пересчитываются).
//!
//! Сеть за портом [`CommentsApi`]: в приложении это HTTP-клиент, в
//! тестах — заглушка. «Один оптимистичный комментарий за раз»
//! обеспечивает гейт незавершённой отправки в самом слое данных, а не
//! в UI.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use validator::Validate;

use portal_api::{Comment, CommentInput, Like, Paginated, User};
use portal_client::{PortalClient, PortalError, PortalResult};

use crate::cache::{CacheKey, CacheService};
use crate::notify::Notifier;

/// Порт сетевых операций над комментариями.
#[async_trait]
pub trait CommentsApi: Send + Sync {
    /// Страница корневых комментариев статьи.
    async fn list_comments(
        &self,
        article_id: i64,
        page: u64,
        per_page: u64,
    ) -> PortalResult<Paginated<Comment>>;

    /// Ответы на комментарий.
    async fn list_replies(&self, parent_id: i64) -> PortalResult<Paginated<Comment>>;

    /// Создание комментария или ответа.
    async fn create_comment(&self, input: &CommentInput) -> PortalResult<Comment>;

    /// Удаление комментария.
    async fn delete_comment(&self, id: i64) -> PortalResult<()>;

    /// Поставить «нравится».
    async fn like_comment(&self, id: i64) -> PortalResult<Like>;

    /// Снять «нравится».
    async fn unlike_comment(&self, id: i64) -> PortalResult<()>;

    /// Текущий статус «нравится».
    async fn like_status(&self, id: i64) -> PortalResult<Option<Like>>;
}

#[async_trait]
impl CommentsApi for PortalClient {
    async fn list_comments(
        &self,
        article_id: i64,
        page: u64,
        per_page: u64,
    ) -> PortalResult<Paginated<Comment>> {
        PortalClient::list_comments(self, article_id, page, per_page).await
    }

    async fn list_replies(&self, parent_id: i64) -> PortalResult<Paginated<Comment>> {
        PortalClient::list_replies(self, parent_id).await
    }

    async fn create_comment(&self, input: &CommentInput) -> PortalResult<Comment> {
        PortalClient::create_comment(self, input).await
    }

    async fn delete_comment(&self, id: i64) -> PortalResult<()> {
        PortalClient::delete_comment(self, id).await
    }

    async fn like_comment(&self, id: i64) -> PortalResult<Like> {
        PortalClient::like_comment(self, id).await
    }

    async fn unlike_comment(&self, id: i64) -> PortalResult<()> {
        PortalClient::unlike_comment(self, id).await
    }

    async fn like_status(&self, id: i64) -> PortalResult<Option<Like>> {
        self.comment_like_status(id).await
    }
}

#[derive(Debug, Error)]
/// Ошибки подсистемы комментариев.
pub enum CommentSyncError {
    /// Предыдущая отправка ещё не завершилась: плейсхолдер уже в кэше.
    #[error("another comment submission is still in flight")]
    SubmissionInFlight,

    /// Комментарий не прошёл локальную валидацию.
    #[error("invalid comment: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Ошибка сетевого слоя.
    #[error(transparent)]
    Api(#[from] PortalError),
}

/// Отслеживаемая незавершённая отправка.
#[derive(Debug, Clone, Copy)]
struct PendingComment {
    /// Локальный (отрицательный) идентификатор плейсхолдера.
    id: i64,
}

/// Координатор оптимистичных мутаций комментариев.
pub struct CommentSync {
    api: Arc<dyn CommentsApi>,
    cache: CacheService,
    notifier: Arc<dyn Notifier>,
    pending: Mutex<Option<PendingComment>>,
    next_local_id: AtomicI64,
}

impl CommentSync {
    /// Собирает подсистему поверх сетевого порта, кэша и уведомлений.
    pub fn new(api: Arc<dyn CommentsApi>, cache: CacheService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            cache,
            notifier,
            pending: Mutex::new(None),
            next_local_id: AtomicI64::new(-1),
        }
    }

    // --- загрузка -------------------------------------------------------

    /// Страница корневых комментариев: из кэша либо с сервера.
    pub async fn comments_page(
        &self,
        article_id: i64,
        page: u64,
        per_page: u64,
    ) -> PortalResult<Paginated<Comment>> {
        if let Some(cached) = self.cache.comment_page(article_id, page) {
            return Ok(cached);
        }
        let fetched = self.api.list_comments(article_id, page, per_page).await?;
        self.cache.put_comment_page(article_id, fetched.clone());
        Ok(fetched)
    }

    /// Ответы на комментарий: из кэша либо с сервера.
    pub async fn replies(&self, parent_id: i64) -> PortalResult<Paginated<Comment>> {
        if let Some(cached) = self.cache.reply_list(parent_id) {
            return Ok(cached);
        }
        let fetched = self.api.list_replies(parent_id).await?;
        self.cache.put_reply_list(parent_id, fetched.clone());
        Ok(fetched)
    }

    /// Статус «нравится»: из кэша либо с сервера.
    pub async fn liked(&self, comment_id: i64) -> PortalResult<Option<Like>> {
        if let Some(cached) = self.cache.like_status(comment_id) {
            return Ok(cached);
        }
        let fetched = self.api.like_status(comment_id).await?;
        self.cache.put_like_status(comment_id, fetched.clone());
        Ok(fetched)
    }

    // --- создание -------------------------------------------------------

    /// Публикует комментарий или ответ с оптимистичной вставкой.
    ///
    /// Плейсхолдер с отрицательным id попадает в кэш до ухода запроса
    /// в сеть; на успехе он заменяется серверной записью на том же
    /// месте, так что подтверждённая копия и плейсхолдер никогда не
    /// видны одновременно.
    pub async fn submit(
        &self,
        author: &User,
        input: CommentInput,
    ) -> Result<Comment, CommentSyncError> {
        input.validate()?;
        let placeholder_id = self.begin()?;

        let snapshot = match input.parent_id {
            Some(parent_id) => self.cache.capture_replies(parent_id),
            None => self.cache.capture_top_level(input.article_id),
        };

        let placeholder = self.placeholder(placeholder_id, author, &input);
        match input.parent_id {
            Some(parent_id) => self.cache.append_reply(parent_id, placeholder),
            None => self.cache.prepend_top_level(input.article_id, placeholder),
        }

        let outcome = self.api.create_comment(&input).await;
        self.finish(placeholder_id);

        match outcome {
            Ok(confirmed) => {
                self.cache.replace_comment(placeholder_id, &confirmed);
                self.cache.invalidate(CacheKey::ArticleComments {
                    article_id: input.article_id,
                });
                if let Some(parent_id) = input.parent_id {
                    self.cache.invalidate(CacheKey::CommentReplies { parent_id });
                }
                self.notifier.success("Комментарий опубликован");
                Ok(confirmed)
            }
            Err(err) => {
                self.cache.restore(snapshot);
                self.notifier.error(&err.user_message());
                Err(err.into())
            }
        }
    }

    // --- «нравится» -----------------------------------------------------

    /// Переключает отметку «нравится» с оптимистичным сдвигом счётчика
    /// во всех закэшированных копиях комментария. Возвращает новое
    /// состояние (`true` — отметка поставлена).
    pub async fn toggle_like(
        &self,
        viewer_id: i64,
        article_id: i64,
        comment_id: i64,
    ) -> Result<bool, CommentSyncError> {
        let current = self.liked(comment_id).await?;
        let liking = current.is_none();

        // Флип строго до запроса.
        if liking {
            let placeholder = Like {
                id: self.next_local_id.fetch_sub(1, Ordering::SeqCst),
                comment_id,
                user_id: viewer_id,
                created_at: Utc::now(),
            };
            self.cache.put_like_status(comment_id, Some(placeholder));
            self.cache.adjust_like_count(comment_id, 1);
        } else {
            self.cache.put_like_status(comment_id, None);
            self.cache.adjust_like_count(comment_id, -1);
        }

        let outcome = if liking {
            self.api.like_comment(comment_id).await.map(|_| ())
        } else {
            self.api.unlike_comment(comment_id).await
        };

        let result = match outcome {
            Ok(()) => Ok(liking),
            Err(err) => {
                self.cache.put_like_status(comment_id, current);
                self.notifier.error(&err.user_message());
                Err(err.into())
            }
        };

        // Независимо от исхода следующая загрузка сверяется с сервером.
        self.cache.invalidate(CacheKey::CommentLike { comment_id });
        self.cache.invalidate_comments_for(article_id);
        result
    }

    // --- удаление -------------------------------------------------------

    /// Удаляет комментарий с оптимистичным исчезновением из кэша.
    pub async fn delete(&self, comment: &Comment) -> Result<(), CommentSyncError> {
        let snapshot = match comment.parent_id {
            Some(parent_id) => self.cache.capture_replies(parent_id),
            None => self.cache.capture_top_level(comment.article_id),
        };
        match comment.parent_id {
            Some(parent_id) => self.cache.remove_reply(parent_id, comment.id),
            None => self.cache.remove_top_level(comment.article_id, comment.id),
        };

        let result = match self.api.delete_comment(comment.id).await {
            Ok(()) => {
                self.notifier.success("Комментарий удалён");
                Ok(())
            }
            Err(err) => {
                self.cache.restore(snapshot);
                self.notifier.error(&err.user_message());
                Err(err.into())
            }
        };

        // Счётчики ответов пересчитывает только сервер.
        self.cache.invalidate_comments_for(comment.article_id);
        result
    }

    // --- гейт -----------------------------------------------------------

    fn begin(&self) -> Result<i64, CommentSyncError> {
        let mut pending = self.pending.lock().expect("pending gate poisoned");
        if pending.is_some() {
            self.notifier
                .error("Дождитесь отправки предыдущего комментария");
            return Err(CommentSyncError::SubmissionInFlight);
        }
        let id = self.next_local_id.fetch_sub(1, Ordering::SeqCst);
        *pending = Some(PendingComment { id });
        Ok(id)
    }

    // Гейт снимает только та отправка, что его взяла.
    fn finish(&self, placeholder_id: i64) {
        let mut pending = self.pending.lock().expect("pending gate poisoned");
        if matches!(*pending, Some(entry) if entry.id == placeholder_id) {
            *pending = None;
        }
    }

    fn placeholder(&self, id: i64, author: &User, input: &CommentInput) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            content: input.content.clone(),
            parent_id: input.parent_id,
            article_id: input.article_id,
            created_at: now,
            updated_at: now,
            is_edited: false,
            like_count: 0,
            child_count: 0,
            author: author.clone(),
            is_optimistic: true,
        }
    }
}
