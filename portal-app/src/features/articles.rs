//! Статьи: список, карточка и CRUD для дашбордов.

use portal_api::{Article, ArticleInput, Paginated};
use portal_client::{PortalClient, PortalResult};

use crate::cache::CacheKey;
use crate::hooks::{Hooks, Mutated};

/// Операции над статьями.
#[derive(Clone)]
pub struct Articles {
    client: PortalClient,
    hooks: Hooks,
}

impl Articles {
    /// Связывает модуль с клиентом и хуками.
    pub fn new(client: PortalClient, hooks: Hooks) -> Self {
        Self { client, hooks }
    }

    /// Страница статей: из кэша либо с сервера.
    pub async fn page(&self, page: u64, per_page: u64) -> PortalResult<Paginated<Article>> {
        self.hooks
            .fetch_page(page, || self.client.list_articles(page, per_page))
            .await
    }

    /// Статья по идентификатору. Карточки не кэшируются: они всегда
    /// открываются свежими.
    pub async fn get(&self, id: i64) -> PortalResult<Article> {
        self.client.get_article(id).await
    }

    /// Создаёт статью. `return_to` — куда вести после успеха; статьи
    /// правят и администратор, и репортёр, поэтому путь выбирает
    /// вызывающий дашборд.
    pub async fn create(
        &self,
        input: &ArticleInput,
        return_to: Option<&str>,
    ) -> PortalResult<Mutated<Article>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Articles,
                "Статья создана",
                return_to,
                self.client.create_article(input),
            )
            .await
    }

    /// Обновляет статью.
    pub async fn update(
        &self,
        id: i64,
        input: &ArticleInput,
        return_to: Option<&str>,
    ) -> PortalResult<Mutated<Article>> {
        self.hooks.check_valid(input)?;
        self.hooks
            .mutate(
                CacheKey::Articles,
                "Статья обновлена",
                return_to,
                self.client.update_article(id, input),
            )
            .await
    }

    /// Удаляет статью.
    pub async fn delete(&self, id: i64, return_to: Option<&str>) -> PortalResult<Mutated<()>> {
        self.hooks
            .mutate(
                CacheKey::Articles,
                "Статья удалена",
                return_to,
                self.client.delete_article(id),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheService;
    use crate::notify::RecordingNotifier;
    use std::sync::Arc;

    #[tokio::test]
    async fn invalid_article_is_rejected_before_the_network() {
        let notifier = RecordingNotifier::new();
        let articles = Articles::new(
            // Адрес никуда не ведёт: до сети дойти не должны.
            PortalClient::new("http://127.0.0.1:1"),
            Hooks::new(CacheService::new(), Arc::new(notifier.clone())),
        );

        let bad = ArticleInput {
            title: String::new(),
            content: "<p>text</p>".to_string(),
            category_id: 1,
            tag_ids: Vec::new(),
            cover_url: None,
        };

        let result = articles.create(&bad, None).await;
        assert!(result.is_err());
        assert_eq!(notifier.errors().len(), 1);
    }
}
