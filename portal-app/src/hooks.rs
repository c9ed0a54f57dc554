//! Универсальные хуки: загрузка списков через кэш и мутации с
//! тостами и инвалидацией.
//!
//! Модули сущностей не трогают кэш и уведомления напрямую: вся
//! механика «посмотри в кэш — сходи в сеть — положи — покажи тост»
//! собрана здесь один раз.

use std::future::Future;
use std::sync::Arc;

use portal_api::Paginated;
use portal_client::{PortalError, PortalResult};
use tracing::debug;
use validator::Validate;

use crate::cache::{CacheKey, CacheService, PageSlot};
use crate::notify::Notifier;

/// Результат успешной мутации: значение плюс путь, на который стоит
/// перейти после неё (если он есть).
#[derive(Debug)]
pub struct Mutated<T> {
    /// Ответ бэкенда.
    pub value: T,
    /// Путь перехода после успеха.
    pub redirect: Option<String>,
}

#[derive(Clone)]
/// Связка кэша и уведомлений, внедряется в модули сущностей.
pub struct Hooks {
    cache: CacheService,
    notifier: Arc<dyn Notifier>,
}

impl Hooks {
    /// Собирает хуки поверх кэша и поверхности уведомлений.
    pub fn new(cache: CacheService, notifier: Arc<dyn Notifier>) -> Self {
        Self { cache, notifier }
    }

    /// Кэш, которым пользуются хуки.
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Страница спискового ресурса: из кэша, если она там есть и не
    /// протухла, иначе через `loader` с записью в кэш.
    pub async fn fetch_page<T, F, Fut>(&self, page: u64, loader: F) -> PortalResult<Paginated<T>>
    where
        T: Clone,
        CacheService: PageSlot<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = PortalResult<Paginated<T>>>,
    {
        let key = <CacheService as PageSlot<T>>::slot_key();
        if let Some(cached) = <CacheService as PageSlot<T>>::page(&self.cache, page) {
            debug!(?key, page, "list served from cache");
            return Ok(cached);
        }

        let fetched = loader().await?;
        <CacheService as PageSlot<T>>::put_page(&self.cache, page, fetched.clone());
        Ok(fetched)
    }

    /// Валидация формы до отправки. Ошибка валидации никогда не уходит
    /// на сервер: пользователю показывается тост, вызывающему —
    /// [`PortalError::InvalidRequest`].
    pub fn check_valid(&self, input: &impl Validate) -> PortalResult<()> {
        if let Err(errors) = input.validate() {
            self.notifier
                .error("Проверьте правильность заполнения формы");
            return Err(PortalError::InvalidRequest(errors.to_string()));
        }
        Ok(())
    }

    /// Прогоняет мутацию через единый конвейер: тост загрузки, затем
    /// на успехе — инвалидация `tag`, тост успеха и путь перехода; на
    /// ошибке — тост с сообщением сервера и возврат ошибки.
    pub async fn mutate<T, Fut>(
        &self,
        tag: CacheKey,
        success_message: &str,
        redirect: Option<&str>,
        op: Fut,
    ) -> PortalResult<Mutated<T>>
    where
        Fut: Future<Output = PortalResult<T>>,
    {
        self.notifier.loading("Выполняем запрос…");
        match op.await {
            Ok(value) => {
                self.cache.invalidate(tag);
                self.notifier.success(success_message);
                Ok(Mutated {
                    value,
                    redirect: redirect.map(str::to_string),
                })
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::notify::{RecordingNotifier, ToastKind};
    use portal_api::Article;

    fn hooks() -> (Hooks, RecordingNotifier, CacheService) {
        let cache = CacheService::new();
        let notifier = RecordingNotifier::new();
        (
            Hooks::new(cache.clone(), Arc::new(notifier.clone())),
            notifier,
            cache,
        )
    }

    #[tokio::test]
    async fn fetch_page_runs_loader_once_per_page() {
        let (hooks, _, _) = hooks();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let page: Paginated<Article> = hooks
                .fetch_page(1, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Paginated::empty(10))
                })
                .await
                .expect("fetch page");
            assert!(page.items.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_page_refetches_after_invalidation() {
        let (hooks, _, cache) = hooks();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Paginated::<Article>::empty(10))
        };

        hooks.fetch_page(1, load).await.expect("first fetch");
        cache.invalidate(CacheKey::Articles);
        hooks.fetch_page(1, load).await.expect("second fetch");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_and_toasts() {
        let (hooks, notifier, cache) = hooks();
        cache.put_page(1, Paginated::<Article>::empty(10));

        let outcome = hooks
            .mutate(CacheKey::Articles, "Готово", Some("/admin/dashboard"), async {
                Ok(42)
            })
            .await
            .expect("mutation");

        assert_eq!(outcome.value, 42);
        assert_eq!(outcome.redirect.as_deref(), Some("/admin/dashboard"));
        assert!(cache.is_stale(CacheKey::Articles));
        assert_eq!(notifier.successes(), vec!["Готово".to_string()]);
    }

    #[tokio::test]
    async fn failed_mutation_toasts_server_message_and_keeps_cache() {
        let (hooks, notifier, cache) = hooks();
        cache.put_page(1, Paginated::<Article>::empty(10));

        let result: PortalResult<Mutated<i64>> = hooks
            .mutate(CacheKey::Articles, "Готово", None, async {
                Err(PortalError::InvalidRequest("заголовок занят".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(!cache.is_stale(CacheKey::Articles));
        assert_eq!(notifier.errors(), vec!["заголовок занят".to_string()]);
    }

    #[tokio::test]
    async fn mutation_emits_loading_before_settling() {
        let (hooks, notifier, _) = hooks();
        hooks
            .mutate(CacheKey::Tags, "Готово", None, async { Ok(()) })
            .await
            .expect("mutation");

        let kinds: Vec<ToastKind> = notifier.events().iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![ToastKind::Loading, ToastKind::Success]);
    }

    #[test]
    fn invalid_input_never_reaches_the_network() {
        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 1))]
            title: String,
        }

        let (hooks, notifier, _) = hooks();
        let result = hooks.check_valid(&Form {
            title: String::new(),
        });

        assert!(matches!(result, Err(PortalError::InvalidRequest(_))));
        assert_eq!(notifier.errors().len(), 1);
    }
}
