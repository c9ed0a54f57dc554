//! Явный кэш-сервис приложения.
//!
//! Никакого неявного глобального состояния: кэш — обычный объект,
//! который внедряется туда, где нужен, и дёшево клонируется (внутри
//! один `Arc<Mutex<…>>`). Ключи инвалидации — закрытое перечисление:
//! опечатка в ключе не компилируется.
//!
//! Значения хранятся по форме: плоские страницы списков сущностей,
//! «бесконечный» покомнатный кэш комментариев статьи (вектор
//! загруженных страниц), плоские списки ответов и статус «нравится»
//! по комментарию. Протухание — отдельное множество ключей: чтение
//! протухшего ключа ведёт себя как промах, запись снимает отметку.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use portal_api::{Article, Category, Comment, Like, Paginated, Tag, User};

/// Размер страницы по умолчанию; используется, когда оптимистичная
/// вставка создаёт страницу раньше первой загрузки с сервера.
const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Ключ кэша. Закрытое перечисление вместо строковых тегов.
pub enum CacheKey {
    /// Страницы списка статей.
    Articles,
    /// Страницы списка категорий.
    Categories,
    /// Страницы списка тегов.
    Tags,
    /// Страницы списка пользователей.
    Users,
    /// Корневые комментарии статьи (все загруженные страницы).
    ArticleComments {
        /// Идентификатор статьи.
        article_id: i64,
    },
    /// Ответы на комментарий (плоский список).
    CommentReplies {
        /// Идентификатор родительского комментария.
        parent_id: i64,
    },
    /// Статус «нравится» текущего пользователя для комментария.
    CommentLike {
        /// Идентификатор комментария.
        comment_id: i64,
    },
}

#[derive(Debug, Default)]
struct CacheState {
    articles: HashMap<u64, Paginated<Article>>,
    categories: HashMap<u64, Paginated<Category>>,
    tags: HashMap<u64, Paginated<Tag>>,
    users: HashMap<u64, Paginated<User>>,
    /// Страницы корневых комментариев по статье, отсортированы по
    /// `current_page`.
    article_comments: HashMap<i64, Vec<Paginated<Comment>>>,
    replies: HashMap<i64, Paginated<Comment>>,
    /// `None` — пользователь не лайкал; отсутствие ключа — неизвестно.
    like_status: HashMap<i64, Option<Like>>,
    stale: HashSet<CacheKey>,
}

#[derive(Debug, Clone, Default)]
/// Дескриптор кэша. Клонируется дёшево, все клоны разделяют состояние.
pub struct CacheService {
    inner: Arc<Mutex<CacheState>>,
}

/// Снимок значения под одним ключом комментариев; достаточно для
/// точного отката оптимистичной правки.
#[derive(Debug, Clone)]
pub enum CommentSnapshot {
    /// Все загруженные страницы корневых комментариев статьи.
    TopLevel {
        /// Идентификатор статьи.
        article_id: i64,
        /// Содержимое на момент снимка; `None` — ключа не было.
        pages: Option<Vec<Paginated<Comment>>>,
    },
    /// Список ответов на комментарий.
    Replies {
        /// Идентификатор родительского комментария.
        parent_id: i64,
        /// Содержимое на момент снимка; `None` — ключа не было.
        list: Option<Paginated<Comment>>,
    },
}

/// Типизированный доступ к страницам спискового ресурса. Реализации —
/// по одной на сущность, чтобы хук загрузки был универсальным.
pub trait PageSlot<T> {
    /// Ключ инвалидации этого списка.
    fn slot_key() -> CacheKey;
    /// Кэшированная страница, если она есть и не протухла.
    fn page(&self, page: u64) -> Option<Paginated<T>>;
    /// Сохраняет страницу и снимает отметку протухания.
    fn put_page(&self, page: u64, value: Paginated<T>);
}

macro_rules! page_slot {
    ($item:ty, $field:ident, $key:expr) => {
        impl PageSlot<$item> for CacheService {
            fn slot_key() -> CacheKey {
                $key
            }

            fn page(&self, page: u64) -> Option<Paginated<$item>> {
                let state = self.lock();
                if state.stale.contains(&$key) {
                    return None;
                }
                state.$field.get(&page).cloned()
            }

            fn put_page(&self, page: u64, value: Paginated<$item>) {
                let mut state = self.lock();
                state.$field.insert(page, value);
                state.stale.remove(&$key);
            }
        }
    };
}

page_slot!(Article, articles, CacheKey::Articles);
page_slot!(Category, categories, CacheKey::Categories);
page_slot!(Tag, tags, CacheKey::Tags);
page_slot!(User, users, CacheKey::Users);

impl CacheService {
    /// Пустой кэш.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().expect("cache lock poisoned")
    }

    /// Помечает ключ протухшим: следующее чтение промахнётся.
    pub fn invalidate(&self, key: CacheKey) {
        self.lock().stale.insert(key);
    }

    /// Протух ли ключ.
    pub fn is_stale(&self, key: CacheKey) -> bool {
        self.lock().stale.contains(&key)
    }

    /// Полная очистка: вызывается при выходе из аккаунта.
    pub fn clear(&self) {
        *self.lock() = CacheState::default();
    }

    /// Протухают все кэши комментариев статьи: её страницы и каждый
    /// загруженный список ответов. Счётчик ответов пересчитывает
    /// только сервер, поэтому после мутации дешевле перечитать.
    pub fn invalidate_comments_for(&self, article_id: i64) {
        let mut state = self.lock();
        state.stale.insert(CacheKey::ArticleComments { article_id });
        let loaded: Vec<i64> = state.replies.keys().copied().collect();
        for parent_id in loaded {
            state.stale.insert(CacheKey::CommentReplies { parent_id });
        }
    }

    // --- корневые комментарии -------------------------------------------

    /// Кэшированная страница корневых комментариев статьи.
    pub fn comment_page(&self, article_id: i64, page: u64) -> Option<Paginated<Comment>> {
        let state = self.lock();
        if state
            .stale
            .contains(&CacheKey::ArticleComments { article_id })
        {
            return None;
        }
        state
            .article_comments
            .get(&article_id)?
            .iter()
            .find(|cached| cached.meta.current_page == page)
            .cloned()
    }

    /// Сохраняет страницу корневых комментариев, заменяя одноимённую.
    pub fn put_comment_page(&self, article_id: i64, value: Paginated<Comment>) {
        let mut state = self.lock();
        let pages = state.article_comments.entry(article_id).or_default();
        match pages
            .iter_mut()
            .find(|cached| cached.meta.current_page == value.meta.current_page)
        {
            Some(cached) => *cached = value,
            None => {
                pages.push(value);
                pages.sort_by_key(|cached| cached.meta.current_page);
            }
        }
        state.stale.remove(&CacheKey::ArticleComments { article_id });
    }

    /// Вставляет комментарий в начало первой страницы статьи. Если ни
    /// одной страницы ещё нет, создаёт её: оптимистичная запись должна
    /// быть видна сразу.
    pub fn prepend_top_level(&self, article_id: i64, comment: Comment) {
        let mut state = self.lock();
        let pages = state.article_comments.entry(article_id).or_default();
        if pages.is_empty() {
            pages.push(Paginated::empty(DEFAULT_PAGE_SIZE));
        }
        pages[0].push_front(comment);
    }

    /// Удаляет корневой комментарий из любой загруженной страницы.
    pub fn remove_top_level(&self, article_id: i64, comment_id: i64) -> bool {
        let mut state = self.lock();
        let Some(pages) = state.article_comments.get_mut(&article_id) else {
            return false;
        };
        pages
            .iter_mut()
            .any(|page| page.remove_where(|comment| comment.id == comment_id).is_some())
    }

    // --- ответы ---------------------------------------------------------

    /// Кэшированный список ответов на комментарий.
    pub fn reply_list(&self, parent_id: i64) -> Option<Paginated<Comment>> {
        let state = self.lock();
        if state.stale.contains(&CacheKey::CommentReplies { parent_id }) {
            return None;
        }
        state.replies.get(&parent_id).cloned()
    }

    /// Сохраняет список ответов.
    pub fn put_reply_list(&self, parent_id: i64, value: Paginated<Comment>) {
        let mut state = self.lock();
        state.replies.insert(parent_id, value);
        state.stale.remove(&CacheKey::CommentReplies { parent_id });
    }

    /// Добавляет ответ в конец списка (хронологический порядок).
    pub fn append_reply(&self, parent_id: i64, comment: Comment) {
        let mut state = self.lock();
        state
            .replies
            .entry(parent_id)
            .or_insert_with(|| Paginated::empty(DEFAULT_PAGE_SIZE))
            .push_back(comment);
    }

    /// Удаляет ответ из списка родителя.
    pub fn remove_reply(&self, parent_id: i64, comment_id: i64) -> bool {
        let mut state = self.lock();
        state
            .replies
            .get_mut(&parent_id)
            .is_some_and(|list| list.remove_where(|comment| comment.id == comment_id).is_some())
    }

    // --- общее по комментариям ------------------------------------------

    /// Заменяет комментарий с `placeholder_id` подтверждённой записью
    /// на том же месте. Так плейсхолдер и серверная копия никогда не
    /// существуют одновременно.
    pub fn replace_comment(&self, placeholder_id: i64, confirmed: &Comment) -> bool {
        let mut state = self.lock();
        if let Some(parent_id) = confirmed.parent_id {
            if let Some(list) = state.replies.get_mut(&parent_id)
                && let Some(slot) = list.items.iter_mut().find(|c| c.id == placeholder_id)
            {
                *slot = confirmed.clone();
                return true;
            }
            return false;
        }

        let Some(pages) = state.article_comments.get_mut(&confirmed.article_id) else {
            return false;
        };
        for page in pages.iter_mut() {
            if let Some(slot) = page.items.iter_mut().find(|c| c.id == placeholder_id) {
                *slot = confirmed.clone();
                return true;
            }
        }
        false
    }

    /// Сдвигает `like_count` комментария на `delta` во всех местах,
    /// где он закэширован: на страницах статей и в списках ответов.
    pub fn adjust_like_count(&self, comment_id: i64, delta: i64) {
        let mut state = self.lock();
        let bump = |comment: &mut Comment| {
            if comment.id == comment_id {
                comment.like_count = (comment.like_count + delta).max(0);
            }
        };
        for pages in state.article_comments.values_mut() {
            for page in pages.iter_mut() {
                page.items.iter_mut().for_each(bump);
            }
        }
        for list in state.replies.values_mut() {
            list.items.iter_mut().for_each(bump);
        }
    }

    // --- статус «нравится» ----------------------------------------------

    /// Кэшированный статус «нравится»: внешний `None` — неизвестно,
    /// внутренний — известно, что отметки нет.
    pub fn like_status(&self, comment_id: i64) -> Option<Option<Like>> {
        let state = self.lock();
        if state.stale.contains(&CacheKey::CommentLike { comment_id }) {
            return None;
        }
        state.like_status.get(&comment_id).cloned()
    }

    /// Сохраняет статус «нравится».
    pub fn put_like_status(&self, comment_id: i64, value: Option<Like>) {
        let mut state = self.lock();
        state.like_status.insert(comment_id, value);
        state.stale.remove(&CacheKey::CommentLike { comment_id });
    }

    // --- снимки ---------------------------------------------------------

    /// Снимок страниц корневых комментариев статьи.
    pub fn capture_top_level(&self, article_id: i64) -> CommentSnapshot {
        CommentSnapshot::TopLevel {
            article_id,
            pages: self.lock().article_comments.get(&article_id).cloned(),
        }
    }

    /// Снимок списка ответов.
    pub fn capture_replies(&self, parent_id: i64) -> CommentSnapshot {
        CommentSnapshot::Replies {
            parent_id,
            list: self.lock().replies.get(&parent_id).cloned(),
        }
    }

    /// Возвращает значение под ключом снимка ровно в состояние на
    /// момент снимка (в том числе удаляет ключ, которого не было).
    pub fn restore(&self, snapshot: CommentSnapshot) {
        let mut state = self.lock();
        match snapshot {
            CommentSnapshot::TopLevel { article_id, pages } => match pages {
                Some(pages) => {
                    state.article_comments.insert(article_id, pages);
                }
                None => {
                    state.article_comments.remove(&article_id);
                }
            },
            CommentSnapshot::Replies { parent_id, list } => match list {
                Some(list) => {
                    state.replies.insert(parent_id, list);
                }
                None => {
                    state.replies.remove(&parent_id);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_api::{PageMeta, Role};

    fn author() -> User {
        User {
            id: 1,
            email: "reader@example.com".to_string(),
            name: "Reader".to_string(),
            role: Role::Reader,
            verified: true,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    fn comment(id: i64, article_id: i64, parent_id: Option<i64>) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            content: format!("<p>comment {id}</p>"),
            parent_id,
            article_id,
            created_at: now,
            updated_at: now,
            is_edited: false,
            like_count: 0,
            child_count: 0,
            author: author(),
            is_optimistic: false,
        }
    }

    fn page(comments: Vec<Comment>, current_page: u64) -> Paginated<Comment> {
        let count = comments.len() as u64;
        Paginated {
            items: comments,
            meta: PageMeta {
                total_items: count,
                item_count: count,
                item_per_pages: 10,
                total_pages: 1,
                current_page,
            },
        }
    }

    #[test]
    fn stale_entity_page_reads_as_a_miss() {
        let cache = CacheService::new();
        let articles: Paginated<Article> = Paginated::empty(10);
        cache.put_page(1, articles.clone());
        assert!(PageSlot::<Article>::page(&cache, 1).is_some());

        cache.invalidate(CacheKey::Articles);
        assert!(PageSlot::<Article>::page(&cache, 1).is_none());

        // Запись снимает протухание.
        cache.put_page(1, articles);
        assert!(PageSlot::<Article>::page(&cache, 1).is_some());
    }

    #[test]
    fn prepend_creates_the_first_page_when_cache_is_cold() {
        let cache = CacheService::new();
        cache.prepend_top_level(9, comment(-1, 9, None));

        let first = cache.comment_page(9, 1).expect("page must exist");
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.meta.total_items, 1);
        assert_eq!(first.items[0].id, -1);
    }

    #[test]
    fn put_comment_page_replaces_same_numbered_page() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));
        cache.put_comment_page(9, page(vec![comment(101, 9, None)], 2));
        cache.put_comment_page(9, page(vec![comment(102, 9, None)], 1));

        let first = cache.comment_page(9, 1).expect("first page");
        assert_eq!(first.items[0].id, 102);
        assert!(cache.comment_page(9, 2).is_some());
    }

    #[test]
    fn replace_comment_swaps_placeholder_in_place() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));
        cache.prepend_top_level(9, comment(-1, 9, None));

        let confirmed = comment(200, 9, None);
        assert!(cache.replace_comment(-1, &confirmed));

        let first = cache.comment_page(9, 1).expect("first page");
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].id, 200);
        assert!(first.items.iter().all(|c| c.id != -1));
    }

    #[test]
    fn replace_comment_targets_reply_lists_for_replies() {
        let cache = CacheService::new();
        cache.append_reply(100, comment(-2, 9, Some(100)));

        let confirmed = comment(300, 9, Some(100));
        assert!(cache.replace_comment(-2, &confirmed));
        let list = cache.reply_list(100).expect("reply list");
        assert_eq!(list.items[0].id, 300);
    }

    #[test]
    fn adjust_like_count_touches_every_cached_copy() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));
        cache.append_reply(50, comment(100, 9, Some(50)));

        cache.adjust_like_count(100, 1);
        assert_eq!(cache.comment_page(9, 1).expect("page").items[0].like_count, 1);
        assert_eq!(cache.reply_list(50).expect("list").items[0].like_count, 1);

        // Ниже нуля счётчик не уходит даже при двойном откате.
        cache.adjust_like_count(100, -5);
        assert_eq!(cache.comment_page(9, 1).expect("page").items[0].like_count, 0);
    }

    #[test]
    fn snapshot_then_restore_is_exact() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));

        let snapshot = cache.capture_top_level(9);
        cache.prepend_top_level(9, comment(-1, 9, None));
        cache.restore(snapshot);

        let first = cache.comment_page(9, 1).expect("first page");
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.items[0].id, 100);
        assert_eq!(first.meta.total_items, 1);
    }

    #[test]
    fn restore_removes_keys_that_did_not_exist() {
        let cache = CacheService::new();
        let snapshot = cache.capture_replies(100);
        cache.append_reply(100, comment(-1, 9, Some(100)));

        cache.restore(snapshot);
        assert!(cache.reply_list(100).is_none());
    }

    #[test]
    fn invalidate_comments_for_covers_loaded_reply_lists() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));
        cache.put_reply_list(100, page(vec![comment(101, 9, Some(100))], 1));

        cache.invalidate_comments_for(9);
        assert!(cache.comment_page(9, 1).is_none());
        assert!(cache.reply_list(100).is_none());
        assert!(cache.is_stale(CacheKey::ArticleComments { article_id: 9 }));
    }

    #[test]
    fn clear_drops_everything() {
        let cache = CacheService::new();
        cache.put_comment_page(9, page(vec![comment(100, 9, None)], 1));
        cache.put_like_status(100, None);
        cache.invalidate(CacheKey::Articles);

        cache.clear();
        assert!(cache.comment_page(9, 1).is_none());
        assert!(cache.like_status(100).is_none());
        assert!(!cache.is_stale(CacheKey::Articles));
    }

    #[test]
    fn like_status_distinguishes_unknown_from_not_liked() {
        let cache = CacheService::new();
        assert!(cache.like_status(100).is_none());

        cache.put_like_status(100, None);
        assert!(matches!(cache.like_status(100), Some(None)));
    }
}
