use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use portal_api::{Article, Category, Comment, Like, PageMeta, Paginated, Role, Tag, User};

use crate::jwt::JwtService;

pub(crate) const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone)]
pub(crate) struct DemoUser {
    pub(crate) user: User,
    pub(crate) password: String,
}

#[derive(Debug)]
pub(crate) struct Db {
    pub(crate) users: Vec<DemoUser>,
    pub(crate) categories: Vec<Category>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) articles: Vec<Article>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) likes: Vec<Like>,
    next_id: i64,
}

impl Db {
    pub(crate) fn seeded() -> Self {
        let seeded_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single()
            .expect("valid seed timestamp");

        let user = |id: i64, email: &str, name: &str, role: Role, verified: bool| DemoUser {
            user: User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                role,
                verified,
                avatar_url: None,
                created_at: seeded_at,
            },
            password: DEMO_PASSWORD.to_string(),
        };

        let users = vec![
            user(1, "reader@example.com", "Demo Reader", Role::Reader, true),
            user(2, "reporter@example.com", "Demo Reporter", Role::Reporter, true),
            user(3, "admin@example.com", "Demo Admin", Role::Admin, true),
            user(4, "unverified@example.com", "Fresh Reader", Role::Reader, false),
        ];

        let categories = vec![
            Category { id: 5, name: "Tech".to_string(), slug: "tech".to_string() },
            Category { id: 6, name: "World".to_string(), slug: "world".to_string() },
        ];
        let tags = vec![
            Tag { id: 7, name: "rust".to_string(), slug: "rust".to_string() },
            Tag { id: 8, name: "web".to_string(), slug: "web".to_string() },
        ];

        let author = users[1].user.clone();
        let article = |id: i64, title: &str, category: &Category| Article {
            id,
            title: title.to_string(),
            slug: slugify(title),
            content: format!("<p>{title}</p>"),
            cover_url: None,
            category: category.clone(),
            tags: tags.clone(),
            author: author.clone(),
            created_at: seeded_at,
            updated_at: seeded_at,
        };

        let articles = vec![
            article(9, "Rust ships a new release", &categories[0]),
            article(10, "World news roundup", &categories[1]),
        ];

        Self {
            users,
            categories,
            tags,
            articles,
            comments: Vec::new(),
            likes: Vec::new(),
            next_id: 100,
        }
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn user_by_email(&self, email: &str) -> Option<&DemoUser> {
        self.users.iter().find(|entry| entry.user.email == email)
    }

    pub(crate) fn user_by_id(&self, id: i64) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.user.id == id)
            .map(|entry| entry.user.clone())
    }

    /// Fills in the server-computed counters before a comment goes out.
    pub(crate) fn hydrate_comment(&self, comment: &Comment) -> Comment {
        let mut out = comment.clone();
        out.like_count = self
            .likes
            .iter()
            .filter(|like| like.comment_id == comment.id)
            .count() as i64;
        out.child_count = self
            .comments
            .iter()
            .filter(|child| child.parent_id == Some(comment.id))
            .count() as i64;
        out
    }
}

#[derive(Clone)]
pub struct AppState {
    pub(crate) db: Arc<Mutex<Db>>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) force_unauthorized: Arc<AtomicBool>,
}

impl AppState {
    pub(crate) fn new(jwt: JwtService) -> Self {
        Self {
            db: Arc::new(Mutex::new(Db::seeded())),
            jwt: Arc::new(jwt),
            force_unauthorized: Arc::new(AtomicBool::new(false)),
        }
    }
}

pub(crate) fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if (ch == ' ' || ch == '-' || ch == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

pub(crate) fn paginate<T: Clone>(items: &[T], page: u64, per_page: u64) -> Paginated<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(per_page);

    let start = ((page - 1) * per_page) as usize;
    let page_items: Vec<T> = items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    let item_count = page_items.len() as u64;
    Paginated {
        items: page_items,
        meta: PageMeta {
            total_items,
            item_count,
            item_per_pages: per_page,
            total_pages,
            current_page: page,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Rust ships a new release"), "rust-ships-a-new-release");
        assert_eq!(slugify("  Hello -- World  "), "hello-world");
    }

    #[test]
    fn paginate_computes_meta() {
        let items: Vec<i64> = (1..=5).collect();
        let page = paginate(&items, 2, 2);

        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.meta.total_items, 5);
        assert_eq!(page.meta.item_count, 2);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.current_page, 2);
    }

    #[test]
    fn paginate_returns_empty_page_past_the_end() {
        let items: Vec<i64> = (1..=3).collect();
        let page = paginate(&items, 9, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.item_count, 0);
    }
}
