use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Роль пользователя портала.
pub enum Role {
    /// Читатель: публичная часть сайта.
    Reader,
    /// Репортёр: собственный дашборд и статьи.
    Reporter,
    /// Администратор: полный дашборд.
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Claims access-токена. Клиент декодирует их без проверки подписи,
/// поэтому значения носят рекомендательный характер; авторизацию
/// принудительно проверяет бэкенд.
pub struct Claims {
    /// Идентификатор пользователя (subject).
    pub sub: String,
    /// Email пользователя.
    pub email: String,
    /// Роль пользователя.
    pub role: Role,
    /// Подтверждён ли email.
    pub verified: bool,
    /// Момент выдачи (unix-секунды).
    pub iat: i64,
    /// Момент истечения (unix-секунды).
    pub exp: i64,
}

impl Claims {
    /// Истёк ли токен к моменту `now_ms` (unix-миллисекунды).
    ///
    /// Контракт бэкенда: `exp * 1000 < now`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.exp * 1000 < now_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Пользователь портала.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Email.
    pub email: String,
    /// Отображаемое имя.
    pub name: String,
    /// Роль.
    pub role: Role,
    /// Подтверждён ли email.
    pub verified: bool,
    /// URL аватара, если загружен.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Статья.
pub struct Article {
    /// Идентификатор статьи.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Слаг для URL.
    pub slug: String,
    /// Содержимое (HTML).
    pub content: String,
    /// URL обложки, если задана.
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Категория статьи.
    pub category: Category,
    /// Теги статьи.
    pub tags: Vec<Tag>,
    /// Автор.
    pub author: User,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Категория статей.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Название.
    pub name: String,
    /// Слаг для URL.
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Тег статьи.
pub struct Tag {
    /// Идентификатор тега.
    pub id: i64,
    /// Название.
    pub name: String,
    /// Слаг для URL.
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Комментарий. Дерево через `parent_id`: корневой комментарий статьи
/// не имеет родителя; глубина в модели не ограничена.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Содержимое (HTML).
    pub content: String,
    /// Идентификатор родительского комментария, если это ответ.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Идентификатор статьи.
    pub article_id: i64,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
    /// Был ли комментарий отредактирован.
    pub is_edited: bool,
    /// Количество лайков (считает сервер).
    pub like_count: i64,
    /// Количество ответов (считает сервер).
    pub child_count: i64,
    /// Автор комментария.
    pub author: User,
    /// Локальный флаг: запись вставлена оптимистично и ещё не
    /// подтверждена сервером. На провод не попадает.
    #[serde(skip)]
    pub is_optimistic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Отметка «нравится»: связывает пользователя и комментарий.
pub struct Like {
    /// Идентификатор отметки.
    pub id: i64,
    /// Идентификатор комментария.
    pub comment_id: i64,
    /// Идентификатор пользователя.
    pub user_id: i64,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Пара токенов сессии. Хранится в cookie-хранилище браузера и
/// заменяется целиком при каждом refresh.
pub struct TokenPair {
    /// Access-токен (bearer).
    pub access_token: String,
    /// Refresh-токен.
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Результат загрузки файла.
pub struct UploadedFile {
    /// Публичный URL загруженного файла.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_screaming_wire_names() {
        let raw = serde_json::to_string(&Role::Reporter).expect("serialize role");
        assert_eq!(raw, r#""REPORTER""#);

        let role: Role = serde_json::from_str(r#""ADMIN""#).expect("deserialize role");
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn claims_expiry_follows_exp_times_thousand() {
        let claims = Claims {
            sub: "1".to_string(),
            email: "a@example.com".to_string(),
            role: Role::Reader,
            verified: true,
            iat: 1_000,
            exp: 2_000,
        };

        assert!(!claims.is_expired_at(2_000_000));
        assert!(claims.is_expired_at(2_000_001));
    }

    #[test]
    fn comment_optimistic_flag_defaults_to_false_on_wire() {
        let raw = r#"{
            "id": 7,
            "content": "<p>hi</p>",
            "articleId": 3,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
            "isEdited": false,
            "likeCount": 0,
            "childCount": 0,
            "author": {
                "id": 1,
                "email": "a@example.com",
                "name": "A",
                "role": "READER",
                "verified": true,
                "createdAt": "2026-01-01T00:00:00Z"
            }
        }"#;

        let comment: Comment = serde_json::from_str(raw).expect("deserialize comment");
        assert!(!comment.is_optimistic);
        assert_eq!(comment.parent_id, None);
    }
}
