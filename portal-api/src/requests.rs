use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::Role;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Вход по email и паролю.
pub struct CredentialsInput {
    /// Email пользователя.
    #[validate(email)]
    pub email: String,
    /// Пароль.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Регистрация нового пользователя.
pub struct SignUpInput {
    /// Отображаемое имя.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Пароль.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Сброс пароля по токену из письма.
pub struct PasswordResetInput {
    /// Токен из письма.
    #[validate(length(min = 1))]
    pub token: String,
    /// Новый пароль.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Создание или обновление статьи.
pub struct ArticleInput {
    /// Заголовок.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Содержимое (HTML).
    #[validate(length(min = 1))]
    pub content: String,
    /// Идентификатор категории.
    pub category_id: i64,
    /// Идентификаторы тегов.
    pub tag_ids: Vec<i64>,
    /// URL обложки, если задана.
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Создание или обновление категории.
pub struct CategoryInput {
    /// Название.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Создание или обновление тега.
pub struct TagInput {
    /// Название.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Создание или обновление пользователя из дашборда.
pub struct UserInput {
    /// Отображаемое имя.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Роль.
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Новый комментарий или ответ.
pub struct CommentInput {
    /// Содержимое (HTML).
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    /// Идентификатор статьи.
    pub article_id: i64,
    /// Идентификатор родительского комментария для ответа.
    pub parent_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_well_formed_email() {
        let input = CredentialsInput {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn comment_content_must_not_be_empty() {
        let input = CommentInput {
            content: String::new(),
            article_id: 1,
            parent_id: None,
        };
        assert!(input.validate().is_err());

        let input = CommentInput {
            content: "<p>привет</p>".to_string(),
            article_id: 1,
            parent_id: Some(2),
        };
        assert!(input.validate().is_ok());
    }
}
