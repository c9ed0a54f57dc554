//! Общие типы новостного портала: сущности, конверт ответа бэкенда,
//! пагинация и валидируемые DTO запросов.
//!
//! Все wire-имена полей следуют контракту бэкенда (camelCase),
//! включая исторические странности вроде `itemPerPages`.
#![warn(missing_docs)]

mod envelope;
mod models;
mod pagination;
mod requests;

pub use envelope::ApiResponse;
pub use models::{Article, Category, Claims, Comment, Like, Role, Tag, TokenPair, UploadedFile, User};
pub use pagination::{PageMeta, Paginated};
pub use requests::{
    ArticleInput, CategoryInput, CommentInput, CredentialsInput, PasswordResetInput, SignUpInput,
    TagInput, UserInput,
};
