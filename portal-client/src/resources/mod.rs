//! Типизированные методы по ресурсам бэкенда.
//!
//! Каждый модуль добавляет методы к [`crate::PortalClient`]; весь
//! транспорт (токены, refresh, повтор после 401, конверт ответа)
//! остаётся в `http`.

/// Статьи: список, чтение, создание, обновление, удаление.
pub mod articles;
/// Аутентификация: вход, регистрация, верификация, сброс пароля.
pub mod auth;
/// Категории статей.
pub mod categories;
/// Комментарии: дерево, ответы, лайки.
pub mod comments;
/// Теги статей.
pub mod tags;
/// Загрузка файлов.
pub mod upload;
/// Пользователи и профиль.
pub mod users;
