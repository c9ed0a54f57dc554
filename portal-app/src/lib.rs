//! Ядро клиентского приложения новостного портала.
//!
//! Слой между HTTP-клиентом и интерфейсом: маршрутный гард по роли и
//! подтверждению email, явный кэш-сервис с закрытым перечислением
//! ключей, универсальные хуки загрузки и мутаций с тостами и
//! инвалидацией, оптимистичная подсистема комментариев и тонкие
//! модули по сущностям.
#![warn(missing_docs)]

pub mod cache;
pub mod comments;
pub mod features;
pub mod guard;
pub mod hooks;
pub mod notify;

pub use cache::{CacheKey, CacheService};
pub use comments::{CommentSync, CommentSyncError, CommentsApi};
pub use hooks::Hooks;
pub use notify::{Notifier, TracingNotifier};
