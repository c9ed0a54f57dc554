//! Клиент REST-бэкенда новостного портала.
//!
//! Оборачивает каждый исходящий запрос: прикрепляет bearer-токен из
//! хранилища сессии, прозрачно обновляет истёкший токен перед
//! отправкой и ровно один раз повторяет запрос после тихого refresh
//! при ответе 401. Поверх конвейера — типизированные методы по всем
//! ресурсам бэкенда.
#![warn(missing_docs)]

mod error;
mod http;
pub mod resources;
pub mod session;
mod store;

pub use error::{PortalError, PortalResult};
pub use http::PortalClient;
pub use resources::auth::AuthData;
pub use resources::comments::LikeStatus;
pub use store::TokenStore;
