use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиента портала.
pub enum PortalError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (нет токена, либо refresh не помог).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Бизнес-ошибка бэкенда: `message` из конверта ответа.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Токен сессии не разобрался как JWT.
    #[error("malformed session token")]
    MalformedToken,

    /// Конверт ответа пришёл без ожидаемых данных.
    #[error("empty response payload")]
    EmptyPayload,
}

/// Результат операций клиента портала.
pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    /// Сообщение, пригодное для показа пользователю.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(message) => message.clone(),
            Self::Unauthorized => "Требуется авторизация".to_string(),
            Self::NotFound => "Ресурс не найден".to_string(),
            _ => "Что-то пошло не так, попробуйте ещё раз".to_string(),
        }
    }
}
