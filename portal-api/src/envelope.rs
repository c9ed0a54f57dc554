use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Единый конверт ответов бэкенда: `{statusCode, success, message, data}`.
pub struct ApiResponse<T> {
    /// HTTP-статус, продублированный в теле.
    pub status_code: u16,
    /// Признак успеха.
    pub success: bool,
    /// Сообщение для пользователя (в т.ч. бизнес-ошибки).
    pub message: String,
    /// Полезная нагрузка; отсутствует при ошибке. Пропущенное поле
    /// читается как `None` без требования `T: Default`.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Успешный ответ с данными.
    pub fn ok(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code,
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Ответ-ошибка без данных.
    pub fn err(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
