//! Поверхность уведомлений (тосты).
//!
//! Хуки и подсистема комментариев не знают, как выглядит тост: они
//! говорят с трейтом. По умолчанию события уходят в `tracing`, в
//! тестах — в записывающую реализацию.

use std::sync::{Arc, Mutex};

use tracing::{error, info};

/// Получатель пользовательских уведомлений.
pub trait Notifier: Send + Sync {
    /// Операция началась и может занять время.
    fn loading(&self, message: &str);
    /// Операция завершилась успешно.
    fn success(&self, message: &str);
    /// Операция провалилась; `message` пригоден для показа пользователю.
    fn error(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
/// Уведомления в лог: реализация по умолчанию для окружений без UI.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&self, message: &str) {
        info!(kind = "loading", "{message}");
    }

    fn success(&self, message: &str) {
        info!(kind = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!(kind = "error", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Вид записанного уведомления.
pub enum ToastKind {
    /// Индикатор загрузки.
    Loading,
    /// Успех.
    Success,
    /// Ошибка.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Записанное уведомление: вид плюс текст.
pub struct ToastEvent {
    /// Вид уведомления.
    pub kind: ToastKind,
    /// Текст уведомления.
    pub message: String,
}

#[derive(Debug, Default, Clone)]
/// Накапливает уведомления в памяти. Используется тестами, чтобы
/// проверять, какие тосты увидел бы пользователь.
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<ToastEvent>>>,
}

impl RecordingNotifier {
    /// Пустой рекордер.
    pub fn new() -> Self {
        Self::default()
    }

    /// Все записанные события по порядку.
    pub fn events(&self) -> Vec<ToastEvent> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    /// Тексты ошибок по порядку.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == ToastKind::Error)
            .map(|event| event.message)
            .collect()
    }

    /// Тексты успехов по порядку.
    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == ToastKind::Success)
            .map(|event| event.message)
            .collect()
    }

    fn record(&self, kind: ToastKind, message: &str) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(ToastEvent {
                kind,
                message: message.to_string(),
            });
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, message: &str) {
        self.record(ToastKind::Loading, message);
    }

    fn success(&self, message: &str) {
        self.record(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.record(ToastKind::Error, message);
    }
}
