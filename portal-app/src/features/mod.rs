//! Тонкие модули по сущностям: валидация формы, нужный ключ кэша и
//! текст тоста. Вся механика — в [`crate::hooks`]; здесь намеренно
//! нет ветвлений сложнее проверки входных данных.

pub mod articles;
pub mod categories;
pub mod tags;
pub mod users;
