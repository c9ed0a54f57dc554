use std::sync::{Arc, RwLock};

use portal_api::TokenPair;

#[derive(Debug, Clone, Default)]
/// Хранилище пары токенов сессии: замена cookie-хранилища браузера.
///
/// Пара заменяется целиком при refresh и очищается при выходе.
/// Дешёво клонируется: все клоны разделяют одно состояние.
pub struct TokenStore {
    inner: Arc<RwLock<Option<TokenPair>>>,
}

impl TokenStore {
    /// Пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }

    /// Хранилище с заранее известной парой токенов.
    pub fn with_tokens(pair: TokenPair) -> Self {
        let store = Self::new();
        store.save(pair);
        store
    }

    /// Текущая пара токенов, если сессия есть.
    pub fn load(&self) -> Option<TokenPair> {
        self.inner.read().expect("token store lock poisoned").clone()
    }

    /// Текущий access-токен.
    pub fn access_token(&self) -> Option<String> {
        self.load().map(|pair| pair.access_token)
    }

    /// Заменяет пару токенов целиком.
    pub fn save(&self, pair: TokenPair) {
        *self.inner.write().expect("token store lock poisoned") = Some(pair);
    }

    /// Очищает сессию (выход).
    pub fn clear(&self) {
        *self.inner.write().expect("token store lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn save_replaces_the_pair_wholesale() {
        let store = TokenStore::new();
        assert!(store.load().is_none());

        store.save(pair("a1", "r1"));
        store.save(pair("a2", "r2"));

        let current = store.load().expect("pair present");
        assert_eq!(current.access_token, "a2");
        assert_eq!(current.refresh_token, "r2");
    }

    #[test]
    fn clones_share_state() {
        let store = TokenStore::new();
        let clone = store.clone();

        store.save(pair("a", "r"));
        assert_eq!(clone.access_token().as_deref(), Some("a"));

        clone.clear();
        assert!(store.load().is_none());
    }
}
