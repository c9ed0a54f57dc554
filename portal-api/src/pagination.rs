use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Метаданные пагинации в том виде, в каком их отдаёт бэкенд
/// (включая имя `itemPerPages`).
pub struct PageMeta {
    /// Всего элементов во всей выборке.
    pub total_items: u64,
    /// Элементов на текущей странице.
    pub item_count: u64,
    /// Размер страницы.
    #[serde(rename = "itemPerPages")]
    pub item_per_pages: u64,
    /// Всего страниц.
    pub total_pages: u64,
    /// Номер текущей страницы (с единицы).
    pub current_page: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Страница коллекции: элементы плюс метаданные.
pub struct Paginated<T> {
    /// Элементы страницы в порядке выдачи.
    pub items: Vec<T>,
    /// Метаданные пагинации.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Пустая страница с заданным размером.
    pub fn empty(item_per_pages: u64) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta {
                total_items: 0,
                item_count: 0,
                item_per_pages,
                total_pages: 0,
                current_page: 1,
            },
        }
    }

    /// Вставляет элемент в начало страницы, синхронно увеличивая
    /// счётчики. Инвариант: `total_items`/`item_count` меняются в ногу
    /// с `items`, чтобы отображаемые числа не расходились со списком.
    pub fn push_front(&mut self, item: T) {
        self.items.insert(0, item);
        self.meta.item_count += 1;
        self.meta.total_items += 1;
    }

    /// Добавляет элемент в конец страницы, синхронно увеличивая счётчики.
    pub fn push_back(&mut self, item: T) {
        self.items.push(item);
        self.meta.item_count += 1;
        self.meta.total_items += 1;
    }

    /// Удаляет первый элемент, для которого `matches` истинно,
    /// синхронно уменьшая счётчики. Возвращает удалённый элемент.
    pub fn remove_where(&mut self, matches: impl Fn(&T) -> bool) -> Option<T> {
        let position = self.items.iter().position(|item| matches(item))?;
        let removed = self.items.remove(position);
        self.meta.item_count = self.meta.item_count.saturating_sub(1);
        self.meta.total_items = self.meta.total_items.saturating_sub(1);
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(items: Vec<i64>) -> Paginated<i64> {
        let count = items.len() as u64;
        Paginated {
            items,
            meta: PageMeta {
                total_items: count,
                item_count: count,
                item_per_pages: 10,
                total_pages: 1,
                current_page: 1,
            },
        }
    }

    #[test]
    fn meta_uses_backend_wire_names() {
        let raw = r#"{"totalItems":5,"itemCount":2,"itemPerPages":2,"totalPages":3,"currentPage":1}"#;
        let meta: PageMeta = serde_json::from_str(raw).expect("parse meta");
        assert_eq!(meta.item_per_pages, 2);
        assert_eq!(serde_json::to_string(&meta).expect("serialize meta"), raw);
    }

    #[test]
    fn push_front_keeps_counters_in_lockstep() {
        let mut page = page_of(vec![2, 3]);
        page.push_front(1);

        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.meta.item_count, 3);
        assert_eq!(page.meta.total_items, 3);
    }

    #[test]
    fn remove_where_decrements_counters_once() {
        let mut page = page_of(vec![1, 2, 3]);
        let removed = page.remove_where(|item| *item == 2);

        assert_eq!(removed, Some(2));
        assert_eq!(page.items, vec![1, 3]);
        assert_eq!(page.meta.item_count, 2);
        assert_eq!(page.meta.total_items, 2);
    }

    #[test]
    fn remove_where_is_noop_for_missing_item() {
        let mut page = page_of(vec![1]);
        assert!(page.remove_where(|item| *item == 9).is_none());
        assert_eq!(page.meta.total_items, 1);
    }
}
