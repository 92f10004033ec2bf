use crate::domain::model::{Ordered, PositionWrite};
use crate::utils::error::{CmsError, Result};
use std::collections::HashSet;

/// Moves the element at `from` to `to`, shifting everything in between by one.
///
/// Both indices must already be checked against `items.len()`.
pub fn move_element<T>(items: &mut [T], from: usize, to: usize) {
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
}

/// Client-side sequence of records ordered by `display_order`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Ordered> OrderedList<T> {
    /// Sorts rows ascending by `display_order`; equal positions keep their read order.
    pub fn from_rows(mut items: Vec<T>) -> Self {
        items.sort_by_key(|item| item.display_order());
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id().to_string()).collect()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Single-element move. Returns `false` when the indices are equal and nothing changed.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(CmsError::InvalidIndex { index, len });
            }
        }

        if from == to {
            return Ok(false);
        }

        move_element(&mut self.items, from, to);
        self.renumber();
        Ok(true)
    }

    /// Rearranges the list to match `ids`, which must name every current item exactly once.
    pub fn apply_id_order<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<bool> {
        if ids.len() != self.items.len() {
            return Err(CmsError::NotAPermutation {
                message: format!("expected {} ids, got {}", self.items.len(), ids.len()),
            });
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let mut positions = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(CmsError::NotAPermutation {
                    message: format!("duplicate id '{}'", id),
                });
            }
            let position = self.position_of(id).ok_or_else(|| CmsError::NotAPermutation {
                message: format!("unknown id '{}'", id),
            })?;
            positions.push(position);
        }

        if positions.iter().enumerate().all(|(i, p)| i == *p) {
            return Ok(false);
        }

        let mut slots: Vec<Option<T>> = self.items.drain(..).map(Some).collect();
        self.items = positions
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect();
        self.renumber();
        Ok(true)
    }

    /// One write per item assigning its current zero-based position.
    pub fn position_writes(&self) -> Vec<PositionWrite> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| PositionWrite {
                id: item.id().to_string(),
                display_order: index as i64,
            })
            .collect()
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_display_order(index as i64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        order: i64,
    }

    impl Ordered for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_order(&self) -> i64 {
            self.order
        }

        fn set_display_order(&mut self, order: i64) {
            self.order = order;
        }
    }

    fn list(ids: &[&str]) -> OrderedList<Item> {
        OrderedList::from_rows(
            ids.iter()
                .enumerate()
                .map(|(i, id)| Item {
                    id: id.to_string(),
                    order: i as i64,
                })
                .collect(),
        )
    }

    #[test]
    fn test_from_rows_sorts_ascending_and_keeps_ties_in_read_order() {
        let rows = vec![
            Item { id: "c".to_string(), order: 7 },
            Item { id: "a".to_string(), order: 2 },
            Item { id: "b".to_string(), order: 2 },
        ];
        let list = OrderedList::from_rows(rows);
        assert_eq!(list.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_matches_remove_then_insert_for_every_index_pair() {
        let ids = ["a", "b", "c", "d", "e"];
        for from in 0..ids.len() {
            for to in 0..ids.len() {
                let mut expected: Vec<&str> = ids.to_vec();
                let moved = expected.remove(from);
                expected.insert(to, moved);

                let mut actual = list(&ids);
                let changed = actual.move_item(from, to).unwrap();

                assert_eq!(changed, from != to);
                assert_eq!(actual.ids(), expected, "move {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_move_to_same_index_is_a_no_op() {
        let mut l = list(&["p1", "p2", "p3"]);
        let before = l.clone();
        assert!(!l.move_item(1, 1).unwrap());
        assert_eq!(l, before);
    }

    #[test]
    fn test_drag_last_to_front() {
        let mut l = list(&["p1", "p2", "p3"]);
        l.move_item(2, 0).unwrap();
        assert_eq!(l.ids(), vec!["p3", "p1", "p2"]);

        let writes = l.position_writes();
        assert_eq!(writes[0], PositionWrite { id: "p3".to_string(), display_order: 0 });
        assert_eq!(writes[1], PositionWrite { id: "p1".to_string(), display_order: 1 });
        assert_eq!(writes[2], PositionWrite { id: "p2".to_string(), display_order: 2 });
    }

    #[test]
    fn test_adjacent_move_is_not_a_swap_of_distant_items() {
        let mut l = list(&["p1", "p2", "p3"]);
        l.move_item(0, 1).unwrap();
        assert_eq!(l.ids(), vec!["p2", "p1", "p3"]);
        assert_eq!(
            l.items().iter().map(|i| i.order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_out_of_range_index_is_rejected_without_change() {
        let mut l = list(&["p1", "p2"]);
        let err = l.move_item(0, 2).unwrap_err();
        assert!(matches!(err, CmsError::InvalidIndex { index: 2, len: 2 }));
        assert_eq!(l.ids(), vec!["p1", "p2"]);
    }

    #[test]
    fn test_apply_id_order() {
        let mut l = list(&["p1", "p2", "p3"]);
        assert!(l.apply_id_order(&["p3", "p1", "p2"]).unwrap());
        assert_eq!(l.ids(), vec!["p3", "p1", "p2"]);
        assert!(!l.apply_id_order(&["p3", "p1", "p2"]).unwrap());
    }

    #[test]
    fn test_apply_id_order_rejects_non_permutations() {
        let mut l = list(&["p1", "p2", "p3"]);
        assert!(l.apply_id_order(&["p1", "p2"]).is_err());
        assert!(l.apply_id_order(&["p1", "p1", "p2"]).is_err());
        assert!(l.apply_id_order(&["p1", "p2", "p9"]).is_err());
        assert_eq!(l.ids(), vec!["p1", "p2", "p3"]);
    }
}
