use crate::models::{Item, ShoppingList, TaskList};

/// Anything with a title and a sequence of checkable items.
pub trait Checklist {
    fn title(&self) -> &str;
    fn items(&self) -> &[Item];
}

impl Checklist for TaskList {
    fn title(&self) -> &str {
        &self.title
    }

    fn items(&self) -> &[Item] {
        &self.items
    }
}

impl Checklist for ShoppingList {
    fn title(&self) -> &str {
        &self.title
    }

    fn items(&self) -> &[Item] {
        &self.items
    }
}

pub fn unchecked_count<L: Checklist + ?Sized>(list: &L) -> usize {
    list.items().iter().filter(|i| !i.is_checked).count()
}

pub fn checked_count<L: Checklist + ?Sized>(list: &L) -> usize {
    list.items().iter().filter(|i| i.is_checked).count()
}

/// Unchecked items across all lists (items to buy, tasks due).
pub fn total_unchecked<L: Checklist>(lists: &[L]) -> usize {
    lists.iter().map(|l| unchecked_count(l)).sum()
}

/// The first list, in the given order, that still has something left to do.
pub fn first_list_with_unchecked<L: Checklist>(lists: &[L]) -> Option<&L> {
    lists.iter().find(|l| unchecked_count(*l) > 0)
}

/// Fraction of all items that are checked, in `[0, 1]`.
///
/// Returns `0.0` when there are no items at all.
pub fn progress_ratio<L: Checklist>(lists: &[L]) -> f64 {
    let total: usize = lists.iter().map(|l| l.items().len()).sum();
    if total == 0 {
        return 0.0;
    }
    let checked: usize = lists.iter().map(|l| checked_count(l)).sum();
    checked as f64 / total as f64
}

/// Figures for a dashboard card summarising a group of lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSummary {
    pub first_list_name: String,
    pub first_list_items_left: usize,
    pub active_lists_count: usize,
    pub total_items: usize,
    pub unchecked_items: usize,
}

pub fn summarize<L: Checklist>(lists: &[L]) -> ListSummary {
    let first = first_list_with_unchecked(lists);
    ListSummary {
        first_list_name: first.map(|l| l.title().to_string()).unwrap_or_default(),
        first_list_items_left: first.map(|l| unchecked_count(l)).unwrap_or(0),
        active_lists_count: lists.len(),
        total_items: lists.iter().map(|l| l.items().len()).sum(),
        unchecked_items: total_unchecked(lists),
    }
}
