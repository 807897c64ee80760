//! Sorter - stable partition sort by ascending price.
//!
//! Quicksort with the last element as pivot. Each pass splits the input
//! into three runs: strictly cheaper than the pivot, equal to it, and
//! strictly dearer. The equal run keeps input order and ends with the
//! pivot itself (it was last), which makes the sort stable. Only the outer
//! runs are partitioned again.
//!
//! Average O(n log n). Already-sorted input degrades to O(n²) because the
//! last element is always the maximum. Pending runs live on an explicit
//! work stack, so that worst case costs time but never call-stack depth.

use rust_decimal::Decimal;

/// Anything with a price that the sorter can order.
pub trait Priced {
    fn price(&self) -> Decimal;
}

/// Pending work for the partition loop
enum Task<T> {
    /// Partition this run
    Sort(Vec<T>),
    /// Append this run to the output as-is
    Emit(Vec<T>),
}

/// Return a copy of `items` ordered by ascending price.
///
/// Equal prices keep their relative input order.
pub fn sort_by_price<T: Priced + Clone>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    quicksort(items.to_vec(), &mut out);
    out
}

fn quicksort<T: Priced>(items: Vec<T>, out: &mut Vec<T>) {
    let mut work = vec![Task::Sort(items)];

    while let Some(task) = work.pop() {
        let mut items = match task {
            Task::Emit(run) => {
                out.extend(run);
                continue;
            }
            Task::Sort(items) => items,
        };

        let pivot = match items.pop() {
            Some(p) => p,
            None => continue,
        };
        if items.is_empty() {
            out.push(pivot);
            continue;
        }

        let key = pivot.price();
        let mut below = Vec::new();
        let mut equal = Vec::new();
        let mut above = Vec::new();
        for item in items {
            match item.price().cmp(&key) {
                std::cmp::Ordering::Less => below.push(item),
                std::cmp::Ordering::Equal => equal.push(item),
                std::cmp::Ordering::Greater => above.push(item),
            }
        }
        equal.push(pivot);

        // Stack order: below runs first, then equal, then above
        work.push(Task::Sort(above));
        work.push(Task::Emit(equal));
        work.push(Task::Sort(below));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(i64, &'static str);

    impl Priced for Item {
        fn price(&self) -> Decimal {
            Decimal::new(self.0, 2)
        }
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<Item> = Vec::new();
        assert!(sort_by_price(&empty).is_empty());

        let one = vec![Item(500, "tea")];
        assert_eq!(sort_by_price(&one), one);
    }

    #[test]
    fn test_sorts_ascending() {
        let items = vec![Item(10000, "Burger"), Item(50000, "Pizza"), Item(35000, "Pasta")];
        let sorted = sort_by_price(&items);
        let names: Vec<_> = sorted.iter().map(|i| i.1).collect();
        assert_eq!(names, vec!["Burger", "Pasta", "Pizza"]);
    }

    #[test]
    fn test_stable_on_equal_prices() {
        let items = vec![
            Item(200, "a"),
            Item(100, "b"),
            Item(200, "c"),
            Item(100, "d"),
            Item(200, "e"),
        ];
        let names: Vec<_> = sort_by_price(&items).iter().map(|i| i.1).collect();
        assert_eq!(names, vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_all_equal_keeps_order() {
        let items = vec![Item(100, "x"), Item(100, "y"), Item(100, "z")];
        assert_eq!(sort_by_price(&items), items);
    }

    #[test]
    fn test_reverse_sorted_input() {
        let items: Vec<Item> = (0..200).rev().map(|p| Item(p, "r")).collect();
        let sorted = sort_by_price(&items);
        assert!(sorted.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(sorted.len(), 200);
    }

    #[test]
    fn test_long_presorted_input_does_not_overflow() {
        let items: Vec<Item> = (0..10_000).map(|p| Item(p, "s")).collect();
        let sorted = sort_by_price(&items);
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_input_is_untouched() {
        let items = vec![Item(300, "c"), Item(100, "a")];
        let _ = sort_by_price(&items);
        assert_eq!(items[0].1, "c");
    }
}
