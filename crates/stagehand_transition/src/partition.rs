//! Stable / entering / exiting classification

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Children of one container split by what happened to them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition<E> {
    /// Present before, not marked for removal
    pub stable: Vec<E>,
    /// Present now, absent before
    pub entering: Vec<E>,
    /// Present before, marked for removal
    pub exiting: Vec<E>,
}

impl<E: Clone + Eq + Hash> Partition<E> {
    /// Split `previous` and `current` children by identity.
    pub fn classify(previous: &[E], current: &[E], is_removing: impl Fn(&E) -> bool) -> Self {
        let before: FxHashSet<&E> = previous.iter().collect();

        let (exiting, stable): (Vec<E>, Vec<E>) =
            previous.iter().cloned().partition(|e| is_removing(e));
        let entering: Vec<E> = current
            .iter()
            .filter(|e| !before.contains(e))
            .cloned()
            .collect();

        Self {
            stable,
            entering,
            exiting,
        }
    }

    /// Nothing entered or left
    pub fn is_settled(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let previous = [1, 2, 3, 4];
        let current = [1, 5, 3, 4, 6];
        let removing = [2, 4];

        let p = Partition::classify(&previous, &current, |e| removing.contains(e));

        assert_eq!(p.stable, vec![1, 3]);
        assert_eq!(p.entering, vec![5, 6]);
        assert_eq!(p.exiting, vec![2, 4]);

        let mut all: Vec<i32> = p
            .stable
            .iter()
            .chain(&p.entering)
            .chain(&p.exiting)
            .copied()
            .collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_children() {
        let p: Partition<u8> = Partition::classify(&[], &[], |_| false);
        assert!(p.stable.is_empty());
        assert!(p.is_settled());
    }

    #[test]
    fn test_exiting_keeps_document_order() {
        let p = Partition::classify(&[9, 3, 7], &[9, 3, 7], |_| true);
        assert_eq!(p.exiting, vec![9, 3, 7]);
        assert!(p.stable.is_empty());
        assert!(p.entering.is_empty());
    }
}
