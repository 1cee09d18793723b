//! Tests for the reservation set

#[cfg(test)]
mod tests {
    use crate::reservation::ReservationSet;

    #[test]
    fn test_new_set_is_empty() {
        let set = ReservationSet::new();

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(8080));
    }

    #[test]
    fn test_add_all_and_remove() {
        let set = ReservationSet::new();
        set.add_all(vec![9000, 9001, 9002]);

        assert_eq!(set.len(), 3);
        assert!(set.contains(9001));

        assert!(set.remove(9001));
        assert!(!set.contains(9001));
        assert_eq!(set.snapshot(), vec![9000, 9002]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let set = ReservationSet::new();
        set.add_all([9000]);

        assert!(set.remove(9000));
        assert!(!set.remove(9000));
        assert!(!set.remove(1));
        assert!(set.is_empty());
    }
}
