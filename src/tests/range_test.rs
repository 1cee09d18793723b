//! Tests for the sequential range allocator

#[cfg(test)]
mod tests {
    use crate::error::PortError;
    use crate::range::RangeAllocator;

    #[test]
    fn test_lowest_free_port_first() {
        let range = RangeAllocator::new_from_range(10000, 10010);

        assert_eq!(range.allocate(None).unwrap(), 10000);
        assert_eq!(range.allocate(None).unwrap(), 10001);

        range.release(10000);
        assert_eq!(range.allocate(None).unwrap(), 10000);
        assert_eq!(range.used_count(), 2);
        assert_eq!(range.available_count(), 9);
    }

    #[test]
    fn test_preferred_port() {
        let range = RangeAllocator::new_from_range(10000, 10010);

        assert_eq!(range.allocate(Some(10005)).unwrap(), 10005);
        // taken, falls back to the lowest free one
        assert_eq!(range.allocate(Some(10005)).unwrap(), 10000);
        // out of range, same
        assert_eq!(range.allocate(Some(80)).unwrap(), 10001);
        assert!(range.is_used(10005));
    }

    #[test]
    fn test_exhausted_range() {
        let range = RangeAllocator::new_from_range(20000, 20001);
        range.allocate(None).unwrap();
        range.allocate(None).unwrap();

        let err = range.allocate(None).unwrap_err();
        assert!(matches!(err, PortError::NoAvailablePorts { start: 20000, end: 20001 }));
        assert_eq!(err.to_string(), "no available ports in the range 20000 to 20001");
        assert_eq!(range.available_count(), 0);
    }

    #[test]
    fn test_release_outside_range_ignored() {
        let range = RangeAllocator::default();
        range.allocate(None).unwrap();

        range.release(9999);
        range.release(10000);
        range.release(10000);
        assert_eq!(range.used_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let range = RangeAllocator::new_from_range(30000, 30010);
        let other = range.clone();

        let port = range.allocate(None).unwrap();
        assert!(other.is_used(port));
        assert_eq!(other.allocate(None).unwrap(), port + 1);
    }
}
