use poparchive_core::{NodeId, Position};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_position_roundtrip(x in 0..i64::MAX) {
        let p = Position::new_valid(x);
        prop_assert_eq!(i64::from(p), x);
    }
}

proptest! {
    #[test]
    fn test_node_id_roundtrip(x in 0..i32::MAX) {
        let n = NodeId::from(x);
        prop_assert_eq!(n.into_raw(), x);
        prop_assert!(!n.is_null());
    }
}

proptest! {
    #[test]
    fn test_negative_node_id_maps_to_null(x in i32::MIN..0) {
        prop_assert!(NodeId::from(x).is_null());
    }
}
