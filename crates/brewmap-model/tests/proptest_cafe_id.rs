use brewmap_model::CafeId;
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn positive_ids_survive_display_and_parse(raw in 1_i64..=i64::MAX) {
        let id = CafeId::new(raw);
        prop_assert_eq!(CafeId::parse(&id.to_string()).expect("parse"), id);
    }

    #[test]
    fn non_numeric_ids_are_rejected(raw in "[a-zA-Z_\\-\\.]{1,12}") {
        prop_assert!(CafeId::parse(&raw).is_err());
    }
}
