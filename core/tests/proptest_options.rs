use datasets_core::{DatasetsClient, GetDatasetsOptions, ListDatasetsParams, NAME_CONTAINS};
use proptest::prelude::*;

fn arb_options() -> impl Strategy<Value = GetDatasetsOptions> {
    (
        proptest::option::of(0u32..500),
        proptest::option::of(0u32..500),
        proptest::option::of("[a-z_]{0,12}"),
        any::<bool>(),
        proptest::option::of(".{0,24}"),
    )
        .prop_map(|(limit, offset, sort_by, sort_desc, query)| GetDatasetsOptions {
            limit,
            offset,
            sort_by,
            sort_desc,
            query,
        })
}

proptest! {
    #[test]
    fn order_suffix_follows_direction_flag(options in arb_options()) {
        let params = ListDatasetsParams::from(&options);
        match options.sort_by.as_deref() {
            Some(field) if !field.is_empty() => {
                let suffix = if options.sort_desc { "-dsc" } else { "-asc" };
                prop_assert_eq!(params.order, Some(format!("{field}{suffix}")));
            }
            _ => prop_assert!(params.order.is_none()),
        }
    }

    #[test]
    fn zero_paging_values_are_never_sent(options in arb_options()) {
        let params = ListDatasetsParams::from(&options);
        prop_assert_eq!(params.limit, options.limit.filter(|&n| n != 0));
        prop_assert_eq!(params.offset, options.offset.filter(|&n| n != 0));
        prop_assert_ne!(params.limit, Some(0));
        prop_assert_ne!(params.offset, Some(0));
    }

    #[test]
    fn query_is_always_a_paired_filter(options in arb_options()) {
        let params = ListDatasetsParams::from(&options);
        prop_assert_eq!(params.q.len(), params.qv.len());
        match options.query.as_deref() {
            Some(query) if !query.is_empty() => {
                prop_assert_eq!(params.q, vec![NAME_CONTAINS.to_string()]);
                prop_assert_eq!(params.qv, vec![query.to_string()]);
            }
            _ => prop_assert!(params.q.is_empty()),
        }
    }

    #[test]
    fn composite_link_is_template_verbatim(id in "[0-9a-f]{16}", path in "[a-zA-Z0-9_./ -]{1,32}") {
        let client = DatasetsClient::new("http://localhost:8080").unwrap();
        prop_assert_eq!(
            client.composite_dataset_link(&id, &path),
            format!("/api/datasets/{id}/display?filename={path}")
        );
    }
}
