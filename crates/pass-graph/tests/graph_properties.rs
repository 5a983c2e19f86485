//! Property tests for graph construction, parsing, and checksums

use chrono::{TimeZone, Utc};
use pass_graph::vocab::schema;
use pass_graph::{
    message_slug, AttributeGraph, Checksum, GraphParser, ResourceUrl, SubGraph, SubjectRole,
    TypedValue, ValueType,
};
use proptest::prelude::*;

fn base() -> ResourceUrl {
    ResourceUrl::parse("https://alice.pod.example/PASS/Passport/document.ttl").unwrap()
}

proptest! {
    #[test]
    fn checksum_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(Checksum::compute(&data), Checksum::compute(&data));
    }

    #[test]
    fn checksum_distinguishes_inputs(
        a in proptest::collection::vec(any::<u8>(), 0..64),
        b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(Checksum::compute(&a), Checksum::compute(&b));
    }

    #[test]
    fn triples_regroup_to_same_graph(
        name in "[a-zA-Z0-9 ._-]{1,40}",
        description in ".{0,80}",
        height in any::<i64>(),
    ) {
        let sg = SubGraph::builder(SubjectRole::Document)
            .add_string(schema::NAME, name.clone())
            .add_string(schema::DESCRIPTION, description)
            .add_integer(schema::HEIGHT, height)
            .build()
            .unwrap();
        let graph = AttributeGraph::from_subgraphs([sg]);
        let triples = graph.to_triples(&base());
        prop_assert_eq!(AttributeGraph::from_triples(&triples), graph);

        let doc = GraphParser::new(&triples).role(&SubjectRole::Document).unwrap();
        prop_assert_eq!(doc.string(schema::NAME), Some(name.as_str()));
        prop_assert_eq!(doc.integer(schema::HEIGHT), Some(height));
    }

    #[test]
    fn non_numeric_integers_are_rejected(raw in "[a-zA-Z]{1,12}") {
        prop_assert!(ValueType::Integer.parse(&raw).is_err());
    }

    #[test]
    fn integers_parse_exactly(n in any::<i64>()) {
        prop_assert_eq!(ValueType::Integer.parse(&n.to_string()).unwrap(), TypedValue::Integer(n));
    }

    #[test]
    fn message_slugs_are_path_safe(title in ".{0,60}", secs in 0i64..2_000_000_000) {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        let slug = message_slug(&title, at);
        prop_assert!(slug.ends_with(".ttl"));
        prop_assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
    }
}
