//! Property-based tests for factoring, merging and interpolation.

#[cfg(test)]
mod proptest_tests {
    use crate::factor::{factor_documents, flatten, inflate, intersection, FlatDocument};
    use crate::merge::{merge_documents, Fragment};
    use crate::symbols::SymbolStore;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};
    use std::path::{Path, PathBuf};

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (0i64..4).prop_map(|n| json!(n)),
            "[xy]{0,2}".prop_map(Value::String),
            prop::collection::vec(0i64..3, 0..3).prop_map(|v| json!(v)),
        ]
    }

    /// Small objects over a tiny key alphabet so that documents overlap.
    fn object() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-c]", value(), 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
    }

    fn value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(2, 12, 3, |inner| {
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
        })
    }

    fn documents() -> impl Strategy<Value = Vec<(PathBuf, Value)>> {
        prop::collection::vec(object(), 1..5).prop_map(|docs| {
            docs.into_iter()
                .enumerate()
                .map(|(i, doc)| (PathBuf::from(format!("/in/{i}.json")), doc))
                .collect()
        })
    }

    fn flat(document: &Value) -> FlatDocument {
        flatten(document.as_object().expect("generated documents are objects"))
    }

    proptest! {
        /// Property: inflate undoes flatten
        #[test]
        fn inflate_inverts_flatten(document in object()) {
            prop_assert_eq!(inflate(flat(&document).iter()), document);
        }

        /// Property: merging the common document with a residual reproduces the input
        #[test]
        fn factoring_round_trips(documents in documents()) {
            let factored = factor_documents(&documents).unwrap();
            prop_assert_eq!(factored.residuals.len(), documents.len());
            for ((origin, original), residual) in documents.iter().zip(&factored.residuals) {
                let rebuilt = merge_documents(vec![
                    Fragment::new("/out/common.json", factored.common.clone()),
                    Fragment::new(origin.clone(), residual.clone()),
                ])
                .unwrap();
                prop_assert_eq!(&rebuilt, original);
            }
        }

        /// Property: adding a document never grows the common key set
        #[test]
        fn intersection_is_monotonic(documents in documents(), extra in object()) {
            let mut tables: Vec<FlatDocument> = documents.iter().map(|(_, d)| flat(d)).collect();
            let before = intersection(&tables);
            tables.push(flat(&extra));
            let after = intersection(&tables);
            prop_assert!(after.is_subset(&before));
        }

        /// Property: common values are equal in every input
        #[test]
        fn common_values_are_shared(documents in documents()) {
            let factored = factor_documents(&documents).unwrap();
            let common = flat(&factored.common);
            for (_, document) in &documents {
                let table = flat(document);
                for (key, value) in &common {
                    prop_assert_eq!(table.get(key), Some(value));
                }
            }
        }
    }

    proptest! {
        /// Property: replacement text is never scanned for further placeholders
        #[test]
        fn interpolation_is_single_pass(
            name in "[a-z]{1,6}",
            other in "[A-Z]{1,6}",
            text in "[a-z ]{0,8}",
        ) {
            let symbols = json!({
                name.clone(): format!("${{{}}}", other),
                other.clone(): "expanded",
            });
            let table = SymbolStore::parse(&symbols, Path::new("/s/symbols.json"))
                .unwrap()
                .resolve(None)
                .unwrap();

            let mut document = json!({"v": format!("{}${{{}}}", text, name)});
            let report = table.interpolate(&mut document);
            prop_assert_eq!(document, json!({"v": format!("{}${{{}}}", text, other)}));
            prop_assert_eq!(report.total_replacements(), 1);
        }
    }
}
