use proptest::prelude::*;
use resource_framework::predicate::field;
use resource_framework::{
    record, FieldDescriptor, Predicate, Resolver, SchemaBuilder, StorageBackend, StoreActor,
    StoreConfig, TypeRegistry, Value,
};
use std::collections::BTreeSet;
use std::sync::Arc;

// Boolean laws for AND/OR/NOT, checked by resolving random predicate trees
// through the store actor against one fixed record set.

fn field_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("b")]
}

fn leaf() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (field_name(), 0i64..4).prop_map(|(f, v)| field("Item", f).eq(v)),
        (field_name(), 0i64..4).prop_map(|(f, v)| field("Item", f).ne(v)),
        (field_name(), 0i64..4).prop_map(|(f, v)| field("Item", f).gt(v)),
        (field_name(), 0i64..4).prop_map(|(f, v)| field("Item", f).le(v)),
        (field_name(), prop::collection::vec(0i64..4, 0..3))
            .prop_map(|(f, vs)| field("Item", f).one_of(vs)),
        Just(field("Item", "a").eq(field("Item", "b"))),
    ]
}

fn predicate() -> impl Strategy<Value = Predicate> {
    leaf().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(p, q)| p & q),
            (inner.clone(), inner.clone()).prop_map(|(p, q)| p | q),
            inner.prop_map(|p| !p),
        ]
    })
}

async fn resolver() -> Resolver {
    let registry = TypeRegistry::new();
    registry
        .register(
            SchemaBuilder::new("Item")
                .field(FieldDescriptor::integer("a"))
                .field(FieldDescriptor::integer("b"))
                .build()
                .unwrap(),
        )
        .unwrap();
    let (client, _handle) = StoreActor::spawn(&StoreConfig::default());
    for a in 0..4 {
        for b in 0..4 {
            client.save("Item", record! { "a" => a, "b" => b }).await.unwrap();
        }
    }
    client.save("Item", record! { "a" => 1 }).await.unwrap();
    client.save("Item", record! { "b" => 2 }).await.unwrap();
    Resolver::new(Arc::new(registry), Arc::new(client))
}

async fn ids(resolver: &Resolver, p: &Predicate) -> BTreeSet<i64> {
    resolver
        .resolve(p, false)
        .await
        .unwrap()
        .iter()
        .filter_map(|i| i.id().and_then(Value::as_i64))
        .collect()
}

fn run<T>(f: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn and_or_are_commutative(p in predicate(), q in predicate()) {
        let (pq_and, qp_and, pq_or, qp_or) = run(async {
            let r = resolver().await;
            (
                ids(&r, &(p.clone() & q.clone())).await,
                ids(&r, &(q.clone() & p.clone())).await,
                ids(&r, &(p.clone() | q.clone())).await,
                ids(&r, &(q.clone() | p.clone())).await,
            )
        });
        prop_assert_eq!(pq_and, qp_and);
        prop_assert_eq!(pq_or, qp_or);
    }

    #[test]
    fn and_or_are_associative(p in predicate(), q in predicate(), s in predicate()) {
        let (left_and, right_and, left_or, right_or) = run(async {
            let r = resolver().await;
            (
                ids(&r, &((p.clone() & q.clone()) & s.clone())).await,
                ids(&r, &(p.clone() & (q.clone() & s.clone()))).await,
                ids(&r, &((p.clone() | q.clone()) | s.clone())).await,
                ids(&r, &(p.clone() | (q.clone() | s.clone()))).await,
            )
        });
        prop_assert_eq!(left_and, right_and);
        prop_assert_eq!(left_or, right_or);
    }

    #[test]
    fn results_match_set_algebra(p in predicate(), q in predicate()) {
        let (all, ps, qs, and, or, not_p, de_morgan) = run(async {
            let r = resolver().await;
            let everything = field("Item", "id").ge(0);
            (
                ids(&r, &everything).await,
                ids(&r, &p).await,
                ids(&r, &q).await,
                ids(&r, &(p.clone() & q.clone())).await,
                ids(&r, &(p.clone() | q.clone())).await,
                ids(&r, &!p.clone()).await,
                ids(&r, &(!(p.clone() | q.clone()))).await,
            )
        });
        prop_assert_eq!(and, ps.intersection(&qs).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(or, ps.union(&qs).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(not_p, all.difference(&ps).copied().collect::<BTreeSet<_>>());
        let expected = all
            .difference(&ps.union(&qs).copied().collect())
            .copied()
            .collect::<BTreeSet<_>>();
        prop_assert_eq!(de_morgan, expected);
    }
}
