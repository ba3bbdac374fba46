use json_catalog::{
    Broadcaster, CollectionStore, Error, Event, NewProduct, Product, ProductManager, ProductPatch,
};
use std::path::Path;
use std::sync::Arc;

fn manager(path: &Path) -> ProductManager {
    ProductManager::new(CollectionStore::<Product>::open(path))
}

fn input(code: &str) -> NewProduct {
    NewProduct {
        title: Some("A".into()),
        description: Some("d".into()),
        price: Some(10.0),
        thumbnail: Some("t".into()),
        code: Some(code.into()),
        stock: Some(5),
    }
}

// ---- create -----------------------------------------------------------------

#[test]
fn create_on_empty_collection_assigns_id_1() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));

    let p = products.create(input("c1")).unwrap();
    assert_eq!(p.id, 1);
    assert_eq!(p.title, "A");
    assert_eq!(p.price, 10.0);
    assert_eq!(p.stock, 5);
}

#[test]
fn duplicate_code_is_rejected_and_list_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));

    products.create(input("c1")).unwrap();
    let err = products.create(input("c1")).unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateKey {
            field: "code",
            value: "c1".into()
        }
    );
    assert_eq!(products.list(None).len(), 1);
}

#[test]
fn ids_follow_previous_max() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    {
        let products = manager(&path);
        for i in 0..3 {
            products.create(input(&format!("c{i}"))).unwrap();
        }
    }
    let products = manager(&path);
    assert_eq!(products.store().next_id(), Some(4));
    assert_eq!(products.create(input("new")).unwrap().id, 4);
}

#[test]
fn ids_continue_past_hand_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(
        &path,
        r#"[{"id":12,"title":"x","description":"x","price":1,"thumbnail":"x","code":"x","stock":1},
            {"id":3,"title":"y","description":"y","price":1,"thumbnail":"y","code":"y","stock":1}]"#,
    )
    .unwrap();

    let products = manager(&path);
    assert_eq!(products.create(input("z")).unwrap().id, 13);
}

#[test]
fn missing_fields_are_rejected_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    products.create(input("c1")).unwrap();
    let before = std::fs::read(&path).unwrap();

    let cases = [
        NewProduct { title: None, ..input("a") },
        NewProduct { description: Some(String::new()), ..input("b") },
        NewProduct { price: None, ..input("c") },
        NewProduct { thumbnail: Some(String::new()), ..input("d") },
        NewProduct { code: None, ..input("e") },
        NewProduct { stock: None, ..input("f") },
    ];
    for case in cases {
        let err = products.create(case).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
    }

    assert_eq!(products.list(None).len(), 1);
    assert_eq!(products.store().next_id(), Some(2));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn zero_price_and_zero_stock_count_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));

    let err = products
        .create(NewProduct {
            price: Some(0.0),
            stock: Some(0),
            ..input("c1")
        })
        .unwrap_err();
    assert_eq!(
        err,
        Error::Validation {
            missing: vec!["price", "stock"]
        }
    );
    assert!(products.list(None).is_empty());
}

#[test]
fn create_persists_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    products.create(input("c1")).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'));
    let on_disk: Vec<Product> = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk, products.list(None));
}

// ---- list -------------------------------------------------------------------

#[test]
fn list_respects_positive_limit_only() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    for i in 0..5 {
        products.create(input(&format!("c{i}"))).unwrap();
    }

    let first_two: Vec<u64> = products.list(Some(2)).iter().map(|p| p.id).collect();
    assert_eq!(first_two, vec![1, 2]);
    assert_eq!(products.list(Some(0)).len(), 5);
    assert_eq!(products.list(Some(-3)).len(), 5);
    assert_eq!(products.list(Some(50)).len(), 5);
    assert_eq!(products.list(None).len(), 5);
}

// ---- get --------------------------------------------------------------------

#[test]
fn get_returns_owned_copy() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    let created = products.create(input("c1")).unwrap();

    let mut copy = products.get(created.id).unwrap();
    copy.code = "hijacked".into();
    copy.id = 77;
    assert_eq!(products.get(created.id).unwrap(), created);
}

#[test]
fn get_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    assert_eq!(
        products.get(9).unwrap_err(),
        Error::NotFound {
            collection: "product",
            id: 9
        }
    );
}

// ---- update -----------------------------------------------------------------

#[test]
fn update_merges_and_keeps_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    products.create(input("c1")).unwrap();

    let updated = products
        .update(
            1,
            ProductPatch {
                id: Some(500),
                title: Some("B".into()),
                stock: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.title, "B");
    assert_eq!(updated.stock, 0);
    assert_eq!(updated.code, "c1");

    assert!(products.get(500).is_err());
    let reopened = manager(&path);
    assert_eq!(reopened.get(1).unwrap(), updated);
}

#[test]
fn update_from_json_body_ignores_id() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    products.create(input("c1")).unwrap();

    let patch: ProductPatch = serde_json::from_str(r#"{"id": 2, "price": 12.5}"#).unwrap();
    let updated = products.update(1, patch).unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.price, 12.5);
}

#[test]
fn update_does_not_revalidate_values() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    products.create(input("c1")).unwrap();

    let updated = products
        .update(
            1,
            ProductPatch {
                title: Some(String::new()),
                price: Some(0.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "");
    assert_eq!(updated.price, 0.0);
}

#[test]
fn update_to_taken_code_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    products.create(input("c1")).unwrap();
    products.create(input("c2")).unwrap();

    let err = products
        .update(
            2,
            ProductPatch {
                code: Some("c1".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { .. }));
    assert_eq!(products.get(2).unwrap().code, "c2");

    // keeping your own code is fine
    products
        .update(
            2,
            ProductPatch {
                code: Some("c2".into()),
                ..Default::default()
            },
        )
        .unwrap();
}

#[test]
fn update_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    let err = products.update(3, ProductPatch::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound { id: 3, .. }));
}

// ---- delete -----------------------------------------------------------------

#[test]
fn delete_then_get_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    products.create(input("c1")).unwrap();

    let removed = products.delete(1).unwrap();
    assert_eq!(removed.code, "c1");
    assert!(matches!(products.get(1), Err(Error::NotFound { id: 1, .. })));
    assert!(matches!(products.delete(1), Err(Error::NotFound { id: 1, .. })));
}

#[test]
fn delete_keeps_order_and_never_reuses_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    for i in 0..4 {
        products.create(input(&format!("c{i}"))).unwrap();
    }

    products.delete(2).unwrap();
    products.delete(4).unwrap();
    let ids: Vec<u64> = products.list(None).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(products.create(input("again")).unwrap().id, 5);

    let on_disk: Vec<Product> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let ids: Vec<u64> = on_disk.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 5]);
}

#[test]
fn deleted_code_can_be_reused() {
    let dir = tempfile::tempdir().unwrap();
    let products = manager(&dir.path().join("products.json"));
    products.create(input("c1")).unwrap();
    products.delete(1).unwrap();
    assert_eq!(products.create(input("c1")).unwrap().id, 2);
}

// ---- notifications ----------------------------------------------------------

#[test]
fn creates_and_deletes_are_published_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let hub = Arc::new(Broadcaster::new());
    let events = hub.subscribe();
    let products = manager(&dir.path().join("products.json")).with_publisher(hub.clone());

    let created = products.create(input("c1")).unwrap();
    products.update(1, ProductPatch::default()).unwrap();
    products.delete(1).unwrap();

    assert_eq!(events.try_recv().unwrap(), Event::ProductAdded(created));
    assert_eq!(events.try_recv().unwrap(), Event::ProductDeleted { id: 1 });
    assert!(events.try_recv().is_err());
}

#[test]
fn failed_operations_publish_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let hub = Arc::new(Broadcaster::new());
    let events = hub.subscribe();
    let products = manager(&dir.path().join("products.json")).with_publisher(hub.clone());

    products.create(input("c1")).unwrap();
    let _ = events.try_recv();

    assert!(products.create(input("c1")).is_err());
    assert!(products.create(NewProduct::default()).is_err());
    assert!(products.delete(42).is_err());
    assert!(events.try_recv().is_err());
}

#[test]
fn gone_listener_does_not_undo_create() {
    let dir = tempfile::tempdir().unwrap();
    let hub = Arc::new(Broadcaster::new());
    drop(hub.subscribe());
    let products = manager(&dir.path().join("products.json")).with_publisher(hub.clone());

    products.create(input("c1")).unwrap();
    assert_eq!(products.list(None).len(), 1);
    assert_eq!(hub.listener_count(), 0);
}

// ---- non-finite prices ------------------------------------------------------

#[test]
fn infinite_price_is_refused_and_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    products.create(input("c1")).unwrap();
    products.create(input("c2")).unwrap();

    for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let err = products
            .create(NewProduct {
                price: Some(price),
                ..input("c3")
            })
            .unwrap_err();
        assert_eq!(
            err,
            Error::Validation {
                missing: vec!["price"]
            }
        );
    }

    let reopened = manager(&path);
    assert_eq!(reopened.list(None).len(), 2);
}

#[test]
fn non_finite_price_patch_is_refused_and_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let products = manager(&path);
    for i in 0..3 {
        products.create(input(&format!("c{i}"))).unwrap();
    }

    for price in [f64::NAN, f64::INFINITY] {
        let err = products
            .update(
                1,
                ProductPatch {
                    price: Some(price),
                    title: Some("B".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
    }
    assert_eq!(products.get(1).unwrap().price, 10.0);
    assert_eq!(products.get(1).unwrap().title, "A");

    let reopened = manager(&path);
    assert_eq!(reopened.list(None).len(), 3);
}
