// SPDX-License-Identifier: Apache-2.0

use brewmap_model::{CafeId, CafeUpdate, NewCafe};
use brewmap_store::{CafeStore, SqliteCafeStore, StoreErrorCode};
use tempfile::tempdir;

fn mk_cafe(name: &str) -> NewCafe {
    NewCafe {
        name: name.to_string(),
        map_url: "http://x".to_string(),
        img_url: "http://y".to_string(),
        location: "Town".to_string(),
        has_sockets: true,
        has_toilet: true,
        has_wifi: true,
        can_take_calls: false,
        seats: Some("10-20".to_string()),
        coffee_price: Some("$2.50".to_string()),
    }
}

#[test]
fn insert_edit_delete_scenario() {
    let root = tempdir().expect("tempdir");
    let store = SqliteCafeStore::open(&root.path().join("cafes.db")).expect("open store");

    let created = store.insert(mk_cafe("Joe's")).expect("insert");
    let listed = store.list().expect("list");
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(listed[0].name, "Joe's");
    assert_eq!(listed[0].map_url, "http://x");
    assert_eq!(listed[0].img_url, "http://y");
    assert_eq!(listed[0].location, "Town");
    assert!(listed[0].has_sockets && listed[0].has_toilet && listed[0].has_wifi);
    assert!(!listed[0].can_take_calls);
    assert_eq!(listed[0].seats.as_deref(), Some("10-20"));
    assert_eq!(listed[0].coffee_price.as_deref(), Some("$2.50"));

    store
        .update(
            created.id,
            &CafeUpdate {
                has_wifi: Some(false),
                has_sockets: Some(true),
                has_toilet: Some(true),
                coffee_price: Some("$3.00".to_string()),
                seats: Some("5-10".to_string()),
            },
        )
        .expect("update");
    let edited = store.get_by_id(created.id).expect("get after edit");
    assert!(!edited.has_wifi);
    assert_eq!(edited.coffee_price.as_deref(), Some("$3.00"));
    assert_eq!(edited.seats.as_deref(), Some("5-10"));
    assert_eq!(edited.name, "Joe's");

    store.delete(created.id).expect("delete");
    assert!(store.list().expect("list after delete").is_empty());
}

#[test]
fn each_insert_gets_a_fresh_identifier() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let a = store.insert(mk_cafe("A")).expect("insert a");
    let b = store.insert(mk_cafe("B")).expect("insert b");
    assert_ne!(a.id, b.id);
    assert_eq!(store.list().expect("list").len(), 2);
}

#[test]
fn duplicate_name_leaves_a_single_record() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    store.insert(mk_cafe("Joe's")).expect("insert");
    let err = store
        .insert(NewCafe {
            location: "Elsewhere".to_string(),
            ..mk_cafe("Joe's")
        })
        .expect_err("duplicate");
    assert_eq!(err.code, StoreErrorCode::Conflict);

    let listed = store.list().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].location, "Town");
}

#[test]
fn edit_changes_only_mutable_columns() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let before = store.insert(mk_cafe("Joe's")).expect("insert");
    let after = store
        .update(
            before.id,
            &CafeUpdate {
                has_sockets: Some(false),
                has_toilet: Some(false),
                has_wifi: Some(false),
                seats: Some("1".to_string()),
                coffee_price: Some("free".to_string()),
            },
        )
        .expect("update");

    assert_eq!(after.id, before.id);
    assert_eq!(after.name, before.name);
    assert_eq!(after.map_url, before.map_url);
    assert_eq!(after.img_url, before.img_url);
    assert_eq!(after.location, before.location);
    assert_eq!(after.can_take_calls, before.can_take_calls);
    assert!(!after.has_sockets && !after.has_toilet && !after.has_wifi);
}

#[test]
fn partial_update_keeps_absent_fields() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let before = store.insert(mk_cafe("Joe's")).expect("insert");
    let after = store
        .update(
            before.id,
            &CafeUpdate {
                coffee_price: Some("$4.00".to_string()),
                ..CafeUpdate::default()
            },
        )
        .expect("update");
    assert_eq!(after.coffee_price.as_deref(), Some("$4.00"));
    assert_eq!(after.seats, before.seats);
    assert_eq!(after.has_wifi, before.has_wifi);
}

#[test]
fn missing_identifier_is_not_found_without_mutation() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let kept = store.insert(mk_cafe("Joe's")).expect("insert");
    let ghost = CafeId::new(kept.id.get() + 100);

    assert!(store.get_by_id(ghost).expect_err("get").is_not_found());
    assert!(store
        .update(
            ghost,
            &CafeUpdate {
                has_wifi: Some(false),
                ..CafeUpdate::default()
            }
        )
        .expect_err("update")
        .is_not_found());
    assert!(store.delete(ghost).expect_err("delete").is_not_found());

    assert_eq!(store.list().expect("list"), vec![kept]);
}

#[test]
fn deleted_identifier_is_gone() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let cafe = store.insert(mk_cafe("Joe's")).expect("insert");
    store.delete(cafe.id).expect("delete");
    assert!(store.get_by_id(cafe.id).expect_err("get").is_not_found());
    assert!(store.delete(cafe.id).expect_err("second delete").is_not_found());
}

#[test]
fn writes_survive_reopen() {
    let root = tempdir().expect("tempdir");
    let path = root.path().join("cafes.db");
    let id = {
        let store = SqliteCafeStore::open(&path).expect("open store");
        store.insert(mk_cafe("Joe's")).expect("insert").id
    };
    let reopened = SqliteCafeStore::open(&path).expect("reopen store");
    assert_eq!(reopened.path(), Some(path.as_path()));
    assert_eq!(reopened.get_by_id(id).expect("get").name, "Joe's");
    reopened.ping().expect("ping");
}

#[test]
fn deleted_identifiers_are_never_handed_out_again() {
    let store = SqliteCafeStore::open_in_memory().expect("store");
    let a = store.insert(mk_cafe("A")).expect("insert A");
    let b = store.insert(mk_cafe("B")).expect("insert B");
    store.delete(b.id).expect("delete B");
    let c = store.insert(mk_cafe("C")).expect("insert C");

    assert_ne!(c.id, b.id);
    assert_ne!(c.id, a.id);
    assert!(store.get_by_id(b.id).expect_err("deleted id").is_not_found());
    assert!(store.delete(b.id).expect_err("stale delete").is_not_found());
    assert_eq!(store.get_by_id(c.id).expect("C").name, "C");
}

#[test]
fn identifiers_stay_retired_across_reopen() {
    let root = tempdir().expect("tempdir");
    let path = root.path().join("cafes.db");
    let retired = {
        let store = SqliteCafeStore::open(&path).expect("open store");
        let cafe = store.insert(mk_cafe("Gone")).expect("insert");
        store.delete(cafe.id).expect("delete");
        cafe.id
    };
    let reopened = SqliteCafeStore::open(&path).expect("reopen store");
    let fresh = reopened.insert(mk_cafe("Fresh")).expect("insert");
    assert_ne!(fresh.id, retired);
    assert!(reopened.get_by_id(retired).expect_err("retired id").is_not_found());
}
