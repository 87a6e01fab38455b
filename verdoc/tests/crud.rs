mod common;

use common::{Droid, Jedi, store};
use serde_json::json;
use verdoc::prelude::*;

#[tokio::test]
async fn insert_assigns_identity_and_keeps_initial_version() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();

    let id = jedi.insert_one(&Jedi::new("Luke", 19, 0)).await.unwrap();

    let found = jedi.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, Some(id));
    assert_eq!(found.name, "Luke");
    assert_eq!(found.age, 19);
    assert_eq!(found.version, 0);
}

#[tokio::test]
async fn client_supplied_identity_is_ignored_on_insert() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();

    let supplied = DocumentId::new();
    let mut document = Jedi::new("Yoda", 534, 0);
    document.id = Some(supplied);

    let assigned = jedi.insert_one(&document).await.unwrap();

    assert_ne!(assigned, supplied);
    assert!(jedi.find_by_id(supplied).await.unwrap().is_none());
    assert!(jedi.find_by_id(assigned).await.unwrap().is_some());
}

#[tokio::test]
async fn find_all_returns_every_document() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();

    jedi.insert_one(&Jedi::new("Luke", 19, 0)).await.unwrap();
    jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    let all = jedi.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn malformed_identity_token_resolves_to_none() {
    // A transport layer maps an unresolvable token straight to "not found";
    // it never reaches the store.
    assert!(DocumentId::resolve("invalid").is_none());

    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    jedi.insert_one(&Jedi::new("Luke", 19, 0)).await.unwrap();

    let found = match DocumentId::resolve("invalid") {
        Some(id) => jedi.find_by_id(id).await.unwrap(),
        None => None,
    };
    assert!(found.is_none());
}

#[tokio::test]
async fn version_defaults_to_zero_in_client_payloads() {
    let payload = Jedi::from_json(json!({ "name": "Luke", "age": 19 })).unwrap();

    assert_eq!(payload.version, 0);
    assert_eq!(payload.id, None);
}

#[tokio::test]
async fn update_with_current_version_advances_version_by_one() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    let outcome = jedi
        .update_one_versioned(id, &Jedi::new("Yoda", 1534, 0))
        .await
        .unwrap();
    assert!(outcome.updated);

    let found = jedi.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.age, 1534);
    assert_eq!(found.version, 1);

    // The refreshed version is the new lock token.
    let outcome = jedi
        .update_one_versioned(id, &Jedi::new("Yoda", 2534, 1))
        .await
        .unwrap();
    assert!(outcome.updated);
    assert_eq!(jedi.find_by_id(id).await.unwrap().unwrap().version, 2);
}

#[tokio::test]
async fn stale_version_is_rejected() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    assert!(
        jedi.update_one_versioned(id, &Jedi::new("Yoda", 1534, 0))
            .await
            .unwrap()
            .updated
    );

    // Replaying the same update with the already-consumed token.
    let stale = jedi
        .update_one_versioned(id, &Jedi::new("Yoda", 1534, 0))
        .await
        .unwrap();
    assert!(!stale.updated);

    // The losing write left no trace.
    let found = jedi.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.age, 1534);
    assert_eq!(found.version, 1);
}

#[tokio::test]
async fn mismatched_version_is_rejected_regardless_of_other_fields() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    let outcome = jedi
        .update_one_versioned(id, &Jedi::new("Yoda", 1534, 999))
        .await
        .unwrap();

    assert!(!outcome.updated);
    assert_eq!(jedi.find_by_id(id).await.unwrap().unwrap().age, 534);
}

#[tokio::test]
async fn update_of_absent_identity_reports_not_updated() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();

    let outcome = jedi
        .update_one_versioned(DocumentId::new(), &Jedi::new("Yoda", 534, 0))
        .await
        .unwrap();

    // Absent identity and version mismatch are deliberately indistinguishable.
    assert!(!outcome.updated);
}

#[tokio::test]
async fn concurrent_updates_with_same_token_admit_exactly_one_winner() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    let first_payload = Jedi::new("Yoda", 600, 0);
    let second_payload = Jedi::new("Yoda", 700, 0);
    let first = jedi.update_one_versioned(id, &first_payload);
    let second = jedi.update_one_versioned(id, &second_payload);

    let (first, second) = futures::join!(first, second);
    let winners = [first.unwrap(), second.unwrap()]
        .iter()
        .filter(|outcome| outcome.updated)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(jedi.find_by_id(id).await.unwrap().unwrap().version, 1);
}

#[tokio::test]
async fn identity_is_unchanged_by_updates() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    // Even an update payload carrying a foreign identity cannot move the
    // document: the identity field is stripped from the update set.
    let mut payload = Jedi::new("Yoda", 1534, 0);
    payload.id = Some(DocumentId::new());

    assert!(jedi.update_one_versioned(id, &payload).await.unwrap().updated);

    let found = jedi.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, Some(id));
}

#[tokio::test]
async fn unversioned_documents_update_on_identity_alone() {
    let store = store();
    let droids = store.ensure_collection::<Droid>().await.unwrap();
    let id = droids.insert_one(&Droid::new("R2-D2")).await.unwrap();

    // No version field, no version check: any update to an existing identity lands.
    assert!(
        droids
            .update_one(id, &Droid::new("R2-D2 (repaired)"))
            .await
            .unwrap()
            .updated
    );
    assert!(
        droids
            .update_one(id, &Droid::new("R2-D2 (repainted)"))
            .await
            .unwrap()
            .updated
    );

    assert!(
        !droids
            .update_one(DocumentId::new(), &Droid::new("C-3PO"))
            .await
            .unwrap()
            .updated
    );
}

#[tokio::test]
async fn delete_reports_count_and_removes_document() {
    let store = store();
    let jedi = store.ensure_collection::<Jedi>().await.unwrap();
    let id = jedi.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    assert_eq!(jedi.delete_one(id).await.unwrap(), 1);
    assert!(jedi.find_by_id(id).await.unwrap().is_none());

    // Deleting an already-absent identity counts zero rather than erroring.
    assert_eq!(jedi.delete_one(id).await.unwrap(), 0);
}
