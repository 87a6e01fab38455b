mod common;

use common::{Jedi, store};
use verdoc::prelude::*;

#[tokio::test]
async fn seed_runs_exactly_once_across_repeated_bootstraps() {
    let store = store();

    for _ in 0..2 {
        store
            .ensure_collection_seeded::<Jedi, _, _>(|jedi| async move {
                jedi.insert_one(&Jedi::new("Luke", 19, 0)).await?;
                Ok(())
            })
            .await
            .unwrap();
    }

    let all = store.typed_collection::<Jedi>().find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Luke");
    assert_eq!(all[0].age, 19);
}

#[tokio::test]
async fn ensure_collection_is_idempotent() {
    let store = store();

    store.ensure_collection::<Jedi>().await.unwrap();
    store.ensure_collection::<Jedi>().await.unwrap();

    let names = store.list_collections().await.unwrap();
    assert_eq!(names, vec!["jedi".to_string()]);
}

#[tokio::test]
async fn bootstrap_returns_handle_to_existing_collection() {
    let store = store();

    let first = store.ensure_collection::<Jedi>().await.unwrap();
    let id = first.insert_one(&Jedi::new("Yoda", 534, 0)).await.unwrap();

    // A later bootstrap of the same name hands back the same collection.
    let second = store.ensure_collection::<Jedi>().await.unwrap();
    assert!(second.find_by_id(id).await.unwrap().is_some());
}

#[tokio::test]
async fn failed_seed_propagates_and_leaves_collection_behind() {
    let store = store();

    let result = store
        .ensure_collection_seeded::<Jedi, _, _>(|_jedi| async move {
            Err(DocumentStoreError::Backend("seed failed".to_string()))
        })
        .await;
    assert!(result.is_err());

    // No rollback of the created collection: a later bootstrap sees it
    // existing and skips its seed.
    assert!(store.collection_exists("jedi").await.unwrap());

    store
        .ensure_collection_seeded::<Jedi, _, _>(|jedi| async move {
            jedi.insert_one(&Jedi::new("Luke", 19, 0)).await?;
            Ok(())
        })
        .await
        .unwrap();

    let all = store.typed_collection::<Jedi>().find_all().await.unwrap();
    assert!(all.is_empty());
}
