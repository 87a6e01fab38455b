mod common;

use common::{Place, store};
use verdoc::memory::InMemoryStore;
use verdoc::prelude::*;

async fn bootstrap_places(store: &DocumentStore<InMemoryStore>) -> TypedCollection<'_, InMemoryStore, Place> {
    store
        .ensure_collection_seeded::<Place, _, _>(|places| async move {
            places.add_index("location", IndexKind::Geo2dSphere).await?;
            places
                .insert_many(&[
                    Place::park("Central Park", -73.97, 40.77),
                    Place::park("Sara D. Roosevelt Park", -73.9928, 40.7193),
                    Place::park("Polo Grounds", -73.9375, 40.8303),
                ])
                .await?;
            Ok(())
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn near_returns_only_places_within_distance() {
    let store = store();
    let places = bootstrap_places(&store).await;

    let nearby = places
        .query(
            Query::builder()
                .filter(Filter::near("location", GeoPoint::new(-73.9667, 40.78), 5_000.0))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].name, "Central Park");
}

#[tokio::test]
async fn near_with_tight_radius_matches_nothing() {
    let store = store();
    let places = bootstrap_places(&store).await;

    let nearby = places
        .query(
            Query::builder()
                .filter(Filter::near("location", GeoPoint::new(-73.9667, 40.78), 100.0))
                .build(),
        )
        .await
        .unwrap();

    assert!(nearby.is_empty());
}

#[tokio::test]
async fn seed_creates_index_and_rows_exactly_once() {
    let store = store();

    bootstrap_places(&store).await;
    let places = bootstrap_places(&store).await;

    assert_eq!(places.find_all().await.unwrap().len(), 3);
    assert_eq!(
        places.list_indexes().await.unwrap(),
        vec![IndexSpec {
            field: "location".to_string(),
            kind: IndexKind::Geo2dSphere,
        }]
    );
}

#[tokio::test]
async fn geojson_location_round_trips_through_storage() {
    let store = store();
    let places = bootstrap_places(&store).await;

    let all = places.find_all().await.unwrap();
    let central_park = all
        .iter()
        .find(|place| place.name == "Central Park")
        .unwrap();

    assert_eq!(central_park.location.longitude(), -73.97);
    assert_eq!(central_park.location.latitude(), 40.77);
}
