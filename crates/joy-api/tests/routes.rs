use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use joy_api::AppState;
use joy_parser::EpisodeId;
use joy_processing::Episode;
use joy_store::{Document, DocumentStore, MemoryStore, Query, StoreError, StoredDocument};
use serde_json::Value;

const COLLECTION: &str = "episodes_api_test";

fn episode(
    id: &str,
    title: &str,
    colors: &[&str],
    subjects: &[&str],
    air_date: Option<(i32, u32, u32)>,
) -> Episode {
    let id = EpisodeId::new(id);
    Episode {
        title: title.to_string(),
        img_src: format!("https://www.twoinchbrush.com/images/{id}.png"),
        youtube_src: format!("https://www.youtube.com/embed/{id}"),
        colors: colors.iter().map(|c| c.to_string()).collect(),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        air_date: air_date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        season: 1,
        episode: id.as_str()[4..].parse().unwrap(),
        id,
    }
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let episodes = [
        episode(
            "S01E01",
            "A Walk in the Woods",
            &["Alizarin Crimson", "Bright Red", "Sap Green"],
            &["TREE", "TREES"],
            Some((1983, 1, 11)),
        ),
        episode(
            "S01E02",
            "Mt. McKinley",
            &["Bright Red", "Titanium White"],
            &["CLOUDS", "MOUNTAIN", "TREE"],
            Some((1983, 1, 18)),
        ),
        episode(
            "S01E03",
            "Ebony Sunset",
            &["Midnight Black", "Titanium White"],
            &["MOUNTAIN", "SNOWY_MOUNTAIN"],
            Some((1983, 2, 1)),
        ),
        episode("S01E04", "Winter Mist", &["Titanium White"], &[], None),
    ];
    for episode in &episodes {
        store
            .set_document(COLLECTION, episode.id.as_str(), &episode.to_document())
            .await
            .unwrap();
    }
    store
}

async fn spawn(store: Arc<dyn DocumentStore>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let state = AppState::new(store).with_collection(COLLECTION);
    tokio::spawn(async move { joy_api::serve(listener, state).await.expect("serve app") });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("request");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("json body");
    (status, body)
}

fn ids(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|episode| episode["id"].as_str().expect("id"))
        .collect()
}

#[tokio::test]
async fn episode_by_id() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) = get(addr, "/episodes/S01E02").await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], "S01E02");
    assert_eq!(body["title"], "Mt. McKinley");
    assert_eq!(body["air_date"], "1983-01-18");
    assert_eq!(body["subjects"].as_array().map(Vec::len), Some(3));

    let (status, body) = get(addr, "/episodes/S01E04").await;
    assert_eq!(status, 200);
    assert!(body["air_date"].is_null());

    let (status, body) = get(addr, "/episodes/S09E99").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Episode not found.");
}

#[tokio::test]
async fn episode_by_name() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) = get(addr, "/episodes/filterName?name=Ebony%20Sunset").await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], "S01E03");

    let (status, body) = get(addr, "/episodes/filterName?name=ebony%20sunset").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Episode not found.");

    for path in ["/episodes/filterName", "/episodes/filterName?name="] {
        let (status, body) = get(addr, path).await;
        assert_eq!(status, 400, "{path}");
        assert_eq!(body["error"], "Query param 'name' is required.");
    }
}

#[tokio::test]
async fn filter_requires_a_valid_filter() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) = get(addr, "/episodes/filter").await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"],
        "At least one of query params 'month', 'subjects', or 'colors' is required."
    );

    let (status, _) = get(addr, "/episodes/filter?month=1983-01").await;
    assert_eq!(status, 400);

    let (status, body) = get(addr, "/episodes/filter?subjects=tree&match=maybe").await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"],
        "Query param 'match' must be 'all' or 'any', got 'maybe'."
    );
}

#[tokio::test]
async fn filter_by_month() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) = get(addr, "/episodes/filter?month=01/1983").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E01", "S01E02"]);

    let (status, body) = get(addr, "/episodes/filter?month=12/1982").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "No episodes found matching the given filters.");
}

#[tokio::test]
async fn filter_values_all_versus_any() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) = get(addr, "/episodes/filter?subjects=tree,%20mountain").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E02"]);

    let (status, body) = get(addr, "/episodes/filter?subjects=tree,mountain&match=ANY").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E01", "S01E02", "S01E03"]);

    // Colors are case-sensitive.
    let (status, _) = get(addr, "/episodes/filter?colors=titanium%20white").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn filters_combine_per_match_mode() {
    let addr = spawn(seeded_store().await).await;

    let (status, body) =
        get(addr, "/episodes/filter?month=01/1983&colors=Titanium%20White").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E02"]);

    let (status, body) = get(
        addr,
        "/episodes/filter?month=02/1983&colors=Bright%20Red&match=any",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E03", "S01E01", "S01E02"]);

    let (status, body) = get(
        addr,
        "/episodes/filter?subjects=mountain&colors=Titanium%20White&match=any",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), ["S01E02", "S01E03", "S01E04"]);
}

struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn set_document(&self, _: &str, _: &str, _: &Document) -> Result<(), StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }

    async fn get_document(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }

    async fn query(&self, _: &str, _: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

#[tokio::test]
async fn store_failures_are_server_errors() {
    let addr = spawn(Arc::new(UnavailableStore)).await;

    let (status, body) = get(addr, "/episodes/S01E01").await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("503"));

    let (status, _) = get(addr, "/episodes/filter?month=01/1983").await;
    assert_eq!(status, 500);
}
