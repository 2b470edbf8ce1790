//! End-to-end routing: every strategy exercised through the engine
//! against a real file-backed store.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map};

use engram_core::config::QueryConfig;
use engram_core::models::{
    EdgeAttributes, GraphEdge, GraphNode, MemoryQuery, Scope, EDGES_ATTRIBUTE_KEY,
    METRIC_SERIES_TYPE,
};
use engram_core::traits::IQueryEngine;
use engram_query::QueryEngine;
use engram_storage::queries::{edge_ops, node_crud};
use engram_storage::StorageEngine;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn setup() -> (QueryEngine, StorageEngine, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_engram.db");
    let storage = StorageEngine::open(&path).unwrap();
    let engine = QueryEngine::new(&storage, QueryConfig::default());
    (engine, storage, dir)
}

fn build_node(id: &str, node_type: &str, scope: Scope, at: DateTime<Utc>) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        node_type: node_type.to_string(),
        scope,
        attributes: Map::new(),
        version: 1,
        updated_by: Some("router-test".to_string()),
        updated_at: Some(at),
    }
}

fn with_content(mut node: GraphNode, content: &str) -> GraphNode {
    node.attributes
        .insert("content".to_string(), json!(content));
    node
}

fn with_tags(mut node: GraphNode, tags: &[&str]) -> GraphNode {
    node.attributes.insert("tags".to_string(), json!(tags));
    node
}

async fn seed_node(storage: &StorageEngine, node: GraphNode) {
    storage
        .writer()
        .with_conn(move |conn| node_crud::upsert_node(conn, &node))
        .await
        .unwrap();
}

async fn seed_edge(storage: &StorageEngine, source: &str, target: &str) {
    let edge = GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
        relationship: "relates_to".to_string(),
        scope: Scope::Local,
        weight: 1.0,
        attributes: EdgeAttributes::default(),
    };
    storage
        .writer()
        .with_conn(move |conn| edge_ops::insert_edge(conn, &edge).map(|_| ()))
        .await
        .unwrap();
}

fn ids(nodes: &[GraphNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

// ─── Node id lookup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn node_id_lookup_returns_only_that_node() {
    let (engine, storage, _dir) = setup();
    seed_node(&storage, build_node("a", "observation", Scope::Local, Utc::now())).await;
    seed_node(&storage, build_node("b", "observation", Scope::Local, Utc::now())).await;

    let request = MemoryQuery {
        node_id: Some("a".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();

    assert_eq!(ids(&nodes), ["a"]);
    assert!(
        !nodes[0].attributes.contains_key(EDGES_ATTRIBUTE_KEY),
        "edges only attach when asked for"
    );
}

#[tokio::test]
async fn node_id_lookup_missing_is_empty_not_error() {
    let (engine, _storage, _dir) = setup();
    let request = MemoryQuery {
        node_id: Some("ghost".to_string()),
        ..MemoryQuery::default()
    };
    assert!(engine.build_and_execute(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn node_id_lookup_attaches_edges_when_asked() {
    let (engine, storage, _dir) = setup();
    seed_node(&storage, build_node("a", "concept", Scope::Local, Utc::now())).await;
    seed_node(&storage, build_node("b", "concept", Scope::Local, Utc::now())).await;
    seed_edge(&storage, "a", "b").await;

    let request = MemoryQuery {
        node_id: Some("a".to_string()),
        include_edges: true,
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();

    let attached = nodes[0]
        .attributes
        .get(EDGES_ATTRIBUTE_KEY)
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].get("target"), Some(&json!("b")));
}

#[tokio::test]
async fn node_id_lookup_depth_visits_each_node_once() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    for id in ["a", "b", "c", "d"] {
        seed_node(&storage, build_node(id, "concept", Scope::Local, now)).await;
    }
    // Diamond: two paths reach d.
    seed_edge(&storage, "a", "b").await;
    seed_edge(&storage, "a", "c").await;
    seed_edge(&storage, "b", "d").await;
    seed_edge(&storage, "c", "d").await;

    let request = MemoryQuery {
        node_id: Some("a".to_string()),
        depth: Some(3),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();

    let mut got = ids(&nodes);
    got.sort_unstable();
    assert_eq!(got, ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn wildcard_node_id_recalls_whole_scope() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(&storage, build_node("a", "observation", Scope::Local, now)).await;
    seed_node(&storage, build_node("b", "observation", Scope::Local, now)).await;
    seed_node(&storage, build_node("c", "observation", Scope::Identity, now)).await;

    let request = MemoryQuery {
        node_id: Some("*".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();

    let mut got = ids(&nodes);
    got.sort_unstable();
    assert_eq!(got, ["a", "b"], "identity-scoped node stays out");
}

// ─── Text search ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_search_matches_content_terms() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_content(build_node("n1", "observation", Scope::Local, now), "a heron waded"),
    )
    .await;
    seed_node(
        &storage,
        with_content(build_node("n2", "observation", Scope::Local, now), "an owl watched"),
    )
    .await;

    let request = MemoryQuery {
        query: Some("Heron".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["n1"]);
}

#[tokio::test]
async fn text_search_keeps_nodes_matching_any_term() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_content(build_node("n1", "observation", Scope::Local, now), "a heron waded"),
    )
    .await;
    seed_node(
        &storage,
        with_content(build_node("n2", "observation", Scope::Local, now), "an owl watched"),
    )
    .await;

    let request = MemoryQuery {
        query: Some("heron osprey".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["n1"], "one matching term keeps the node");
}

#[tokio::test]
async fn text_search_tag_filter_applies() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_tags(
            with_content(build_node("tagged", "observation", Scope::Local, now), "heron"),
            &["birds"],
        ),
    )
    .await;
    seed_node(
        &storage,
        with_content(build_node("untagged", "observation", Scope::Local, now), "heron"),
    )
    .await;

    let request = MemoryQuery {
        query: Some("heron".to_string()),
        tags: vec!["birds".to_string()],
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["tagged"]);
}

#[tokio::test]
async fn text_search_scope_token_switches_scope() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_content(build_node("id-1", "observation", Scope::Identity, now), "heron"),
    )
    .await;

    let request = MemoryQuery {
        query: Some("scope:identity heron".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["id-1"]);

    let unknown = MemoryQuery {
        query: Some("scope:nebula heron".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&unknown).await.unwrap();
    assert!(nodes.is_empty(), "unknown scope names match nothing");
}

#[tokio::test]
async fn text_search_type_token_narrows_type() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_content(build_node("obs", "observation", Scope::Local, now), "heron"),
    )
    .await;
    seed_node(
        &storage,
        with_content(build_node("con", "concept", Scope::Local, now), "heron"),
    )
    .await;

    let request = MemoryQuery {
        query: Some("type:concept heron".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["con"]);
}

#[tokio::test]
async fn text_search_respects_time_bounds() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(
        &storage,
        with_content(build_node("fresh", "observation", Scope::Local, now), "heron"),
    )
    .await;
    seed_node(
        &storage,
        with_content(
            build_node("stale", "observation", Scope::Local, now - Duration::hours(3)),
            "heron",
        ),
    )
    .await;

    let request = MemoryQuery {
        query: Some("heron".to_string()),
        since: Some(now - Duration::hours(1)),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["fresh"]);
}

// ─── Related ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn related_excludes_the_pivot() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    for id in ["a", "b", "c"] {
        seed_node(&storage, build_node(id, "concept", Scope::Local, now)).await;
    }
    seed_edge(&storage, "a", "b").await;
    seed_edge(&storage, "b", "c").await;

    let request = MemoryQuery {
        related_to: Some("b".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();

    let mut got = ids(&nodes);
    got.sort_unstable();
    assert_eq!(got, ["a", "c"]);
    assert!(nodes
        .iter()
        .all(|n| n.attributes.contains_key(EDGES_ATTRIBUTE_KEY)));
}

#[tokio::test]
async fn related_depth_limits_hops() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    for id in ["a", "b", "c", "d"] {
        seed_node(&storage, build_node(id, "concept", Scope::Local, now)).await;
    }
    seed_edge(&storage, "a", "b").await;
    seed_edge(&storage, "b", "c").await;
    seed_edge(&storage, "c", "d").await;

    let direct = MemoryQuery {
        related_to: Some("a".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&direct).await.unwrap();
    assert_eq!(ids(&nodes), ["b"], "default depth stops at direct neighbors");

    let deeper = MemoryQuery {
        related_to: Some("a".to_string()),
        depth: Some(3),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&deeper).await.unwrap();
    let mut got = ids(&nodes);
    got.sort_unstable();
    assert_eq!(got, ["b", "c"]);
}

// ─── Time range ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn time_range_scans_newest_first_with_paging() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    for i in 0..5i64 {
        seed_node(
            &storage,
            build_node(
                &format!("n{i}"),
                "observation",
                Scope::Local,
                now - Duration::hours(i),
            ),
        )
        .await;
    }

    let request = MemoryQuery {
        since: Some(now - Duration::minutes(150)),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["n0", "n1", "n2"]);

    let paged = MemoryQuery {
        since: Some(now - Duration::minutes(150)),
        limit: Some(2),
        offset: 1,
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&paged).await.unwrap();
    assert_eq!(ids(&nodes), ["n1", "n2"]);
}

#[tokio::test]
async fn time_range_hides_metric_series() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(&storage, build_node("obs", "observation", Scope::Local, now)).await;
    seed_node(&storage, build_node("m", METRIC_SERIES_TYPE, Scope::Local, now)).await;

    let request = MemoryQuery {
        since: Some(now - Duration::hours(1)),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["obs"]);
}

// ─── Type filter and wildcard ────────────────────────────────────────────────

#[tokio::test]
async fn type_filter_returns_single_type() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(&storage, build_node("obs", "observation", Scope::Local, now)).await;
    seed_node(&storage, build_node("con", "concept", Scope::Local, now)).await;

    let request = MemoryQuery {
        node_type: Some("concept".to_string()),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&request).await.unwrap();
    assert_eq!(ids(&nodes), ["con"]);
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_reflect_seeded_nodes() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    seed_node(&storage, build_node("a", "observation", Scope::Local, now)).await;
    seed_node(&storage, build_node("b", "concept", Scope::Identity, now)).await;

    let stats = engine.get_stats().await.unwrap();

    assert_eq!(stats.total_nodes, 2);
    assert_eq!(stats.nodes_by_type.get("observation"), Some(&1));
    assert_eq!(stats.nodes_by_scope.get("identity"), Some(&1));
    assert_eq!(stats.recent_nodes_24h, 2);
}

#[tokio::test]
async fn empty_query_falls_back_to_scope_wildcard() {
    let (engine, storage, _dir) = setup();
    let now = Utc::now();
    for i in 0..3 {
        seed_node(
            &storage,
            build_node(&format!("n{i}"), "observation", Scope::Local, now),
        )
        .await;
    }

    let nodes = engine
        .build_and_execute(&MemoryQuery::default())
        .await
        .unwrap();
    assert_eq!(nodes.len(), 3);

    let limited = MemoryQuery {
        limit: Some(2),
        ..MemoryQuery::default()
    };
    let nodes = engine.build_and_execute(&limited).await.unwrap();
    assert_eq!(nodes.len(), 2);
}
