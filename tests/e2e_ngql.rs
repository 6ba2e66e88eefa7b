//! End-to-end tests for statement rendering from resolved descriptors.

use norm::reflect::{EdgeTypeNamer, TagNamer, VertexIdInt64, VertexIdStr};
use norm::{ngql, record, Error, SchemaResolver};
use pretty_assertions::assert_eq;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Player [string_id, tag] {
        pub vid: String = "vertex_id",
        pub name: String = "not_null;index:idx_player_name,length:16",
        pub age: i64 = "default:18;comment:age in years;index:idx_player_name,priority:2",
        pub nickname: Option<String>,
    }
}

impl VertexIdStr for Player {
    fn vertex_id(&self) -> String {
        self.vid.clone()
    }
}

impl TagNamer for Player {
    fn tag_name() -> String {
        "player".into()
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Serve [edge_type] {
        pub player: String = "edge_src_id",
        pub team: String = "edge_dst_id",
        pub season: i64 = "edge_rank",
        pub start_year: i64,
        pub end_year: Option<i64>,
    }
}

impl EdgeTypeNamer for Serve {
    fn edge_type_name() -> String {
        "serve".into()
    }
}

// ============================================================================
// 1. CREATE TAG / CREATE EDGE
// ============================================================================

#[test]
fn test_create_tag() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Player>().unwrap();
    assert_eq!(
        ngql::create_tags(&vertex, true).unwrap(),
        "CREATE TAG IF NOT EXISTS player(name string NOT NULL, age int64 DEFAULT 18 COMMENT 'age in years', \
         nickname string)"
    );
}

#[test]
fn test_create_edge() {
    let resolver = SchemaResolver::new();
    let edge = resolver.edge::<Serve>().unwrap();
    assert_eq!(
        ngql::create_edge(&edge, false).unwrap(),
        "CREATE EDGE serve(start_year int64, end_year int64)"
    );
}

record! {
    #[derive(Debug, Default)]
    pub struct Session [int64_id, tag] {
        pub id: i64 = "vertex_id",
        pub created: i64 = "type:timestamp;ttl:100",
        pub refreshed: i64 = "type:timestamp;ttl:100",
    }
}

impl VertexIdInt64 for Session {
    fn vertex_id(&self) -> i64 {
        self.id
    }
}

impl TagNamer for Session {
    fn tag_name() -> String {
        "session".into()
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct Token [int64_id, tag] {
        pub id: i64 = "vertex_id",
        pub issued: i64 = "type:timestamp;ttl:3600",
    }
}

impl VertexIdInt64 for Token {
    fn vertex_id(&self) -> i64 {
        self.id
    }
}

impl TagNamer for Token {
    fn tag_name() -> String {
        "token".into()
    }
}

#[test]
fn test_ttl_clause() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Token>().unwrap();
    assert_eq!(
        ngql::create_tag(&vertex.tags()[0], false).unwrap(),
        r#"CREATE TAG token(issued timestamp) TTL_DURATION = 3600, TTL_COL = "issued""#
    );
}

#[test]
fn test_two_ttl_properties_fail_at_render() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Session>().unwrap();
    let err = ngql::create_tag(&vertex.tags()[0], false).unwrap_err();
    assert!(matches!(err, Error::Render(_)), "{err}");
}

record! {
    #[derive(Debug, Default)]
    pub struct Tagged [string_id, tag] {
        pub vid: String = "vertex_id",
        pub labels: Vec<String>,
    }
}

impl VertexIdStr for Tagged {
    fn vertex_id(&self) -> String {
        self.vid.clone()
    }
}

impl TagNamer for Tagged {
    fn tag_name() -> String {
        "tagged".into()
    }
}

#[test]
fn test_property_without_storage_type_fails_at_render() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Tagged>().unwrap();
    let err = ngql::create_tags(&vertex, false).unwrap_err();
    assert!(err.to_string().contains("labels"), "{err}");
}

// ============================================================================
// 2. CREATE INDEX
// ============================================================================

#[test]
fn test_composite_index_ordered_by_priority() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Player>().unwrap();
    let indexes = vertex.tags()[0].indexes();
    assert_eq!(indexes.len(), 1);
    assert_eq!(
        ngql::create_index(&indexes[0], true).unwrap(),
        "CREATE TAG INDEX IF NOT EXISTS idx_player_name ON player(age, name(16))"
    );
}

// ============================================================================
// 3. INSERT VERTEX / INSERT EDGE
// ============================================================================

#[test]
fn test_insert_vertex() {
    let resolver = SchemaResolver::new();
    let player = Player {
        vid: "p1".into(),
        name: "Tim".into(),
        age: 42,
        nickname: None,
    };
    assert_eq!(
        ngql::insert_vertex(&resolver, &player, false).unwrap(),
        r#"INSERT VERTEX player(name, age, nickname) VALUES "p1":("Tim", 42, NULL)"#
    );
}

#[test]
fn test_insert_edge() {
    let resolver = SchemaResolver::new();
    let serve = Serve {
        player: "p1".into(),
        team: "t1".into(),
        season: 2,
        start_year: 1997,
        end_year: Some(2016),
    };
    assert_eq!(
        ngql::insert_edge(&resolver, &serve, true).unwrap(),
        r#"INSERT EDGE IF NOT EXISTS serve(start_year, end_year) VALUES "p1"->"t1"@2:(1997, 2016)"#
    );
}

#[test]
fn test_insert_vertex_requires_vertex_type() {
    let resolver = SchemaResolver::new();
    let serve = Serve::default();
    let err = ngql::insert_vertex(&resolver, &serve, false).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
}
