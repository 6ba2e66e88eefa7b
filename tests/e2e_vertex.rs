//! End-to-end tests for vertex descriptors.
//!
//! Each test declares record types with `record!`, resolves them through a
//! `SchemaResolver`, and checks the descriptor or a scan against it.

use norm::reflect::{TagNamer, VertexIdInt64, VertexIdStr};
use norm::{record, Error, IndexKind, SchemaResolver, StorageHint, VidType, WireValue, WireVertex};
use pretty_assertions::assert_eq;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Player [string_id, tag] {
        pub vid: String = "vertex_id",
        pub name: String,
        pub age: i64,
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
    pub struct Scored [string_id, tag] {
        pub vid: String = "vertex_id",
        pub age: f64,
    }
}

impl VertexIdStr for Scored {
    fn vertex_id(&self) -> String {
        self.vid.clone()
    }
}

impl TagNamer for Scored {
    fn tag_name() -> String {
        "player".into()
    }
}

fn prop_pairs(resolver: &SchemaResolver) -> Vec<(String, Option<String>)> {
    let vertex = resolver.vertex::<Player>().unwrap();
    vertex.tags()[0]
        .properties()
        .iter()
        .map(|p| (p.name.clone(), p.storage_type.clone()))
        .collect()
}

// ============================================================================
// 1. Self-tagged vertex with inferred storage types
// ============================================================================

#[test]
fn test_self_tagged_vertex() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Player>().unwrap();

    assert_eq!(vertex.vid_type(), VidType::String);
    assert_eq!(vertex.tags().len(), 1);
    assert_eq!(vertex.tags()[0].name(), "player");
    assert_eq!(
        prop_pairs(&resolver),
        vec![
            ("name".to_string(), Some("string".to_string())),
            ("age".to_string(), Some("int64".to_string())),
        ]
    );
    assert!(vertex.vid_field().is_some());
}

// ============================================================================
// 2. TTL on two properties still parses
// ============================================================================

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

#[test]
fn test_multiple_ttl_properties_parse() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Session>().unwrap();
    let tag = vertex.tag("session").unwrap();

    let ttls: Vec<_> = tag.properties().iter().map(|p| p.ttl.as_deref()).collect();
    assert_eq!(ttls, vec![Some("100"), Some("100")]);
    assert_eq!(tag.property("created").unwrap().hint, StorageHint::DateTime);
    assert_eq!(vertex.vid_type(), VidType::Int64);
}

// ============================================================================
// 3. Multi-tag vertex composed of tag-bearing fields
// ============================================================================

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct PersonTag [tag] {
        pub name: String = "index:idx_person_name,length:32",
        pub birth_year: i32 = "not_null;default:1970",
    }
}

impl TagNamer for PersonTag {
    fn tag_name() -> String {
        "person".into()
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct EmployeeTag [tag] {
        pub company: String = "comment:current employer",
        pub level: Option<u8>,
    }
}

impl TagNamer for EmployeeTag {
    fn tag_name() -> String {
        "employee".into()
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Staff [int64_id] {
        pub id: i64 = "vertex_id",
        pub person: PersonTag,
        pub employee: Option<EmployeeTag>,
        pub note: String,
    }
}

impl VertexIdInt64 for Staff {
    fn vertex_id(&self) -> i64 {
        self.id
    }
}

#[test]
fn test_multi_tag_vertex() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Staff>().unwrap();

    let names: Vec<_> = vertex.tags().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["person", "employee"]);

    let person = vertex.tag("person").unwrap();
    let birth = person.property("birth_year").unwrap();
    assert_eq!(birth.storage_type.as_deref(), Some("int32"));
    assert!(birth.not_null);
    assert_eq!(birth.default.as_deref(), Some("1970"));
    assert_eq!(birth.path.indices(), &[1, 1]);

    let employee = vertex.tag("employee").unwrap();
    let level = employee.property("level").unwrap();
    assert_eq!(level.storage_type.as_deref(), Some("int8"));
    assert_eq!(level.path.indices(), &[2, 1]);
    assert_eq!(
        employee.property("company").unwrap().comment.as_deref(),
        Some("current employer")
    );

    let indexes = person.indexes();
    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].kind, IndexKind::Tag);
    assert_eq!(indexes[0].target, "person");
    assert_eq!(indexes[0].fields[0].length, Some(32));
}

#[test]
fn test_multi_tag_scan_materialises_optional_tag() {
    let resolver = SchemaResolver::new();
    let wire = WireValue::from(
        WireVertex::new(7)
            .with_tag("person", [("name", WireValue::from("Ada")), ("birth_year", WireValue::from(1815))])
            .with_tag("employee", [("company", "Analytical"), ("unknown", "ignored")]),
    );

    let mut staff = Staff::default();
    resolver.scan(&wire, &mut staff).unwrap();

    assert_eq!(staff.id, 7);
    assert_eq!(staff.person.name, "Ada");
    assert_eq!(staff.person.birth_year, 1815);
    assert_eq!(staff.employee.as_ref().map(|e| e.company.as_str()), Some("Analytical"));
    assert_eq!(staff.note, "");
}

#[test]
fn test_missing_optional_tag_is_skipped() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Staff>().unwrap();
    assert!(!vertex.tag("person").unwrap().is_optional());
    assert!(vertex.tag("employee").unwrap().is_optional());

    let wire = WireValue::from(WireVertex::new(1).with_tag("person", [("name", "Bo")]));
    let mut staff = Staff::default();
    resolver.scan(&wire, &mut staff).unwrap();
    assert_eq!(staff.person.name, "Bo");
    assert_eq!(staff.employee, None);
}

#[test]
fn test_missing_required_member_tag_fails() {
    let resolver = SchemaResolver::new();
    let wire = WireValue::from(WireVertex::new(1).with_tag("employee", [("company", "Acme")]));

    let mut staff = Staff::default();
    let err = resolver.scan(&wire, &mut staff).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }), "{err}");
    assert!(err.to_string().contains("no tag `person`"), "{err}");
}

#[test]
fn test_missing_self_tag_fails() {
    let resolver = SchemaResolver::new();
    let wire = WireValue::from(WireVertex::new("p1").with_tag("team", [("name", "Rockets")]));

    let mut player = Player::default();
    let err = resolver.scan(&wire, &mut player).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }), "{err}");
    assert!(err.to_string().contains("no tag `player`"), "{err}");
    assert_eq!(player.name, "");
}

// ============================================================================
// 4. Scanning a vertex into a wider numeric field
// ============================================================================

#[test]
fn test_scan_int_into_float_field() {
    let resolver = SchemaResolver::new();
    let wire = WireValue::from(WireVertex::new("p1").with_tag("player", [("age", 33)]));

    let mut scored = Scored::default();
    resolver.scan(&wire, &mut scored).unwrap();
    assert_eq!(scored.age, 33.0);
    assert_eq!(scored.vid, "p1");
}

// ============================================================================
// 5. Embedded records and name collisions
// ============================================================================

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Audit {
        pub name: String,
        pub updated_at: i64 = "type:timestamp",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Account [string_id, tag] {
        pub vid: String = "vertex_id",
        pub name: String,
        pub audit: Audit = "flatten",
        #[allow(non_snake_case)]
        pub UserName: String,
        pub alias: String = "prop:name",
        pub cache: String = "-",
    }
}

impl VertexIdStr for Account {
    fn vertex_id(&self) -> String {
        self.vid.clone()
    }
}

impl TagNamer for Account {
    fn tag_name() -> String {
        "account".into()
    }
}

#[test]
fn test_flatten_and_first_declaration_wins() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Account>().unwrap();
    let tag = vertex.tag("account").unwrap();

    let names: Vec<_> = tag.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["name", "user_name", "updated_at"]);
    assert_eq!(tag.property("name").unwrap().field_name, "name");
    assert_eq!(tag.property("updated_at").unwrap().path.indices(), &[2, 1]);
}

#[test]
fn test_flattened_scan() {
    let resolver = SchemaResolver::new();
    let wire = WireValue::from(
        WireVertex::new("a1").with_tag("account", [("name", WireValue::from("x")), ("updated_at", WireValue::from(99))]),
    );
    let mut account = Account::default();
    resolver.scan(&wire, &mut account).unwrap();
    assert_eq!(account.name, "x");
    assert_eq!(account.audit.updated_at, 99);
    assert_eq!(account.audit.name, "");
}

// ============================================================================
// 6. Identifier accessors
// ============================================================================

#[test]
fn test_vid_literals() {
    let resolver = SchemaResolver::new();
    let player = Player {
        vid: "p\"1".into(),
        ..Player::default()
    };
    let vertex = resolver.vertex::<Player>().unwrap();
    assert_eq!(vertex.vid_literal(&player).unwrap(), r#""p\"1""#);

    let staff = Staff {
        id: 42,
        ..Staff::default()
    };
    let vertex = resolver.vertex::<Staff>().unwrap();
    assert_eq!(vertex.vid_literal(&staff).unwrap(), "42");
}

#[test]
fn test_vid_rejects_other_record_type() {
    let resolver = SchemaResolver::new();
    let vertex = resolver.vertex::<Player>().unwrap();
    let err = vertex.vid(&Scored::default()).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
}
