mod support;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use support::{connected_client, hit, node, object, search};
use ua_client::memory::{MemoryDataSource, MemorySearch};
use ua_client::{resource, Lookup};
use ua_model::{ids, CapabilityKind, DashboardData, DashboardDescriptor, NodeClass};
use ua_panel::{CapabilityResolver, DashboardResolver};

fn descriptor(name: &str, keys: &[&str]) -> DashboardDescriptor {
    DashboardDescriptor {
        name: name.to_string(),
        dash_keys: keys.iter().map(|k| k.to_string()).collect(),
    }
}

#[tokio::test]
async fn descriptor_keys_replace_search_hit_keys() {
    let source = Arc::new(
        MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump1", descriptor("Pump", &["k1", "k2"])),
    );
    let mut pump = hit("Pump", "/d/pump");
    pump.dash_keys = vec!["old".to_string()];
    let resolver = DashboardResolver::new(connected_client(source).await, search(vec![pump]));

    let resolved = resolver.resolve("ns=1;s=Pump1").await.unwrap();
    assert_eq!(
        resolved,
        Lookup::Found(DashboardData {
            title: "Pump".to_string(),
            url: "/d/pump".to_string(),
            dash_keys: vec!["k1".to_string(), "k2".to_string()],
            id: None,
            uid: None,
            tags: Vec::new(),
        })
    );
}

#[tokio::test]
async fn blank_descriptor_name_skips_search() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump1", descriptor("", &["k1"])));
    let catalog = Arc::new(MemorySearch::new(vec![hit("Pump", "/d/pump")]));
    let resolver = DashboardResolver::new(connected_client(source).await, catalog.clone());

    assert_eq!(resolver.resolve("ns=1;s=Pump1").await.unwrap(), Lookup::Empty);
    assert!(catalog.queries().is_empty());
}

#[tokio::test]
async fn whitespace_descriptor_name_is_searched() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump1", descriptor(" ", &[])));
    let catalog = Arc::new(MemorySearch::new(vec![hit("Pump", "/d/pump")]));
    let resolver = DashboardResolver::new(connected_client(source).await, catalog.clone());

    assert_eq!(resolver.resolve("ns=1;s=Pump1").await.unwrap(), Lookup::Empty);
    assert_eq!(catalog.queries(), vec![" ".to_string()]);
}

#[tokio::test]
async fn missing_descriptor_is_empty() {
    let source = Arc::new(MemoryDataSource::new("opcua"));
    let catalog = Arc::new(MemorySearch::new(vec![hit("Pump", "/d/pump")]));
    let resolver = DashboardResolver::new(connected_client(source).await, catalog.clone());

    assert_eq!(resolver.resolve("ns=1;s=Pump1").await.unwrap(), Lookup::Empty);
    assert!(catalog.queries().is_empty());
}

#[tokio::test]
async fn search_without_hits_is_empty() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump1", descriptor("Pump", &[])));
    let catalog = Arc::new(MemorySearch::new(vec![hit("Boiler", "/d/boiler")]));
    let resolver = DashboardResolver::new(connected_client(source).await, catalog.clone());

    assert_eq!(resolver.resolve("ns=1;s=Pump1").await.unwrap(), Lookup::Empty);
    assert_eq!(catalog.queries(), vec!["Pump".to_string()]);
}

#[tokio::test]
async fn search_failure_is_an_error() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump1", descriptor("Pump", &[])));
    let resolver = DashboardResolver::new(connected_client(source).await, Arc::new(MemorySearch::failing()));

    assert!(resolver.resolve("ns=1;s=Pump1").await.is_err());
}

#[tokio::test]
async fn node_type_is_first_type_definition_target() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_references(
        "ns=1;s=Pump1",
        ids::HAS_TYPE_DEFINITION,
        vec![node("ns=1;i=1001", NodeClass::ObjectType), node("ns=1;i=1002", NodeClass::ObjectType)],
    ));
    let resolver = DashboardResolver::new(connected_client(source).await, search(Vec::new()));

    assert_eq!(
        resolver.node_type("ns=1;s=Pump1").await.unwrap(),
        Lookup::Found(node("ns=1;i=1001", NodeClass::ObjectType))
    );
    assert_eq!(resolver.node_type("ns=1;s=Other").await.unwrap(), Lookup::Empty);
}

#[tokio::test]
async fn catalogue_and_lookup_by_name() {
    let source = Arc::new(MemoryDataSource::new("opcua"));
    let catalog = Arc::new(MemorySearch::new(vec![hit("Pump", "/d/pump"), hit("Boiler", "/d/boiler")]));
    let resolver = DashboardResolver::new(connected_client(source).await, catalog.clone());

    assert_eq!(resolver.all_dashboards().await.unwrap().len(), 2);
    assert_eq!(
        resolver.dashboard_by_name("boiler").await.unwrap().map(|hit| hit.url),
        Some("/d/boiler".to_string())
    );
    assert_eq!(resolver.dashboard_by_name("Mixer").await.unwrap(), None);
    assert_eq!(catalog.queries(), vec!["".to_string(), "boiler".to_string(), "Mixer".to_string()]);
}

#[tokio::test]
async fn absent_reference_type_is_never_browsed() {
    let source = Arc::new(
        MemoryDataSource::new("opcua")
            .with_present(ids::DEFINED_BY_EQUIPMENT_CLASS)
            .with_references(
                "ns=1;s=Pump1",
                ids::DEFINED_BY_EQUIPMENT_CLASS,
                vec![object("ns=2;s=PumpClass")],
            ),
    );
    let resolver = CapabilityResolver::new(connected_client(source.clone()).await);

    let list = resolver.resolve("ns=1;s=Pump1").await.unwrap().unwrap_or_default();

    assert!(!list.contains(CapabilityKind::Interface));
    assert_eq!(
        list.get(CapabilityKind::EquipmentClass),
        Some(&[object("ns=2;s=PumpClass")][..])
    );
    let browsed: Vec<_> = source
        .calls_to(resource::BROWSE_REFERENCE_TARGETS)
        .into_iter()
        .filter_map(|call| call.params.get("referenceId").map(str::to_string))
        .collect();
    assert_eq!(browsed, vec![ids::DEFINED_BY_EQUIPMENT_CLASS.to_string()]);
}

#[tokio::test]
async fn present_reference_type_without_targets_is_listed_empty() {
    let source = Arc::new(MemoryDataSource::new("opcua").with_present(ids::HAS_INTERFACE));
    let resolver = CapabilityResolver::new(connected_client(source).await);

    let list = resolver.resolve("ns=1;s=Pump1").await.unwrap().unwrap_or_default();
    assert_eq!(list.get(CapabilityKind::Interface), Some(&[][..]));
    assert!(!list.contains(CapabilityKind::EquipmentClass));
}

#[tokio::test]
async fn no_supported_reference_type_is_empty() {
    let source = Arc::new(MemoryDataSource::new("opcua"));
    let resolver = CapabilityResolver::new(connected_client(source.clone()).await);

    assert_eq!(resolver.resolve("ns=1;s=Pump1").await.unwrap(), Lookup::Empty);
    assert_eq!(source.call_count(resource::IS_NODE_PRESENT), 2);
    assert_eq!(source.call_count(resource::BROWSE_REFERENCE_TARGETS), 0);
}
