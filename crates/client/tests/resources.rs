use pretty_assertions::assert_eq;
use std::sync::Arc;
use ua_client::memory::{MemoryDataSource, MemoryRegistry};
use ua_client::{resource, BackendHandleCache, ClientError, Lookup, ResourceClient};
use ua_model::{ids, DashboardDescriptor, MappingRequest, Node, NodeClass, QualifiedName};

fn node(id: &str, class: NodeClass) -> Node {
    Node::new(id, QualifiedName::new(id, "urn:test"), id, class)
}

async fn connected(source: MemoryDataSource) -> (ResourceClient, Arc<MemoryDataSource>) {
    let source = Arc::new(source);
    let registry = Arc::new(MemoryRegistry::new().with_source("opcua", source.clone()));
    let cache = BackendHandleCache::new(registry, "opcua");
    cache.connect().await.expect("connect");
    (ResourceClient::new(cache, "Operator"), source)
}

#[tokio::test]
async fn browse_sends_node_class_mask() {
    let (client, source) = connected(MemoryDataSource::new("opcua").with_children(
        ids::TYPES_FOLDER,
        vec![
            node("i=58", NodeClass::ObjectType),
            node("i=62", NodeClass::VariableType),
        ],
    ))
    .await;

    let mask = NodeClass::Object | NodeClass::ObjectType;
    let nodes = client
        .browse(ids::TYPES_FOLDER, Some(mask))
        .await
        .unwrap()
        .unwrap_or_default();
    assert_eq!(nodes, vec![node("i=58", NodeClass::ObjectType)]);

    let calls = source.calls_to(resource::BROWSE);
    assert_eq!(calls[0].params.get("nodeClassMask"), Some("9"));
}

#[tokio::test]
async fn zero_children_is_empty_not_error() {
    let (client, _) = connected(MemoryDataSource::new("opcua").with_children("ns=1;s=Leaf", vec![])).await;
    assert_eq!(client.browse("ns=1;s=Leaf", None).await.unwrap(), Lookup::Empty);
    assert_eq!(
        client
            .browse_reference_targets("ns=1;s=Leaf", ids::HAS_TYPE_DEFINITION)
            .await
            .unwrap(),
        Lookup::Empty
    );
}

#[tokio::test]
async fn absent_node_is_not_present() {
    let (client, _) = connected(MemoryDataSource::new("opcua")).await;
    assert_eq!(
        client.is_node_present(ids::HAS_INTERFACE).await.unwrap(),
        Lookup::Found(false)
    );
}

#[tokio::test]
async fn backend_failure_is_surfaced() {
    let (client, _) = connected(MemoryDataSource::new("opcua").failing(resource::BROWSE_REFERENCE_TARGETS)).await;
    let err = client
        .browse_reference_targets("ns=1;s=Pump", ids::HAS_TYPE_DEFINITION)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Backend { .. }));
}

#[tokio::test]
async fn descriptor_request_carries_perspective() {
    let descriptor = DashboardDescriptor {
        name: "Pump".to_string(),
        dash_keys: vec!["k1".to_string()],
    };
    let (client, source) =
        connected(MemoryDataSource::new("opcua").with_dashboard("ns=1;s=Pump", descriptor.clone())).await;

    let found = client.dashboard_descriptor("ns=1;s=Pump").await.unwrap();
    assert_eq!(found, Lookup::Found(descriptor));
    let call = &source.calls_to(resource::GET_DASHBOARD)[0];
    assert_eq!(call.params.get("perspective"), Some("Operator"));
}

#[tokio::test]
async fn mapping_serializes_interfaces() {
    let (client, source) = connected(MemoryDataSource::new("opcua")).await;
    let request = MappingRequest {
        node_id: "ns=1;s=Pump".to_string(),
        type_node_id: "ns=1;i=1001".to_string(),
        use_type: true,
        interfaces: vec!["ns=1;i=2001".to_string()],
        dashboard: Some("Pump".to_string()),
        existing_dashboard: None,
    };

    assert_eq!(client.add_dashboard_mapping(&request).await.unwrap(), Lookup::Found(true));
    let params = &source.mappings()[0];
    assert_eq!(params.get("interfaces"), Some(r#"["ns=1;i=2001"]"#));
    assert_eq!(params.get("useType"), Some("true"));
    assert_eq!(params.get("existingDashboard"), Some(""));
}

#[tokio::test]
async fn mapping_without_dashboard_is_not_sent() {
    let (client, source) = connected(MemoryDataSource::new("opcua")).await;
    let request = MappingRequest {
        node_id: "ns=1;s=Pump".to_string(),
        ..Default::default()
    };
    assert_eq!(client.add_dashboard_mapping(&request).await.unwrap(), Lookup::Found(false));
    assert_eq!(source.call_count(resource::ADD_DASHBOARD_MAPPING), 0);
}

#[tokio::test]
async fn namespaces_round_out_resource_set() {
    let (client, _) = connected(
        MemoryDataSource::new("opcua").with_namespaces(vec![ids::OPC_UA_NAMESPACE.to_string()]),
    )
    .await;
    assert_eq!(
        client.namespaces().await.unwrap().unwrap_or_default(),
        vec![ids::OPC_UA_NAMESPACE.to_string()]
    );
}
