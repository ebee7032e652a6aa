use std::sync::Arc;
use ua_client::memory::{MemoryDataSource, MemoryRegistry};
use ua_client::{resource, BackendHandleCache, Lookup, ResourceClient};
use ua_model::{ids, Node, NodeClass, QualifiedName};

fn node(id: &str) -> Node {
    Node::new(id, QualifiedName::new(id, "urn:test"), id, NodeClass::Object)
}

#[tokio::test]
async fn operations_degrade_until_handle_resolves() {
    let source = Arc::new(
        MemoryDataSource::new("opcua")
            .with_children(ids::OBJECTS_FOLDER, vec![node("ns=1;s=Plant")])
            .with_present(ids::HAS_INTERFACE),
    );
    let registry = Arc::new(MemoryRegistry::held().with_source("opcua", source.clone()));
    let cache = BackendHandleCache::new(registry.clone(), "opcua");
    let client = ResourceClient::new(cache.clone(), "Operator");

    assert_eq!(
        client.browse(ids::OBJECTS_FOLDER, None).await.unwrap(),
        Lookup::NotConnected
    );
    assert_eq!(
        client.is_node_present(ids::HAS_INTERFACE).await.unwrap(),
        Lookup::NotConnected
    );
    assert_eq!(
        client
            .browse_reference_targets("ns=1;s=Plant", ids::HAS_TYPE_DEFINITION)
            .await
            .unwrap(),
        Lookup::NotConnected
    );
    assert!(client.dashboard_descriptor("ns=1;s=Plant").await.unwrap().into_option().is_none());
    assert!(source.calls().is_empty());

    registry.release();
    cache.wait_ready().await;

    let children = client.browse(ids::OBJECTS_FOLDER, None).await.unwrap();
    assert_eq!(children, Lookup::Found(vec![node("ns=1;s=Plant")]));
    assert_eq!(
        client.is_node_present(ids::HAS_INTERFACE).await.unwrap(),
        Lookup::Found(true)
    );
    assert_eq!(source.call_count(resource::BROWSE), 1);
}

#[tokio::test]
async fn registry_is_asked_once_while_lookup_in_flight() {
    let source = Arc::new(MemoryDataSource::new("opcua"));
    let registry = Arc::new(MemoryRegistry::held().with_source("opcua", source));
    let cache = BackendHandleCache::new(registry.clone(), "opcua");

    for _ in 0..5 {
        assert!(cache.handle().is_none());
    }
    registry.release();
    cache.wait_ready().await;

    assert!(cache.handle().is_some());
    assert_eq!(registry.lookups(), 1);
}

#[tokio::test]
async fn failed_lookup_is_retried_on_next_call() {
    let registry = Arc::new(MemoryRegistry::new());
    let cache = BackendHandleCache::new(registry.clone(), "missing");

    assert!(cache.handle().is_none());
    // Let the background lookup run and fail.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!cache.is_ready());

    assert!(cache.handle().is_none());
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(registry.lookups(), 2);
}

#[tokio::test]
async fn connect_resolves_in_caller_task() {
    let source = Arc::new(MemoryDataSource::new("opcua"));
    let registry = Arc::new(MemoryRegistry::new().with_source("opcua", source));
    let cache = BackendHandleCache::new(registry, "opcua");

    let handle = cache.connect().await.unwrap();
    assert_eq!(handle.name(), "opcua");
    assert!(cache.is_ready());
    assert!(cache.state().is_ready());
}
