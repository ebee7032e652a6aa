use ua_client::{Lookup, ResourceClient, Result};
use ua_model::{CapabilityKind, CapabilityList, Node};

/// Probes optional reference types and collects their targets.
///
/// A target fetch is only sent after its own probe confirmed the reference
/// type; older servers reject unknown reference types.
pub struct CapabilityResolver {
    client: ResourceClient,
}

impl CapabilityResolver {
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// `Empty` when the server supports none of the capability kinds.
    pub async fn resolve(&self, node_id: &str) -> Result<Lookup<CapabilityList>> {
        let (interfaces, equipment_classes) = tokio::join!(
            self.probe(node_id, CapabilityKind::Interface),
            self.probe(node_id, CapabilityKind::EquipmentClass),
        );

        let mut list = CapabilityList::new();
        for (kind, outcome) in [
            (CapabilityKind::Interface, interfaces?),
            (CapabilityKind::EquipmentClass, equipment_classes?),
        ] {
            match outcome {
                Lookup::Found(targets) => list.append(kind, targets),
                Lookup::Empty => log::info!("Server does not support {kind:?} references"),
                Lookup::NotConnected => return Ok(Lookup::NotConnected),
            }
        }
        Ok(if list.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Found(list)
        })
    }

    /// `Empty` means the reference type is absent on the server.
    async fn probe(&self, node_id: &str, kind: CapabilityKind) -> Result<Lookup<Vec<Node>>> {
        let reference_type = kind.reference_type_id();
        match self.client.is_node_present(reference_type).await? {
            Lookup::Found(true) => {}
            Lookup::Found(false) | Lookup::Empty => return Ok(Lookup::Empty),
            Lookup::NotConnected => return Ok(Lookup::NotConnected),
        }
        let targets = self
            .client
            .browse_reference_targets(node_id, reference_type)
            .await?;
        Ok(match targets {
            Lookup::NotConnected => Lookup::NotConnected,
            other => Lookup::Found(other.unwrap_or_default()),
        })
    }
}
