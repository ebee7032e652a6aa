//! Well-known node ids of the OPC UA base namespace and the ISA-95 profile.

use crate::node::{Node, NodeClass, QualifiedName};

pub const OPC_UA_NAMESPACE: &str = "http://opcfoundation.org/UA/";
pub const ISA95_NAMESPACE: &str = "http://www.OPCFoundation.org/UA/2013/01/ISA95";

pub const OBJECTS_FOLDER: &str = "i=85";
pub const TYPES_FOLDER: &str = "i=86";

pub const HAS_TYPE_DEFINITION: &str = "i=40";
pub const HAS_INTERFACE: &str = "i=17603";

/// Expanded id of the ISA-95 `DefinedByEquipmentClass` reference type, in the
/// JSON form the backend accepts for ids outside the base namespace.
pub const DEFINED_BY_EQUIPMENT_CLASS: &str =
    r#"{"namespaceUrl":"http://www.OPCFoundation.org/UA/2013/01/ISA95","id":"i=4919"}"#;

pub fn objects_folder() -> Node {
    Node::new(
        OBJECTS_FOLDER,
        QualifiedName::new("Objects", OPC_UA_NAMESPACE),
        "Objects",
        NodeClass::Object,
    )
}

pub fn types_folder() -> Node {
    Node::new(
        TYPES_FOLDER,
        QualifiedName::new("Types", OPC_UA_NAMESPACE),
        "Types",
        NodeClass::Object,
    )
}
