/// Identifier of the root node every top-level node is linked under.
pub const ROOT_IDENTIFIER: &str = "_root";

/// Identifiers starting with this prefix belong to manager-internal
/// (operational) nodes, which are exempt from parent linking and pruning.
pub const OPERATIONAL_PREFIX: &str = "_";

/// Node type assigned when a definition does not name one.
pub const DEFAULT_NODE_TYPE: &str = "node";

/// Node type of the root node.
pub const ROOT_NODE_TYPE: &str = "root";

/// Returns true if the identifier names an operational node.
pub fn is_operational(identifier: &str) -> bool {
    identifier.starts_with(OPERATIONAL_PREFIX)
}
