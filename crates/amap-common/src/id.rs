/// Data attribute used to tag a container element with its map instance id.
///
/// Rendered in markup as `data-internal-id`; the focus handshake reads it
/// back from whatever element sits under the probed point.
pub const INTERNAL_ID_ATTRIBUTE: &str = "internalId";

/// Generate a fresh map instance id for callers that do not pick their own.
pub fn new_map_id() -> String {
    format!("map-{}", uuid::Uuid::new_v4().simple())
}
