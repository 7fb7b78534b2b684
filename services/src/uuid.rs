use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
///
/// UUIDv5 is the SHA-1 based variant, so equal inputs produce equal ids
/// across calls and across processes.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}
