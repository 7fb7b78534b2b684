//! Point model and identity.

use serde::{Deserialize, Serialize};
use services::uuid::stable_uuid;
use uuid::Uuid;

/// Payload stored alongside every vector.
///
/// `symbol_names`, `symbol_kinds`, and `unity_tags` come from the
/// symbol-extraction side and are carried opaquely.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PointPayload {
    pub path: String,
    pub lang: String,
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
    pub file_hash: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbol_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbol_kinds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unity_tags: Vec<String>,
}

/// One vector + payload record, addressed by a deterministic id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Point {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// Derive the stable point id for a chunk range of a file.
///
/// The id is a pure function of `(path, start_line, end_line)`, so
/// re-upserting an unchanged range overwrites in place. Chunking-config
/// changes produce new ids, which is safe: a changed file's old points
/// are deleted wholesale before new ones are written.
pub fn point_id(path: &str, start_line: usize, end_line: usize) -> Uuid {
    stable_uuid(&format!("{path}:{start_line}:{end_line}"))
}
