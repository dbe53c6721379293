use crate::store::StoreError;
use campaign_kernel::Project;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// The full persisted state of one project at a point in time.
///
/// The version store treats this as an inert JSON value. Only
/// [`Snapshot::capture`] and [`Snapshot::restore`] know it holds a [`Project`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Value);

impl Snapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Convert a project into its snapshot form.
    pub fn capture(project: &Project) -> Result<Self, StoreError> {
        Ok(Self(serde_json::to_value(project)?))
    }

    /// Rebuild a project from this snapshot.
    pub fn restore(&self) -> Result<Project, StoreError> {
        Ok(Project::deserialize(&self.0)?)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Compact JSON with object keys sorted at every depth.
    ///
    /// Equal content yields equal bytes regardless of the order keys were inserted.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        write_canonical(&self.0, &mut buf)?;
        Ok(buf)
    }

    /// Lowercase hex SHA-256 of [`Snapshot::canonical_bytes`].
    pub fn digest(&self) -> Result<String, StoreError> {
        Ok(sha256_hex(&self.canonical_bytes()?))
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            out.push(b'{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_canonical(val, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out)?;
            }
            out.push(b']');
        }
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
