use chrono::{DateTime, Utc};
use join_core::{JoinError, JoinResult};
use join_domain::{Contact, Task};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// Both remote collections, as persisted in one board file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// On-disk wrapper around the board document: format version plus enough
/// metadata to tell which instance wrote last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEnvelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub instance_id: Uuid,
    pub data: BoardDocument,
}

impl BoardEnvelope {
    pub fn new(data: BoardDocument, instance_id: Uuid) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            instance_id,
            data,
        }
    }

    pub fn empty(instance_id: Uuid) -> Self {
        Self::new(BoardDocument::default(), instance_id)
    }

    pub fn to_json(&self) -> JoinResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| JoinError::Serialization(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> JoinResult<Self> {
        let envelope: Self =
            serde_json::from_slice(bytes).map_err(|e| JoinError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(JoinError::Serialization(format!(
                "unsupported board file version: {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let envelope = BoardEnvelope::empty(Uuid::new_v4());
        let bytes = envelope.to_json().unwrap();
        let parsed = BoardEnvelope::from_json(&bytes).unwrap();
        assert_eq!(parsed.version, FORMAT_VERSION);
        assert_eq!(parsed.instance_id, envelope.instance_id);
        assert!(parsed.data.tasks.is_empty());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut envelope = BoardEnvelope::empty(Uuid::new_v4());
        envelope.version = 99;
        let bytes = serde_json::to_vec(&envelope).unwrap();
        let err = BoardEnvelope::from_json(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
