use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Utc};
use redflag_types::Behavior;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Position after which the next recency page starts. Travels to clients as
/// an opaque string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl PageKey {
    pub fn after(behavior: &Behavior) -> Self {
        Self {
            created_at: behavior.created_at,
            id: behavior.id,
        }
    }

    pub fn encode(&self) -> String {
        B64.encode(format!("{}|{}", self.created_at.to_rfc3339(), self.id))
    }

    pub fn decode(cursor: &str) -> Result<Self> {
        let invalid = || Error::Validation("Invalid page cursor.".to_string());

        let bytes = B64.decode(cursor).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (ts, id) = raw.split_once('|').ok_or_else(invalid)?;

        Ok(Self {
            created_at: DateTime::parse_from_rfc3339(ts).map_err(|_| invalid())?.with_timezone(&Utc),
            id: id.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_the_wire() {
        let key = PageKey {
            created_at: "2026-03-04T05:06:07.089Z".parse().unwrap(),
            id: Uuid::new_v4(),
        };
        let encoded = key.encode();
        assert!(!encoded.contains('|'));
        assert_eq!(PageKey::decode(&encoded).unwrap(), key);
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let no_separator = B64.encode("no-separator");
        let bad_timestamp = B64.encode("yesterday|abc");
        let inputs: [&str; 4] = ["", "not base64!", &no_separator, &bad_timestamp];
        for bad in inputs {
            assert!(matches!(PageKey::decode(bad), Err(Error::Validation(_))), "{bad}");
        }
    }
}
