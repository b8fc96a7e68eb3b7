use crate::utils::error::ServiceError;
use crate::Result;
use serde::Deserialize;
use std::path::Path;

/// Firestore access credentials, read once at startup from a local JSON
/// file (`firebase_key.json` by default).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreCredentials {
    pub project_id: String,
    pub api_key: String,
}

impl StoreCredentials {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Credentials(format!(
                "Cannot read credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        let credentials: StoreCredentials = serde_json::from_str(&contents).map_err(|e| {
            ServiceError::Credentials(format!(
                "Malformed credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        if credentials.project_id.is_empty() || credentials.api_key.is_empty() {
            return Err(ServiceError::Credentials(
                "Credential file must set project_id and api_key".to_string(),
            ));
        }

        Ok(credentials)
    }
}
