//! Identity registry (IPRS) lookup. The registry is an opaque collaborator
//! reached over HTTP; its error messages are surfaced to the client verbatim.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::{IprsData, UserType, VerificationData};

#[derive(Debug, Deserialize)]
pub struct RegistryEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RegistryRecord>,
}

/// The registry's wire shape for a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub id_no: String,
    pub full_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
    #[serde(default)]
    pub county_of_birth: Option<String>,
}

#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    async fn lookup(&self, id_number: &str) -> Result<RegistryRecord>;
}

pub struct HttpIdentityRegistry {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpIdentityRegistry {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("IPRS_URL").context("IPRS_URL must be set in .env")?;
        let api_key = std::env::var("IPRS_API_KEY").ok();
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl IdentityRegistry for HttpIdentityRegistry {
    async fn lookup(&self, id_number: &str) -> Result<RegistryRecord> {
        let mut request = self
            .client
            .post(format!("{}/iprs/lookup", self.base_url))
            .json(&serde_json::json!({ "id_number": id_number }));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let envelope: RegistryEnvelope = request
            .send()
            .await
            .context("Identity registry is unreachable")?
            .json()
            .await
            .context("Identity registry returned an unreadable response")?;

        if !envelope.success {
            return Err(anyhow!(envelope
                .message
                .unwrap_or_else(|| "Identity verification failed".to_string())));
        }
        envelope
            .data
            .ok_or_else(|| anyhow!("No record found for the supplied ID number"))
    }
}

/// Normalize the registry's wire record into the session's shape.
pub fn normalize(record: &RegistryRecord, user_type: UserType) -> (IprsData, VerificationData) {
    let iprs = IprsData {
        id_number: record.id_no.clone(),
        full_name: record.full_name.clone(),
        gender: record.gender.clone(),
        date_of_birth: record.date_of_birth.clone(),
        phone_number: record.phone_number.clone(),
        email: record.email.clone(),
        nationality: record.citizenship.clone(),
        county_of_birth: record.county_of_birth.clone(),
    };
    let verification = VerificationData {
        full_name: record.full_name.clone(),
        user_type,
    };
    (iprs, verification)
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Registry that answers from a fixed table; unknown IDs fail the way
    /// the real registry does.
    pub struct MockRegistry {
        pub records: Vec<RegistryRecord>,
    }

    #[async_trait]
    impl IdentityRegistry for MockRegistry {
        async fn lookup(&self, id_number: &str) -> Result<RegistryRecord> {
            self.records
                .iter()
                .find(|r| r.id_no == id_number)
                .cloned()
                .ok_or_else(|| anyhow!("No record found for the supplied ID number"))
        }
    }

    pub fn jane_doe() -> RegistryRecord {
        RegistryRecord {
            id_no: "12345678".to_string(),
            full_name: "Jane Doe".to_string(),
            gender: Some("F".to_string()),
            date_of_birth: Some("1990-04-12".to_string()),
            phone_number: Some("0712345678".to_string()),
            email: Some("jane@example.com".to_string()),
            citizenship: Some("Kenyan".to_string()),
            county_of_birth: Some("Kisumu".to_string()),
        }
    }
}
