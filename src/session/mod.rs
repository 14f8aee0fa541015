pub mod guard;
pub mod store;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Individual,
    Company,
}

/// Personal record returned by the identity registry, normalized.
/// Immutable once fetched; only replaced wholesale by a new lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IprsData {
    pub id_number: String,
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub nationality: Option<String>,
    pub county_of_birth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationData {
    pub full_name: String,
    pub user_type: UserType,
}

/// Organizational entity record, company path only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityResponse {
    pub entity_id: String,
    pub company_name: String,
    pub director_id: String,
    /// Designation the director selected for the new user.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationData {
    pub id_number: String,
    pub phone_number: String,
    pub email: String,
    pub user_type: UserType,
}

/// Payload that was sent to account creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreationData {
    pub iprs_id: String,
    pub phone_number: String,
    pub email: String,
    pub entity_id: Option<String>,
    pub director_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreationResponse {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinData {
    pub pin: String,
    pub confirm_pin: String,
}

/// The whole in-progress signup for one browser. Each step adds its own
/// sub-record; nothing is removed until the flow completes or is abandoned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupSession {
    pub iprs_data: Option<IprsData>,
    pub verification_data: Option<VerificationData>,
    pub entity_response: Option<EntityResponse>,
    pub authentication_data: Option<AuthenticationData>,
    pub user_creation_data: Option<UserCreationData>,
    pub user_creation_response: Option<UserCreationResponse>,
    pub pin_data: Option<PinData>,
}

/// Shallow-merge patch: `Some` fields overwrite, `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    pub iprs_data: Option<IprsData>,
    pub verification_data: Option<VerificationData>,
    pub entity_response: Option<EntityResponse>,
    pub authentication_data: Option<AuthenticationData>,
    pub user_creation_data: Option<UserCreationData>,
    pub user_creation_response: Option<UserCreationResponse>,
    pub pin_data: Option<PinData>,
}

impl SignupSession {
    pub fn merge(&mut self, patch: SessionPatch) {
        if let Some(v) = patch.iprs_data {
            self.iprs_data = Some(v);
        }
        if let Some(v) = patch.verification_data {
            self.verification_data = Some(v);
        }
        if let Some(v) = patch.entity_response {
            self.entity_response = Some(v);
        }
        if let Some(v) = patch.authentication_data {
            self.authentication_data = Some(v);
        }
        if let Some(v) = patch.user_creation_data {
            self.user_creation_data = Some(v);
        }
        if let Some(v) = patch.user_creation_response {
            self.user_creation_response = Some(v);
        }
        if let Some(v) = patch.pin_data {
            self.pin_data = Some(v);
        }
    }

    /// The one place the durable user id is read from. OTP and PIN steps
    /// must not reach into the creation response themselves.
    pub fn user_id(&self) -> Option<i32> {
        self.user_creation_response.as_ref().map(|r| r.id)
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.verification_data.as_ref().map(|v| v.user_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iprs(id: &str) -> IprsData {
        IprsData {
            id_number: id.to_string(),
            full_name: "Jane Doe".to_string(),
            gender: Some("F".to_string()),
            date_of_birth: Some("1990-04-12".to_string()),
            phone_number: Some("0712345678".to_string()),
            email: Some("jane@example.com".to_string()),
            nationality: Some("Kenyan".to_string()),
            county_of_birth: Some("Kisumu".to_string()),
        }
    }

    #[test]
    fn merge_is_additive() {
        let mut session = SignupSession::default();
        session.merge(SessionPatch {
            iprs_data: Some(iprs("12345678")),
            verification_data: Some(VerificationData {
                full_name: "Jane Doe".to_string(),
                user_type: UserType::Individual,
            }),
            ..Default::default()
        });

        // A later step's patch must not clobber earlier fields.
        session.merge(SessionPatch {
            user_creation_response: Some(UserCreationResponse { id: 42 }),
            ..Default::default()
        });

        assert_eq!(session.iprs_data.as_ref().unwrap().id_number, "12345678");
        assert_eq!(session.user_id(), Some(42));
        assert_eq!(session.user_type(), Some(UserType::Individual));
    }

    #[test]
    fn new_lookup_replaces_old_iprs_record() {
        let mut session = SignupSession::default();
        session.merge(SessionPatch {
            iprs_data: Some(iprs("12345678")),
            ..Default::default()
        });
        session.merge(SessionPatch {
            iprs_data: Some(iprs("87654321")),
            ..Default::default()
        });
        assert_eq!(session.iprs_data.unwrap().id_number, "87654321");
    }

    #[test]
    fn user_id_absent_until_creation() {
        let session = SignupSession::default();
        assert_eq!(session.user_id(), None);
    }
}
