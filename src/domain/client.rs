//! Client relationship records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{ClientStatus, Identifiable, NamedEntity, ServiceTier, WcagLevel};

/// An organisation whose digital properties are audited for accessibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub company: String,
    pub contact_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub status: ClientStatus,
    pub tier: ServiceTier,
    #[serde(default)]
    pub compliance_target: WcagLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn new(company: impl Into<String>, contact_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company: company.into(),
            contact_name: contact_name.into(),
            email: email.into(),
            phone: None,
            website: None,
            industry: None,
            status: ClientStatus::Active,
            tier: ServiceTier::Standard,
            compliance_target: WcagLevel::AA,
            notes: None,
            created_at: None,
        }
    }

    /// Materialises a stored record from a submitted draft.
    pub fn from_draft(id: Uuid, draft: ClientDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            company: draft.company,
            contact_name: draft.contact_name,
            email: draft.email,
            phone: draft.phone,
            website: draft.website,
            industry: draft.industry,
            status: draft.status,
            tier: draft.tier,
            compliance_target: draft.compliance_target,
            notes: draft.notes,
            created_at: Some(created_at),
        }
    }

    /// Overwrites every editable field, keeping identity and creation time.
    pub fn apply(&mut self, draft: ClientDraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_draft(id, draft, Utc::now());
        self.created_at = created_at;
    }

    pub fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            company: self.company.clone(),
            contact_name: self.contact_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            industry: self.industry.clone(),
            status: self.status,
            tier: self.tier,
            compliance_target: self.compliance_target,
            notes: self.notes.clone(),
        }
    }
}

impl Identifiable for Client {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Client {
    fn name(&self) -> &str {
        &self.company
    }
}

/// Create/update payload for a client, as assembled by the client wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub company: String,
    pub contact_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub status: ClientStatus,
    pub tier: ServiceTier,
    pub compliance_target: WcagLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let client = Client::new("Acme", "Jo Smith", "jo@acme.test");
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["contactName"], "Jo Smith");
        assert_eq!(value["complianceTarget"], "AA");
        assert!(value.get("phone").is_none());
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let mut client = Client::new("Acme", "Jo", "jo@acme.test");
        client.created_at = None;
        let id = client.id;
        let mut draft = client.to_draft();
        draft.company = "Acme Corp".into();
        client.apply(draft);
        assert_eq!(client.id, id);
        assert_eq!(client.company, "Acme Corp");
        assert!(client.created_at.is_none());
    }
}
