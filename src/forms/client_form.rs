use uuid::Uuid;

use crate::api::Mutation;
use crate::domain::{Client, ClientDraft, ClientStatus, ServiceTier, WcagLevel};
use crate::errors::FormError;

use super::record::{FormField, FormRecord};
use super::validation::{FieldDescriptor, FieldKind, Validator};
use super::wizard::{FormDefinition, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientField {
    Company,
    ContactName,
    Email,
    Phone,
    Status,
    Tier,
    ComplianceTarget,
    Industry,
    Website,
    Notes,
}

impl FormField for ClientField {
    const ALL: &'static [Self] = &[
        ClientField::Company,
        ClientField::ContactName,
        ClientField::Email,
        ClientField::Phone,
        ClientField::Status,
        ClientField::Tier,
        ClientField::ComplianceTarget,
        ClientField::Industry,
        ClientField::Website,
        ClientField::Notes,
    ];

    fn key(self) -> &'static str {
        match self {
            ClientField::Company => "company",
            ClientField::ContactName => "contactName",
            ClientField::Email => "email",
            ClientField::Phone => "phone",
            ClientField::Status => "status",
            ClientField::Tier => "tier",
            ClientField::ComplianceTarget => "complianceTarget",
            ClientField::Industry => "industry",
            ClientField::Website => "website",
            ClientField::Notes => "notes",
        }
    }
}

const STEPS: [WizardStep<ClientField>; 2] = [
    WizardStep {
        id: "contact",
        title: "Contact details",
        description: "Who we work with and how to reach them.",
        fields: &[
            ClientField::Company,
            ClientField::ContactName,
            ClientField::Email,
            ClientField::Phone,
        ],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "engagement",
        title: "Engagement",
        description: "Service level and the conformance target we audit against.",
        fields: &[
            ClientField::Status,
            ClientField::Tier,
            ClientField::ComplianceTarget,
            ClientField::Industry,
            ClientField::Website,
            ClientField::Notes,
        ],
        is_required: true,
        estimated_time: "2 min",
    },
];

/// Wizard that creates a client or edits an existing one.
#[derive(Debug, Clone)]
pub struct ClientForm {
    target: Option<Uuid>,
    defaults: FormRecord<ClientField>,
}

impl ClientForm {
    pub fn create() -> Self {
        let defaults = FormRecord::from_pairs([
            (ClientField::Status, ClientStatus::Active.label().to_string()),
            (ClientField::Tier, ServiceTier::Standard.label().to_string()),
            (ClientField::ComplianceTarget, WcagLevel::AA.label().to_string()),
        ]);
        Self {
            target: None,
            defaults,
        }
    }

    pub fn edit(client: &Client) -> Self {
        let mut pairs = vec![
            (ClientField::Company, client.company.clone()),
            (ClientField::ContactName, client.contact_name.clone()),
            (ClientField::Email, client.email.clone()),
            (ClientField::Status, client.status.label().to_string()),
            (ClientField::Tier, client.tier.label().to_string()),
            (ClientField::ComplianceTarget, client.compliance_target.label().to_string()),
        ];
        let optional = [
            (ClientField::Phone, &client.phone),
            (ClientField::Industry, &client.industry),
            (ClientField::Website, &client.website),
            (ClientField::Notes, &client.notes),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                pairs.push((field, value.clone()));
            }
        }
        Self {
            target: Some(client.id),
            defaults: FormRecord::from_pairs(pairs),
        }
    }
}

impl FormDefinition for ClientForm {
    type Field = ClientField;
    type Output = Mutation<ClientDraft>;

    fn name(&self) -> &'static str {
        "client"
    }

    fn steps(&self) -> &[WizardStep<ClientField>] {
        &STEPS
    }

    fn field(&self, field: ClientField) -> FieldDescriptor {
        match field {
            ClientField::Company => {
                FieldDescriptor::new("Company", FieldKind::Text, Validator::MaxLength(120))
            }
            ClientField::ContactName => {
                FieldDescriptor::new("Contact name", FieldKind::Text, Validator::MaxLength(120))
            }
            ClientField::Email => FieldDescriptor::new("Email", FieldKind::Email, Validator::Email),
            ClientField::Phone => FieldDescriptor::new("Phone", FieldKind::Text, Validator::custom(validate_phone))
                .with_optional()
                .with_help("Digits, spaces, dashes, parentheses and a leading + are accepted."),
            ClientField::Status => FieldDescriptor::choice("Status", ClientStatus::labels()),
            ClientField::Tier => FieldDescriptor::choice("Service tier", ServiceTier::labels()),
            ClientField::ComplianceTarget => {
                FieldDescriptor::choice("Compliance target", WcagLevel::labels())
                    .with_help("WCAG conformance level the client has committed to.")
            }
            ClientField::Industry => {
                FieldDescriptor::new("Industry", FieldKind::Text, Validator::MaxLength(80)).with_optional()
            }
            ClientField::Website => {
                FieldDescriptor::new("Website", FieldKind::Url, Validator::Url).with_optional()
            }
            ClientField::Notes => {
                FieldDescriptor::new("Notes", FieldKind::LongText, Validator::MaxLength(2000)).with_optional()
            }
        }
    }

    fn defaults(&self) -> FormRecord<ClientField> {
        self.defaults.clone()
    }

    fn assemble(&self, record: &FormRecord<ClientField>) -> Result<Mutation<ClientDraft>, FormError> {
        let draft = ClientDraft {
            company: record.require(ClientField::Company)?.to_string(),
            contact_name: record.require(ClientField::ContactName)?.to_string(),
            email: record.require(ClientField::Email)?.to_string(),
            phone: record.optional(ClientField::Phone),
            website: record.optional(ClientField::Website),
            industry: record.optional(ClientField::Industry),
            status: record.parse(ClientField::Status)?,
            tier: record.parse(ClientField::Tier)?,
            compliance_target: record.parse(ClientField::ComplianceTarget)?,
            notes: record.optional(ClientField::Notes),
        };
        Ok(match self.target {
            Some(id) => Mutation::update(id, draft),
            None => Mutation::create(draft),
        })
    }
}

fn validate_phone(value: &str) -> Result<String, String> {
    let allowed = |c: char| c.is_ascii_digit() || " -()".contains(c);
    let body = value.strip_prefix('+').unwrap_or(value);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if body.chars().all(allowed) && digits >= 7 {
        Ok(value.to_string())
    } else {
        Err("Enter a phone number with at least 7 digits".to_string())
    }
}
