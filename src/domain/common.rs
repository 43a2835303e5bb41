//! Shared traits and categorical enums for compliance records.

use uuid::Uuid;

/// Exposes a stable identifier for records served by the backend.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to a record's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// First eight hex digits of an id, as shown in tables and choice labels.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

/// Declares a closed set of choices with a wire slug and a display label.
///
/// The slug is what the REST backend stores and what listing filters match
/// against; the label is what tables and prompts show.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($slug:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub enum $name {
            $( #[serde(rename = $slug)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const SLUGS: &'static [&'static str] = &[$($slug),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Display labels in declaration order, for choice prompts.
            pub fn labels() -> Vec<String> {
                Self::ALL.iter().map(|value| value.label().to_string()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| {
                        candidate.as_str().eq_ignore_ascii_case(normalized)
                            || candidate.label().eq_ignore_ascii_case(normalized)
                    })
                    .ok_or_else(|| {
                        format!("Value must be one of: {}", Self::labels().join(", "))
                    })
            }
        }
    };
}

choice_enum! {
    /// WCAG conformance level targeted by a client or project, or violated by an issue.
    WcagLevel {
        A => ("A", "A"),
        AA => ("AA", "AA"),
        AAA => ("AAA", "AAA"),
    }
}

impl Default for WcagLevel {
    fn default() -> Self {
        WcagLevel::AA
    }
}

choice_enum! {
    /// Relationship state of a client account.
    ClientStatus {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Pending => ("pending", "Pending"),
        Prospect => ("prospect", "Prospect"),
    }
}

choice_enum! {
    /// Contracted service level.
    ServiceTier {
        Basic => ("basic", "Basic"),
        Standard => ("standard", "Standard"),
        Premium => ("premium", "Premium"),
        Enterprise => ("enterprise", "Enterprise"),
    }
}

choice_enum! {
    ProjectStatus {
        Planning => ("planning", "Planning"),
        Active => ("active", "Active"),
        OnHold => ("on_hold", "On Hold"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

impl ProjectStatus {
    /// Returns `true` for statuses where no further work is expected.
    pub fn is_closed(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }
}

choice_enum! {
    Priority {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Critical => ("critical", "Critical"),
    }
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

choice_enum! {
    /// Impact of an accessibility issue on affected users.
    Severity {
        Critical => ("critical", "Critical"),
        Serious => ("serious", "Serious"),
        Moderate => ("moderate", "Moderate"),
        Minor => ("minor", "Minor"),
    }
}

impl Severity {
    /// Numeric rank where higher means more severe; used for sorting.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::Serious => 3,
            Severity::Moderate => 2,
            Severity::Minor => 1,
        }
    }
}

choice_enum! {
    IssueStatus {
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In Progress"),
        Resolved => ("resolved", "Resolved"),
        Verified => ("verified", "Verified"),
        WontFix => ("wont_fix", "Won't Fix"),
    }
}

impl IssueStatus {
    /// Issues that still need remediation work.
    pub fn is_open(self) -> bool {
        matches!(self, IssueStatus::Open | IssueStatus::InProgress)
    }

    /// Issues counted as remediated for the resolution rate.
    pub fn is_resolved(self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Verified)
    }
}
