use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External platform integrated with the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mailcow,
    Chatwoot,
    Cpanel,
}

impl Platform {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mailcow => "mailcow",
            Self::Chatwoot => "chatwoot",
            Self::Cpanel => "cpanel",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mailcow" => Some(Self::Mailcow),
            "chatwoot" => Some(Self::Chatwoot),
            "cpanel" => Some(Self::Cpanel),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier a platform handed back for a provisioned account.
///
/// Tagged per platform so the merge step is exhaustively type-checked
/// instead of relying on untyped JSON blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum PlatformIdentity {
    Mailcow {
        email: String,
    },
    Chatwoot {
        agent_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        team_id: Option<i64>,
    },
    Cpanel {
        email: String,
    },
}

impl PlatformIdentity {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Mailcow { .. } => Platform::Mailcow,
            Self::Chatwoot { .. } => Platform::Chatwoot,
            Self::Cpanel { .. } => Platform::Cpanel,
        }
    }
}

/// Aggregate record of a member's presence across external platforms.
///
/// One row exists per member who has been provisioned at least once.
/// Subsequent provisioning runs merge into the existing row: platform
/// lists are unioned and identity entries are replaced per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedUser {
    pub id: Uuid,
    pub team_member_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub status: String,
    pub platforms: Vec<Platform>,
    pub platform_identities: BTreeMap<Platform, PlatformIdentity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagedUser {
    /// Merge freshly provisioned identities into this aggregate.
    ///
    /// Platform names are unioned (deduplicated); identity entries are
    /// shallow-merged with the new value winning per platform. The
    /// denormalized email/full name are refreshed from the latest run.
    pub fn merge(&mut self, full_name: &str, email: Option<&str>, new: Vec<PlatformIdentity>) {
        for identity in new {
            let platform = identity.platform();
            if !self.platforms.contains(&platform) {
                self.platforms.push(platform);
            }
            self.platform_identities.insert(platform, identity);
        }
        self.full_name = full_name.to_string();
        if let Some(email) = email {
            self.email = Some(email.to_string());
        }
    }
}

/// Input for creating a managed user on first provisioning.
#[derive(Debug, Clone)]
pub struct CreateManagedUser {
    pub team_member_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub identities: Vec<PlatformIdentity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn managed(identities: Vec<PlatformIdentity>) -> ManagedUser {
        let platforms = identities.iter().map(PlatformIdentity::platform).collect();
        let platform_identities = identities
            .into_iter()
            .map(|i| (i.platform(), i))
            .collect();
        ManagedUser {
            id: Uuid::new_v4(),
            team_member_id: Uuid::new_v4(),
            full_name: "John Doe".into(),
            email: Some("doe.john_sales@example.com".into()),
            status: "active".into(),
            platforms,
            platform_identities,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn merge_is_additive_across_platforms() {
        let mut user = managed(vec![PlatformIdentity::Mailcow {
            email: "doe.john_sales@example.com".into(),
        }]);

        user.merge(
            "John Doe",
            None,
            vec![PlatformIdentity::Chatwoot {
                agent_id: 42,
                team_id: None,
            }],
        );

        assert!(user.platforms.contains(&Platform::Mailcow));
        assert!(user.platforms.contains(&Platform::Chatwoot));
        assert!(user.platform_identities.contains_key(&Platform::Mailcow));
        assert!(user.platform_identities.contains_key(&Platform::Chatwoot));
    }

    #[test]
    fn merge_replaces_existing_identity_without_duplicating_platform() {
        let mut user = managed(vec![PlatformIdentity::Chatwoot {
            agent_id: 1,
            team_id: None,
        }]);

        user.merge(
            "John Doe",
            None,
            vec![PlatformIdentity::Chatwoot {
                agent_id: 2,
                team_id: Some(7),
            }],
        );

        assert_eq!(user.platforms.len(), 1);
        assert_eq!(
            user.platform_identities[&Platform::Chatwoot],
            PlatformIdentity::Chatwoot {
                agent_id: 2,
                team_id: Some(7)
            }
        );
    }

    #[test]
    fn identity_serializes_with_platform_tag() {
        let identity = PlatformIdentity::Mailcow {
            email: "a@b.c".into(),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["platform"], "mailcow");
        assert_eq!(json["email"], "a@b.c");
    }
}
