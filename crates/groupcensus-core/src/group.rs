//! Mail-enabled group records and type classification.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Group type marker carried by Microsoft 365 groups.
pub const UNIFIED_MARKER: &str = "Unified";

/// Resolved group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupType {
    /// Mail-enabled group without the unified marker.
    DistributionList,
    /// Microsoft 365 group.
    M365Group,
}

impl GroupType {
    /// Both group types, in report order.
    pub const ALL: [GroupType; 2] = [GroupType::DistributionList, GroupType::M365Group];

    /// Value written to the `GroupType` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DistributionList => "DistributionList",
            Self::M365Group => "M365Group",
        }
    }

    /// Short tag used in the console summary.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::DistributionList => "DL",
            Self::M365Group => "M365",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group entry as returned by the directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGroup {
    /// Directory object ID.
    pub id: Option<String>,
    /// Group display name.
    pub display_name: Option<String>,
    /// Mail address.
    pub mail: Option<String>,
    /// Exchange proxy addresses (`SMTP:` marks the primary).
    #[serde(deserialize_with = "null_as_default")]
    pub proxy_addresses: Vec<String>,
    /// Raw group type markers.
    #[serde(deserialize_with = "null_as_default")]
    pub group_types: Vec<String>,
}

// Graph returns `null` rather than omitting empty collections on some objects.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawGroup {
    /// Resolves the primary SMTP address.
    ///
    /// Prefers the upper-case `SMTP:` proxy address, then `mail`.
    #[must_use]
    pub fn primary_smtp_address(&self) -> String {
        self.proxy_addresses
            .iter()
            .find_map(|addr| addr.strip_prefix("SMTP:"))
            .or(self.mail.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Classifies a group from its type markers.
///
/// Total: anything without the unified marker is a Distribution List.
#[must_use]
pub fn classify(group_types: &[String]) -> GroupType {
    if group_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(UNIFIED_MARKER))
    {
        GroupType::M365Group
    } else {
        GroupType::DistributionList
    }
}

/// A classified group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Directory object ID, empty when the directory returned none.
    pub id: String,
    /// Group display name.
    pub display_name: String,
    /// Primary SMTP address.
    pub primary_smtp_address: String,
    /// Raw type markers as returned by the directory.
    pub group_type_markers: Vec<String>,
    group_type: GroupType,
}

impl GroupRecord {
    /// Resolved group type.
    #[must_use]
    pub fn group_type(&self) -> GroupType {
        self.group_type
    }

    /// Returns the identifier if it is usable for a lookup.
    #[must_use]
    pub fn lookup_id(&self) -> Option<&str> {
        let id = self.id.trim();
        (!id.is_empty()).then_some(id)
    }

    /// Name used in log lines: display name, then address, then id.
    #[must_use]
    pub fn label(&self) -> &str {
        [&self.display_name, &self.primary_smtp_address, &self.id]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("<unnamed group>", String::as_str)
    }
}

impl From<RawGroup> for GroupRecord {
    fn from(raw: RawGroup) -> Self {
        let group_type = classify(&raw.group_types);
        let primary_smtp_address = raw.primary_smtp_address();
        Self {
            id: raw.id.unwrap_or_default(),
            display_name: raw.display_name.unwrap_or_default(),
            primary_smtp_address,
            group_type_markers: raw.group_types,
            group_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_markers_classify_as_distribution_list() {
        assert_eq!(classify(&[]), GroupType::DistributionList);
    }

    #[test]
    fn test_unified_marker_classifies_as_m365() {
        assert_eq!(classify(&["Unified".to_string()]), GroupType::M365Group);
        assert_eq!(
            classify(&["DynamicMembership".to_string(), "unified".to_string()]),
            GroupType::M365Group
        );
    }

    #[test]
    fn test_other_markers_classify_as_distribution_list() {
        assert_eq!(
            classify(&["DynamicMembership".to_string()]),
            GroupType::DistributionList
        );
    }

    #[test]
    fn test_raw_group_from_graph_json() {
        let json = serde_json::json!({
            "id": "group-123",
            "displayName": "Sales",
            "mail": "sales@contoso.com",
            "proxyAddresses": ["smtp:sales@contoso.onmicrosoft.com", "SMTP:sales@contoso.com"],
            "groupTypes": ["Unified"]
        });

        let raw: RawGroup = serde_json::from_value(json).unwrap();
        let record = GroupRecord::from(raw);
        assert_eq!(record.id, "group-123");
        assert_eq!(record.primary_smtp_address, "sales@contoso.com");
        assert_eq!(record.group_type(), GroupType::M365Group);
    }

    #[test]
    fn test_missing_fields_default() {
        let raw: RawGroup = serde_json::from_value(serde_json::json!({})).unwrap();
        let record = GroupRecord::from(raw);
        assert!(record.lookup_id().is_none());
        assert_eq!(record.display_name, "");
        assert_eq!(record.primary_smtp_address, "");
        assert_eq!(record.group_type(), GroupType::DistributionList);
        assert_eq!(record.label(), "<unnamed group>");
    }

    #[test]
    fn test_null_collections_default() {
        let json = serde_json::json!({
            "id": "group-1",
            "mail": null,
            "proxyAddresses": null,
            "groupTypes": null
        });
        let raw: RawGroup = serde_json::from_value(json).unwrap();
        assert!(raw.group_types.is_empty());
        assert!(raw.proxy_addresses.is_empty());
    }

    #[test]
    fn test_primary_address_falls_back_to_mail() {
        let raw = RawGroup {
            mail: Some("ops@contoso.com".into()),
            proxy_addresses: vec!["smtp:alias@contoso.com".into()],
            ..Default::default()
        };
        assert_eq!(raw.primary_smtp_address(), "ops@contoso.com");
    }

    #[test]
    fn test_blank_id_is_not_usable() {
        let record = GroupRecord::from(RawGroup {
            id: Some("   ".into()),
            display_name: Some("Blank".into()),
            ..Default::default()
        });
        assert!(record.lookup_id().is_none());
        assert_eq!(record.label(), "Blank");
    }
}
