//! Request and notification payloads exchanged with the structure source

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Parameters of a structure fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureParams {
    /// Ask the source to recompute its metadata before answering
    pub update_metadata: bool,
    /// Selected group identifiers per project; unrestricted projects are omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<String>>>,
    /// Restrict the answer to these top-level entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_projects: Option<Vec<String>>,
}

impl StructureParams {
    pub fn full(update_metadata: bool, groups: Option<BTreeMap<String, Vec<String>>>) -> Self {
        Self {
            update_metadata,
            groups,
            affected_projects: None,
        }
    }

    pub fn scoped(affected: Vec<String>, groups: Option<BTreeMap<String, Vec<String>>>) -> Self {
        Self {
            update_metadata: false,
            groups,
            affected_projects: Some(affected),
        }
    }

    pub fn is_scoped(&self) -> bool {
        self.affected_projects.is_some()
    }
}

/// Signal that the source's index changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexUpdated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_projects: Option<Vec<String>>,
}

impl IndexUpdated {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn projects<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            affected_projects: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Affected keys, or `None` when the whole tree must be refetched
    ///
    /// An empty list means the same as an absent one.
    pub fn scope(&self) -> Option<&[String]> {
        self.affected_projects
            .as_deref()
            .filter(|keys| !keys.is_empty())
    }
}

/// A group the source can restrict a project's structure to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub identifier: String,
    pub display_name: String,
}

/// Group catalog entry for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGroups {
    pub project_name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl ProjectGroups {
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.identifier.as_str())
    }
}

/// Decode a group catalog, dropping malformed entries
pub fn decode_groups(json: &Value) -> Vec<ProjectGroups> {
    let Some(items) = json.as_array() else {
        if !json.is_null() {
            warn!("Group catalog is not an array: {}", json);
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match ProjectGroups::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Dropping malformed group catalog entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_params_omit_scope() {
        let params = StructureParams::full(true, None);
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"updateMetadata": true}));
    }

    #[test]
    fn test_scoped_params_wire_shape() {
        let mut groups = BTreeMap::new();
        groups.insert("petclinic".to_string(), vec!["web".to_string()]);
        let params = StructureParams::scoped(vec!["petclinic".to_string()], Some(groups));

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "updateMetadata": false,
                "groups": {"petclinic": ["web"]},
                "affectedProjects": ["petclinic"]
            })
        );
    }

    #[test]
    fn test_index_updated_scope() {
        assert_eq!(IndexUpdated::all().scope(), None);
        assert_eq!(IndexUpdated::projects(Vec::<String>::new()).scope(), None);
        assert_eq!(
            IndexUpdated::projects(["a"]).scope(),
            Some(&["a".to_string()][..])
        );

        let parsed: IndexUpdated = serde_json::from_value(json!({"affectedProjects": ["x"]})).unwrap();
        assert_eq!(parsed.scope().map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_decode_groups_skips_bad_entries() {
        let catalog = decode_groups(&json!([
            {"projectName": "petclinic", "groups": [
                {"identifier": "web", "displayName": "Web"},
                {"identifier": "data", "displayName": "Data"}
            ]},
            {"groups": []},
            {"projectName": "empty"}
        ]));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].identifiers().collect::<Vec<_>>(), vec!["web", "data"]);
        assert!(catalog[1].groups.is_empty());
        assert!(decode_groups(&json!(null)).is_empty());
    }
}
