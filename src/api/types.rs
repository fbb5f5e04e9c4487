//! Jira API response types and the domain types they are unified into.
//!
//! Cloud (REST v3) and Server/DC (REST v2) return different shapes for the
//! project list. Each shape gets its own type and is decoded independently;
//! only after a successful decode are the results converted into [`Project`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Avatar URLs keyed by resolution label (e.g. `"48x48"`).
///
/// Jira returns 16x16, 24x24, 32x32 and 48x48 on most installs, but the set
/// is not guaranteed, so the labels are kept as an open map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrls(BTreeMap<String, String>);

/// Resolution labels tried before falling back to any available entry.
const PREFERRED_AVATAR_SIZES: [&str; 2] = ["48x48", "32x32"];

impl AvatarUrls {
    /// Pick the avatar URL to display.
    ///
    /// Prefers 48x48, then 32x32, then the first remaining entry in label
    /// order. Returns `None` for an empty map.
    pub fn preferred(&self) -> Option<&str> {
        PREFERRED_AVATAR_SIZES
            .iter()
            .find_map(|size| self.0.get(*size))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AvatarUrls {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn preferred_avatar(urls: Option<&AvatarUrls>) -> String {
    urls.and_then(AvatarUrls::preferred)
        .unwrap_or_default()
        .to_string()
}

/// A project entry as both API generations return it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    /// The project key (e.g., "PROJ").
    pub key: String,
    /// The project name.
    pub name: String,
    /// URLs for the project's avatar images.
    #[serde(default)]
    pub avatar_urls: Option<AvatarUrls>,
}

/// Paginated project search page.
///
/// Returned by `GET /rest/api/3/project/search` on Jira Cloud.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProjectPage {
    /// The projects on this page.
    pub values: Vec<RawProject>,
    /// Whether this is the last page.
    #[serde(default)]
    pub is_last: Option<bool>,
    /// Total number of visible projects.
    #[serde(default)]
    pub total: Option<u64>,
}

/// Flat project list.
///
/// Returned by `GET /rest/api/2/project` on Jira Server and Data Center.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ServerProjectList(pub Vec<RawProject>);

/// The authenticated user.
///
/// Returned by `GET /rest/api/{2,3}/myself`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Myself {
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
    /// URLs for the user's avatar images.
    #[serde(default)]
    pub avatar_urls: Option<AvatarUrls>,
}

/// A Jira project snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Short unique identifier, compared case-insensitively.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Absolute or server-relative avatar URL; empty when the server sent none.
    pub avatar_url: String,
}

impl Project {
    /// Whether this project's key matches `key`, ignoring ASCII case.
    pub fn has_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        Self {
            avatar_url: preferred_avatar(raw.avatar_urls.as_ref()),
            key: raw.key,
            name: raw.name,
        }
    }
}

impl From<CloudProjectPage> for Vec<Project> {
    fn from(page: CloudProjectPage) -> Self {
        page.values.into_iter().map(Project::from).collect()
    }
}

impl From<ServerProjectList> for Vec<Project> {
    fn from(list: ServerProjectList) -> Self {
        list.0.into_iter().map(Project::from).collect()
    }
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
    /// Preferred avatar URL; empty when the server sent none.
    pub avatar_url: String,
}

impl From<Myself> for Profile {
    fn from(myself: Myself) -> Self {
        Self {
            avatar_url: preferred_avatar(myself.avatar_urls.as_ref()),
            display_name: myself.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_avatar_picks_48() {
        let urls: AvatarUrls = [("24x24", "a"), ("48x48", "b"), ("32x32", "c")]
            .into_iter()
            .collect();
        assert_eq!(urls.preferred(), Some("b"));
    }

    #[test]
    fn test_preferred_avatar_falls_back_to_32() {
        let urls: AvatarUrls = [("16x16", "x"), ("32x32", "c")].into_iter().collect();
        assert_eq!(urls.preferred(), Some("c"));
    }

    #[test]
    fn test_preferred_avatar_takes_any_available() {
        let urls: AvatarUrls = [("16x16", "x")].into_iter().collect();
        assert_eq!(urls.preferred(), Some("x"));
    }

    #[test]
    fn test_preferred_avatar_fallback_is_deterministic() {
        let urls: AvatarUrls = [("24x24", "b"), ("16x16", "a")].into_iter().collect();
        assert_eq!(urls.preferred(), Some("a"));
    }

    #[test]
    fn test_preferred_avatar_empty_map() {
        assert_eq!(AvatarUrls::default().preferred(), None);
        assert_eq!(preferred_avatar(None), "");
    }

    #[test]
    fn test_parse_cloud_project_page() {
        let json = r#"{
            "self": "https://company.atlassian.net/rest/api/3/project/search?startAt=0",
            "maxResults": 50,
            "startAt": 0,
            "total": 2,
            "isLast": true,
            "values": [
                {
                    "id": "10000",
                    "key": "PROJ",
                    "name": "My Project",
                    "avatarUrls": {
                        "48x48": "https://company.atlassian.net/avatar/48",
                        "24x24": "https://company.atlassian.net/avatar/24"
                    }
                },
                {"id": "10001", "key": "OPS", "name": "Operations"}
            ]
        }"#;

        let page: CloudProjectPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.is_last, Some(true));
        assert_eq!(page.total, Some(2));

        let projects: Vec<Project> = page.into();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].key, "PROJ");
        assert_eq!(projects[0].avatar_url, "https://company.atlassian.net/avatar/48");
        assert_eq!(projects[1].avatar_url, "");
    }

    #[test]
    fn test_cloud_page_requires_values() {
        assert!(serde_json::from_str::<CloudProjectPage>("[]").is_err());
        assert!(serde_json::from_str::<CloudProjectPage>("{}").is_err());
    }

    #[test]
    fn test_parse_server_project_list() {
        let json = r#"[
            {
                "key": "DC",
                "name": "Data Center",
                "avatarUrls": {"32x32": "/secure/projectavatar?size=medium&pid=1"}
            }
        ]"#;

        let list: ServerProjectList = serde_json::from_str(json).unwrap();
        let projects: Vec<Project> = list.into();
        assert_eq!(
            projects,
            vec![Project {
                key: "DC".to_string(),
                name: "Data Center".to_string(),
                avatar_url: "/secure/projectavatar?size=medium&pid=1".to_string(),
            }]
        );
    }

    #[test]
    fn test_server_list_rejects_cloud_shape() {
        assert!(serde_json::from_str::<ServerProjectList>(r#"{"values": []}"#).is_err());
    }

    #[test]
    fn test_parse_myself() {
        let json = r#"{
            "accountId": "abc123",
            "displayName": "Test User",
            "emailAddress": "test@example.com",
            "active": true,
            "avatarUrls": {"16x16": "https://avatars.example.com/16"}
        }"#;

        let myself: Myself = serde_json::from_str(json).unwrap();
        let profile = Profile::from(myself);
        assert_eq!(profile.display_name, "Test User");
        assert_eq!(profile.avatar_url, "https://avatars.example.com/16");
    }

    #[test]
    fn test_parse_myself_without_display_name() {
        let myself: Myself = serde_json::from_str(r#"{"name": "svc-bot"}"#).unwrap();
        let profile = Profile::from(myself);
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.avatar_url, "");
    }

    #[test]
    fn test_project_key_compare_ignores_case() {
        let project = Project {
            key: "PROJ".to_string(),
            ..Default::default()
        };
        assert!(project.has_key("proj"));
        assert!(project.has_key("PROJ"));
        assert!(!project.has_key("PRO"));
    }
}
