//! Records served by the profile backend.
//!
//! Field names follow the backend's camelCase JSON (including the
//! `orchidID` / `scopusID` spellings). The client only ever holds read-only
//! copies; updates go through [`SocialProfileUpdate`] or [`EditProfileData`].

use crate::form::FormInput;
use serde::{Deserialize, Deserializer, Serialize};

/// Shown in place of a project or patent description the backend left out.
pub const DESCRIPTION_PLACEHOLDER: &str = "No description provided.";

/// Profile of the logged-in faculty member (`GET /profile`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub designation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(rename = "orchidID", default, skip_serializing_if = "Option::is_none")]
    pub orchid_id: Option<String>,
    #[serde(rename = "scopusID", default, skip_serializing_if = "Option::is_none")]
    pub scopus_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_scholar: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub research_interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_links: Vec<String>,
}

impl ProfileRecord {
    /// Initial values for the social/academic links form.
    ///
    /// Absent links become empty strings, which the form treats as "unset".
    pub fn social_defaults(&self) -> FormInput {
        let mut input = FormInput::new();
        input.insert(
            "linkedin".to_string(),
            self.linkedin.clone().unwrap_or_default(),
        );
        input.insert(
            "orchidID".to_string(),
            self.orchid_id.clone().unwrap_or_default(),
        );
        input.insert(
            "scopusID".to_string(),
            self.scopus_id.clone().unwrap_or_default(),
        );
        input.insert(
            "googleScholar".to_string(),
            self.google_scholar.clone().unwrap_or_default(),
        );
        input
    }
}

/// Read `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entry of `GET /project/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectRecord {
    pub fn display_description(&self) -> &str {
        display_description(self.description.as_deref())
    }
}

/// Entry of `GET /patent/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PatentRecord {
    pub fn display_description(&self) -> &str {
        display_description(self.description.as_deref())
    }
}

fn display_description(description: Option<&str>) -> &str {
    match description {
        Some(text) if !text.trim().is_empty() => text,
        _ => DESCRIPTION_PLACEHOLDER,
    }
}

/// Body of `PUT /profile/edit` sent by the links form.
///
/// An empty string clears the corresponding link on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(rename = "orchidID", default, skip_serializing_if = "Option::is_none")]
    pub orchid_id: Option<String>,
    #[serde(rename = "scopusID", default, skip_serializing_if = "Option::is_none")]
    pub scopus_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_scholar: Option<String>,
}

/// Every field `PUT /profile/edit` accepts. Unset fields are left untouched
/// by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(rename = "orchidID", default, skip_serializing_if = "Option::is_none")]
    pub orchid_id: Option<String>,
    #[serde(rename = "scopusID", default, skip_serializing_if = "Option::is_none")]
    pub scopus_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_scholar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_links: Option<Vec<String>>,
}

impl From<SocialProfileUpdate> for EditProfileData {
    fn from(update: SocialProfileUpdate) -> Self {
        Self {
            linkedin: update.linkedin,
            orchid_id: update.orchid_id,
            scopus_id: update.scopus_id,
            google_scholar: update.google_scholar,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_uses_backend_field_names() {
        let profile: ProfileRecord = serde_json::from_value(json!({
            "name": "A. Smith",
            "designation": "Professor",
            "description": "Works on compilers",
            "orchidID": "0000-0002-1825-0097",
            "scopusID": "57190000000",
            "googleScholar": "https://scholar.google.com/citations?user=abc",
            "researchInterests": ["Compilers", "Type systems"],
            "courses": ["CS101"],
            "unknownField": true
        }))
        .unwrap();

        assert_eq!(profile.orchid_id.as_deref(), Some("0000-0002-1825-0097"));
        assert_eq!(profile.scopus_id.as_deref(), Some("57190000000"));
        assert_eq!(profile.linkedin, None);
        assert_eq!(profile.research_interests, vec!["Compilers", "Type systems"]);
    }

    #[test]
    fn test_profile_tolerates_missing_lists() {
        let profile: ProfileRecord =
            serde_json::from_value(json!({ "name": "A. Smith" })).unwrap();
        assert!(profile.courses.is_empty());
        assert!(profile.research_interests.is_empty());
        assert_eq!(profile.designation, "");
    }

    #[test]
    fn test_profile_reads_null_as_empty() {
        let profile: ProfileRecord = serde_json::from_value(json!({
            "name": "A. Smith",
            "designation": null,
            "description": null,
            "researchInterests": null,
            "courses": null,
            "education": null,
            "additionalLinks": null,
            "linkedin": null
        }))
        .unwrap();
        assert_eq!(profile.designation, "");
        assert_eq!(profile.description, "");
        assert!(profile.research_interests.is_empty());
        assert!(profile.courses.is_empty());
        assert_eq!(profile.linkedin, None);
        assert_eq!(profile.social_defaults()["linkedin"], "");
    }

    #[test]
    fn test_social_defaults_fill_missing_links_with_empty_strings() {
        let profile = ProfileRecord {
            name: "A. Smith".to_string(),
            linkedin: Some(String::new()),
            scopus_id: Some("123".to_string()),
            ..Default::default()
        };
        let defaults = profile.social_defaults();
        assert_eq!(defaults["linkedin"], "");
        assert_eq!(defaults["orchidID"], "");
        assert_eq!(defaults["scopusID"], "123");
        assert_eq!(defaults["googleScholar"], "");
    }

    #[test]
    fn test_project_accepts_mongo_id_and_defaults_description() {
        let project: ProjectRecord =
            serde_json::from_value(json!({ "_id": "p1", "title": "Solar roofs" })).unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.display_description(), DESCRIPTION_PLACEHOLDER);

        let blank: PatentRecord = serde_json::from_value(
            json!({ "id": "x", "title": "Widget", "description": "   " }),
        )
        .unwrap();
        assert_eq!(blank.display_description(), DESCRIPTION_PLACEHOLDER);
    }

    #[test]
    fn test_social_update_serializes_only_present_fields() {
        let update = SocialProfileUpdate {
            linkedin: Some("https://linkedin.com/in/asmith".to_string()),
            orchid_id: Some(String::new()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({ "linkedin": "https://linkedin.com/in/asmith", "orchidID": "" })
        );
    }

    #[test]
    fn test_edit_profile_data_from_social_update() {
        let update = SocialProfileUpdate {
            google_scholar: Some("https://scholar.google.com".to_string()),
            ..Default::default()
        };
        let edit = EditProfileData::from(update);
        let value = serde_json::to_value(&edit).unwrap();
        assert_eq!(value, json!({ "googleScholar": "https://scholar.google.com" }));
    }
}
