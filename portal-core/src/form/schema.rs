//! Field specifications and the validator that interprets them.

use super::FormInput;
use crate::records::SocialProfileUpdate;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Shape of a single field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text. Anything goes, including the empty string.
    Text,
    /// Absolute URL. The empty string means "unset" and is accepted.
    Url,
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used in input, errors and the wire format.
    pub name: &'static str,
    /// Human label.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Reject empty or whitespace-only input.
    pub required: bool,
    /// Message shown when the value has the wrong shape.
    pub message: Option<&'static str>,
    /// Example input shown in an empty field.
    pub placeholder: &'static str,
}

impl FieldSpec {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: false,
            message: None,
            placeholder: "",
        }
    }

    pub fn url(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Url,
            required: false,
            message: None,
            placeholder: "",
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Check one raw value against this field.
    pub fn check(&self, raw: &str) -> Result<(), String> {
        if raw.trim().is_empty() {
            if self.required {
                return Err(format!("{} is required", self.label));
            }
            if raw.is_empty() {
                return Ok(());
            }
        }
        match self.kind {
            FieldKind::Text => Ok(()),
            FieldKind::Url => match Url::parse(raw) {
                Ok(_) => Ok(()),
                Err(_) => Err(self
                    .message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} must be a valid URL", self.label))),
            },
        }
    }
}

/// An ordered set of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Validate every field of `input`.
    ///
    /// Fields missing from `input` count as empty strings; keys in `input`
    /// that the schema does not know are dropped. All fields are checked, so
    /// the error map names every offending field at once.
    pub fn validate(&self, input: &FormInput) -> Result<ValidatedForm, FieldErrors> {
        let mut values = BTreeMap::new();
        let mut errors = FieldErrors::default();
        for field in &self.fields {
            let raw = input.get(field.name).map(String::as_str).unwrap_or("");
            match field.check(raw) {
                Ok(()) => {
                    values.insert(field.name.to_string(), raw.to_string());
                }
                Err(message) => errors.insert(field.name, message),
            }
        }
        if errors.is_empty() {
            Ok(ValidatedForm { values })
        } else {
            Err(errors)
        }
    }
}

/// Input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    values: BTreeMap<String, String>,
}

impl ValidatedForm {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Body for `PUT /profile/edit`. Every field of the links schema is sent,
    /// empty ones included, so clearing a field clears the stored link.
    pub fn into_social_update(self) -> SocialProfileUpdate {
        let mut values = self.values;
        SocialProfileUpdate {
            linkedin: values.remove("linkedin"),
            orchid_id: values.remove("orchidID"),
            scopus_id: values.remove("scopusID"),
            google_scholar: values.remove("googleScholar"),
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Schema of the social/academic links form.
pub fn social_profile_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::url("linkedin", "LinkedIn Profile")
            .with_message("Please enter a valid LinkedIn URL")
            .with_placeholder("https://linkedin.com/in/yourusername"),
        FieldSpec::text("orchidID", "ORCID ID").with_placeholder("0000-0000-0000-0000"),
        FieldSpec::text("scopusID", "Scopus ID").with_placeholder("Your Scopus ID"),
        FieldSpec::url("googleScholar", "Google Scholar Profile")
            .with_message("Please enter a valid Google Scholar URL")
            .with_placeholder("https://scholar.google.com/citations?user=..."),
    ])
}
