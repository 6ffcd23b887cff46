//! Declarative form schemas, validation and editable form state.
//!
//! A [`FormSchema`] is plain data: one [`FieldSpec`] per field, each tagged
//! with a [`FieldKind`]. [`FormSchema::validate`] interprets it against raw
//! string input and returns either the accepted values or a message per
//! offending field. Validation is synchronous and never touches the network.

pub mod schema;
pub mod state;

pub use schema::{
    social_profile_schema, FieldErrors, FieldKind, FieldSpec, FormSchema, ValidatedForm,
};
pub use state::FormState;

use std::collections::BTreeMap;

/// Raw form input keyed by field name.
pub type FormInput = BTreeMap<String, String>;
