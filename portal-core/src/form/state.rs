//! Editable state of one form instance.

use super::schema::{FieldErrors, FieldSpec, FormSchema, ValidatedForm};
use super::FormInput;
use std::collections::BTreeMap;

/// Values, errors and focus of a form bound to a schema.
///
/// Only fields the schema declares are ever stored. Defaults are replaced
/// wholesale by [`reset`](Self::reset) whenever the source record changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    schema: FormSchema,
    values: FormInput,
    defaults: FormInput,
    errors: BTreeMap<String, String>,
    focused: usize,
    pub is_submitting: bool,
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        let values: FormInput = schema
            .field_names()
            .map(|name| (name.to_string(), String::new()))
            .collect();
        Self {
            schema,
            defaults: values.clone(),
            values,
            errors: BTreeMap::new(),
            focused: 0,
            is_submitting: false,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Replace defaults and current values, dropping errors.
    pub fn reset(&mut self, defaults: FormInput) {
        let defaults: FormInput = self
            .schema
            .field_names()
            .map(|name| {
                let value = defaults.get(name).cloned().unwrap_or_default();
                (name.to_string(), value)
            })
            .collect();
        self.values = defaults.clone();
        self.defaults = defaults;
        self.errors.clear();
    }

    pub fn values(&self) -> &FormInput {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Set a field's value. Returns false for fields the schema lacks.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                self.errors.remove(name);
                true
            }
            None => false,
        }
    }

    pub fn focused_field(&self) -> Option<&FieldSpec> {
        self.schema.fields.get(self.focused)
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focus_next(&mut self) {
        let len = self.schema.fields.len();
        if len > 0 {
            self.focused = (self.focused + 1) % len;
        }
    }

    pub fn focus_previous(&mut self) {
        let len = self.schema.fields.len();
        if len > 0 {
            self.focused = if self.focused == 0 { len - 1 } else { self.focused - 1 };
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(name) = self.focused_field().map(|field| field.name) {
            let mut value = self.value(name).to_string();
            value.push(c);
            self.set_value(name, value);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(name) = self.focused_field().map(|field| field.name) {
            let mut value = self.value(name).to_string();
            value.pop();
            self.set_value(name, value);
        }
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors.into_map();
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.defaults
    }

    /// Validate the current values against the schema.
    pub fn validate(&self) -> Result<ValidatedForm, FieldErrors> {
        self.schema.validate(&self.values)
    }
}
