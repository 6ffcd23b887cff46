//! Faculty Portal Core - Profile Records, Query Cache, Form Validation
//!
//! Everything the profile client needs that does not touch a terminal or a
//! socket: the records the backend serves, the keyed query cache the UI reads
//! through, and the declarative schema used to validate the links form.

pub mod backend;
pub mod error;
pub mod form;
pub mod query;
pub mod records;

pub use backend::ProfileBackend;
pub use error::{RemoteError, RemoteResult};
pub use form::{
    social_profile_schema, FieldErrors, FieldKind, FieldSpec, FormInput, FormSchema, FormState,
    ValidatedForm,
};
pub use query::{
    CacheConfig, Loader, MutationGuard, QueryCache, QueryKey, QuerySnapshot, QueryUpdate,
    ResourceState, Subscription,
};
pub use records::{
    EditProfileData, PatentRecord, ProfileRecord, ProjectRecord, SocialProfileUpdate,
    DESCRIPTION_PLACEHOLDER,
};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
