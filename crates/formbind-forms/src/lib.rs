//! # formbind-forms
//!
//! Declarative form rendering and data binding. A list of [`FieldConfig`]
//! records describes the fields; the renderer turns them plus a nested data
//! tree into HTML controls, and the validation pipeline turns a submitted
//! tree back into sanitized nested data.
//!
//! ## Modules
//!
//! - [`path`] - Field paths and nested get/set over form data
//! - [`html`] - The element/attribute markup primitive
//! - [`choices`] - Ordered choice lists and their expansion
//! - [`config`] - Typed field configuration records
//! - [`fields`] - The six field descriptor variants
//! - [`factory`] - Normalizing configs into descriptors
//! - [`renderer`] - Row, table, and form composition
//! - [`validation`] - Validating submissions into nested output
//! - [`submission`] - Decoding urlencoded bodies with bracket names
//! - [`binder`] - Prefixed views over a data subtree
//! - [`meta`] - Binding fields to a host metadata store

pub mod binder;
pub mod choices;
pub mod config;
pub mod factory;
pub mod fields;
pub mod html;
pub mod meta;
pub mod path;
pub mod renderer;
pub mod submission;
pub mod validation;
pub mod value;

pub use binder::FormBinder;
pub use choices::{ChoiceList, Choices, Description};
pub use config::{DescPos, FieldConfig, FieldType, RenderCallback, Sanitizer};
pub use factory::{FieldFactory, IntoDescriptor};
pub use fields::{Field, FieldDescriptor};
pub use html::{AttrValue, Attrs, TOKEN};
pub use meta::{input_from_meta, update_meta, InMemoryMetaStore, MetadataStore};
pub use path::{get_value, get_value_or, set_value, FieldPath};
pub use renderer::{input, input_with_value, FormRenderer, StaticNonce};
pub use submission::{parse_urlencoded, SubmissionSource, UrlEncodedBody};
pub use validation::{validate_data, validate_post_data};
