//! Field storage vocabulary for Canvas.
//!
//! This crate defines the shared language between the prop-shape evaluation
//! engine (which recommends storage for component props) and the provisioning
//! step (which creates fields, widgets, and settings from those
//! recommendations). It contains no evaluation logic.
//!
//! # Architecture
//!
//! - `types`: field types, widgets, cardinality, and the setting keys
//!   provisioners understand
//! - `expression`: the path language locating where a prop value lives inside
//!   a provisioned field

pub mod expression;
pub mod types;

pub use expression::FieldTypePropExpression;
pub use types::{
    instance_settings, storage_settings, Cardinality, FieldType, FieldWidget, InstanceSettings,
    StorageSettings,
};
