// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mirror view state into the URL query string and back.
//!
//! A list of [`FieldDefinition`]s maps state fields to URL parameters. [`state_to_params`] and
//! [`push_history`] write state into the URL, [`params_to_state`] and [`listen`] read it back,
//! the latter whenever the user navigates through the history. Each view namespaces its
//! parameters with a [`QueryPrefix`] so several views can share one URL; parameters outside the
//! view's definitions are never touched.
mod api;
mod builder;
mod definition;
mod popstate;
mod query;
mod sync;

pub use api::UrlStateSync;
pub use builder::Builder as UrlStateSyncBuilder;
pub use definition::{
    DefinitionError, FieldDefinition, FieldDefinitions, ParamValue, QueryPrefix, ValueType,
};
pub use popstate::{PopStateSubscription, listen};
pub use query::QueryString;
pub use sync::{Params, Setters, params_to_state, push_history, state_to_params};
