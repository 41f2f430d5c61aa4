// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::url_state::api::UrlStateSync;
use crate::url_state::{DefinitionError, FieldDefinition, FieldDefinitions, QueryPrefix};

#[derive(Clone, Debug, Default)]
pub struct Builder {
    prefix: QueryPrefix,
    definitions: Vec<FieldDefinition>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace for all parameters of this synchronizer, defaults to no prefix.
    pub fn prefix(mut self, prefix: impl Into<QueryPrefix>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn field(mut self, definition: FieldDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn fields(mut self, definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    pub fn build(self) -> Result<UrlStateSync, DefinitionError> {
        let definitions = FieldDefinitions::new(self.definitions)?;
        Ok(UrlStateSync::new(self.prefix, definitions))
    }
}
