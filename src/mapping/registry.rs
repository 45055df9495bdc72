//! Registry of mapped tables.
//!
//! Built once at startup and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::MappingError;
use crate::mapping::{CoercionRule, ColumnDef, FieldRef, Model, TableDefinition};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: HashMap<String, Arc<TableDefinition>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table of a model type.
    pub fn register<M: Model>(&mut self) -> Result<Arc<TableDefinition>, MappingError> {
        self.register_definition(M::definition())
    }

    pub fn register_definition(
        &mut self,
        definition: TableDefinition,
    ) -> Result<Arc<TableDefinition>, MappingError> {
        if self.tables.contains_key(&definition.name) {
            return Err(MappingError::DuplicateTable(definition.name));
        }
        tracing::debug!(
            "Registered table '{}' ({} columns)",
            definition.name,
            definition.columns.len()
        );
        let definition = Arc::new(definition);
        self.tables
            .insert(definition.name.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Builder-style registration.
    pub fn with_model<M: Model>(mut self) -> Result<Self, MappingError> {
        self.register::<M>()?;
        Ok(self)
    }

    pub fn table(&self, name: &str) -> Result<Arc<TableDefinition>, MappingError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| MappingError::UnregisteredTable(name.to_string()))
    }

    pub fn table_for<M: Model>(&self) -> Result<Arc<TableDefinition>, MappingError> {
        self.table(M::TABLE)
    }

    pub fn resolve_column(&self, field: &FieldRef) -> Result<&ColumnDef, MappingError> {
        self.tables
            .get(field.table())
            .ok_or_else(|| MappingError::UnregisteredTable(field.table().to_string()))?
            .resolve(field)
    }

    pub fn coercion_rule_for(&self, field: &FieldRef) -> Result<Option<CoercionRule>, MappingError> {
        Ok(self.resolve_column(field)?.coercion)
    }

    /// Registered tables, sorted by name.
    pub fn tables(&self) -> Vec<&TableDefinition> {
        let mut tables: Vec<&TableDefinition> = self.tables.values().map(|t| t.as_ref()).collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
