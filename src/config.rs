//! fieldql configuration.
//!
//! Loaded from TOML. The file names the database and declares the mapped
//! tables the CLI can query:
//!
//! ```toml
//! [database]
//! url = "sqlite://flags.db"
//!
//! [[tables]]
//! name = "t_multiple_boolean"
//!
//! [[tables.columns]]
//! field = "id"
//! sql_type = "integer"
//! primary_key = true
//!
//! [[tables.columns]]
//! field = "primitiveFlag"
//! column = "primitive_flag"
//! coercion = "int_flag"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FieldqlError, FieldqlResult};
use crate::mapping::{CoercionRule, ColumnDef, Registry, SqlType, TableDefinition};
use crate::transpiler::Dialect;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Overrides the dialect inferred from the URL scheme.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// True for SQLite URLs whose database lives in the connection itself.
    pub fn is_in_memory(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
    }

    /// Connections to open. An in-memory SQLite database is private to its
    /// connection, so it always gets exactly one.
    pub fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            dialect: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub field: String,
    /// Defaults to the field name.
    pub column: Option<String>,
    /// Defaults to the coercion rule's storage type, then to text.
    pub sql_type: Option<SqlType>,
    pub coercion: Option<CoercionRule>,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnConfig {
    fn to_column(&self) -> ColumnDef {
        let sql_type = self
            .sql_type
            .or_else(|| self.coercion.map(CoercionRule::default_sql_type))
            .unwrap_or(SqlType::Text);
        let column = self.column.clone().unwrap_or_else(|| self.field.clone());

        let mut def = ColumnDef::new(self.field.clone(), column, sql_type);
        def.coercion = self.coercion;
        def.primary_key = self.primary_key;
        def
    }
}

impl TableConfig {
    pub fn to_definition(&self) -> TableDefinition {
        self.columns
            .iter()
            .fold(TableDefinition::new(self.name.clone()), |table, column| {
                table.column(column.to_column())
            })
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `<config dir>/fieldql/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fieldql").join("config.toml"))
    }

    /// Load from `path`, or from the default path when given none.
    ///
    /// A missing default file yields an empty configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> FieldqlResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> FieldqlResult<Self> {
        toml::from_str(content).map_err(|e| FieldqlError::Config(e.to_string()))
    }

    /// Build a registry from the declared tables.
    pub fn registry(&self) -> FieldqlResult<Registry> {
        let mut registry = Registry::new();
        for table in &self.tables {
            registry.register_definition(table.to_definition())?;
        }
        Ok(registry)
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database.url = url.into();
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.config.database.max_connections = n;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.database.dialect = Some(dialect);
        self
    }

    pub fn table(mut self, table: TableConfig) -> Self {
        self.config.tables.push(table);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[database]
url = "sqlite::memory:"
max_connections = 1

[[tables]]
name = "t_multiple_boolean"

[[tables.columns]]
field = "id"
sql_type = "integer"
primary_key = true

[[tables.columns]]
field = "booleanFlag"
column = "boolean_flag"
coercion = "native_boolean"

[[tables.columns]]
field = "objectFlag"
column = "object_flag"
coercion = "nullable_int_flag"

[[tables.columns]]
field = "name"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.database.dialect, None);
        assert_eq!(config.tables.len(), 1);
    }

    #[test]
    fn test_column_defaults() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let table = config.tables[0].to_definition();

        assert_eq!(
            table.column_for("booleanFlag"),
            Some(&ColumnDef::boolean("booleanFlag", "boolean_flag"))
        );
        assert_eq!(
            table.column_for("objectFlag"),
            Some(&ColumnDef::nullable_int_flag("objectFlag", "object_flag"))
        );
        assert_eq!(table.column_for("name"), Some(&ColumnDef::text("name", "name")));
        assert_eq!(table.primary_key().len(), 1);
    }

    #[test]
    fn test_registry_from_config() {
        let registry = Config::from_toml_str(SAMPLE).unwrap().registry().unwrap();
        assert!(registry.table("t_multiple_boolean").is_ok());
        assert!(registry.table("t_other").is_err());
    }

    #[test]
    fn test_duplicate_tables_rejected() {
        let table = TableConfig {
            name: "t".to_string(),
            columns: vec![],
        };
        let config = Config::builder().table(table.clone()).table(table).build();
        assert!(config.registry().unwrap_err().is_mapping());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[database]\nmax_connections = \"many\"").unwrap_err();
        assert!(matches!(err, FieldqlError::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .database("postgres://localhost/app")
            .max_connections(2)
            .dialect(Dialect::Postgres)
            .build();
        assert_eq!(config.database.url, "postgres://localhost/app");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.dialect, Some(Dialect::Postgres));
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_in_memory_sqlite_uses_one_connection() {
        assert_eq!(DatabaseConfig::new("sqlite::memory:").pool_size(), 1);
        assert_eq!(DatabaseConfig::new("sqlite://flags.db?mode=memory&cache=shared").pool_size(), 1);
        assert_eq!(DatabaseConfig::new("sqlite://flags.db").pool_size(), 5);
        assert_eq!(DatabaseConfig::new("postgres://localhost/app").pool_size(), 5);
        assert!(!DatabaseConfig::new("postgres://localhost/memory").is_in_memory());
    }
}
