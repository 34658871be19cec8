//! Database mode configuration
//!
//! The JSON payload lists databases, each with a connection string, an
//! optional default query and the tables to export:
//!
//! ```json
//! {
//!   "databases": [{
//!     "connectionString": "postgres://reader@db/crm",
//!     "query": null,
//!     "tables": [{ "tableName": "customers", "outputFile": "customers.csv" }]
//!   }]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DecryptError, DecryptResult};
use crate::models::TableUnit;

/// Top-level database configuration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub databases: Vec<DatabaseConfig>,
}

/// One database and the tables to read from it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    #[serde(default)]
    pub connection_string: String,

    /// Default query for every table of this database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

/// One table to export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub table_name: String,

    #[serde(default)]
    pub output_file: PathBuf,

    /// Query overriding the database default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RunConfig {
    /// Read, parse and validate a configuration file
    ///
    /// Every failure is [`DecryptError::ConfigInvalid`]; nothing is
    /// processed from a file that does not pass.
    pub fn load(path: &Path) -> DecryptResult<Self> {
        if !path.exists() {
            return Err(DecryptError::ConfigInvalid(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            DecryptError::ConfigInvalid(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&contents)
    }

    /// Parse and validate a configuration payload
    pub fn parse(contents: &str) -> DecryptResult<Self> {
        if contents.trim().is_empty() {
            return Err(DecryptError::ConfigInvalid(
                "configuration file is empty".into(),
            ));
        }

        let config: RunConfig = serde_json::from_str(contents).map_err(|e| {
            DecryptError::ConfigInvalid(format!("Failed to parse configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> DecryptResult<()> {
        if self.databases.is_empty() {
            return Err(DecryptError::ConfigInvalid(
                "No database configurations found".into(),
            ));
        }

        for (db_index, db) in self.databases.iter().enumerate() {
            let db_label = db_index + 1;
            if db.connection_string.trim().is_empty() {
                return Err(DecryptError::ConfigInvalid(format!(
                    "database {} has no connectionString",
                    db_label
                )));
            }
            if db.tables.is_empty() {
                return Err(DecryptError::ConfigInvalid(format!(
                    "database {} has no tables",
                    db_label
                )));
            }

            for (table_index, table) in db.tables.iter().enumerate() {
                let table_label = table_index + 1;
                if table.output_file.as_os_str().is_empty() {
                    return Err(DecryptError::ConfigInvalid(format!(
                        "database {} table {} has no outputFile",
                        db_label, table_label
                    )));
                }
                if db.effective_query(table).is_none() {
                    return Err(DecryptError::ConfigInvalid(format!(
                        "database {} table {} has neither a tableName nor a query",
                        db_label, table_label
                    )));
                }
            }
        }

        Ok(())
    }

    /// Expand the configuration into one unit per table, in file order
    pub fn units(&self) -> Vec<TableUnit> {
        self.databases
            .iter()
            .flat_map(|db| {
                db.tables.iter().filter_map(move |table| {
                    db.effective_query(table).map(|query| {
                        TableUnit::database(
                            db.connection_string.clone(),
                            table.display_name(),
                            query,
                            table.output_file.clone(),
                        )
                    })
                })
            })
            .collect()
    }
}

impl DatabaseConfig {
    /// Table query, else the database default, else `SELECT * FROM <table>`
    ///
    /// Blank queries count as absent. `None` when nothing applies and the
    /// table has no name.
    pub fn effective_query(&self, table: &TableConfig) -> Option<String> {
        non_blank(table.query.as_deref())
            .or_else(|| non_blank(self.query.as_deref()))
            .map(str::to_string)
            .or_else(|| {
                non_blank(Some(table.table_name.as_str()))
                    .map(|name| format!("SELECT * FROM {}", name))
            })
    }
}

impl TableConfig {
    fn display_name(&self) -> String {
        if self.table_name.trim().is_empty() {
            self.output_file.display().to_string()
        } else {
            self.table_name.clone()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitSource;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "databases": [
            {
                "connectionString": "sqlite://crm.db",
                "query": "SELECT id, ssn FROM customers",
                "tables": [
                    { "tableName": "customers", "outputFile": "out/customers.csv" },
                    { "tableName": "orders", "outputFile": "out/orders.csv", "query": "SELECT * FROM orders WHERE open = 1" }
                ]
            },
            {
                "connectionString": "postgres://reader@db/hr",
                "tables": [
                    { "tableName": "staff", "outputFile": "staff.csv", "query": "   " }
                ]
            }
        ]
    }"#;

    fn queries(config: &RunConfig) -> Vec<String> {
        config
            .units()
            .iter()
            .map(|u| u.query().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_parse_sample() {
        let config = RunConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.databases.len(), 2);
        assert_eq!(config.databases[0].tables[1].table_name, "orders");
    }

    #[test]
    fn test_query_precedence() {
        let config = RunConfig::parse(SAMPLE).unwrap();
        assert_eq!(
            queries(&config),
            vec![
                "SELECT id, ssn FROM customers",
                "SELECT * FROM orders WHERE open = 1",
                "SELECT * FROM staff",
            ]
        );
    }

    #[test]
    fn test_units_carry_connection_and_output() {
        let config = RunConfig::parse(SAMPLE).unwrap();
        let units = config.units();
        assert_eq!(units.len(), 3);
        assert_eq!(units[2].output, PathBuf::from("staff.csv"));
        match &units[2].source {
            UnitSource::Database {
                connection, table, ..
            } => {
                assert_eq!(connection, "postgres://reader@db/hr");
                assert_eq!(table, "staff");
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        assert!(matches!(
            RunConfig::parse("  "),
            Err(DecryptError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_no_databases_is_invalid() {
        assert!(matches!(
            RunConfig::parse(r#"{"databases": []}"#),
            Err(DecryptError::ConfigInvalid(_))
        ));
        assert!(RunConfig::parse("{}").is_err());
    }

    #[test]
    fn test_unparsable_is_invalid() {
        assert!(matches!(
            RunConfig::parse("{\"databases\": ["),
            Err(DecryptError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_table_without_name_or_query_is_invalid() {
        let payload = r#"{"databases":[{"connectionString":"sqlite://x.db","tables":[{"outputFile":"a.csv"}]}]}"#;
        let err = RunConfig::parse(payload).unwrap_err();
        assert!(err.to_string().contains("neither a tableName nor a query"));
    }

    #[test]
    fn test_table_without_output_is_invalid() {
        let payload = r#"{"databases":[{"connectionString":"sqlite://x.db","tables":[{"tableName":"t"}]}]}"#;
        assert!(RunConfig::parse(payload).is_err());
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            RunConfig::load(&dir.path().join("nope.json")),
            Err(DecryptError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(RunConfig::load(&path).unwrap().units().len(), 3);
    }
}
