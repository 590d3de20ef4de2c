use std::collections::HashSet;

use crate::domain::errors::DatabaseError;

/// A single column of a table declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<String>,
}

impl ColumnDefinition {
    /// Creates a nullable column with no default.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
            default: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a default expression, rendered verbatim.
    pub fn default_value(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }

    fn render(&self) -> String {
        let mut sql = format!("{} {}", quote_identifier(&self.name), self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.unique && !self.primary_key {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

/// Declaration of one table, owned by the model layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Table-level constraints, rendered verbatim (e.g. `CHECK (...)`).
    pub constraints: Vec<String>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.name.trim().is_empty() {
            return Err(DatabaseError::configuration("table name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(DatabaseError::configuration(format!(
                "table {} declares no columns",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DatabaseError::configuration(format!(
                    "table {} declares column {} twice",
                    self.name, column.name
                )));
            }
        }
        Ok(())
    }

    /// DDL that creates the table only when it does not exist yet.
    pub fn create_statement(&self) -> String {
        let body = self
            .columns
            .iter()
            .map(ColumnDefinition::render)
            .chain(self.constraints.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_identifier(&self.name),
            body
        )
    }
}

/// Ordered registry of table declarations read by schema initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: Vec<TableDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(
        tables: impl IntoIterator<Item = TableDefinition>,
    ) -> Result<Self, DatabaseError> {
        let mut registry = Self::new();
        for table in tables {
            registry.register(table)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, table: TableDefinition) -> Result<(), DatabaseError> {
        table.validate()?;
        if self.tables.iter().any(|t| t.name == table.name) {
            return Err(DatabaseError::configuration(format!(
                "table {} is already registered",
                table.name
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Statements in registration order, so referenced tables come first.
    pub fn create_statements(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(TableDefinition::create_statement)
            .collect()
    }
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
