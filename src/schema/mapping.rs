//! Table schemas keyed by table name

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ddl::{extract_columns, extract_statements};
use super::error::SchemaError;
use super::field::TypedField;

/// Fields of one table, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub fields: Vec<TypedField>,
}

/// Upper-cased table name to schema, built once per DDL text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMapping {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaMapping {
    /// Parse every CREATE TABLE statement in `ddl`.
    ///
    /// A table declared twice keeps its last definition. A malformed statement
    /// aborts the whole mapping; type names are resolved later, when a table
    /// is rendered.
    pub fn from_ddl(ddl: &str) -> Result<Self, SchemaError> {
        let mut mapping = Self::default();
        for statement in extract_statements(ddl) {
            let definition = extract_columns(&statement)?;
            let fields = definition
                .fragments
                .iter()
                .map(TypedField::parse)
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(
                table = %definition.table_name,
                columns = fields.len(),
                "Parsed table definition"
            );
            mapping.insert(TableSchema {
                table_name: definition.table_name,
                fields,
            });
        }
        Ok(mapping)
    }

    /// Add or replace a table, keyed by its upper-cased name
    pub fn insert(&mut self, table: TableSchema) {
        self.tables.insert(table.table_name.to_uppercase(), table);
    }

    /// Case-insensitive lookup
    pub fn get(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables.get(&table_name.to_uppercase())
    }

    /// Case-insensitive lookup that fails with [`SchemaError::UnknownTable`]
    pub fn require(&self, table_name: &str) -> Result<&TableSchema, SchemaError> {
        self.get(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_uppercase()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDL: &str = r#"
-- sales schema
CREATE TABLE Customer (
    ID        INTEGER NOT NULL,
    NAME      VARCHAR(100),
    BALANCE   DECIMAL(12,2),
    PRIMARY KEY (ID)
);

CREATE TABLE ORDERS (
    ORDER_ID  INTEGER NOT NULL,
    PLACED    DATE
);
"#;

    #[test]
    fn test_from_ddl_preserves_field_order() {
        let mapping = SchemaMapping::from_ddl(DDL).unwrap();
        assert_eq!(mapping.len(), 2);

        let customer = mapping.require("customer").unwrap();
        let names: Vec<&str> = customer.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "NAME", "BALANCE"]);
        assert_eq!(customer.fields[2].sql_type, "DECIMAL");
        assert!(!customer.fields[0].nullable);
    }

    #[test]
    fn test_require_unknown_table() {
        let mapping = SchemaMapping::from_ddl(DDL).unwrap();
        assert_eq!(
            mapping.require("invoices").unwrap_err(),
            SchemaError::UnknownTable("INVOICES".to_string())
        );
    }

    #[test]
    fn test_redefined_table_keeps_last() {
        let ddl = "CREATE TABLE T (A INTEGER)\nCREATE TABLE T (B DATE, C TIME)";
        let mapping = SchemaMapping::from_ddl(ddl).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.require("t").unwrap().fields.len(), 2);
    }

    #[test]
    fn test_unsupported_type_is_kept_for_rendering() {
        let ddl = "CREATE TABLE T (A INTEGER, B CLOB)\nCREATE TABLE U (C DATE)";
        let mapping = SchemaMapping::from_ddl(ddl).unwrap();
        assert_eq!(mapping.len(), 2);

        let t = mapping.require("t").unwrap();
        assert_eq!(t.fields[1].sql_type, "CLOB");
        assert_eq!(
            t.fields[1].resolved_type().unwrap_err(),
            SchemaError::UnsupportedType("CLOB".to_string())
        );
        assert!(mapping.require("u").unwrap().fields[0].resolved_type().is_ok());
    }
}
