//! Input data model: table descriptors supplied by schema introspection.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One table as reported by the introspection layer. Never mutated by the
/// layout engine; rebuilt from scratch on every schema load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub schema: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    #[serde(default)]
    pub primary_keys: Vec<PrimaryKeyDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    #[serde(
        default,
        rename = "foreign_key_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    pub column: String,
    pub reference_schema: String,
    pub reference_table: String,
    pub reference_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyDescriptor {
    pub column: String,
}

/// Stable table identity: `"{schema}.{table}"`.
pub fn build_table_id(schema: &str, table: &str) -> String {
    format!("{}.{}", schema, table)
}

/// Split a table id back into (schema, table). Splits on the first dot.
pub fn split_table_id(id: &str) -> Option<(&str, &str)> {
    id.split_once('.')
}

impl TableDescriptor {
    pub fn table_id(&self) -> String {
        build_table_id(&self.schema, &self.table)
    }
}

impl ForeignKeyDescriptor {
    /// Id of the table this foreign key points at.
    pub fn reference_id(&self) -> String {
        build_table_id(&self.reference_schema, &self.reference_table)
    }
}

/// Direct one-hop neighborhood of a focus table: the tables it references
/// (plus the focus table itself) and the tables that reference it.
#[derive(Debug, Clone)]
pub struct FocusSubsets<'a> {
    pub left: Vec<&'a TableDescriptor>,
    pub right: Vec<&'a TableDescriptor>,
}

/// Id-keyed table lookup preserving introspection input order. Input order
/// drives deterministic iteration and first-encountered tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: Vec<TableDescriptor>,
    index: HashMap<String, usize>,
}

impl TableCatalog {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            // first descriptor wins on duplicate ids
            index.entry(table.table_id()).or_insert(i);
        }
        Self { tables, index }
    }

    /// Parse the introspection payload: a JSON array of table descriptors.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let tables: Vec<TableDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(tables))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TableDescriptor> {
        self.index.get(id).map(|&i| &self.tables[i])
    }

    /// Tables in input order.
    pub fn iter(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }

    /// Tables `id` references via foreign key ("left" side), in foreign-key
    /// declaration order. Deduplicated; self-references and references to
    /// tables absent from the catalog are skipped.
    pub fn references_of(&self, id: &str) -> Vec<&TableDescriptor> {
        let mut out = Vec::new();
        let Some(table) = self.get(id) else {
            return out;
        };
        let mut seen = HashSet::new();
        for fk in &table.foreign_keys {
            let ref_id = fk.reference_id();
            if ref_id == id || !seen.insert(ref_id.clone()) {
                continue;
            }
            if let Some(referenced) = self.get(&ref_id) {
                out.push(referenced);
            }
        }
        out
    }

    /// Tables whose foreign keys point at `id` ("right" side), in catalog
    /// input order. Each referencing table appears once. An id absent from
    /// the catalog has no referencing tables, even if dangling foreign keys
    /// name it.
    pub fn referenced_by(&self, id: &str) -> Vec<&TableDescriptor> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        for table in &self.tables {
            if table.table_id() == id {
                continue;
            }
            if table.foreign_keys.iter().any(|fk| fk.reference_id() == id) {
                out.push(table);
            }
        }
        out
    }

    pub fn has_relations(&self, id: &str) -> bool {
        !self.references_of(id).is_empty() || !self.referenced_by(id).is_empty()
    }

    /// One-hop subsets around a focus table, used to seed the focus layout.
    /// The left set contains the focus table plus its direct foreign-key
    /// targets, in catalog order.
    pub fn focus_subsets(&self, center_id: &str) -> FocusSubsets<'_> {
        let mut related: HashSet<String> = HashSet::new();
        related.insert(center_id.to_string());
        if let Some(center) = self.get(center_id) {
            for fk in &center.foreign_keys {
                related.insert(fk.reference_id());
            }
        }

        let left = self
            .tables
            .iter()
            .filter(|t| related.contains(&t.table_id()))
            .collect();
        let right = self.referenced_by(center_id);

        FocusSubsets { left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, fks: &[(&str, &str)]) -> TableDescriptor {
        TableDescriptor {
            schema: "public".to_string(),
            table: name.to_string(),
            comment: None,
            columns: vec![ColumnDescriptor {
                name: "id".to_string(),
                ty: "integer".to_string(),
                nullable: false,
            }],
            foreign_keys: fks
                .iter()
                .map(|(column, target)| ForeignKeyDescriptor {
                    name: None,
                    column: column.to_string(),
                    reference_schema: "public".to_string(),
                    reference_table: target.to_string(),
                    reference_column: "id".to_string(),
                })
                .collect(),
            primary_keys: vec![PrimaryKeyDescriptor {
                column: "id".to_string(),
            }],
        }
    }

    #[test]
    fn test_table_id_roundtrip() {
        assert_eq!(build_table_id("public", "users"), "public.users");
        assert_eq!(split_table_id("public.users"), Some(("public", "users")));
        assert_eq!(split_table_id("noschema"), None);
    }

    #[test]
    fn test_from_json_introspection_shape() {
        // extra fields from the introspection payload are ignored
        let json = r#"[
            {
                "schema": "public",
                "table": "orders",
                "rows": 120,
                "type": "BASE TABLE",
                "comment": null,
                "columns": [
                    {"name": "id", "ordinal_position": 1, "type": "integer", "nullable": false},
                    {"name": "user_id", "ordinal_position": 2, "type": "integer"}
                ],
                "foreign_keys": [
                    {
                        "foreign_key_name": "orders_user_id_fkey",
                        "column": "user_id",
                        "reference_schema": "public",
                        "reference_table": "users",
                        "reference_column": "id",
                        "fk_def": "FOREIGN KEY (user_id) REFERENCES users(id)"
                    }
                ],
                "primary_keys": [{"column": "id", "pk_def": "PRIMARY KEY (id)"}],
                "indexes": []
            }
        ]"#;
        let catalog = TableCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let orders = catalog.get("public.orders").unwrap();
        assert_eq!(orders.columns.len(), 2);
        assert!(!orders.columns[0].nullable);
        assert!(orders.columns[1].nullable);
        assert_eq!(orders.foreign_keys[0].reference_id(), "public.users");
        assert_eq!(
            orders.foreign_keys[0].name.as_deref(),
            Some("orders_user_id_fkey")
        );
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(TableCatalog::from_json("not json").is_err());
    }

    #[test]
    fn test_references_of_dedup_and_skip() {
        // two FKs to users, one self-reference, one dangling reference
        let orders = table(
            "orders",
            &[
                ("user_id", "users"),
                ("approved_by", "users"),
                ("parent_id", "orders"),
                ("ghost_id", "missing"),
            ],
        );
        let catalog = TableCatalog::new(vec![orders, table("users", &[])]);

        let refs = catalog.references_of("public.orders");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].table, "users");
    }

    #[test]
    fn test_referenced_by_in_catalog_order() {
        let catalog = TableCatalog::new(vec![
            table("invoices", &[("order_id", "orders")]),
            table("orders", &[]),
            table("shipments", &[("order_id", "orders")]),
        ]);

        let refs = catalog.referenced_by("public.orders");
        let names: Vec<&str> = refs.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(names, vec!["invoices", "shipments"]);
    }

    #[test]
    fn test_referenced_by_unknown_id_is_empty() {
        // dangling foreign keys never make their target relatable
        let catalog = TableCatalog::new(vec![table("orders", &[("ghost_id", "missing")])]);
        assert!(catalog.referenced_by("public.missing").is_empty());
    }

    #[test]
    fn test_has_relations() {
        let catalog = TableCatalog::new(vec![
            table("orders", &[("user_id", "users")]),
            table("users", &[]),
            table("settings", &[]),
        ]);
        assert!(catalog.has_relations("public.orders"));
        assert!(catalog.has_relations("public.users"));
        assert!(!catalog.has_relations("public.settings"));
        assert!(!catalog.has_relations("public.missing"));
    }

    #[test]
    fn test_focus_subsets() {
        let catalog = TableCatalog::new(vec![
            table("users", &[]),
            table("orders", &[("user_id", "users")]),
            table("invoices", &[("order_id", "orders")]),
        ]);

        let subsets = catalog.focus_subsets("public.orders");
        let left: Vec<&str> = subsets.left.iter().map(|t| t.table.as_str()).collect();
        let right: Vec<&str> = subsets.right.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(left, vec!["users", "orders"]);
        assert_eq!(right, vec!["invoices"]);
    }

    #[test]
    fn test_focus_subsets_unknown_center() {
        let catalog = TableCatalog::new(vec![table("users", &[])]);
        let subsets = catalog.focus_subsets("public.missing");
        assert!(subsets.left.is_empty());
        assert!(subsets.right.is_empty());
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let mut second = table("users", &[]);
        second.comment = Some("duplicate".to_string());
        let catalog = TableCatalog::new(vec![table("users", &[]), second]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("public.users").unwrap().comment.is_none());
    }
}
