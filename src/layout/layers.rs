//! Layer classification: integer depth assignment for the three traversal
//! modes. All traversals carry explicit visited sets, so reference cycles
//! terminate; a node reachable twice keeps its first-discovered depth.

use crate::graph::RelationGraph;
use crate::schema::TableCatalog;
use std::collections::{HashMap, HashSet, VecDeque};

/// Optional traversal scope. `None` means the whole catalog; `Some` restricts
/// lookups and frontier expansion to the given id set.
pub type Scope<'a> = Option<&'a HashSet<String>>;

fn in_scope(catalog: &TableCatalog, scope: Scope, id: &str) -> bool {
    match scope {
        Some(ids) => ids.contains(id),
        None => catalog.contains(id),
    }
}

/// Breadth-first layering over the undirected relation graph. Returns
/// `(id, depth)` pairs in discovery order; nodes unreachable from `root` are
/// absent.
pub fn classify_undirected(graph: &RelationGraph, root: &str) -> Vec<(String, i64)> {
    let mut layers = Vec::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(String, i64)> = VecDeque::new();
    queue.push_back((root.to_string(), 0));

    while let Some((id, depth)) = queue.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let Some(node) = graph.get(&id) else {
            continue;
        };
        layers.push((id, depth));

        for neighbor in &node.connections {
            if !visited.contains(neighbor) {
                queue.push_back((neighbor.clone(), depth + 1));
            }
        }
    }

    layers
}

/// Breadth-first depth assignment following outgoing foreign keys
/// (table -> referenced table). The start id is assigned depth 0 even when it
/// is outside the scope; frontier expansion stays inside the scope.
pub fn classify_outgoing(catalog: &TableCatalog, scope: Scope, start: &str) -> HashMap<String, i64> {
    let mut weights = HashMap::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(String, i64)> = VecDeque::new();
    queue.push_back((start.to_string(), 0));

    while let Some((id, depth)) = queue.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        weights.insert(id.clone(), depth);

        let Some(table) = catalog.get(&id) else {
            continue;
        };
        for fk in &table.foreign_keys {
            let ref_id = fk.reference_id();
            if in_scope(catalog, scope, &ref_id) && !visited.contains(&ref_id) {
                queue.push_back((ref_id, depth + 1));
            }
        }
    }

    weights
}

/// Recursive depth assignment over incoming references (tables whose foreign
/// keys point at the current frontier). The start table gets depth 1, each
/// referencing table one more than its discoverer. Unlike the outgoing pass,
/// a start outside the scope receives no depth at all.
pub fn classify_incoming(catalog: &TableCatalog, scope: Scope, start: &str) -> HashMap<String, i64> {
    let mut weights = HashMap::new();
    let mut visited = HashSet::new();
    walk_incoming(catalog, scope, start, 0, &mut weights, &mut visited);
    weights
}

fn walk_incoming(
    catalog: &TableCatalog,
    scope: Scope,
    leaf: &str,
    weight: i64,
    weights: &mut HashMap<String, i64>,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(leaf.to_string()) {
        return;
    }
    if !in_scope(catalog, scope, leaf) || catalog.get(leaf).is_none() {
        return;
    }

    let depth = weight + 1;
    weights.insert(leaf.to_string(), depth);

    for table in catalog.iter() {
        let table_id = table.table_id();
        if !in_scope(catalog, scope, &table_id) || visited.contains(&table_id) {
            continue;
        }
        if table.foreign_keys.iter().any(|fk| fk.reference_id() == leaf) {
            walk_incoming(catalog, scope, &table_id, depth, weights, visited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ForeignKeyDescriptor, TableDescriptor};

    fn table(name: &str, fks: &[(&str, &str)]) -> TableDescriptor {
        TableDescriptor {
            schema: "public".to_string(),
            table: name.to_string(),
            comment: None,
            columns: vec![],
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
            primary_keys: vec![],
        }
    }

    fn id(name: &str) -> String {
        format!("public.{}", name)
    }

    #[test]
    fn test_undirected_bfs_depths() {
        let catalog = TableCatalog::new(vec![
            table("a", &[("b_id", "b")]),
            table("b", &[("c_id", "c")]),
            table("c", &[]),
            table("d", &[]),
        ]);
        let graph = RelationGraph::from_catalog(&catalog);

        let layers = classify_undirected(&graph, &id("a"));
        assert_eq!(
            layers,
            vec![(id("a"), 0), (id("b"), 1), (id("c"), 2)]
        );
    }

    #[test]
    fn test_undirected_cycle_terminates() {
        let catalog = TableCatalog::new(vec![
            table("a", &[("b_id", "b")]),
            table("b", &[("c_id", "c")]),
            table("c", &[("a_id", "a")]),
        ]);
        let graph = RelationGraph::from_catalog(&catalog);

        let layers = classify_undirected(&graph, &id("a"));
        assert_eq!(layers.len(), 3);
        // both neighbors of the root sit at depth 1
        assert!(layers.contains(&(id("b"), 1)));
        assert!(layers.contains(&(id("c"), 1)));
    }

    #[test]
    fn test_outgoing_depths_follow_fk_chain() {
        let catalog = TableCatalog::new(vec![
            table("invoices", &[("order_id", "orders")]),
            table("orders", &[("user_id", "users")]),
            table("users", &[]),
        ]);

        let weights = classify_outgoing(&catalog, None, &id("invoices"));
        assert_eq!(weights[&id("invoices")], 0);
        assert_eq!(weights[&id("orders")], 1);
        assert_eq!(weights[&id("users")], 2);
    }

    #[test]
    fn test_outgoing_keeps_minimum_depth() {
        // two chains to users: direct and through orders
        let catalog = TableCatalog::new(vec![
            table("invoices", &[("user_id", "users"), ("order_id", "orders")]),
            table("orders", &[("user_id", "users")]),
            table("users", &[]),
        ]);

        let weights = classify_outgoing(&catalog, None, &id("invoices"));
        assert_eq!(weights[&id("users")], 1);
    }

    #[test]
    fn test_outgoing_scope_restricts_frontier() {
        let catalog = TableCatalog::new(vec![
            table("invoices", &[("order_id", "orders")]),
            table("orders", &[("user_id", "users")]),
            table("users", &[]),
        ]);
        let scope: HashSet<String> = [id("invoices"), id("orders")].into_iter().collect();

        let weights = classify_outgoing(&catalog, Some(&scope), &id("invoices"));
        assert_eq!(weights.len(), 2);
        assert!(!weights.contains_key(&id("users")));
    }

    #[test]
    fn test_incoming_depths() {
        let catalog = TableCatalog::new(vec![
            table("users", &[]),
            table("orders", &[("user_id", "users")]),
            table("invoices", &[("order_id", "orders")]),
        ]);

        let weights = classify_incoming(&catalog, None, &id("orders"));
        assert_eq!(weights[&id("orders")], 1);
        assert_eq!(weights[&id("invoices")], 2);
        assert!(!weights.contains_key(&id("users")));
    }

    #[test]
    fn test_incoming_cycle_terminates() {
        let catalog = TableCatalog::new(vec![
            table("a", &[("b_id", "b")]),
            table("b", &[("a_id", "a")]),
        ]);

        let weights = classify_incoming(&catalog, None, &id("a"));
        assert_eq!(weights[&id("a")], 1);
        assert_eq!(weights[&id("b")], 2);
    }

    #[test]
    fn test_incoming_unknown_start_assigns_nothing() {
        let catalog = TableCatalog::new(vec![table("users", &[])]);
        let weights = classify_incoming(&catalog, None, &id("missing"));
        assert!(weights.is_empty());
    }

    #[test]
    fn test_outgoing_self_reference_terminates() {
        let catalog = TableCatalog::new(vec![table("nodes", &[("parent_id", "nodes")])]);
        let weights = classify_outgoing(&catalog, None, &id("nodes"));
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[&id("nodes")], 0);
    }
}
