//! Extension find/replace operations.

use super::{Database, now_ms};
use crate::error::Result;
use crate::overrides::{Extension, NodeBody, OverrideNode};
use rusqlite::{Connection, Transaction, params};
use tracing::debug;

impl Database {
    /// Load the extension and its full node tree by unique key.
    pub fn find_extension(&self, name: &str, namespace: &str) -> Result<Option<Extension>> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "SELECT id FROM extension WHERE name = ?1 AND namespace = ?2",
                params![name, namespace],
                |row| row.get::<_, i64>(0),
            );
            let id = match row {
                Ok(id) => id,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            let nodes = load_children(conn, id, None)?;

            Ok(Some(Extension {
                id: Some(id),
                name: name.to_string(),
                namespace: namespace.to_string(),
                nodes,
            }))
        })
    }

    /// Swap the stored tree for the extension's key in one transaction.
    ///
    /// The previous config rows are removed for the whole subtree (the
    /// cascade covers nested rows) before the new tree is inserted. If the
    /// extension was never persisted there is nothing to delete and the
    /// delete is a no-op.
    pub fn replace_extension(&self, extension: &Extension) -> Result<i64> {
        let now = now_ms();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO extension (name, namespace, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name, namespace) DO UPDATE SET updated_at = excluded.updated_at",
                params![extension.name, extension.namespace, now],
            )?;
            let id: i64 = tx.query_row(
                "SELECT id FROM extension WHERE name = ?1 AND namespace = ?2",
                params![extension.name, extension.namespace],
                |row| row.get(0),
            )?;

            let deleted = tx.execute(
                "DELETE FROM config WHERE extension_id = ?1",
                params![id],
            )?;
            debug!(extension_id = id, deleted, "cleared previous override rows");

            for node in &extension.nodes {
                insert_node(&tx, id, None, node)?;
            }

            tx.commit()?;
            Ok(id)
        })
    }

    /// Delete an extension and, through the cascade, its whole tree.
    pub fn delete_extension(&self, name: &str, namespace: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM extension WHERE name = ?1 AND namespace = ?2",
                params![name, namespace],
            )?;
            Ok(deleted > 0)
        })
    }
}

fn insert_node(
    tx: &Transaction,
    extension_id: i64,
    parent_id: Option<i64>,
    node: &OverrideNode,
) -> Result<()> {
    let value = match &node.body {
        NodeBody::Leaf(value) => Some(value.as_str()),
        NodeBody::Interior(_) => None,
    };
    tx.execute(
        "INSERT INTO config (extension_id, parent_id, name, value) VALUES (?1, ?2, ?3, ?4)",
        params![extension_id, parent_id, node.name, value],
    )?;
    let id = tx.last_insert_rowid();

    for child in node.children() {
        insert_node(tx, extension_id, Some(id), child)?;
    }
    Ok(())
}

fn load_children(
    conn: &Connection,
    extension_id: i64,
    parent_id: Option<i64>,
) -> Result<Vec<OverrideNode>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, value FROM config
         WHERE extension_id = ?1 AND parent_id IS ?2 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![extension_id, parent_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut nodes = Vec::new();
    for row in rows {
        let (id, name, value) = row?;
        // NULL value marks an interior row; any non-NULL string, empty
        // included, is a leaf.
        let body = match value {
            Some(value) => NodeBody::Leaf(value),
            None => NodeBody::Interior(load_children(conn, extension_id, Some(id))?),
        };
        nodes.push(OverrideNode {
            id: Some(id),
            name,
            body,
        });
    }
    Ok(nodes)
}
