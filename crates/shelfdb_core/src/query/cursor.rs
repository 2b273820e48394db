//! Lazy query results.

use super::{AccessPath, QueryPlan};
use crate::document::Document;
use crate::error::CoreResult;
use crate::schema::{ID_COLUMN, STORAGE_KEY_COLUMN};
use crate::store::{decode_document, key_cell};
use shelfdb_storage::{Predicate, Row, TableStore};

/// The documents matched by a query.
///
/// Nothing is read until the first call to `next`. The cursor then fetches
/// the rows for its access path, decodes them one at a time and yields
/// those that pass the residual filter. A cursor cannot be rewound; run
/// the query again for a fresh one.
///
/// After an error the cursor is finished.
pub struct Cursor<'s> {
    backend: &'s dyn TableStore,
    table: &'s str,
    plan: QueryPlan,
    rows: Option<std::vec::IntoIter<Row>>,
    finished: bool,
}

impl<'s> Cursor<'s> {
    pub(crate) fn new(backend: &'s dyn TableStore, table: &'s str, plan: QueryPlan) -> Self {
        Self {
            backend,
            table,
            plan,
            rows: None,
            finished: false,
        }
    }

    /// Returns the plan this cursor executes.
    #[must_use]
    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    fn fetch(&self) -> CoreResult<Vec<Row>> {
        let rows = match self.plan.path() {
            AccessPath::StorageKey(key) => match key_cell(*key) {
                Ok(cell) => self
                    .backend
                    .select(self.table, &Predicate::eq(STORAGE_KEY_COLUMN, cell))?,
                // No row can carry a key the column cannot hold.
                Err(_) => Vec::new(),
            },
            AccessPath::Id(id) => self
                .backend
                .select(self.table, &Predicate::eq(ID_COLUMN, id.as_str()))?,
            AccessPath::Index { table, columns } => {
                let predicate = columns
                    .iter()
                    .fold(Predicate::all(), |p, (column, text)| {
                        p.and(column.as_str(), text.as_str())
                    });
                self.backend
                    .select_join(self.table, table, ID_COLUMN, &predicate)?
                    .into_iter()
                    .map(|(primary, _)| primary)
                    .collect()
            }
            AccessPath::FullScan => self.backend.select(self.table, &Predicate::all())?,
        };
        Ok(rows)
    }
}

impl Iterator for Cursor<'_> {
    type Item = CoreResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.rows.is_none() {
            match self.fetch() {
                Ok(rows) => self.rows = Some(rows.into_iter()),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        let rows = self.rows.as_mut()?;
        for row in rows.by_ref() {
            match decode_document(&row) {
                Ok(doc) if self.plan.matches(doc.fields()) => return Some(Ok(doc)),
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        self.finished = true;
        None
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("table", &self.table)
            .field("plan", &self.plan)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
