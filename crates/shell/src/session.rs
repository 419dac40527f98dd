//! One console session: a remote store, a local table per entity, and a
//! single history shared by every table.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use hakwon_client::{PendingOperationsRegistry, RemoteError, RemoteStore, TrackedStore};
use hakwon_core::{EntityId, EntityType, Record};
use hakwon_history::command::{SharedCache, SharedStore};
use hakwon_history::{
    AddEntityCommand, DeleteEntityCommand, EditEntityCommand, HistoryError, HistoryManager,
    LocalTable,
};

use crate::parse::{parse_line, ParseError, ShellCommand, HELP};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Edits and deletes need the current row; `load` the entity first.
    #[error("{entity} {id} is not loaded")]
    NotLoaded { entity: EntityType, id: EntityId },
}

/// What the caller should do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct Session {
    store: SharedStore,
    registry: Arc<PendingOperationsRegistry>,
    tables: HashMap<EntityType, Arc<LocalTable>>,
    history: HistoryManager,
}

impl Session {
    /// Wrap `store` so its writes show up in the pending registry.
    pub fn new<S>(store: S, history: HistoryManager) -> Self
    where
        S: RemoteStore + 'static,
    {
        let registry = PendingOperationsRegistry::new();
        let store: SharedStore = Arc::new(TrackedStore::new(store, Arc::clone(&registry)));
        let tables = EntityType::ALL
            .iter()
            .map(|&entity| (entity, Arc::new(LocalTable::new(entity))))
            .collect();

        Self {
            store,
            registry,
            tables,
            history,
        }
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn table(&self, entity: EntityType) -> &Arc<LocalTable> {
        &self.tables[&entity]
    }

    /// Parse and run one input line.
    pub async fn handle_line(&mut self, line: &str) -> Result<Outcome, SessionError> {
        match parse_line(line)? {
            Some(command) => self.run(command).await,
            None => Ok(Outcome::Continue(String::new())),
        }
    }

    pub async fn run(&mut self, command: ShellCommand) -> Result<Outcome, SessionError> {
        let output = match command {
            ShellCommand::Load(entity) => {
                let rows = self.store.list_entities(entity).await?;
                let count = rows.len();
                self.table(entity).replace_all(rows);
                tracing::debug!(%entity, count, "Rows loaded");
                format!("{count} {} loaded", entity.label())
            }
            ShellCommand::Show(entity) => render_rows(&self.table(entity).rows()),
            ShellCommand::Add { entity, fields } => {
                let command =
                    AddEntityCommand::new(entity, fields, self.store.clone(), self.cache(entity));
                self.history.execute_command(command).await?;
                self.applied()
            }
            ShellCommand::Edit { entity, id, fields } => {
                let old = self.loaded_row(entity, &id)?;
                let mut new = old.clone();
                new.extend(fields);
                let command = EditEntityCommand::new(
                    entity,
                    id,
                    old,
                    new,
                    self.store.clone(),
                    self.cache(entity),
                );
                self.history.execute_command(command).await?;
                self.applied()
            }
            ShellCommand::Delete { entity, id } => {
                let snapshot = self.loaded_row(entity, &id)?;
                let command = DeleteEntityCommand::new(
                    entity,
                    id,
                    snapshot,
                    self.store.clone(),
                    self.cache(entity),
                );
                self.history.execute_command(command).await?;
                self.applied()
            }
            ShellCommand::Undo => {
                let description = self.history.next_undo_description();
                self.history.undo().await?;
                format!("undone: {}", description.unwrap_or_default())
            }
            ShellCommand::Redo => {
                let description = self.history.next_redo_description();
                self.history.redo().await?;
                format!("redone: {}", description.unwrap_or_default())
            }
            ShellCommand::History => self.render_history(),
            ShellCommand::Clear => {
                self.history.clear_history();
                "history cleared".to_string()
            }
            ShellCommand::Pending => self.render_pending(),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(output))
    }

    // ---- private helpers ----

    fn cache(&self, entity: EntityType) -> SharedCache {
        self.table(entity).clone()
    }

    fn loaded_row(&self, entity: EntityType, id: &EntityId) -> Result<Record, SessionError> {
        self.table(entity)
            .get(id)
            .ok_or_else(|| SessionError::NotLoaded {
                entity,
                id: id.clone(),
            })
    }

    fn applied(&self) -> String {
        let info = self.history.history_info();
        format!(
            "ok: {} ({}/{})",
            self.history.next_undo_description().unwrap_or_default(),
            info.current,
            info.total
        )
    }

    fn render_history(&self) -> String {
        let entries = self.history.entries();
        if entries.is_empty() {
            return "history is empty".to_string();
        }
        let mut out = String::new();
        for (i, entry) in entries.iter().enumerate() {
            let marker = if entry.applied { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {i:>3} {} {}",
                entry.executed_at.format("%H:%M:%S"),
                entry.description
            );
        }
        out.trim_end().to_string()
    }

    fn render_pending(&self) -> String {
        let pending = self.registry.snapshot();
        if pending.is_empty() {
            return "no pending writes".to_string();
        }
        pending
            .iter()
            .map(|op| format!("{} {:?} {} since {}", op.id, op.kind, op.entity, op.started_at))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_rows(rows: &[Record]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    rows.iter()
        .map(|row| serde_json::Value::Object(row.clone()).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
