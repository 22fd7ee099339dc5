mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PlanError;
use crate::models::*;
use crate::plan::{self, PlanMode};

pub(crate) const DEFAULT_LIST_LIMIT: u32 = 50;
pub(crate) const MAX_LIST_LIMIT: u32 = 100;

const GOAL_COLUMNS: &str = "id, title, description, category, target_amount, target_date,
     current_saved, image_url, status, created_at, updated_at";

/// Which goals a listing returns.
#[derive(Debug, Clone, Default)]
pub(crate) struct GoalFilter {
    pub(crate) status: Option<GoalStatus>,
    pub(crate) category: Option<GoalCategory>,
    /// Case-insensitive substring match on the title.
    pub(crate) search: Option<String>,
    /// Skip archived goals when no explicit status is requested.
    pub(crate) hide_archived: bool,
    pub(crate) limit: Option<u32>,
}

impl GoalFilter {
    pub(crate) fn visible() -> Self {
        Self {
            hide_archived: true,
            ..Default::default()
        }
    }

    fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "opened goal database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Goals ─────────────────────────────────────────────────

    pub(crate) fn insert_goal(&self, goal: &Goal) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO goals (title, description, category, target_amount, target_date,
                                current_saved, image_url, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                goal.title,
                goal.description,
                goal.category.as_str(),
                goal.target_amount.to_string(),
                goal.target_date.to_string(),
                goal.current_saved.to_string(),
                goal.image_url,
                goal.status.as_str(),
                goal.created_at,
                goal.updated_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, title = %goal.title, "created goal");
        Ok(id)
    }

    pub(crate) fn get_goal_by_id(&self, id: i64) -> Result<Option<Goal>> {
        let result = self.conn.query_row(
            &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
            params![id],
            row_to_goal,
        );
        match result {
            Ok(g) => Ok(Some(g)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Goals matching `filter`, newest first.
    pub(crate) fn get_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>> {
        let mut sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.as_str()));
        } else if filter.hide_archived {
            sql.push_str(&format!(" AND status != ?{}", param_values.len() + 1));
            param_values.push(Box::new(GoalStatus::Archived.as_str()));
        }
        if let Some(category) = filter.category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(category.as_str()));
        }
        if let Some(ref s) = filter.search {
            sql.push_str(&format!(" AND title LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");
        sql.push_str(&format!(" LIMIT {}", filter.effective_limit()));

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_goal)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_goal_count(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM goals WHERE status != ?1",
            params![GoalStatus::Archived.as_str()],
            |row| row.get(0),
        )?)
    }

    /// Apply a partial update. Returns the updated goal, or `None` if no goal
    /// has this id.
    pub(crate) fn update_goal(&self, id: i64, update: &GoalUpdate) -> Result<Option<Goal>> {
        let Some(mut goal) = self.get_goal_by_id(id)? else {
            return Ok(None);
        };
        goal.apply(update);
        goal.updated_at = Some(timestamp());
        self.write_goal(id, &goal)?;
        info!(id, "updated goal");
        Ok(Some(goal))
    }

    /// Record a contribution (or a withdrawal, if negative) against a goal.
    pub(crate) fn add_savings(&self, id: i64, amount: Decimal) -> Result<Option<Goal>> {
        let Some(mut goal) = self.get_goal_by_id(id)? else {
            return Ok(None);
        };
        let saved = goal.current_saved.checked_add(amount).ok_or_else(|| {
            PlanError::InvalidAmount(format!("adding {amount} overflows the saved amount"))
        })?;
        let saved = plan::round_cents(saved);
        plan::validate_current_saved(saved)?;
        goal.current_saved = saved;
        goal.updated_at = Some(timestamp());
        self.write_goal(id, &goal)?;
        info!(id, %amount, saved = %goal.current_saved, "recorded savings");
        Ok(Some(goal))
    }

    /// Soft delete: the row stays, marked archived.
    pub(crate) fn archive_goal(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE goals SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                GoalStatus::Archived.as_str(),
                timestamp(),
                id
            ],
        )?;
        if changed > 0 {
            info!(id, "archived goal");
        }
        Ok(changed > 0)
    }

    /// Hard delete.
    pub(crate) fn delete_goal(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "deleted goal");
        }
        Ok(changed > 0)
    }

    fn write_goal(&self, id: i64, goal: &Goal) -> Result<()> {
        self.conn.execute(
            "UPDATE goals SET title = ?1, description = ?2, category = ?3, target_amount = ?4,
                              target_date = ?5, current_saved = ?6, image_url = ?7, status = ?8,
                              updated_at = ?9
             WHERE id = ?10",
            params![
                goal.title,
                goal.description,
                goal.category.as_str(),
                goal.target_amount.to_string(),
                goal.target_date.to_string(),
                goal.current_saved.to_string(),
                goal.image_url,
                goal.status.as_str(),
                goal.updated_at,
                id,
            ],
        )?;
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    /// Write matching goals to CSV with their derived amounts as of `today`.
    /// Returns the number of goals written.
    pub(crate) fn export_to_csv(
        &self,
        path: &Path,
        filter: &GoalFilter,
        today: NaiveDate,
        mode: PlanMode,
    ) -> Result<usize> {
        let goals = self.get_goals(filter)?;
        if goals.is_empty() {
            return Ok(0);
        }

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        wtr.write_record([
            "id",
            "title",
            "category",
            "status",
            "target_amount",
            "current_saved",
            "target_date",
            "days_remaining",
            "amount_remaining",
            "daily_amount",
            "weekly_amount",
            "monthly_amount",
            "progress_percentage",
        ])?;

        for goal in &goals {
            let view = goal.view(today, mode);
            wtr.write_record([
                goal.id.unwrap_or(0).to_string(),
                goal.title.clone(),
                goal.category.to_string(),
                goal.status.to_string(),
                format!("{:.2}", goal.target_amount),
                format!("{:.2}", goal.current_saved),
                goal.target_date.to_string(),
                view.plan.days_remaining.to_string(),
                format!("{:.2}", view.plan.amount_remaining),
                format!("{:.2}", view.plan.daily_amount),
                format!("{:.2}", view.plan.weekly_amount),
                format!("{:.2}", view.plan.monthly_amount),
                format!("{:.2}", view.progress_percentage),
            ])?;
        }
        wtr.flush().context("Failed to write export file")?;
        info!(count = goals.len(), path = %path.display(), "exported goals");
        Ok(goals.len())
    }
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn row_to_goal(row: &Row<'_>) -> rusqlite::Result<Goal> {
    let date_str: String = row.get(5)?;
    let target_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Goal {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        category: GoalCategory::parse(&row.get::<_, String>(3)?).unwrap_or_default(),
        target_amount: amount_column(row, 4)?,
        target_date,
        current_saved: amount_column(row, 6)?,
        image_url: row.get(7)?,
        status: GoalStatus::parse(&row.get::<_, String>(8)?).unwrap_or_default(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Amounts are stored as decimal TEXT; anything else is a corrupt row.
fn amount_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests;
