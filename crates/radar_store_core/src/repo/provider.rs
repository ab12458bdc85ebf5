//! Execution provider contract and its SQLite implementation.
//!
//! # Responsibility
//! - Run one read statement into a tabular `ResultSet`.
//! - Run one mutating statement and report affected rows.
//! - Run an ordered statement list as one all-or-nothing transaction.
//!
//! # Invariants
//! - `execute_transactional` never leaves a partial write behind: it commits
//!   every statement or none.
//! - An empty statement list is a successful no-op.
//! - Connections are borrowed per call; no statement or transaction outlives
//!   the call that created it.

use super::error::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};

/// SQL text plus its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Tabular read result: column names plus row values in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        self.rows.iter().map(|values| ResultRow {
            columns: &self.columns,
            values,
        })
    }
}

/// Borrowed view of one `ResultSet` row with typed, name-based accessors.
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> ResultRow<'a> {
    pub fn value(&self, column: &str) -> RepoResult<&'a Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| RepoError::MissingColumn(column.to_string()))
    }

    pub fn optional_integer(&self, column: &str) -> RepoResult<Option<i64>> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Integer(value) => Ok(Some(*value)),
            other => Err(unexpected_type(column, "integer", other)),
        }
    }

    pub fn integer(&self, column: &str) -> RepoResult<i64> {
        self.optional_integer(column)?
            .ok_or_else(|| RepoError::InvalidData(format!("`{column}` is NULL")))
    }

    /// Reads a REAL column; integer storage is widened.
    pub fn real(&self, column: &str) -> RepoResult<f64> {
        match self.value(column)? {
            Value::Real(value) => Ok(*value),
            Value::Integer(value) => Ok(*value as f64),
            other => Err(unexpected_type(column, "real", other)),
        }
    }

    /// Reads a TEXT column; NULL reads as empty text.
    pub fn text(&self, column: &str) -> RepoResult<String> {
        match self.value(column)? {
            Value::Null => Ok(String::new()),
            Value::Text(value) => Ok(value.clone()),
            other => Err(unexpected_type(column, "text", other)),
        }
    }
}

fn unexpected_type(column: &str, expected: &str, actual: &Value) -> RepoError {
    RepoError::InvalidData(format!(
        "`{column}` should be {expected}, got {:?}",
        actual.data_type()
    ))
}

/// Storage capability consumed by the radar repository.
pub trait ExecutionProvider {
    /// Runs a read-only statement.
    fn query(&self, statement: &Statement) -> RepoResult<ResultSet>;
    /// Runs one mutating statement and returns the affected row count.
    fn execute(&self, statement: &Statement) -> RepoResult<usize>;
    /// Runs all statements in one transaction.
    ///
    /// Returns `Ok(true)` after commit and `Ok(false)` when a statement failed
    /// and everything was rolled back. `Err` is reserved for failures to
    /// begin, commit or roll back the transaction itself.
    fn execute_transactional(&self, statements: &[Statement]) -> RepoResult<bool>;
}

/// `ExecutionProvider` over a caller-owned SQLite connection.
pub struct SqliteProvider<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProvider<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }
}

impl ExecutionProvider for SqliteProvider<'_> {
    fn query(&self, statement: &Statement) -> RepoResult<ResultSet> {
        let mut stmt = self.conn.prepare(statement.sql())?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(statement.params()))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for index in 0..width {
                record.push(row.get::<_, Value>(index)?);
            }
            values.push(record);
        }

        Ok(ResultSet::new(columns, values))
    }

    fn execute(&self, statement: &Statement) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute(statement.sql(), params_from_iter(statement.params()))?;
        Ok(changed)
    }

    fn execute_transactional(&self, statements: &[Statement]) -> RepoResult<bool> {
        if statements.is_empty() {
            debug!("event=radar_batch module=provider status=skipped reason=empty");
            return Ok(true);
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (index, statement) in statements.iter().enumerate() {
            let outcome = tx.execute(statement.sql(), params_from_iter(statement.params()));
            if let Err(err) = outcome {
                warn!(
                    "event=radar_batch module=provider status=rolled_back failed_index={index} total={} error={err}",
                    statements.len()
                );
                // SQLite may already have rolled back on its own (RAISE(ROLLBACK), SQLITE_FULL).
                if self.conn.is_autocommit() {
                    drop(tx);
                } else {
                    tx.rollback()?;
                }
                return Ok(false);
            }
        }
        tx.commit()?;

        debug!(
            "event=radar_batch module=provider status=committed total={}",
            statements.len()
        );
        Ok(true)
    }
}
