use crate::{Binding, Result, Row};

/// Database connection the builder executes through. The builder owns
/// the full statement lifecycle: compile, prepare, bind positionally,
/// run, so implementations only ever see finished SQL plus bindings.
pub trait Connection {
    fn prepare(&self, sql: &str) -> Result<Box<dyn Statement>>;

    /// Identifier generated by the most recent `INSERT` on this
    /// connection.
    fn last_insert_id(&self) -> Result<i64>;
}

/// Prepared statement handle. Bindings are passed on every run, in the
/// same order the placeholders appear in the SQL text.
pub trait Statement {
    /// Runs the statement and returns the number of affected rows.
    fn execute(&mut self, bindings: &[Binding]) -> Result<u64>;

    fn fetch(&mut self, bindings: &[Binding]) -> Result<Option<Row>>;

    fn fetch_all(&mut self, bindings: &[Binding]) -> Result<Vec<Row>>;
}
