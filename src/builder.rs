use crate::{
    Argument, Binding, Clause, ClauseNode, Connection, Direction, FromRow, GenericSqlWriter, Join,
    JoinType, Logical, Operand, Operator, OrderBy, QuarryError, Result, SqlWriter, Value,
    VariableExpression,
    method::{self, Family},
    truncate_long,
};
use log::debug;
use std::mem::take;

#[derive(Clone, Copy)]
enum Section {
    Where,
    Having,
}

/// Fluent statement builder. Accumulates state through chained calls and
/// compiles to SQL plus ordered bindings when a terminal method runs.
///
/// A builder describes exactly one statement: it is created for it,
/// consumed by its terminal call and never shared.
pub struct Builder<'c> {
    connection: &'c dyn Connection,
    table: Option<String>,
    table_alias: Option<String>,
    columns: Vec<String>,
    joins: Vec<Join>,
    wheres: Vec<ClauseNode>,
    havings: Vec<ClauseNode>,
    group_by: Vec<String>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'c> Builder<'c> {
    pub fn new(connection: &'c dyn Connection) -> Self {
        Self {
            connection,
            table: None,
            table_alias: None,
            columns: vec!["*".into()],
            joins: Vec::new(),
            wheres: Vec::new(),
            havings: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn from(self, table: impl Into<String>) -> Self {
        self.table(table)
    }

    pub fn into_table(self, table: impl Into<String>) -> Self {
        self.table(table)
    }

    /// Alias applied when this builder compiles as a subquery.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn select(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn count(mut self, column: &str) -> Self {
        self.columns = vec![format!("COUNT({})", column)];
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy::new(column, direction));
        self
    }

    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, Direction::Asc)
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, Direction::Desc)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn clauses_mut(&mut self, section: Section) -> &mut Vec<ClauseNode> {
        match section {
            Section::Where => &mut self.wheres,
            Section::Having => &mut self.havings,
        }
    }

    fn clause(
        mut self,
        section: Section,
        column: impl Into<Operand>,
        value: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
    ) -> Self {
        self.clauses_mut(section)
            .push(Clause::new(column, operator, value, connector).into());
        self
    }

    /// Captures the clauses produced by `group` into a parenthesized
    /// node, folding any previously accumulated clauses into a sibling
    /// group of their own.
    fn clause_group(
        mut self,
        section: Section,
        group: impl FnOnce(Self) -> Self,
    ) -> Self {
        let previous = take(self.clauses_mut(section));
        let mut builder = group(self);
        let captured = take(builder.clauses_mut(section));
        *builder.clauses_mut(section) = if previous.is_empty() {
            vec![ClauseNode::Group(captured)]
        } else {
            vec![ClauseNode::Group(previous), ClauseNode::Group(captured)]
        };
        builder
    }

    /// Builds the right-hand side from a child builder. With a table set
    /// the child compiles to a parenthesized subquery owning its
    /// bindings, otherwise its clauses are merged as a group.
    fn clause_sub(
        mut self,
        section: Section,
        column: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
    ) -> Result<Self, QuarryError> {
        let mut child = sub(Builder::new(self.connection));
        if child.table.is_some() {
            let (sql, bindings) = child.compile_sub_select()?;
            self.clauses_mut(section).push(
                Clause::new(
                    column,
                    operator,
                    VariableExpression::new(sql, bindings),
                    connector,
                )
                .into(),
            );
        } else {
            let captured = take(child.clauses_mut(section));
            let previous = take(self.clauses_mut(section));
            *self.clauses_mut(section) = if previous.is_empty() {
                vec![ClauseNode::Group(captured)]
            } else {
                vec![ClauseNode::Group(previous), ClauseNode::Group(captured)]
            };
        }
        Ok(self)
    }

    pub fn where_with(
        self,
        column: impl Into<Operand>,
        value: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
    ) -> Self {
        self.clause(Section::Where, column, value, operator, connector)
    }

    pub fn where_(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Equals, Logical::And)
    }

    pub fn or_where(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Equals, Logical::Or)
    }

    pub fn xor_where(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Equals, Logical::Xor)
    }

    pub fn where_not(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::NotEquals, Logical::And)
    }

    pub fn where_is(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Is, Logical::And)
    }

    pub fn where_is_not(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::IsNot, Logical::And)
    }

    pub fn where_is_null(self, column: impl Into<Operand>) -> Self {
        self.where_with(column, Operand::Value(Default::default()), Operator::Is, Logical::And)
    }

    pub fn where_is_not_null(self, column: impl Into<Operand>) -> Self {
        self.where_with(
            column,
            Operand::Value(Default::default()),
            Operator::IsNot,
            Logical::And,
        )
    }

    pub fn where_in(self, column: impl Into<Operand>, values: impl Into<Operand>) -> Self {
        self.where_with(column, values, Operator::In, Logical::And)
    }

    pub fn where_not_in(self, column: impl Into<Operand>, values: impl Into<Operand>) -> Self {
        self.where_with(column, values, Operator::NotIn, Logical::And)
    }

    pub fn where_like(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Like, Logical::And)
    }

    pub fn where_less(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Less, Logical::And)
    }

    pub fn where_greater(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.where_with(column, value, Operator::Greater, Logical::And)
    }

    /// Parenthesized `WHERE` group. The callback receives this builder,
    /// so state it touches beyond clauses (joins, ordering) lands on the
    /// statement itself.
    pub fn where_group(self, group: impl FnOnce(Self) -> Self) -> Self {
        self.clause_group(Section::Where, group)
    }

    /// Compares `column` against a subquery built by `sub` on a fresh
    /// builder. A callback that never sets a table contributes its
    /// clauses as a plain group instead.
    pub fn where_sub(
        self,
        column: impl Into<Operand>,
        operator: Operator,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
    ) -> Result<Self, QuarryError> {
        self.clause_sub(Section::Where, column, operator, Logical::And, sub)
    }

    pub fn where_sub_with(
        self,
        column: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
    ) -> Result<Self, QuarryError> {
        self.clause_sub(Section::Where, column, operator, connector, sub)
    }

    pub fn having_with(
        self,
        column: impl Into<Operand>,
        value: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
    ) -> Self {
        self.clause(Section::Having, column, value, operator, connector)
    }

    pub fn having(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.having_with(column, value, Operator::Equals, Logical::And)
    }

    pub fn or_having(self, column: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.having_with(column, value, Operator::Equals, Logical::Or)
    }

    pub fn having_group(self, group: impl FnOnce(Self) -> Self) -> Self {
        self.clause_group(Section::Having, group)
    }

    pub fn having_sub(
        self,
        column: impl Into<Operand>,
        operator: Operator,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
    ) -> Result<Self, QuarryError> {
        self.clause_sub(Section::Having, column, operator, Logical::And, sub)
    }

    pub fn having_sub_with(
        self,
        column: impl Into<Operand>,
        operator: Operator,
        connector: Logical,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
    ) -> Result<Self, QuarryError> {
        self.clause_sub(Section::Having, column, operator, connector, sub)
    }

    pub fn join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(table, left, right, Operator::Equals, None, None)
    }

    pub fn join_with(
        mut self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        operator: Operator,
        join_type: Option<JoinType>,
        alias: Option<&str>,
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            left: left.into(),
            right: right.into(),
            operator,
            join_type,
            alias: alias.map(str::to_string),
            bindings: Vec::new(),
        });
        self
    }

    pub fn left_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(table, left, right, Operator::Equals, Some(JoinType::Left), None)
    }

    pub fn left_outer_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(
            table,
            left,
            right,
            Operator::Equals,
            Some(JoinType::LeftOuter),
            None,
        )
    }

    pub fn right_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(table, left, right, Operator::Equals, Some(JoinType::Right), None)
    }

    pub fn right_outer_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(
            table,
            left,
            right,
            Operator::Equals,
            Some(JoinType::RightOuter),
            None,
        )
    }

    pub fn cross_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join_with(table, left, right, Operator::Equals, Some(JoinType::Cross), None)
    }

    /// Joins against a derived table compiled from `sub`, whose alias
    /// ends up inside the parenthesized table text. The subquery
    /// bindings travel with the join and precede every `WHERE` binding.
    pub fn join_sub(
        mut self,
        sub: impl FnOnce(Builder<'c>) -> Builder<'c>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Result<Self, QuarryError> {
        let child = sub(Builder::new(self.connection));
        let (table, bindings) = child.compile_sub_select()?;
        self.joins.push(Join {
            table,
            left: left.into(),
            right: right.into(),
            operator: Operator::Equals,
            join_type: None,
            alias: None,
            bindings,
        });
        Ok(self)
    }

    /// Dispatches a convenience method by name, decomposing it into
    /// connector prefix, verb and operator suffix. The join family
    /// requires at least table, left and right column arguments.
    pub fn call(self, name: &str, arguments: Vec<Argument>) -> Result<Self, QuarryError> {
        match method::family(name)? {
            Family::Join => {
                if arguments.len() < 3 {
                    return Err(QuarryError::ArityError {
                        method: name.into(),
                        received: arguments.len(),
                        expected: 3,
                    });
                }
                let join_type = method::decompose_join(name)?;
                let operator = arguments
                    .get(3)
                    .and_then(Argument::as_operator)
                    .unwrap_or_default();
                let alias = arguments
                    .get(4)
                    .and_then(Argument::as_text)
                    .map(str::to_string);
                let mut args = arguments.into_iter();
                let table = args.next().and_then(Argument::into_value).unwrap_or_default();
                let left = args.next().and_then(Argument::into_value).unwrap_or_default();
                let right = args.next().and_then(Argument::into_value).unwrap_or_default();
                Ok(self.join_with(
                    text_of(table),
                    text_of(left),
                    text_of(right),
                    operator,
                    Some(join_type),
                    alias.as_deref(),
                ))
            }
            family @ (Family::Where | Family::Having) => {
                if arguments.is_empty() {
                    return Err(QuarryError::ArityError {
                        method: name.into(),
                        received: 0,
                        expected: 1,
                    });
                }
                let pattern = method::decompose_clause(family, name)?;
                let operator = pattern.operator.unwrap_or_else(|| {
                    arguments
                        .get(2)
                        .and_then(Argument::as_operator)
                        .unwrap_or_default()
                });
                let mut args = arguments.into_iter();
                let column = args.next().and_then(Argument::into_value).unwrap_or_default();
                let value = if pattern.null_value {
                    Default::default()
                } else {
                    args.next().and_then(Argument::into_value).unwrap_or_default()
                };
                let section = match family {
                    Family::Where => Section::Where,
                    _ => Section::Having,
                };
                Ok(self.clause(section, column, value, operator, pattern.connector))
            }
        }
    }

    pub fn compile_select(&self) -> Result<(String, Vec<Binding>), QuarryError> {
        let mut sql = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter.write_select(
            &mut sql,
            &mut bindings,
            &self.columns,
            self.table.as_deref().unwrap_or_default(),
            &self.joins,
            &self.wheres,
            &self.group_by,
            &self.havings,
            &self.order_by,
            self.limit,
            self.offset,
        )?;
        sql.push(';');
        Ok((sql, bindings))
    }

    fn compile_sub_select(&self) -> Result<(String, Vec<Binding>), QuarryError> {
        let mut sql = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter.write_sub_select(
            &mut sql,
            &mut bindings,
            self.table_alias.as_deref(),
            &self.columns,
            self.table.as_deref().unwrap_or_default(),
            &self.joins,
            &self.wheres,
            &self.group_by,
            &self.havings,
            &self.order_by,
            self.limit,
            self.offset,
        )?;
        Ok((sql, bindings))
    }

    pub fn compile_update(
        &self,
        assignments: &[(String, Operand)],
    ) -> Result<(String, Vec<Binding>), QuarryError> {
        let mut sql = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter.write_update(
            &mut sql,
            &mut bindings,
            self.table.as_deref().unwrap_or_default(),
            assignments,
            &self.wheres,
            &self.order_by,
            self.limit,
            self.offset,
        )?;
        Ok((sql, bindings))
    }

    pub fn compile_insert(
        &self,
        values: &[(String, Operand)],
        ignore: bool,
    ) -> Result<(String, Vec<Binding>), QuarryError> {
        let mut sql = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter.write_insert(
            &mut sql,
            &mut bindings,
            self.table.as_deref().unwrap_or_default(),
            values,
            ignore,
        )?;
        Ok((sql, bindings))
    }

    pub fn compile_delete(&self) -> Result<(String, Vec<Binding>), QuarryError> {
        let mut sql = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter.write_delete(
            &mut sql,
            &mut bindings,
            self.table.as_deref().unwrap_or_default(),
            &self.wheres,
            &self.order_by,
            self.limit,
            self.offset,
        )?;
        Ok((sql, bindings))
    }

    pub fn fetch<T: FromRow>(self) -> Result<Option<T>> {
        let (sql, bindings) = self.compile_select()?;
        debug!("Executing query: {}", truncate_long!(sql));
        let mut statement = self.connection.prepare(&sql)?;
        match statement.fetch(&bindings)? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub fn fetch_all<T: FromRow>(self) -> Result<Vec<T>> {
        let (sql, bindings) = self.compile_select()?;
        debug!("Executing query: {}", truncate_long!(sql));
        let mut statement = self.connection.prepare(&sql)?;
        statement
            .fetch_all(&bindings)?
            .iter()
            .map(T::from_row)
            .collect()
    }

    pub fn update<S: Into<String>, V: Into<Operand>>(
        self,
        assignments: impl IntoIterator<Item = (S, V)>,
    ) -> Result<u64> {
        let assignments = assignments
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect::<Vec<_>>();
        let (sql, bindings) = self.compile_update(&assignments)?;
        debug!("Executing query: {}", truncate_long!(sql));
        self.connection.prepare(&sql)?.execute(&bindings)
    }

    pub fn insert<S: Into<String>, V: Into<Operand>>(
        self,
        values: impl IntoIterator<Item = (S, V)>,
    ) -> Result<i64> {
        self.run_insert(values, false)
    }

    /// `INSERT IGNORE` variant, rows violating constraints are skipped.
    pub fn insert_ignore<S: Into<String>, V: Into<Operand>>(
        self,
        values: impl IntoIterator<Item = (S, V)>,
    ) -> Result<i64> {
        self.run_insert(values, true)
    }

    fn run_insert<S: Into<String>, V: Into<Operand>>(
        self,
        values: impl IntoIterator<Item = (S, V)>,
        ignore: bool,
    ) -> Result<i64> {
        let values = values
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect::<Vec<_>>();
        let (sql, bindings) = self.compile_insert(&values, ignore)?;
        debug!("Executing query: {}", truncate_long!(sql));
        self.connection.prepare(&sql)?.execute(&bindings)?;
        self.connection.last_insert_id()
    }

    pub fn delete(self) -> Result<u64> {
        let (sql, bindings) = self.compile_delete()?;
        debug!("Executing query: {}", truncate_long!(sql));
        self.connection.prepare(&sql)?.execute(&bindings)
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::Text(text) => text,
        other => other.to_json(),
    }
}
