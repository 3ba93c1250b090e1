use crate::{
    Binding, Clause, ClauseNode, Join, Operand, OrderBy, QuarryError, Value, separated_by,
};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Linearizes builder state into SQL text while pushing the matching
/// bindings in placeholder order. Every `?` written is paired with
/// exactly one binding pushed, so text and parameters never drift apart.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    #[allow(clippy::too_many_arguments)]
    fn write_select(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        columns: &[String],
        table: &str,
        joins: &[Join],
        wheres: &[ClauseNode],
        group_by: &[String],
        havings: &[ClauseNode],
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(), QuarryError> {
        out.push_str("SELECT ");
        separated_by(out, columns, |out, column| out.push_str(column), ", ");
        out.push_str(" FROM ");
        out.push_str(table);
        for join in joins {
            out.push(' ');
            self.write_join(out, bindings, join);
        }
        self.write_where_section(out, bindings, wheres)?;
        if !group_by.is_empty() {
            out.push_str(" GROUP BY ");
            separated_by(out, group_by, |out, column| out.push_str(column), ", ");
        }
        if havings.iter().any(|node| !node.is_empty()) {
            out.push_str(" HAVING ");
            self.write_clauses(out, bindings, havings)?;
        }
        self.write_order_by_section(out, order_by);
        self.write_limit_offset(out, limit, offset);
        Ok(())
    }

    /// Same as [`Self::write_select`] but parenthesized for use as a
    /// derived table or scalar subquery, with an optional alias.
    #[allow(clippy::too_many_arguments)]
    fn write_sub_select(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        alias: Option<&str>,
        columns: &[String],
        table: &str,
        joins: &[Join],
        wheres: &[ClauseNode],
        group_by: &[String],
        havings: &[ClauseNode],
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(), QuarryError> {
        out.push('(');
        self.write_select(
            out, bindings, columns, table, joins, wheres, group_by, havings, order_by, limit,
            offset,
        )?;
        out.push(')');
        if let Some(alias) = alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        Ok(())
    }

    fn write_insert(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        table: &str,
        values: &[(String, Operand)],
        ignore: bool,
    ) -> Result<(), QuarryError> {
        out.push_str(if ignore {
            "INSERT IGNORE INTO "
        } else {
            "INSERT INTO "
        });
        out.push_str(table);
        out.push_str(" (");
        separated_by(out, values, |out, (column, _)| out.push_str(column), ", ");
        out.push_str(") VALUES (");
        for (i, (_, value)) in values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_operand(out, bindings, value)?;
        }
        out.push_str(");");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_update(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        table: &str,
        assignments: &[(String, Operand)],
        wheres: &[ClauseNode],
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(), QuarryError> {
        out.push_str("UPDATE ");
        out.push_str(table);
        out.push_str(" SET ");
        for (i, (column, value)) in assignments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(column);
            out.push_str(" = ");
            self.write_operand(out, bindings, value)?;
        }
        self.write_where_section(out, bindings, wheres)?;
        self.write_order_by_section(out, order_by);
        self.write_limit_offset(out, limit, offset);
        out.push(';');
        Ok(())
    }

    fn write_delete(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        table: &str,
        wheres: &[ClauseNode],
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(), QuarryError> {
        out.push_str("DELETE FROM ");
        out.push_str(table);
        self.write_where_section(out, bindings, wheres)?;
        self.write_order_by_section(out, order_by);
        self.write_limit_offset(out, limit, offset);
        out.push(';');
        Ok(())
    }

    fn write_where_section(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        wheres: &[ClauseNode],
    ) -> Result<(), QuarryError> {
        if wheres.iter().any(|node| !node.is_empty()) {
            out.push_str(" WHERE ");
            self.write_clauses(out, bindings, wheres)?;
        }
        Ok(())
    }

    /// One level of the clause forest. The first rendered node drops its
    /// connector, every later one is prefixed with its own.
    fn write_clauses(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        nodes: &[ClauseNode],
    ) -> Result<(), QuarryError> {
        let mut first = true;
        for node in nodes {
            if node.is_empty() {
                continue;
            }
            if !first {
                out.push(' ');
            }
            self.write_clause_node(out, bindings, node, !first)?;
            first = false;
        }
        Ok(())
    }

    fn write_clause_node(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        node: &ClauseNode,
        with_connector: bool,
    ) -> Result<(), QuarryError> {
        match node {
            ClauseNode::Clause(clause) => self.write_clause(out, bindings, clause, with_connector),
            ClauseNode::Group(children) => {
                let mut non_empty = children.iter().filter(|child| !child.is_empty());
                match (non_empty.next(), non_empty.next()) {
                    // A group of one renders without its parentheses.
                    (Some(single), None) => {
                        self.write_clause_node(out, bindings, single, with_connector)
                    }
                    (None, ..) => Ok(()),
                    _ => {
                        if with_connector {
                            out.push_str(node.connector().as_str());
                            out.push(' ');
                        }
                        out.push('(');
                        self.write_clauses(out, bindings, children)?;
                        out.push(')');
                        Ok(())
                    }
                }
            }
        }
    }

    fn write_clause(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        clause: &Clause,
        with_connector: bool,
    ) -> Result<(), QuarryError> {
        if with_connector {
            out.push_str(clause.connector.as_str());
            out.push(' ');
        }
        self.write_column(out, bindings, &clause.left);
        out.push(' ');
        out.push_str(clause.operator.as_str());
        out.push(' ');
        if clause.operator.expects_list() {
            if let Operand::Value(Value::List(items)) = &clause.right {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    bindings.push(Binding::try_from(item.clone())?);
                    out.push('?');
                }
                out.push(')');
                return Ok(());
            }
        }
        self.write_operand(out, bindings, &clause.right)
    }

    /// Left-hand side of a comparison, spliced as identifier text.
    fn write_column(&self, out: &mut String, bindings: &mut Vec<Binding>, operand: &Operand) {
        match operand {
            Operand::Value(Value::Text(text)) => out.push_str(text),
            Operand::Value(value) => out.push_str(&value.to_json()),
            Operand::Expression(expression) => out.push_str(expression.text()),
            Operand::Variable(variable) => {
                out.push_str(variable.text());
                bindings.extend(variable.bindings().iter().cloned());
            }
        }
    }

    /// Value position of a comparison: a plain value becomes `?` with a
    /// binding, expressions are spliced verbatim.
    fn write_operand(
        &self,
        out: &mut String,
        bindings: &mut Vec<Binding>,
        operand: &Operand,
    ) -> Result<(), QuarryError> {
        match operand {
            Operand::Value(value) => {
                bindings.push(Binding::try_from(value.clone())?);
                out.push('?');
            }
            Operand::Expression(expression) => out.push_str(expression.text()),
            Operand::Variable(variable) => {
                out.push_str(variable.text());
                bindings.extend(variable.bindings().iter().cloned());
            }
        }
        Ok(())
    }

    fn write_join(&self, out: &mut String, bindings: &mut Vec<Binding>, join: &Join) {
        let _ = write!(out, "{}", join);
        bindings.extend(join.bindings.iter().cloned());
    }

    fn write_order_by_section(&self, out: &mut String, order_by: &[OrderBy]) {
        if !order_by.is_empty() {
            out.push_str(" ORDER BY ");
            separated_by(
                out,
                order_by,
                |out, order| {
                    let _ = write!(out, "{}", order);
                },
                ", ",
            );
        }
    }

    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
        if let Some(offset) = offset {
            out.push_str(" OFFSET ");
            write_integer!(out, offset);
        }
    }
}

pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindType, Logical, Operator};

    fn clause(column: &str, operator: Operator, value: Value, connector: Logical) -> ClauseNode {
        ClauseNode::Clause(Clause::new(column, operator, value, connector))
    }

    #[test]
    fn clauses_drop_leading_connector() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_clauses(
                &mut out,
                &mut bindings,
                &[
                    clause("age", Operator::Greater, Value::Int(18), Logical::And),
                    clause("age", Operator::Less, Value::Int(65), Logical::Or),
                ],
            )
            .unwrap();
        assert_eq!(out, "age > ? OR age < ?");
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn group_of_one_is_unwrapped() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_clauses(
                &mut out,
                &mut bindings,
                &[ClauseNode::Group(vec![clause(
                    "age",
                    Operator::Equals,
                    Value::Int(25),
                    Logical::And,
                )])],
            )
            .unwrap();
        assert_eq!(out, "age = ?");
    }

    #[test]
    fn group_connector_comes_from_first_child() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_clauses(
                &mut out,
                &mut bindings,
                &[
                    clause("gender", Operator::Equals, Value::Text("male".into()), Logical::And),
                    ClauseNode::Group(vec![
                        clause("age", Operator::Greater, Value::Int(18), Logical::Or),
                        clause("age", Operator::Less, Value::Int(65), Logical::Or),
                    ]),
                ],
            )
            .unwrap();
        assert_eq!(out, "gender = ? OR (age > ? OR age < ?)");
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn in_list_renders_one_placeholder_per_element() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_clauses(
                &mut out,
                &mut bindings,
                &[clause(
                    "age",
                    Operator::In,
                    Value::List(vec![Value::Int(19), Value::Int(27), Value::Int(65)]),
                    Logical::And,
                )],
            )
            .unwrap();
        assert_eq!(out, "age IN (?, ?, ?)");
        assert_eq!(
            bindings.iter().map(|b| b.bind_type).collect::<Vec<_>>(),
            vec![BindType::Int, BindType::Int, BindType::Int]
        );
    }

    #[test]
    fn empty_groups_are_skipped() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_clauses(
                &mut out,
                &mut bindings,
                &[
                    ClauseNode::Group(vec![]),
                    clause("id", Operator::Equals, Value::Int(1), Logical::And),
                ],
            )
            .unwrap();
        assert_eq!(out, "id = ?");
    }

    #[test]
    fn insert_ignores_and_binds_in_column_order() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_insert(
                &mut out,
                &mut bindings,
                "users",
                &[
                    ("name".into(), Operand::from("Tom")),
                    ("age".into(), Operand::from(25)),
                ],
                true,
            )
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO users (name, age) VALUES (?, ?);");
        assert_eq!(bindings[0].value, Value::Text("Tom".into()));
        assert_eq!(bindings[1].value, Value::Int(25));
    }

    #[test]
    fn update_emits_set_bindings_before_where_bindings() {
        let mut out = String::new();
        let mut bindings = Vec::new();
        GenericSqlWriter
            .write_update(
                &mut out,
                &mut bindings,
                "users",
                &[("name".into(), Operand::from("Tom"))],
                &[clause("id", Operator::Equals, Value::Int(7), Logical::And)],
                &[],
                None,
                None,
            )
            .unwrap();
        assert_eq!(out, "UPDATE users SET name = ? WHERE id = ?;");
        assert_eq!(bindings[0].value, Value::Text("Tom".into()));
        assert_eq!(bindings[1].value, Value::Int(7));
    }
}
