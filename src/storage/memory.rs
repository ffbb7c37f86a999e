use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use sqlparser::ast as sql_ast;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tokio::sync::Mutex;

use crate::core::{Result, StoreError, Value};
use crate::result::{QueryResult, Row};
use crate::storage::schema::{ColumnSpec, TableSchema};
use crate::storage::{INFORMATION_SCHEMA_COLUMNS, INFORMATION_SCHEMA_KEY_USAGE, QueryExecutor};

/// The bundled in-memory executor.
///
/// Holds typed tables behind a single async mutex and interprets the
/// statement shapes the DAO layer emits: CREATE TABLE, single-row INSERT,
/// single-table SELECT/UPDATE/DELETE with an equality-style WHERE clause,
/// and single-level snapshot transactions. Table metadata is additionally
/// served through virtual `information_schema` tables.
pub struct MemoryExecutor {
    state: Mutex<EngineState>,
}

struct EngineState {
    tables: HashMap<String, MemTable>,
    backup: Option<HashMap<String, MemTable>>,
}

#[derive(Clone)]
struct MemTable {
    schema: TableSchema,
    rows: BTreeMap<u64, Row>,
    next_row_id: u64,
    next_key: i64,
}

impl MemTable {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
            next_row_id: 0,
            next_key: 1,
        }
    }

    fn column_names(&self) -> Vec<String> {
        self.schema
            .columns()
            .iter()
            .map(|col| col.name.clone())
            .collect()
    }

    fn check_uniqueness(&self, candidate: &[Value], ignore: Option<u64>) -> Result<()> {
        for (idx, spec) in self.schema.columns().iter().enumerate() {
            if !(spec.primary_key || spec.unique) {
                continue;
            }
            let value = &candidate[idx];
            if value.is_null() {
                continue;
            }
            for (row_id, row) in &self.rows {
                if Some(*row_id) == ignore {
                    continue;
                }
                if &row[idx] == value {
                    return Err(StoreError::Constraint(format!(
                        "Unique constraint violation: Column '{}' already contains value {}",
                        spec.name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState {
                tables: HashMap::new(),
                backup: None,
            }),
        }
    }
}

impl Default for MemoryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        // Transaction control words go straight to the engine; sqlparser is
        // not involved (same short-circuit as a wire-protocol frontend).
        let trimmed = sql.trim().to_uppercase();
        if trimmed == "BEGIN" || trimmed == "BEGIN TRANSACTION" || trimmed == "START TRANSACTION" {
            return begin_locked(&mut *self.state.lock().await);
        }
        if trimmed == "COMMIT" || trimmed == "COMMIT TRANSACTION" {
            return commit_locked(&mut *self.state.lock().await);
        }
        if trimmed == "ROLLBACK" || trimmed == "ROLLBACK TRANSACTION" {
            return rollback_locked(&mut *self.state.lock().await);
        }

        let statements = Parser::parse_sql(&GenericDialect {}, sql)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        if statements.len() != 1 {
            return Err(StoreError::Parse(format!(
                "expected exactly one statement, got {}",
                statements.len()
            )));
        }
        let Some(statement) = statements.into_iter().next() else {
            return Err(StoreError::Parse("empty statement".into()));
        };

        let mut params = Params::new(params);
        let mut state = self.state.lock().await;
        match statement {
            sql_ast::Statement::CreateTable(create) => run_create_table(&mut state, create),
            sql_ast::Statement::Insert(insert) => run_insert(&mut state, insert, &mut params),
            sql_ast::Statement::Query(query) => run_select(&state, *query, &mut params),
            sql_ast::Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => run_update(&mut state, table, assignments, selection, &mut params),
            sql_ast::Statement::Delete(delete) => run_delete(&mut state, delete, &mut params),
            other => Err(StoreError::Execution(format!(
                "Statement type not supported: {}",
                other
            ))),
        }
    }

    async fn begin(&self) -> Result<()> {
        begin_locked(&mut *self.state.lock().await).map(|_| ())
    }

    async fn commit(&self) -> Result<()> {
        commit_locked(&mut *self.state.lock().await).map(|_| ())
    }

    async fn rollback(&self) -> Result<()> {
        rollback_locked(&mut *self.state.lock().await).map(|_| ())
    }
}

// ============================================================================
// Transactions: whole-catalog snapshots, single level
// ============================================================================

fn begin_locked(state: &mut EngineState) -> Result<QueryResult> {
    if state.backup.is_some() {
        return Err(StoreError::Transaction("transaction already active".into()));
    }
    state.backup = Some(state.tables.clone());
    Ok(QueryResult::empty())
}

fn commit_locked(state: &mut EngineState) -> Result<QueryResult> {
    state
        .backup
        .take()
        .ok_or_else(|| StoreError::Transaction("no active transaction".into()))?;
    Ok(QueryResult::empty())
}

fn rollback_locked(state: &mut EngineState) -> Result<QueryResult> {
    let backup = state
        .backup
        .take()
        .ok_or_else(|| StoreError::Transaction("no active transaction".into()))?;
    state.tables = backup;
    Ok(QueryResult::empty())
}

// ============================================================================
// Statement execution
// ============================================================================

fn run_create_table(state: &mut EngineState, create: sql_ast::CreateTable) -> Result<QueryResult> {
    let table_name = object_name_string(&create.name);
    if state.tables.contains_key(&table_name) {
        if create.if_not_exists {
            return Ok(QueryResult::empty());
        }
        return Err(StoreError::Execution(format!(
            "Table '{}' already exists",
            table_name
        )));
    }

    let mut columns = Vec::new();
    for col in &create.columns {
        let data_type = convert_data_type(&col.data_type)?;
        let mut spec = ColumnSpec::new(col.name.value.clone(), data_type);
        for opt in &col.options {
            match &opt.option {
                sql_ast::ColumnOption::NotNull => spec.nullable = false,
                sql_ast::ColumnOption::Unique { is_primary, .. } => {
                    spec.unique = true;
                    if *is_primary {
                        spec.primary_key = true;
                        spec.nullable = false;
                    }
                }
                sql_ast::ColumnOption::Default(expr) => {
                    spec.default = Some(literal(expr, &mut Params::new(&[]))?);
                }
                sql_ast::ColumnOption::Generated { .. } => spec.auto_generated = true,
                _ => {}
            }
        }
        columns.push(spec);
    }

    for constraint in &create.constraints {
        match constraint {
            sql_ast::TableConstraint::PrimaryKey { columns: keys, .. } => {
                for key in keys {
                    mark_column(&mut columns, &key.to_string(), &table_name, true)?;
                }
            }
            sql_ast::TableConstraint::Unique { columns: keys, .. } => {
                for key in keys {
                    mark_column(&mut columns, &key.to_string(), &table_name, false)?;
                }
            }
            _ => {}
        }
    }

    state.tables.insert(
        table_name.clone(),
        MemTable::new(TableSchema::new(table_name, columns)),
    );
    Ok(QueryResult::empty())
}

fn mark_column(
    columns: &mut [ColumnSpec],
    name: &str,
    table: &str,
    primary: bool,
) -> Result<()> {
    let spec = columns
        .iter_mut()
        .find(|col| col.name == name)
        .ok_or_else(|| StoreError::ColumnNotFound(name.to_string(), table.to_string()))?;
    spec.unique = true;
    if primary {
        spec.primary_key = true;
        spec.nullable = false;
    }
    Ok(())
}

fn run_insert(
    state: &mut EngineState,
    insert: sql_ast::Insert,
    params: &mut Params<'_>,
) -> Result<QueryResult> {
    let table_name = insert.table.to_string().to_lowercase();
    let provided_columns: Vec<String> = insert
        .columns
        .iter()
        .map(|ident| ident.value.clone())
        .collect();

    let source = insert
        .source
        .ok_or_else(|| StoreError::Execution("INSERT requires a VALUES clause".into()))?;
    let sql_ast::SetExpr::Values(values) = *source.body else {
        return Err(StoreError::Execution(
            "Only the VALUES clause is supported in INSERT".into(),
        ));
    };

    let table = state
        .tables
        .get_mut(&table_name)
        .ok_or_else(|| StoreError::TableNotFound(table_name.clone()))?;

    let mut affected = 0u64;
    let mut last_insert_id = None;
    for row_exprs in &values.rows {
        let names: Vec<String> = if provided_columns.is_empty() {
            table.column_names()
        } else {
            provided_columns.clone()
        };
        if row_exprs.len() != names.len() {
            return Err(StoreError::Execution(format!(
                "INSERT into '{}' supplies {} values for {} columns",
                table_name,
                row_exprs.len(),
                names.len()
            )));
        }

        let mut by_column: BTreeMap<String, Value> = BTreeMap::new();
        for (name, expr) in names.iter().zip(row_exprs) {
            by_column.insert(name.clone(), literal(expr, params)?);
        }

        let mut row = Vec::with_capacity(table.schema.columns().len());
        for spec in table.schema.columns() {
            let provided = by_column
                .remove(&spec.name)
                .filter(|value| !(spec.auto_generated && value.is_null()));
            let value = match provided {
                Some(value) => {
                    if spec.auto_generated
                        && let Value::Integer(supplied) = value
                    {
                        table.next_key = table.next_key.max(supplied + 1);
                    }
                    value
                }
                None if spec.auto_generated => {
                    let key = table.next_key;
                    table.next_key += 1;
                    Value::Integer(key)
                }
                None => spec.default.clone().unwrap_or(Value::Null),
            };
            row.push(value);
        }
        if let Some(unknown) = by_column.keys().next() {
            return Err(StoreError::ColumnNotFound(
                unknown.clone(),
                table_name.clone(),
            ));
        }

        table.schema.validate_row(&row)?;
        table.check_uniqueness(&row, None)?;

        if let Some(pk) = table.schema.primary_key()
            && let Some(idx) = table.schema.column_index(&pk.name)
        {
            last_insert_id = Some(row[idx].clone());
        }

        let row_id = table.next_row_id;
        table.next_row_id += 1;
        table.rows.insert(row_id, row);
        affected += 1;
    }

    let mut result = QueryResult::with_affected(affected);
    result.last_insert_id = last_insert_id;
    Ok(result)
}

fn run_select(
    state: &EngineState,
    query: sql_ast::Query,
    params: &mut Params<'_>,
) -> Result<QueryResult> {
    let sql_ast::SetExpr::Select(select) = *query.body else {
        return Err(StoreError::Execution("Only SELECT queries supported".into()));
    };

    if select.from.len() != 1 {
        return Err(StoreError::Execution(
            "SELECT must target exactly one table".into(),
        ));
    }
    let table_name = table_factor_name(&select.from[0].relation)?;

    let (columns, rows) = match virtual_rows(state, &table_name) {
        Some(virtual_table) => virtual_table,
        None => {
            let table = state
                .tables
                .get(&table_name)
                .ok_or_else(|| StoreError::TableNotFound(table_name.clone()))?;
            (
                table.column_names(),
                table.rows.values().cloned().collect::<Vec<Row>>(),
            )
        }
    };

    let condition = match &select.selection {
        Some(expr) => bind_condition(expr, params)?,
        None => Cond::All,
    };

    let mut matched = Vec::new();
    for row in &rows {
        if eval_condition(&condition, &columns, row, &table_name)? {
            matched.push(row.clone());
        }
    }

    if let Some(limit) = parse_limit(&query.limit_clause)? {
        matched.truncate(limit);
    }

    // Projection: `*` or plain column names.
    let mut wildcard = false;
    let mut picked: Vec<usize> = Vec::new();
    for item in &select.projection {
        match item {
            sql_ast::SelectItem::Wildcard(_) => wildcard = true,
            sql_ast::SelectItem::UnnamedExpr(expr) => {
                let name = column_name(expr)?;
                let idx = columns.iter().position(|c| *c == name).ok_or_else(|| {
                    StoreError::ColumnNotFound(name.clone(), table_name.clone())
                })?;
                picked.push(idx);
            }
            other => {
                return Err(StoreError::Execution(format!(
                    "Unsupported select item: {}",
                    other
                )));
            }
        }
    }

    if wildcard {
        return Ok(QueryResult::with_rows(columns, matched));
    }

    let projected_columns = picked.iter().map(|idx| columns[*idx].clone()).collect();
    let projected_rows = matched
        .into_iter()
        .map(|row| picked.iter().map(|idx| row[*idx].clone()).collect())
        .collect();
    Ok(QueryResult::with_rows(projected_columns, projected_rows))
}

fn run_update(
    state: &mut EngineState,
    table: sql_ast::TableWithJoins,
    assignments: Vec<sql_ast::Assignment>,
    selection: Option<sql_ast::Expr>,
    params: &mut Params<'_>,
) -> Result<QueryResult> {
    let table_name = table_factor_name(&table.relation)?;

    // Bind SET values before the WHERE clause: placeholder order.
    let mut sets: Vec<(String, Value)> = Vec::new();
    for assign in &assignments {
        let column = match &assign.target {
            sql_ast::AssignmentTarget::ColumnName(name) => {
                if name.0.len() == 1 {
                    name.0[0].to_string()
                } else {
                    return Err(StoreError::Execution(
                        "Qualified column names not supported in UPDATE".into(),
                    ));
                }
            }
            _ => {
                return Err(StoreError::Execution(
                    "Only simple column names supported in UPDATE".into(),
                ));
            }
        };
        sets.push((column, literal(&assign.value, params)?));
    }
    let condition = match &selection {
        Some(expr) => bind_condition(expr, params)?,
        None => Cond::All,
    };

    let table = state
        .tables
        .get_mut(&table_name)
        .ok_or_else(|| StoreError::TableNotFound(table_name.clone()))?;

    let mut resolved: Vec<(usize, Value)> = Vec::new();
    for (column, value) in sets {
        let idx = table
            .schema
            .column_index(&column)
            .ok_or_else(|| StoreError::ColumnNotFound(column, table_name.clone()))?;
        resolved.push((idx, value));
    }

    let columns = table.column_names();
    let mut targets = Vec::new();
    for (row_id, row) in &table.rows {
        if eval_condition(&condition, &columns, row, &table_name)? {
            targets.push(*row_id);
        }
    }

    let mut affected = 0u64;
    for row_id in targets {
        let Some(current) = table.rows.get(&row_id) else {
            continue;
        };
        let mut updated = current.clone();
        for (idx, value) in &resolved {
            updated[*idx] = value.clone();
        }
        table.schema.validate_row(&updated)?;
        table.check_uniqueness(&updated, Some(row_id))?;
        table.rows.insert(row_id, updated);
        affected += 1;
    }

    Ok(QueryResult::with_affected(affected))
}

fn run_delete(
    state: &mut EngineState,
    delete: sql_ast::Delete,
    params: &mut Params<'_>,
) -> Result<QueryResult> {
    let tables = match &delete.from {
        sql_ast::FromTable::WithFromKeyword(tables) => tables,
        sql_ast::FromTable::WithoutKeyword(tables) => tables,
    };
    if tables.is_empty() {
        return Err(StoreError::Execution("DELETE requires a table".into()));
    }
    let table_name = table_factor_name(&tables[0].relation)?;

    let condition = match &delete.selection {
        Some(expr) => bind_condition(expr, params)?,
        None => Cond::All,
    };

    let table = state
        .tables
        .get_mut(&table_name)
        .ok_or_else(|| StoreError::TableNotFound(table_name.clone()))?;

    let columns = table.column_names();
    let mut targets = Vec::new();
    for (row_id, row) in &table.rows {
        if eval_condition(&condition, &columns, row, &table_name)? {
            targets.push(*row_id);
        }
    }

    let mut affected = 0u64;
    for row_id in targets {
        if table.rows.remove(&row_id).is_some() {
            affected += 1;
        }
    }

    Ok(QueryResult::with_affected(affected))
}

// ============================================================================
// information_schema virtual tables
// ============================================================================

fn virtual_rows(state: &EngineState, table_name: &str) -> Option<(Vec<String>, Vec<Row>)> {
    match table_name {
        INFORMATION_SCHEMA_COLUMNS => {
            let columns = vec![
                "table_name".to_string(),
                "column_name".to_string(),
                "is_nullable".to_string(),
                "column_default".to_string(),
                "extra".to_string(),
            ];
            let mut rows = Vec::new();
            for (name, table) in &state.tables {
                for spec in table.schema.columns() {
                    rows.push(vec![
                        Value::Text(name.clone()),
                        Value::Text(spec.name.clone()),
                        Value::Text(if spec.nullable { "YES" } else { "NO" }.to_string()),
                        spec.default.clone().unwrap_or(Value::Null),
                        Value::Text(
                            if spec.auto_generated {
                                "auto_increment"
                            } else {
                                ""
                            }
                            .to_string(),
                        ),
                    ]);
                }
            }
            Some((columns, rows))
        }
        INFORMATION_SCHEMA_KEY_USAGE => {
            let columns = vec![
                "table_name".to_string(),
                "column_name".to_string(),
                "constraint_name".to_string(),
            ];
            let mut rows = Vec::new();
            for (name, table) in &state.tables {
                // Primary key first, then unique columns in declaration order.
                for spec in table.schema.columns() {
                    if spec.primary_key {
                        rows.push(vec![
                            Value::Text(name.clone()),
                            Value::Text(spec.name.clone()),
                            Value::Text("PRIMARY".to_string()),
                        ]);
                    }
                }
                for spec in table.schema.columns() {
                    if spec.unique && !spec.primary_key {
                        rows.push(vec![
                            Value::Text(name.clone()),
                            Value::Text(spec.name.clone()),
                            Value::Text(format!("uq_{}_{}", name, spec.name)),
                        ]);
                    }
                }
            }
            Some((columns, rows))
        }
        _ => None,
    }
}

// ============================================================================
// Expression binding and evaluation
// ============================================================================

struct Params<'a> {
    values: &'a [Value],
    next: usize,
}

impl<'a> Params<'a> {
    fn new(values: &'a [Value]) -> Self {
        Self { values, next: 0 }
    }

    fn take(&mut self) -> Result<Value> {
        let value = self.values.get(self.next).cloned().ok_or_else(|| {
            StoreError::Execution(format!(
                "statement references parameter {} but only {} were bound",
                self.next + 1,
                self.values.len()
            ))
        })?;
        self.next += 1;
        Ok(value)
    }
}

enum Cond {
    All,
    Cmp {
        column: String,
        op: CmpOp,
        value: Value,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
}

#[derive(Clone, Copy)]
enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

fn bind_condition(expr: &sql_ast::Expr, params: &mut Params<'_>) -> Result<Cond> {
    match expr {
        sql_ast::Expr::Nested(inner) => bind_condition(inner, params),
        sql_ast::Expr::BinaryOp { left, op, right } => match op {
            sql_ast::BinaryOperator::And => Ok(Cond::And(
                Box::new(bind_condition(left, params)?),
                Box::new(bind_condition(right, params)?),
            )),
            sql_ast::BinaryOperator::Or => Ok(Cond::Or(
                Box::new(bind_condition(left, params)?),
                Box::new(bind_condition(right, params)?),
            )),
            sql_ast::BinaryOperator::Eq => bind_cmp(left, CmpOp::Eq, right, params),
            sql_ast::BinaryOperator::NotEq => bind_cmp(left, CmpOp::NotEq, right, params),
            sql_ast::BinaryOperator::Lt => bind_cmp(left, CmpOp::Lt, right, params),
            sql_ast::BinaryOperator::LtEq => bind_cmp(left, CmpOp::LtEq, right, params),
            sql_ast::BinaryOperator::Gt => bind_cmp(left, CmpOp::Gt, right, params),
            sql_ast::BinaryOperator::GtEq => bind_cmp(left, CmpOp::GtEq, right, params),
            other => Err(StoreError::Execution(format!(
                "Unsupported operator in WHERE clause: {}",
                other
            ))),
        },
        sql_ast::Expr::IsNull(inner) => Ok(Cond::IsNull {
            column: column_name(inner)?,
            negated: false,
        }),
        sql_ast::Expr::IsNotNull(inner) => Ok(Cond::IsNull {
            column: column_name(inner)?,
            negated: true,
        }),
        other => Err(StoreError::Execution(format!(
            "Unsupported WHERE expression: {}",
            other
        ))),
    }
}

fn bind_cmp(
    left: &sql_ast::Expr,
    op: CmpOp,
    right: &sql_ast::Expr,
    params: &mut Params<'_>,
) -> Result<Cond> {
    Ok(Cond::Cmp {
        column: column_name(left)?,
        op,
        value: literal(right, params)?,
    })
}

fn eval_condition(cond: &Cond, columns: &[String], row: &[Value], table: &str) -> Result<bool> {
    match cond {
        Cond::All => Ok(true),
        Cond::And(a, b) => {
            Ok(eval_condition(a, columns, row, table)? && eval_condition(b, columns, row, table)?)
        }
        Cond::Or(a, b) => {
            Ok(eval_condition(a, columns, row, table)? || eval_condition(b, columns, row, table)?)
        }
        Cond::IsNull { column, negated } => {
            let value = cell(columns, row, column, table)?;
            Ok(value.is_null() != *negated)
        }
        Cond::Cmp { column, op, value } => {
            let current = cell(columns, row, column, table)?;
            if current.is_null() || value.is_null() {
                return Ok(false);
            }
            let ordering = current.compare(value)?;
            Ok(match op {
                CmpOp::Eq => ordering == std::cmp::Ordering::Equal,
                CmpOp::NotEq => ordering != std::cmp::Ordering::Equal,
                CmpOp::Lt => ordering == std::cmp::Ordering::Less,
                CmpOp::LtEq => ordering != std::cmp::Ordering::Greater,
                CmpOp::Gt => ordering == std::cmp::Ordering::Greater,
                CmpOp::GtEq => ordering != std::cmp::Ordering::Less,
            })
        }
    }
}

fn cell<'a>(columns: &[String], row: &'a [Value], column: &str, table: &str) -> Result<&'a Value> {
    columns
        .iter()
        .position(|c| c == column)
        .and_then(|idx| row.get(idx))
        .ok_or_else(|| StoreError::ColumnNotFound(column.to_string(), table.to_string()))
}

fn literal(expr: &sql_ast::Expr, params: &mut Params<'_>) -> Result<Value> {
    match expr {
        sql_ast::Expr::Value(value) => match &value.value {
            sql_ast::Value::Placeholder(_) => params.take(),
            sql_ast::Value::Number(n, _) => n.parse::<i64>().map(Value::Integer).map_err(|_| {
                StoreError::TypeMismatch(format!("Invalid integer literal: {}", n))
            }),
            sql_ast::Value::SingleQuotedString(s) | sql_ast::Value::DoubleQuotedString(s) => {
                Ok(Value::Text(s.clone()))
            }
            sql_ast::Value::Boolean(b) => Ok(Value::Boolean(*b)),
            sql_ast::Value::Null => Ok(Value::Null),
            other => Err(StoreError::Execution(format!(
                "Unsupported literal: {}",
                other
            ))),
        },
        sql_ast::Expr::UnaryOp {
            op: sql_ast::UnaryOperator::Minus,
            expr,
        } => match literal(expr, params)? {
            Value::Integer(i) => Ok(Value::Integer(-i)),
            other => Err(StoreError::TypeMismatch(format!(
                "Cannot negate {}",
                other.type_name()
            ))),
        },
        other => Err(StoreError::Execution(format!(
            "Unsupported value expression: {}",
            other
        ))),
    }
}

fn column_name(expr: &sql_ast::Expr) -> Result<String> {
    match expr {
        sql_ast::Expr::Identifier(ident) => Ok(ident.value.clone()),
        sql_ast::Expr::CompoundIdentifier(idents) => idents
            .last()
            .map(|ident| ident.value.clone())
            .ok_or_else(|| StoreError::Parse("empty compound identifier".into())),
        other => Err(StoreError::Execution(format!(
            "Expected a column name, got: {}",
            other
        ))),
    }
}

fn table_factor_name(factor: &sql_ast::TableFactor) -> Result<String> {
    match factor {
        sql_ast::TableFactor::Table { name, .. } => Ok(object_name_string(name)),
        _ => Err(StoreError::Execution(
            "Complex table references not supported".into(),
        )),
    }
}

fn object_name_string(name: &sql_ast::ObjectName) -> String {
    name.0
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(".")
        .to_lowercase()
}

fn parse_limit(limit_clause: &Option<sql_ast::LimitClause>) -> Result<Option<usize>> {
    let Some(clause) = limit_clause else {
        return Ok(None);
    };

    match clause {
        sql_ast::LimitClause::LimitOffset { limit, .. } => match limit {
            Some(sql_ast::Expr::Value(value_with_span)) => {
                extract_limit_number(&value_with_span.value)
            }
            Some(_) => Err(StoreError::Execution("Only numeric LIMIT supported".into())),
            None => Ok(None),
        },
        sql_ast::LimitClause::OffsetCommaLimit { limit, .. } => match limit {
            sql_ast::Expr::Value(value_with_span) => extract_limit_number(&value_with_span.value),
            _ => Err(StoreError::Execution("Only numeric LIMIT supported".into())),
        },
    }
}

fn extract_limit_number(value: &sql_ast::Value) -> Result<Option<usize>> {
    match value {
        sql_ast::Value::Number(n, _) => n
            .parse::<usize>()
            .map(Some)
            .map_err(|_| StoreError::Parse(format!("Invalid LIMIT value: {}", n))),
        _ => Err(StoreError::Execution("Only numeric LIMIT supported".into())),
    }
}

fn convert_data_type(dt: &sql_ast::DataType) -> Result<crate::core::DataType> {
    use crate::core::DataType;

    match dt {
        sql_ast::DataType::Int(_)
        | sql_ast::DataType::Integer(_)
        | sql_ast::DataType::SmallInt(_)
        | sql_ast::DataType::BigInt(_) => Ok(DataType::Integer),

        sql_ast::DataType::Text
        | sql_ast::DataType::Varchar(_)
        | sql_ast::DataType::Char(_)
        | sql_ast::DataType::String(_) => Ok(DataType::Text),

        sql_ast::DataType::Boolean | sql_ast::DataType::Bool => Ok(DataType::Boolean),

        // Timestamps are stored in their canonical text form.
        sql_ast::DataType::Timestamp(_, _)
        | sql_ast::DataType::Datetime(_)
        | sql_ast::DataType::Date => Ok(DataType::Text),

        _ => Err(StoreError::TypeMismatch(format!(
            "Unsupported data type: {}",
            dt
        ))),
    }
}
