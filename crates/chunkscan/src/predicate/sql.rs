use crate::{
    chunk::Chunk,
    predicate::{
        paren::remove_redundant_parentheses,
        plan::{Conjunction, ScanPlan, Term, plan},
    },
    value::Value,
};
use serde::{Deserialize, Serialize};

///
/// SqlDialect
///
/// Identifier quoting style. Placeholders are always positional `?`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// MySQL / ClickHouse backtick quoting.
    #[default]
    Mysql,
    /// ANSI double-quote quoting.
    Ansi,
}

impl SqlDialect {
    #[must_use]
    pub fn quote_ident(self, name: &str) -> String {
        let quote = match self {
            Self::Mysql => '`',
            Self::Ansi => '"',
        };
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);

        out
    }

    /// Schema-qualified table name.
    #[must_use]
    pub fn table_name(self, schema: &str, table: &str) -> String {
        format!("{}.{}", self.quote_ident(schema), self.quote_ident(table))
    }
}

///
/// ScanWhere
///
/// A WHERE-clause fragment plus its positional arguments, in placeholder
/// order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanWhere {
    pub sql: String,
    pub args: Vec<Value>,
}

impl ScanWhere {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Build the WHERE fragment selecting `chunk`, quoting identifiers for MySQL.
///
/// A non-empty `extra` expression is ANDed in verbatim; it is returned
/// alone when the chunk constrains nothing.
#[must_use]
pub fn scan_where_sql(chunk: &Chunk, extra: Option<&str>, next: bool) -> ScanWhere {
    scan_where_sql_with(SqlDialect::default(), chunk, extra, next)
}

/// [`scan_where_sql`] with an explicit identifier dialect.
#[must_use]
pub fn scan_where_sql_with(
    dialect: SqlDialect,
    chunk: &Chunk,
    extra: Option<&str>,
    next: bool,
) -> ScanWhere {
    let mut writer = SqlWriter::new(dialect);
    let sql = writer.plan(&plan(chunk, next));
    let extra = extra.map(str::trim).filter(|expr| !expr.is_empty());

    let sql = match (sql.is_empty(), extra) {
        (true, None) => String::new(),
        (true, Some(expr)) => expr.to_string(),
        (false, None) => remove_redundant_parentheses(&sql),
        (false, Some(expr)) => remove_redundant_parentheses(&format!("({sql}) AND ({expr})")),
    };
    tracing::trace!(sql = %sql, args = writer.args.len(), next, "scan where");

    ScanWhere {
        sql,
        args: writer.args,
    }
}

///
/// SqlWriter
///
/// Renders a plan while collecting arguments in emission order.
///

struct SqlWriter {
    dialect: SqlDialect,
    args: Vec<Value>,
}

impl SqlWriter {
    const fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            args: Vec::new(),
        }
    }

    fn plan(&mut self, plan: &ScanPlan<'_>) -> String {
        match plan {
            ScanPlan::Empty => String::new(),
            ScanPlan::Single(terms) => self.conjunction(terms),
            ScanPlan::Composite {
                equal,
                lower,
                upper,
            } => {
                let mut groups = Vec::with_capacity(3);
                if !equal.is_empty() {
                    groups.push(self.conjunction(equal));
                }
                if !lower.is_empty() {
                    groups.push(self.disjunction(lower));
                }
                if !upper.is_empty() {
                    groups.push(self.disjunction(upper));
                }

                if groups.len() == 1 {
                    groups.remove(0)
                } else {
                    groups
                        .iter()
                        .map(|group| format!("({group})"))
                        .collect::<Vec<_>>()
                        .join(" AND ")
                }
            }
        }
    }

    fn disjunction(&mut self, disjuncts: &[Conjunction<'_>]) -> String {
        disjuncts
            .iter()
            .map(|terms| format!("({})", self.conjunction(terms)))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn conjunction(&mut self, terms: &[Term<'_>]) -> String {
        terms
            .iter()
            .map(|term| self.term(term))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn term(&mut self, term: &Term<'_>) -> String {
        self.args.push(term.value.clone());
        format!("{} {} ?", self.dialect.quote_ident(term.column), term.op)
    }
}
