mod paren;
mod property;

use crate::{
    chunk::{Chunk, ValueMap},
    predicate::paren::{Expr, parse},
    value::{Value, compare},
};
use ::bson::{Bson, Document};
use std::cmp::Ordering;

///
/// Test helpers
///
/// Row evaluators for generated predicates: the SQL evaluator reads back
/// the normalized WHERE text, the document evaluator walks the filter.
/// Both only understand the shapes the generators emit.
///

// (column, lower, upper)
type ColumnBounds<'a> = (&'a str, Option<i64>, Option<i64>);

fn chunk(bounds: &[ColumnBounds<'_>]) -> Chunk {
    let mut chunk = Chunk::new();
    for (column, lower, upper) in bounds {
        chunk.update(column, lower.map(Value::Int), upper.map(Value::Int));
    }

    chunk
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

fn row(columns: &[&str], values: &[i64]) -> ValueMap {
    columns
        .iter()
        .zip(values)
        .map(|(column, value)| ((*column).to_string(), Value::Int(*value)))
        .collect()
}

fn holds(ordering: Ordering, op: &str) -> bool {
    match op {
        "=" | "$eq" => ordering == Ordering::Equal,
        ">" | "$gt" => ordering == Ordering::Greater,
        ">=" | "$gte" => ordering != Ordering::Less,
        "<" | "$lt" => ordering == Ordering::Less,
        "<=" | "$lte" => ordering != Ordering::Greater,
        other => panic!("unexpected operator {other}"),
    }
}

/// Evaluate a generated WHERE fragment against `row`. An empty fragment
/// accepts every row.
fn eval_sql(sql: &str, args: &[Value], row: &ValueMap) -> bool {
    if sql.is_empty() {
        assert!(args.is_empty(), "arguments without placeholders");
        return true;
    }

    let expr = parse(sql).unwrap_or_else(|| panic!("unparseable predicate: {sql}"));
    let mut args = args.iter();
    let result = eval_expr(&expr, &mut args, row);
    assert!(args.next().is_none(), "unused arguments for {sql}");

    result
}

// Children are always evaluated so that placeholders consume their
// arguments in text order.
fn eval_expr<'a>(
    expr: &Expr,
    args: &mut impl Iterator<Item = &'a Value>,
    row: &ValueMap,
) -> bool {
    match expr {
        Expr::And(items) => items
            .iter()
            .map(|item| eval_expr(item, args, row))
            .collect::<Vec<_>>()
            .into_iter()
            .all(|b| b),
        Expr::Or(items) => items
            .iter()
            .map(|item| eval_expr(item, args, row))
            .collect::<Vec<_>>()
            .into_iter()
            .any(|b| b),
        Expr::Atom(text) => {
            let parts: Vec<&str> = text.split_whitespace().collect();
            let [column, op, "?"] = parts.as_slice() else {
                panic!("unexpected atom {text}");
            };
            let column = column.trim_matches(&['`', '"'][..]);
            let arg = args.next().unwrap_or_else(|| panic!("missing argument for {text}"));
            let value = row.get(column).expect("row covers every column");

            holds(compare(value, arg).expect("comparable"), op)
        }
        Expr::Opaque(text) => panic!("unexpected connective in {text}"),
    }
}

/// Evaluate a generated filter document against an all-integer `row`.
fn eval_document(doc: &Document, row: &ValueMap) -> bool {
    doc.iter().all(|(key, value)| match key.as_str() {
        "$and" => array_docs(value).iter().all(|doc| eval_document(doc, row)),
        "$or" => array_docs(value).iter().any(|doc| eval_document(doc, row)),
        field => {
            let actual = match row.get(field) {
                Some(Value::Int(v)) => *v,
                other => panic!("unexpected row value {other:?}"),
            };
            match value {
                Bson::Document(ops) => ops
                    .iter()
                    .all(|(op, operand)| holds(actual.cmp(&int(operand)), op)),
                operand => actual == int(operand),
            }
        }
    })
}

fn array_docs(value: &Bson) -> Vec<&Document> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item.as_document().expect("document"))
        .collect()
}

fn int(value: &Bson) -> i64 {
    value.as_i64().unwrap_or_else(|| panic!("expected int64, got {value:?}"))
}
