use crate::{
    chunk::Chunk,
    predicate::plan::{CmpOp, Conjunction, ScanPlan, Term, plan},
};
use ::bson::{Bson, Document};

/// Build the MongoDB filter document selecting `chunk`.
///
/// Semantics match [`scan_where_sql`](crate::predicate::scan_where_sql):
/// equality is a bare `field: value` pair, conjunction is field
/// co-occurrence, disjunction is `$or`, and independent groups are
/// combined with `$and`. A non-empty `extra` filter is ANDed in.
#[must_use]
pub fn scan_bson(chunk: &Chunk, extra: Option<&Document>, next: bool) -> Document {
    let filter = plan_document(&plan(chunk, next));
    tracing::trace!(filter = %filter, next, "scan filter");

    match extra.filter(|doc| !doc.is_empty()) {
        None => filter,
        Some(extra) if filter.is_empty() => extra.clone(),
        Some(extra) => and_document(vec![filter, extra.clone()]),
    }
}

fn plan_document(plan: &ScanPlan<'_>) -> Document {
    match plan {
        ScanPlan::Empty => Document::new(),
        ScanPlan::Single(terms) => conjunction_document(terms),
        ScanPlan::Composite {
            equal,
            lower,
            upper,
        } => {
            let mut groups = Vec::with_capacity(3);
            if !equal.is_empty() {
                groups.push(conjunction_document(equal));
            }
            if !lower.is_empty() {
                groups.push(disjunction_document(lower));
            }
            if !upper.is_empty() {
                groups.push(disjunction_document(upper));
            }

            match groups.len() {
                0 => Document::new(),
                1 => groups.remove(0),
                _ => and_document(groups),
            }
        }
    }
}

fn and_document(groups: Vec<Document>) -> Document {
    let mut doc = Document::new();
    doc.insert("$and", groups.into_iter().map(Bson::Document).collect::<Vec<_>>());

    doc
}

// A single disjunct is emitted bare rather than as a one-element `$or`.
fn disjunction_document(disjuncts: &[Conjunction<'_>]) -> Document {
    if let [only] = disjuncts {
        return conjunction_document(only);
    }

    let mut doc = Document::new();
    doc.insert(
        "$or",
        disjuncts
            .iter()
            .map(|terms| Bson::Document(conjunction_document(terms)))
            .collect::<Vec<_>>(),
    );

    doc
}

// Terms on the same field merge into one operator document. A field with a
// single equality term is written as a bare value.
fn conjunction_document(terms: &[Term<'_>]) -> Document {
    let mut fields: Vec<(&str, Vec<(CmpOp, Bson)>)> = Vec::with_capacity(terms.len());
    for term in terms {
        let entry = (term.op, Bson::from(term.value));
        match fields.iter_mut().find(|(column, _)| *column == term.column) {
            Some((_, ops)) => ops.push(entry),
            None => fields.push((term.column, vec![entry])),
        }
    }

    let mut doc = Document::new();
    for (column, mut ops) in fields {
        let value = match ops.as_slice() {
            [(CmpOp::Eq, _)] => ops.remove(0).1,
            _ => Bson::Document(
                ops.into_iter()
                    .map(|(op, value)| (op.mongo().to_string(), value))
                    .collect(),
            ),
        };
        doc.insert(column, value);
    }

    doc
}
