use super::*;
use crate::{
    predicate::{remove_redundant_parentheses, scan_bson, scan_where_sql},
    value::compare_column,
};
use proptest::prelude::*;

const COLUMNS: [&str; 3] = ["a", "b", "c"];

fn arb_bound() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    let value = -2i64..=2;
    prop_oneof![
        Just((None, None)),
        value.clone().prop_map(|v| (Some(v), None)),
        value.clone().prop_map(|v| (None, Some(v))),
        value.clone().prop_map(|v| (Some(v), Some(v))),
        (value.clone(), value).prop_map(|(l, u)| (Some(l), Some(u))),
    ]
}

fn arb_chunk() -> impl Strategy<Value = Chunk> {
    prop::collection::vec(arb_bound(), 1..=COLUMNS.len()).prop_map(|bounds| {
        let columns: Vec<ColumnBounds<'_>> = COLUMNS
            .iter()
            .zip(bounds)
            .map(|(column, (lower, upper))| (*column, lower, upper))
            .collect();
        chunk(&columns)
    })
}

fn arb_tuple() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-3i64..=3, COLUMNS.len())
}

fn arb_rows() -> impl Strategy<Value = Vec<ValueMap>> {
    prop::collection::vec(arb_tuple().prop_map(|values| row(&COLUMNS, &values)), 1..24)
}

// Columns bounded on one side, with those bounds as a key row.
fn side(
    bounds: &[ColumnBounds<'static>],
    pick: fn(&ColumnBounds<'static>) -> Option<i64>,
) -> (Vec<&'static str>, ValueMap) {
    let (columns, values): (Vec<&str>, Vec<i64>) = bounds
        .iter()
        .filter_map(|bound| pick(bound).map(|value| (bound.0, value)))
        .unzip();
    let key = row(&columns, &values);

    (columns, key)
}

proptest! {
    #[test]
    fn sql_and_document_select_the_same_rows(
        chunk in arb_chunk(),
        next in any::<bool>(),
        rows in arb_rows(),
    ) {
        let where_ = scan_where_sql(&chunk, None, next);
        let filter = scan_bson(&chunk, None, next);

        for row in &rows {
            prop_assert_eq!(
                eval_sql(&where_.sql, &where_.args, row),
                eval_document(&filter, row),
                "sql {} / filter {} disagree on {:?}", where_.sql, filter, row
            );
        }
    }

    #[test]
    fn fully_bounded_chunk_is_a_tuple_range(
        lower in arb_tuple(),
        upper in arb_tuple(),
        next in any::<bool>(),
        rows in arb_rows(),
    ) {
        // An all-equal chunk pins every column, so it is never exclusive.
        prop_assume!(!(next && lower == upper));

        let columns: Vec<ColumnBounds<'_>> = COLUMNS
            .iter()
            .zip(lower.iter().zip(&upper))
            .map(|(column, (l, u))| (*column, Some(*l), Some(*u)))
            .collect();
        let chunk = chunk(&columns);
        let where_ = scan_where_sql(&chunk, None, next);
        let (lower, upper) = (row(&COLUMNS, &lower), row(&COLUMNS, &upper));

        for row in &rows {
            let above = compare_column(&COLUMNS, row, &lower).expect("comparable");
            let below = compare_column(&COLUMNS, row, &upper).expect("comparable");
            let expected = holds(above, if next { ">" } else { ">=" }) && holds(below, "<=");

            prop_assert_eq!(eval_sql(&where_.sql, &where_.args, row), expected, "{}", where_.sql);
        }
    }

    #[test]
    fn partially_bounded_chunk_is_a_pair_of_tuple_ranges(
        bounds in prop::collection::vec(arb_bound(), 1..=COLUMNS.len()),
        next in any::<bool>(),
        rows in arb_rows(),
    ) {
        let columns: Vec<ColumnBounds<'static>> = COLUMNS
            .iter()
            .zip(bounds)
            .map(|(column, (lower, upper))| (*column, lower, upper))
            .collect();
        let where_ = scan_where_sql(&chunk(&columns), None, next);

        // Leading columns pinned to one value are equalities; each side of the
        // rest is a tuple comparison over the columns carrying that side.
        let pinned = columns
            .iter()
            .take_while(|(_, lower, upper)| lower.is_some() && lower == upper)
            .count();
        let (lower_columns, lower) = side(&columns[pinned..], |bound| bound.1);
        let (upper_columns, upper) = side(&columns[pinned..], |bound| bound.2);

        for row in &rows {
            let on_pins = columns[..pinned]
                .iter()
                .all(|(column, value, _)| row.get(*column) == value.map(Value::Int).as_ref());
            let above = lower_columns.is_empty()
                || holds(
                    compare_column(&lower_columns, row, &lower).expect("comparable"),
                    if next { ">" } else { ">=" },
                );
            let below = upper_columns.is_empty()
                || holds(
                    compare_column(&upper_columns, row, &upper).expect("comparable"),
                    "<=",
                );

            prop_assert_eq!(
                eval_sql(&where_.sql, &where_.args, row),
                on_pins && above && below,
                "{}",
                where_.sql
            );
        }
    }

    #[test]
    fn continuation_chunks_never_overlap(
        bounds in prop::collection::vec(arb_tuple(), 2..5),
        rows in arb_rows(),
    ) {
        // Consecutive boundaries b0 < b1 < .. slice the key space; each row
        // falls in at most one (b(i-1), b(i)] slice.
        let mut bounds: Vec<ValueMap> = bounds.iter().map(|b| row(&COLUMNS, b)).collect();
        bounds.sort_by(|l, r| compare_column(&COLUMNS, l, r).expect("comparable"));
        bounds.dedup();

        let slices: Vec<_> = bounds
            .windows(2)
            .map(|pair| {
                let range = crate::chunk::ScanRange::new(pair[0].clone(), pair[1].clone());
                scan_where_sql(&Chunk::from_range(&COLUMNS, &range), None, true)
            })
            .collect();

        for row in &rows {
            let hits = slices
                .iter()
                .filter(|w| eval_sql(&w.sql, &w.args, row))
                .count();
            let inside = compare_column(&COLUMNS, row, &bounds[0]).expect("comparable")
                == Ordering::Greater
                && compare_column(&COLUMNS, row, &bounds[bounds.len() - 1]).expect("comparable")
                    != Ordering::Greater;

            prop_assert_eq!(hits, usize::from(inside));
        }
    }
}

//
// Parenthesis normalizer
//

#[derive(Clone, Debug)]
enum Tree {
    Atom(usize),
    And(Vec<Tree>),
    Or(Vec<Tree>),
}

impl Tree {
    fn render(&self) -> String {
        let (items, sep) = match self {
            Self::Atom(i) if i % 2 == 0 => return format!("(x{i} = 1)"),
            Self::Atom(i) => return format!("x{i} = 1"),
            Self::And(items) => (items, " AND "),
            Self::Or(items) => (items, " or "),
        };

        items
            .iter()
            .map(|item| format!("({})", item.render()))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn eval(&self, mask: u8) -> bool {
        match self {
            Self::Atom(i) => (mask >> i) & 1 == 1,
            Self::And(items) => items.iter().all(|item| item.eval(mask)),
            Self::Or(items) => items.iter().any(|item| item.eval(mask)),
        }
    }
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let leaf = (0usize..4).prop_map(Tree::Atom);

    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Tree::And),
            prop::collection::vec(inner, 2..4).prop_map(Tree::Or),
        ]
    })
}

fn eval_parsed(expr: &Expr, mask: u8) -> bool {
    match expr {
        Expr::And(items) => items.iter().all(|item| eval_parsed(item, mask)),
        Expr::Or(items) => items.iter().any(|item| eval_parsed(item, mask)),
        Expr::Atom(text) => {
            let index: u8 = text
                .strip_prefix('x')
                .and_then(|rest| rest.split_whitespace().next())
                .and_then(|digits| digits.parse().ok())
                .unwrap_or_else(|| panic!("unexpected atom {text}"));
            (mask >> index) & 1 == 1
        }
        Expr::Opaque(text) => panic!("unexpected connective in {text}"),
    }
}

proptest! {
    #[test]
    fn normalizer_is_idempotent_and_preserves_meaning(tree in arb_tree(), mask in 0u8..16) {
        let rendered = tree.render();
        let normalized = remove_redundant_parentheses(&rendered);

        prop_assert_eq!(remove_redundant_parentheses(&normalized), normalized.clone());

        let expr = parse(&normalized).expect("normalized output parses");
        prop_assert_eq!(eval_parsed(&expr, mask), tree.eval(mask), "{}", normalized);
    }

    #[test]
    fn normalizer_never_adds_parentheses(tree in arb_tree()) {
        let rendered = tree.render();
        let normalized = remove_redundant_parentheses(&rendered);
        let count = |s: &str| s.matches('(').count();

        prop_assert!(count(&normalized) <= count(&rendered));
    }
}
