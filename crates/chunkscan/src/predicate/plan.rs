use crate::{
    chunk::{Bound, BoundShape, Chunk},
    value::Value,
};
use derive_more::Display;

///
/// Scan predicate plan
///
/// Backend-neutral form of a chunk predicate. Both the SQL and the BSON
/// renderers consume this plan, so the two backends cannot diverge on
/// which terms exist, only on how they are spelled.
///

///
/// CmpOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CmpOp {
    #[display("=")]
    Eq,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
}

impl CmpOp {
    /// MongoDB query operator for this comparison.
    #[must_use]
    pub const fn mongo(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }

    /// Lower-bound operator: continuation chunks exclude the boundary row.
    #[must_use]
    pub const fn lower(next: bool) -> Self {
        if next { Self::Gt } else { Self::Gte }
    }
}

///
/// Term
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term<'a> {
    pub column: &'a str,
    pub op: CmpOp,
    pub value: &'a Value,
}

impl<'a> Term<'a> {
    #[must_use]
    pub const fn new(column: &'a str, op: CmpOp, value: &'a Value) -> Self {
        Self { column, op, value }
    }
}

/// Terms that must all hold.
pub type Conjunction<'a> = Vec<Term<'a>>;

///
/// ScanPlan
///

#[derive(Clone, Debug, PartialEq)]
pub enum ScanPlan<'a> {
    /// The chunk constrains nothing.
    Empty,

    /// Single-column chunk: a conjunction over that column.
    Single(Conjunction<'a>),

    /// Composite key: equality prefix AND any(lower) AND any(upper).
    /// Empty groups are omitted at render time.
    Composite {
        equal: Conjunction<'a>,
        lower: Vec<Conjunction<'a>>,
        upper: Vec<Conjunction<'a>>,
    },
}

impl ScanPlan<'_> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Plan the predicate for `chunk`.
///
/// `next` marks a continuation chunk whose lower boundary was the previous
/// chunk's upper boundary and must therefore be excluded.
#[must_use]
pub fn plan(chunk: &Chunk, next: bool) -> ScanPlan<'_> {
    match chunk.bounds() {
        [] => ScanPlan::Empty,
        [bound] => plan_single(bound, next),
        bounds => plan_composite(bounds, next),
    }
}

fn plan_single(bound: &Bound, next: bool) -> ScanPlan<'_> {
    let column = bound.column.as_str();
    let terms = match bound.shape() {
        BoundShape::Unbounded => return ScanPlan::Empty,
        BoundShape::Lower(lower) => vec![Term::new(column, CmpOp::lower(next), lower)],
        BoundShape::Upper(upper) => vec![Term::new(column, CmpOp::Lte, upper)],
        BoundShape::Exact(value) => vec![Term::new(column, CmpOp::Eq, value)],
        BoundShape::Between { lower, upper } => vec![
            Term::new(column, CmpOp::lower(next), lower),
            Term::new(column, CmpOp::Lte, upper),
        ],
    };

    ScanPlan::Single(terms)
}

fn plan_composite(bounds: &[Bound], next: bool) -> ScanPlan<'_> {
    // Equality prefix: leading columns pinned to one value.
    let equal: Conjunction<'_> = bounds
        .iter()
        .map_while(|bound| match bound.shape() {
            BoundShape::Exact(value) => Some(Term::new(&bound.column, CmpOp::Eq, value)),
            _ => None,
        })
        .collect();
    let rest = &bounds[equal.len()..];

    let lower = lexicographic(
        rest.iter()
            .filter_map(|b| b.lower.as_ref().map(|v| (b.column.as_str(), v))),
        CmpOp::Gt,
        CmpOp::lower(next),
    );
    let upper = lexicographic(
        rest.iter()
            .filter_map(|b| b.upper.as_ref().map(|v| (b.column.as_str(), v))),
        CmpOp::Lt,
        CmpOp::Lte,
    );

    if equal.is_empty() && lower.is_empty() && upper.is_empty() {
        return ScanPlan::Empty;
    }

    ScanPlan::Composite {
        equal,
        lower,
        upper,
    }
}

/// Decompose a tuple comparison against `sides` into disjuncts.
///
/// For sides (c1, b1) .. (cn, bn) this yields, for each i,
/// `c1 = b1 AND .. AND c(i-1) = b(i-1) AND ci OP bi`, where OP is `strict`
/// for every side but the last and `terminal` for the last.
pub(crate) fn lexicographic<'a>(
    sides: impl Iterator<Item = (&'a str, &'a Value)>,
    strict: CmpOp,
    terminal: CmpOp,
) -> Vec<Conjunction<'a>> {
    let sides: Vec<_> = sides.collect();
    let last = sides.len().saturating_sub(1);

    sides
        .into_iter()
        .enumerate()
        .fold(Chain::default(), |chain, (i, (column, value))| {
            let op = if i == last { terminal } else { strict };
            chain.push(column, op, value)
        })
        .disjuncts
}

///
/// Chain
///
/// Fold accumulator for `lexicographic`: the equalities on every side seen
/// so far, plus the disjuncts emitted so far.
///

#[derive(Default)]
struct Chain<'a> {
    prefix: Conjunction<'a>,
    disjuncts: Vec<Conjunction<'a>>,
}

impl<'a> Chain<'a> {
    fn push(mut self, column: &'a str, op: CmpOp, value: &'a Value) -> Self {
        let mut disjunct = self.prefix.clone();
        disjunct.push(Term::new(column, op, value));
        self.disjuncts.push(disjunct);
        self.prefix.push(Term::new(column, CmpOp::Eq, value));

        self
    }
}
