//! Rule AST data structures.
//!
//! - `PriceKind`: which OHLC field a reference reads
//! - `PriceRef`: a price field at a bar offset (0 = the current, forming bar)
//! - `ArithOp` / `CompareOp`: the operator sets of the rule language
//! - `Expr`: the rule AST, rooted at a single `Comparison`

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceKind {
    Open,
    High,
    Low,
    Close,
}

impl PriceKind {
    pub const ALL: [PriceKind; 4] = [
        PriceKind::Open,
        PriceKind::High,
        PriceKind::Low,
        PriceKind::Close,
    ];

    /// The case-sensitive source keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            PriceKind::Open => "OPEN",
            PriceKind::High => "HIGH",
            PriceKind::Low => "LOW",
            PriceKind::Close => "CLOSE",
        }
    }

    pub fn from_keyword(word: &str) -> Option<PriceKind> {
        PriceKind::ALL.into_iter().find(|k| k.keyword() == word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceRef {
    pub kind: PriceKind,
    pub offset: usize,
}

impl PriceRef {
    pub fn new(kind: PriceKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for PriceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind.keyword(), self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub const ALL: [ArithOp; 4] = [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div];

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Position in per-platform operator tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Lt,
        CompareOp::Gt,
        CompareOp::Le,
        CompareOp::Ge,
        CompareOp::Eq,
        CompareOp::Ne,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// Position in per-platform operator tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Compare(CompareOp),
    Arith(ArithOp),
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Compare(op) => op.symbol(),
            Operator::Arith(op) => op.symbol(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ref(PriceRef),
    BinaryArith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn price(kind: PriceKind, offset: usize) -> Expr {
        Expr::Ref(PriceRef::new(kind, offset))
    }

    pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Expr {
        Expr::BinaryArith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Expr {
        Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Expr::Comparison { .. })
    }

    /// Every price reference in left-to-right source order.
    pub fn price_refs(&self) -> Vec<PriceRef> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs(&self, out: &mut Vec<PriceRef>) {
        match self {
            Expr::Ref(r) => out.push(*r),
            Expr::BinaryArith { left, right, .. } | Expr::Comparison { left, right, .. } => {
                left.collect_refs(out);
                right.collect_refs(out);
            }
        }
    }

    /// Deepest bar offset referenced, i.e. how much history the rule needs.
    pub fn max_offset(&self) -> usize {
        self.price_refs()
            .iter()
            .map(|r| r.offset)
            .max()
            .unwrap_or(0)
    }
}

/// Canonical source form. Compound children are always parenthesized, so the
/// output parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ref(r) => write!(f, "{}", r),
            Expr::BinaryArith { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            Expr::Comparison { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Ref(_) => write!(f, "{}", expr),
        _ => write!(f, "({})", expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(PriceKind::from_keyword("OPEN"), Some(PriceKind::Open));
        assert_eq!(PriceKind::from_keyword("CLOSE"), Some(PriceKind::Close));
        assert_eq!(PriceKind::from_keyword("close"), None);
        assert_eq!(PriceKind::from_keyword("VOLUME"), None);
    }

    #[test]
    fn operator_indices_are_dense() {
        for (i, op) in CompareOp::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
        for (i, op) in ArithOp::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
    }

    #[test]
    fn display_flat_comparison() {
        let expr = Expr::compare(
            CompareOp::Lt,
            Expr::price(PriceKind::Open, 1),
            Expr::price(PriceKind::Close, 6),
        );
        assert_eq!(expr.to_string(), "OPEN[1] < CLOSE[6]");
    }

    #[test]
    fn display_parenthesizes_compound_operands() {
        let left = Expr::arith(
            ArithOp::Sub,
            Expr::price(PriceKind::Open, 4),
            Expr::price(PriceKind::Low, 8),
        );
        let right = Expr::arith(
            ArithOp::Sub,
            Expr::price(PriceKind::Close, 8),
            Expr::price(PriceKind::Open, 3),
        );
        let expr = Expr::compare(CompareOp::Le, left, right);
        assert_eq!(
            expr.to_string(),
            "(OPEN[4] - LOW[8]) <= (CLOSE[8] - OPEN[3])"
        );
    }

    #[test]
    fn price_refs_in_source_order() {
        let expr = Expr::compare(
            CompareOp::Gt,
            Expr::arith(
                ArithOp::Add,
                Expr::price(PriceKind::High, 2),
                Expr::price(PriceKind::Low, 0),
            ),
            Expr::price(PriceKind::Close, 9),
        );
        let refs = expr.price_refs();
        assert_eq!(
            refs,
            vec![
                PriceRef::new(PriceKind::High, 2),
                PriceRef::new(PriceKind::Low, 0),
                PriceRef::new(PriceKind::Close, 9),
            ]
        );
        assert_eq!(expr.max_offset(), 9);
    }

    #[test]
    fn is_comparison() {
        assert!(!Expr::price(PriceKind::Open, 0).is_comparison());
        assert!(Expr::compare(
            CompareOp::Eq,
            Expr::price(PriceKind::Open, 0),
            Expr::price(PriceKind::Close, 0)
        )
        .is_comparison());
    }
}
