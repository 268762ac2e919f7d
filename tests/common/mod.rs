#![allow(dead_code)]

use ruleconv::domain::expr::{ArithOp, CompareOp, Expr, PriceKind};
use std::io::Write;

pub const STRATEGY_INI: &str = r#"
[strategy]
name = Three Bar Breakout
symbol = EURUSD
entry_long = OPEN[1] < CLOSE[6], (HIGH[0] - LOW[0]) > (HIGH[1] - LOW[1])
exit_long = CLOSE[0] < LOW[1]
entry_short = OPEN[1] > CLOSE[6]
exit_short = CLOSE[0] > HIGH[1]

[emit]
period = PERIOD_H1
"#;

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn price(kind: PriceKind, offset: usize) -> Expr {
    Expr::price(kind, offset)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    Expr::arith(ArithOp::Sub, left, right)
}

pub fn cmp(op: CompareOp, left: Expr, right: Expr) -> Expr {
    Expr::compare(op, left, right)
}
