//! Backend emitter.
//!
//! Walks a rule AST and renders it in a platform's syntax. Leaf references go
//! through the platform's reference style; operators come from its static
//! table. Any compound operand is wrapped in parentheses so the output keeps
//! the AST's grouping regardless of the target's own precedence rules.

use crate::domain::expr::{Expr, PriceRef};
use crate::domain::platform::{EmitOptions, Platform, RefStyle};

/// Render a price reference in the platform's idiom.
pub fn render_ref(price: PriceRef, platform: Platform, opts: &EmitOptions) -> String {
    let syntax = platform.syntax();
    let keyword = syntax.price_keyword(price.kind);
    match syntax.ref_style {
        RefStyle::ArrayIndex => format!("{}[{}]", keyword, price.offset),
        RefStyle::FunctionCall => format!(
            "i{}({}, {}, {})",
            keyword, opts.symbol, opts.period, price.offset
        ),
        RefStyle::BracketOffset if price.offset == 0 => keyword.to_string(),
        RefStyle::BracketOffset => format!("{}[{}]", keyword, price.offset),
        RefStyle::MethodChain => format!("{}.{}.Last({})", opts.series, keyword, price.offset),
    }
}

fn write_expr(out: &mut String, expr: &Expr, platform: Platform, opts: &EmitOptions) {
    let syntax = platform.syntax();
    match expr {
        Expr::Ref(price) => out.push_str(&render_ref(*price, platform, opts)),
        Expr::BinaryArith { op, left, right } => {
            write_operand(out, left, platform, opts);
            out.push(' ');
            out.push_str(syntax.arith_symbol(*op));
            out.push(' ');
            write_operand(out, right, platform, opts);
        }
        Expr::Comparison { op, left, right } => {
            write_operand(out, left, platform, opts);
            out.push(' ');
            out.push_str(syntax.compare_symbol(*op));
            out.push(' ');
            write_operand(out, right, platform, opts);
        }
    }
}

fn write_operand(out: &mut String, expr: &Expr, platform: Platform, opts: &EmitOptions) {
    if let Expr::Ref(_) = expr {
        write_expr(out, expr, platform, opts);
    } else {
        out.push('(');
        write_expr(out, expr, platform, opts);
        out.push(')');
    }
}

/// Emit `expr` for `platform` with explicit substitution values.
pub fn emit_with(expr: &Expr, platform: Platform, opts: &EmitOptions) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, platform, opts);
    out
}

/// Emit `expr` for `platform` using the default substitution values.
pub fn emit(expr: &Expr, platform: Platform) -> String {
    emit_with(expr, platform, &EmitOptions::default())
}
