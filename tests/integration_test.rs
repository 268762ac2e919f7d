//! End-to-end translation tests: rule text in, platform condition text out.

mod common;

use common::*;
use ruleconv::domain::combiner::combine;
use ruleconv::domain::emitter::emit;
use ruleconv::domain::error::{LexErrorKind, ParseErrorKind, TranslateError};
use ruleconv::domain::expr::{CompareOp, Expr, PriceKind};
use ruleconv::domain::lexer::tokenize;
use ruleconv::domain::platform::{EmitOptions, Platform};
use ruleconv::domain::rule_parser::{parse, parse_rule};
use ruleconv::domain::translate::{translate_rule, RuleSet};

fn pipeline(rule: &str, platform: Platform) -> String {
    let tokens = tokenize(rule).unwrap();
    let expr = parse(&tokens, rule).unwrap();
    emit(&expr, platform)
}

#[test]
fn mql5_end_to_end_example() {
    assert_eq!(
        pipeline("OPEN[1] < CLOSE[6]", Platform::Mql5),
        "iOpen(_Symbol, PERIOD_CURRENT, 1) < iClose(_Symbol, PERIOD_CURRENT, 6)"
    );
}

#[test]
fn same_rule_on_every_platform() {
    let rule = "HIGH[2] >= LOW[0]";
    assert_eq!(pipeline(rule, Platform::Mql4), "High[2] >= Low[0]");
    assert_eq!(
        pipeline(rule, Platform::Mql5),
        "iHigh(_Symbol, PERIOD_CURRENT, 2) >= iLow(_Symbol, PERIOD_CURRENT, 0)"
    );
    assert_eq!(pipeline(rule, Platform::PineScript), "high[2] >= low");
    assert_eq!(
        pipeline(rule, Platform::CTrader),
        "Bars.HighPrices.Last(2) >= Bars.LowPrices.Last(0)"
    );
}

#[test]
fn offset_zero_rendering() {
    let rule = "CLOSE[0] == OPEN[0]";
    assert_eq!(pipeline(rule, Platform::PineScript), "close == open");
    assert!(pipeline(rule, Platform::Mql4).contains("Close[0]"));
    assert!(pipeline(rule, Platform::Mql5).contains("iClose(_Symbol, PERIOD_CURRENT, 0)"));
    assert!(pipeline(rule, Platform::CTrader).contains("Bars.ClosePrices.Last(0)"));
}

#[test]
fn parenthesization_fidelity() {
    let rule = "(OPEN[4] - LOW[8]) <= (CLOSE[8] - OPEN[3])";
    let expr = parse_rule(rule).unwrap();
    assert_eq!(
        expr,
        cmp(
            CompareOp::Le,
            sub(price(PriceKind::Open, 4), price(PriceKind::Low, 8)),
            sub(price(PriceKind::Close, 8), price(PriceKind::Open, 3)),
        )
    );
    for platform in Platform::ALL {
        let out = emit(&expr, platform);
        assert!(out.starts_with('('), "{platform}: {out}");
        assert!(out.contains(") <= ("), "{platform}: {out}");
        assert!(out.ends_with(')'), "{platform}: {out}");
    }
}

#[test]
fn rejects_two_comparisons() {
    match parse_rule("OPEN[1] < CLOSE[6] < HIGH[2]").unwrap_err() {
        TranslateError::Parse(e) => assert_eq!(e.kind, ParseErrorKind::MultipleComparisons),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn rejects_unknown_identifier() {
    match parse_rule("FOO[1] < CLOSE[0]").unwrap_err() {
        TranslateError::Lex(e) => {
            assert_eq!(e.kind, LexErrorKind::UnknownIdentifier("FOO".to_string()))
        }
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn rejects_negative_offset() {
    match parse_rule("OPEN[-1] < CLOSE[0]").unwrap_err() {
        TranslateError::Lex(e) => assert_eq!(e.kind, LexErrorKind::NegativeOffset),
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn combiner_keeps_order_and_rejects_empty() {
    assert_eq!(combine(&["A", "B", "C"], Platform::Mql4).unwrap(), "A && B && C");
    assert_eq!(combine(&["A", "B", "C"], Platform::CTrader).unwrap(), "A && B && C");
    assert_eq!(
        combine(&["A", "B", "C"], Platform::PineScript).unwrap(),
        "A and B and C"
    );
    let none: Vec<String> = Vec::new();
    assert!(matches!(
        combine(&none, Platform::Mql5),
        Err(TranslateError::EmptyRuleSet)
    ));
}

#[test]
fn emission_is_byte_identical_across_calls() {
    let expr = parse_rule("(OPEN[1] + HIGH[1]) * LOW[2] / CLOSE[3] != HIGH[0] - LOW[0]").unwrap();
    for platform in Platform::ALL {
        let first = emit(&expr, platform);
        let second = emit(&expr, platform);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }
}

#[test]
fn rule_set_translation_for_each_platform() {
    let set = RuleSet::new(["OPEN[1] < CLOSE[6]", "HIGH[0] > HIGH[1]"]);
    let opts = EmitOptions::default();
    assert_eq!(
        set.translate(Platform::Mql4, &opts).unwrap(),
        "Open[1] < Close[6] && High[0] > High[1]"
    );
    assert_eq!(
        set.translate(Platform::PineScript, &opts).unwrap(),
        "open[1] < close[6] and high > high[1]"
    );
    assert_eq!(
        set.translate(Platform::CTrader, &opts).unwrap(),
        "Bars.OpenPrices.Last(1) < Bars.ClosePrices.Last(6) && Bars.HighPrices.Last(0) > Bars.HighPrices.Last(1)"
    );
}

#[test]
fn a_single_bad_rule_aborts_the_set() {
    let set = RuleSet::new(["OPEN[1] < CLOSE[6]", "OPEN[1] CLOSE[6]", "HIGH[0] > HIGH[1]"]);
    let err = set.translate(Platform::Mql4, &EmitOptions::default()).unwrap_err();
    match err {
        TranslateError::Parse(e) => {
            assert_eq!(e.kind, ParseErrorKind::MissingComparison);
            assert_eq!(e.rule, "OPEN[1] CLOSE[6]");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn repeated_price_kinds_are_kept_distinct() {
    let out = translate_rule(
        "CLOSE[0] - CLOSE[1] > CLOSE[1] - CLOSE[2]",
        Platform::PineScript,
        &EmitOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "(close - close[1]) > (close[1] - close[2])");
}

#[test]
fn no_placeholders_left_in_output() {
    let rules = [
        "OPEN[1] < CLOSE[6]",
        "(OPEN[4] - LOW[8]) <= (CLOSE[8] - OPEN[3])",
        "HIGH[0] * LOW[0] / CLOSE[1] == OPEN[0]",
    ];
    for rule in rules {
        for platform in Platform::ALL {
            let out = translate_rule(rule, platform, &EmitOptions::default()).unwrap();
            assert!(!out.contains("placeholder"), "{platform}: {out}");
            assert!(!out.contains('{'), "{platform}: {out}");
            assert!(!out.contains("OPEN") && !out.contains("CLOSE"), "{platform}: {out}");
        }
    }
}

#[test]
fn canonical_display_reparses() {
    let expr: Expr = parse_rule("OPEN[1] - HIGH[2] * LOW[3] < CLOSE[0]").unwrap();
    assert_eq!(expr.to_string(), "(OPEN[1] - (HIGH[2] * LOW[3])) < CLOSE[0]");
    assert_eq!(parse_rule(&expr.to_string()).unwrap(), expr);
}
