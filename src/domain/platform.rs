//! Target platforms and their static syntax tables.
//!
//! Each platform owns one immutable `PlatformSyntax` describing how it spells
//! price series, operators and logical AND. Tables are indexed by the enum
//! position of `PriceKind`, `CompareOp` and `ArithOp`, so lookups never depend
//! on map iteration order.

use crate::domain::error::TranslateError;
use crate::domain::expr::{ArithOp, CompareOp, PriceKind};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// MetaTrader 4: `Close[1]` array indexing.
    Mql4,
    /// MetaTrader 5: `iClose(symbol, period, 1)` historical access.
    Mql5,
    /// TradingView Pine Script: `close[1]` series offsets, bare `close` for the current bar.
    PineScript,
    /// cTrader cBots: `Bars.ClosePrices.Last(1)` method chaining.
    CTrader,
}

/// How a platform references a price series at a bar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStyle {
    ArrayIndex,
    FunctionCall,
    BracketOffset,
    MethodChain,
}

#[derive(Debug)]
pub struct PlatformSyntax {
    pub ref_style: RefStyle,
    /// Series keywords indexed by `PriceKind` order.
    pub price: [&'static str; 4],
    /// Indexed by `CompareOp::index`.
    pub compare: [&'static str; 6],
    /// Indexed by `ArithOp::index`.
    pub arith: [&'static str; 4],
    pub and: &'static str,
    pub extension: &'static str,
}

impl PlatformSyntax {
    pub fn price_keyword(&self, kind: PriceKind) -> &'static str {
        self.price[kind as usize]
    }

    pub fn compare_symbol(&self, op: CompareOp) -> &'static str {
        self.compare[op.index()]
    }

    pub fn arith_symbol(&self, op: ArithOp) -> &'static str {
        self.arith[op.index()]
    }
}

const C_COMPARE: [&str; 6] = ["<", ">", "<=", ">=", "==", "!="];
const C_ARITH: [&str; 4] = ["+", "-", "*", "/"];

static MQL4: PlatformSyntax = PlatformSyntax {
    ref_style: RefStyle::ArrayIndex,
    price: ["Open", "High", "Low", "Close"],
    compare: C_COMPARE,
    arith: C_ARITH,
    and: "&&",
    extension: "mq4",
};

static MQL5: PlatformSyntax = PlatformSyntax {
    ref_style: RefStyle::FunctionCall,
    price: ["Open", "High", "Low", "Close"],
    compare: C_COMPARE,
    arith: C_ARITH,
    and: "&&",
    extension: "mq5",
};

static PINE: PlatformSyntax = PlatformSyntax {
    ref_style: RefStyle::BracketOffset,
    price: ["open", "high", "low", "close"],
    compare: C_COMPARE,
    arith: C_ARITH,
    and: "and",
    extension: "pine",
};

static CTRADER: PlatformSyntax = PlatformSyntax {
    ref_style: RefStyle::MethodChain,
    price: ["OpenPrices", "HighPrices", "LowPrices", "ClosePrices"],
    compare: C_COMPARE,
    arith: C_ARITH,
    and: "&&",
    extension: "cs",
};

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Mql4,
        Platform::Mql5,
        Platform::PineScript,
        Platform::CTrader,
    ];

    pub fn syntax(self) -> &'static PlatformSyntax {
        match self {
            Platform::Mql4 => &MQL4,
            Platform::Mql5 => &MQL5,
            Platform::PineScript => &PINE,
            Platform::CTrader => &CTRADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Mql4 => "mql4",
            Platform::Mql5 => "mql5",
            Platform::PineScript => "pine",
            Platform::CTrader => "ctrader",
        }
    }

    pub fn and_token(self) -> &'static str {
        self.syntax().and
    }

    pub fn file_extension(self) -> &'static str {
        self.syntax().extension
    }

    /// Name of the generated strategy file, e.g. `Strategy_EURUSD_1700000000000.mq4`.
    pub fn output_file_name(self, symbol: &str, timestamp_millis: i64) -> String {
        format!(
            "Strategy_{}_{}.{}",
            symbol,
            timestamp_millis,
            self.file_extension()
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mql4" | "mq4" => Ok(Platform::Mql4),
            "mql5" | "mq5" => Ok(Platform::Mql5),
            "pine" | "pinescript" => Ok(Platform::PineScript),
            "ctrader" | "cs" | "csharp" => Ok(Platform::CTrader),
            _ => Err(TranslateError::UnknownPlatform {
                name: s.to_string(),
            }),
        }
    }
}

/// Values substituted into function-call and method-chained references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub symbol: String,
    pub period: String,
    pub series: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            symbol: "_Symbol".to_string(),
            period: "PERIOD_CURRENT".to_string(),
            series: "Bars".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_accepts_aliases() {
        assert_eq!("mql4".parse::<Platform>().unwrap(), Platform::Mql4);
        assert_eq!("MQ4".parse::<Platform>().unwrap(), Platform::Mql4);
        assert_eq!("mq5".parse::<Platform>().unwrap(), Platform::Mql5);
        assert_eq!("PineScript".parse::<Platform>().unwrap(), Platform::PineScript);
        assert_eq!("csharp".parse::<Platform>().unwrap(), Platform::CTrader);
        assert_eq!(" ctrader ".parse::<Platform>().unwrap(), Platform::CTrader);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "ninjatrader".parse::<Platform>().unwrap_err();
        assert!(matches!(err, TranslateError::UnknownPlatform { name } if name == "ninjatrader"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for p in Platform::ALL {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn and_tokens() {
        assert_eq!(Platform::Mql4.and_token(), "&&");
        assert_eq!(Platform::Mql5.and_token(), "&&");
        assert_eq!(Platform::CTrader.and_token(), "&&");
        assert_eq!(Platform::PineScript.and_token(), "and");
    }

    #[test]
    fn operator_tables_match_source_symbols() {
        for p in Platform::ALL {
            let syntax = p.syntax();
            for op in CompareOp::ALL {
                assert_eq!(syntax.compare_symbol(op), op.symbol());
            }
            for op in ArithOp::ALL {
                assert_eq!(syntax.arith_symbol(op), op.symbol());
            }
        }
    }

    #[test]
    fn price_keywords() {
        assert_eq!(Platform::Mql4.syntax().price_keyword(PriceKind::Close), "Close");
        assert_eq!(Platform::PineScript.syntax().price_keyword(PriceKind::High), "high");
        assert_eq!(Platform::CTrader.syntax().price_keyword(PriceKind::Low), "LowPrices");
    }

    #[test]
    fn output_file_names() {
        assert_eq!(
            Platform::Mql5.output_file_name("EURUSD", 1700000000000),
            "Strategy_EURUSD_1700000000000.mq5"
        );
        assert_eq!(
            Platform::CTrader.output_file_name("XAUUSD", 1),
            "Strategy_XAUUSD_1.cs"
        );
    }
}
