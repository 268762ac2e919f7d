//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::file_config_adapter::{build_emit_options, build_strategy, FileConfigAdapter};
use crate::domain::config_validation::{
    validate_emit_config, validate_emit_options, validate_strategy_config,
};
use crate::domain::error::TranslateError;
use crate::domain::platform::{EmitOptions, Platform};
use crate::domain::rule_parser::parse_rule;
use crate::domain::strategy::{Condition, Strategy};
use crate::domain::translate::RuleSet;

#[derive(Parser, Debug)]
#[command(name = "ruleconv", about = "Translate OHLC trading rules into platform condition strings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate every rule set of a strategy file
    Translate {
        #[arg(short, long)]
        strategy: PathBuf,
        /// Target platform (mql4, mql5, pine, ctrader); all when omitted
        #[arg(short, long)]
        platform: Option<Platform>,
        /// Directory to write one condition file per platform into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Translate rules given on the command line into one combined condition
    Rule {
        #[arg(short, long)]
        platform: Option<Platform>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        series: Option<String>,
        #[arg(required = true)]
        rules: Vec<String>,
    },
    /// Validate a strategy file's rules
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List supported target platforms
    ListPlatforms,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Translate {
            strategy,
            platform,
            output,
        } => run_translate(&strategy, platform, output.as_deref()),
        Command::Rule {
            platform,
            symbol,
            period,
            series,
            rules,
        } => match rule_options(symbol, period, series) {
            Ok(opts) => run_rule(&rules, platform, &opts),
            Err(e) => report(&e),
        },
        Command::Validate { strategy } => run_validate(&strategy),
        Command::ListPlatforms => run_list_platforms(),
    }
}

fn report(err: &TranslateError) -> ExitCode {
    eprintln!("error: {}", err.display_with_context());
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TranslateError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Load, validate and build the strategy and emit options from an INI file.
pub fn load_strategy(path: &Path) -> Result<(Strategy, EmitOptions), ExitCode> {
    eprintln!("Loading strategy from {}", path.display());
    let adapter = load_config(path)?;

    validate_strategy_config(&adapter).map_err(|e| report(&e))?;
    validate_emit_config(&adapter).map_err(|e| report(&e))?;

    let strategy = build_strategy(&adapter).map_err(|e| report(&e))?;
    let opts = build_emit_options(&adapter);
    Ok((strategy, opts))
}

fn selected(platform: Option<Platform>) -> Vec<Platform> {
    match platform {
        Some(p) => vec![p],
        None => Platform::ALL.to_vec(),
    }
}

/// Render a platform's conditions as a `//`-commented fragment file. All four
/// targets share `//` line comments.
pub fn render_conditions(
    strategy: &Strategy,
    platform: Platform,
    conditions: &[Condition],
    generated: DateTime<Utc>,
) -> String {
    let mut out = format!(
        "// {} ({}) conditions for {}, generated {}\n",
        strategy.name,
        strategy.symbol,
        platform,
        generated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for condition in conditions {
        out.push_str(&format!("// {}\n{}\n", condition.label, condition.text));
    }
    out
}

fn run_translate(strategy_path: &Path, platform: Option<Platform>, output: Option<&Path>) -> ExitCode {
    let (strategy, opts) = match load_strategy(strategy_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    eprintln!("Translating strategy: {}", strategy.name);

    if let Some(dir) = output {
        if let Err(e) = fs::create_dir_all(dir) {
            return report(&TranslateError::Io(e));
        }
    }

    let now = Utc::now();
    for p in selected(platform) {
        let conditions = match strategy.translate(p, &opts) {
            Ok(c) => c,
            Err(e) => return report(&e),
        };

        match output {
            Some(dir) => {
                let path = dir.join(p.output_file_name(&strategy.symbol, now.timestamp_millis()));
                let content = render_conditions(&strategy, p, &conditions, now);
                if let Err(e) = fs::write(&path, content) {
                    return report(&TranslateError::Io(e));
                }
                eprintln!("  {}: written to {}", p, path.display());
            }
            None => {
                println!("[{}]", p);
                for condition in &conditions {
                    println!("{} = {}", condition.label, condition.text);
                }
            }
        }
    }

    ExitCode::SUCCESS
}

/// Emit options for the `rule` command: flags override the defaults and
/// must be identifiers, like their `[emit]` counterparts.
pub fn rule_options(
    symbol: Option<String>,
    period: Option<String>,
    series: Option<String>,
) -> Result<EmitOptions, TranslateError> {
    let defaults = EmitOptions::default();
    let opts = EmitOptions {
        symbol: symbol.unwrap_or(defaults.symbol),
        period: period.unwrap_or(defaults.period),
        series: series.unwrap_or(defaults.series),
    };
    validate_emit_options(&opts)?;
    Ok(opts)
}

/// Combined condition per platform for ad-hoc rules.
pub fn translate_rules(
    rules: &[String],
    platform: Option<Platform>,
    opts: &EmitOptions,
) -> Result<Vec<(Platform, String)>, TranslateError> {
    let set = RuleSet::new(rules.iter().map(String::as_str));
    selected(platform)
        .into_iter()
        .map(|p| Ok((p, set.translate(p, opts)?)))
        .collect()
}

fn run_rule(rules: &[String], platform: Option<Platform>, opts: &EmitOptions) -> ExitCode {
    let translated = match translate_rules(rules, platform, opts) {
        Ok(t) => t,
        Err(e) => return report(&e),
    };
    if let [(_, condition)] = translated.as_slice() {
        println!("{}", condition);
    } else {
        for (p, condition) in &translated {
            println!("{}: {}", p, condition);
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(strategy_path: &Path) -> ExitCode {
    eprintln!("Validating strategy: {}", strategy_path.display());
    let (strategy, _opts) = match load_strategy(strategy_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    for (label, set) in strategy.rule_sets() {
        eprintln!("\n{} ({} rules):", label, set.len());
        if set.is_empty() {
            return report(&TranslateError::EmptyRuleSet);
        }
        for raw in set.rules() {
            match parse_rule(raw) {
                Ok(expr) => {
                    eprintln!("  Parsed:   {}", expr);
                    eprintln!("  Raw:      {}", raw);
                    eprintln!("  Lookback: {} bars", expr.max_offset());
                }
                Err(e) => {
                    eprintln!("  error in {}:", label);
                    return report(&e);
                }
            }
        }
    }

    eprintln!("\nStrategy rules are valid.");
    ExitCode::SUCCESS
}

fn run_list_platforms() -> ExitCode {
    for p in Platform::ALL {
        println!("{}\t.{}\tAND '{}'", p, p.file_extension(), p.and_token());
    }
    ExitCode::SUCCESS
}
