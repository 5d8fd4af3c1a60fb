//! Money parsing and rounding.
//!
//! Every numeric field entering the engine passes through [`AmountParser`],
//! which applies one parse-or-default policy: anything that is not a
//! non-negative number reads as zero. [`AmountReader`] applies that policy
//! while keeping a record of each field it had to coerce, so a malformed
//! value can be told apart from a genuine zero in logs and in the result.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::models::{AuditWarning, RawAmount};

/// Warning code attached to every coerced field.
pub const MALFORMED_AMOUNT_CODE: &str = "MALFORMED_AMOUNT";

/// The largest share of an item one person can hold, in percent.
pub const MAX_SHARE_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// The largest amount the parser accepts, one trillion. Anything above reads
/// as malformed.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Adds amounts, or returns zero if the sum overflows.
pub fn sum_or_zero<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .unwrap_or_else(|| overflowed("sum"))
}

/// `amount * numerator / denominator`, or zero if it overflows or the
/// denominator is zero.
pub fn scale_or_zero(amount: Decimal, numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    amount
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
        .unwrap_or_else(|| overflowed("product"))
}

fn overflowed(operation: &str) -> Decimal {
    warn!(operation, "Amount overflow counted as zero");
    Decimal::ZERO
}

/// Rounds an amount to the nearest cent, halves away from zero.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to_cents(Decimal::from_str("3.335").unwrap()), Decimal::from_str("3.34").unwrap());
/// assert_eq!(round_to_cents(Decimal::from_str("3.334").unwrap()), Decimal::from_str("3.33").unwrap());
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// The outcome of reading a raw amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    /// The text was a non-negative number.
    Valid(Decimal),
    /// The text could not be read; it counts as zero.
    Malformed,
}

impl ParsedAmount {
    /// The value to calculate with. Malformed input reads as zero.
    pub fn value(self) -> Decimal {
        match self {
            ParsedAmount::Valid(value) => value,
            ParsedAmount::Malformed => Decimal::ZERO,
        }
    }

    /// Returns true if the text could not be read.
    pub fn is_malformed(self) -> bool {
        matches!(self, ParsedAmount::Malformed)
    }
}

/// Parses user-entered amounts.
///
/// Surrounding whitespace and configured currency symbols are ignored. Empty
/// text, unparseable text, negative numbers and numbers above [`MAX_AMOUNT`]
/// are all malformed.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::{AmountParser, ParsedAmount};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let parser = AmountParser::default();
/// assert_eq!(parser.parse("$12.50"), ParsedAmount::Valid(Decimal::from_str("12.50").unwrap()));
/// assert_eq!(parser.parse("twelve"), ParsedAmount::Malformed);
/// assert_eq!(parser.parse("-1.00"), ParsedAmount::Malformed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountParser {
    currency_symbols: Vec<String>,
}

impl Default for AmountParser {
    fn default() -> Self {
        Self::new(vec!["$".to_string()])
    }
}

impl AmountParser {
    /// Creates a parser that strips the given currency symbols.
    pub fn new(currency_symbols: Vec<String>) -> Self {
        let currency_symbols = currency_symbols
            .into_iter()
            .filter(|symbol| !symbol.is_empty())
            .collect();
        Self { currency_symbols }
    }

    /// Returns the currency symbols this parser strips.
    pub fn currency_symbols(&self) -> &[String] {
        &self.currency_symbols
    }

    /// Parses a raw amount.
    pub fn parse(&self, raw: &str) -> ParsedAmount {
        let mut text = raw.trim();
        for symbol in &self.currency_symbols {
            if let Some(stripped) = text.strip_prefix(symbol.as_str()) {
                text = stripped.trim_start();
                break;
            }
        }

        if text.is_empty() {
            return ParsedAmount::Malformed;
        }

        let parsed = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text));
        match parsed {
            Ok(value) if value.is_zero() => ParsedAmount::Valid(value),
            Ok(value) if !value.is_sign_negative() && value <= MAX_AMOUNT => {
                ParsedAmount::Valid(value)
            }
            _ => ParsedAmount::Malformed,
        }
    }
}

/// Reads raw amounts through an [`AmountParser`], remembering what it coerced.
#[derive(Debug)]
pub struct AmountReader<'a> {
    parser: &'a AmountParser,
    warnings: Vec<AuditWarning>,
}

impl<'a> AmountReader<'a> {
    /// Creates a reader backed by the given parser.
    pub fn new(parser: &'a AmountParser) -> Self {
        Self {
            parser,
            warnings: Vec::new(),
        }
    }

    /// Reads a money amount, coercing malformed input to zero.
    pub fn amount(&mut self, field: &str, raw: &RawAmount) -> Decimal {
        match self.parser.parse(raw.as_str()) {
            ParsedAmount::Valid(value) => value,
            ParsedAmount::Malformed => {
                self.record(field, raw, "is not a non-negative number within range");
                Decimal::ZERO
            }
        }
    }

    /// Reads a share percentage, coercing malformed or out-of-range input to zero.
    pub fn percentage(&mut self, field: &str, raw: &RawAmount) -> Decimal {
        match self.parser.parse(raw.as_str()) {
            ParsedAmount::Valid(value) if value <= MAX_SHARE_PERCENTAGE => value,
            ParsedAmount::Valid(_) => {
                self.record(field, raw, "is outside 0-100");
                Decimal::ZERO
            }
            ParsedAmount::Malformed => {
                self.record(field, raw, "is not a non-negative number within range");
                Decimal::ZERO
            }
        }
    }

    /// Returns the warnings collected so far.
    pub fn warnings(&self) -> &[AuditWarning] {
        &self.warnings
    }

    /// Consumes the reader, returning every warning it collected.
    pub fn into_warnings(self) -> Vec<AuditWarning> {
        self.warnings
    }

    fn record(&mut self, field: &str, raw: &RawAmount, problem: &str) {
        warn!(field = %field, raw = %raw, "Malformed amount coerced to zero");
        self.warnings.push(AuditWarning {
            code: MALFORMED_AMOUNT_CODE.to_string(),
            message: format!("{} '{}' {}; counted as 0.00", field, raw, problem),
            severity: "low".to_string(),
        });
    }
}
