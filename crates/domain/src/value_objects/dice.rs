//! Dice notation parsing and rolling
//!
//! Supports notations like "3D6", "2D6+6", "D100", "-2D6", "1D4+1D6-1".
//! A leading repeat count defaults to 1. A sign in front of a dice group
//! applies to the group's sum, so "-2D6" subtracts the total of two dice once.
//!
//! Also provides [`spread`], which scatters a signed total over N buckets one
//! unit at a time.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use thiserror::Error;

use crate::ports::RandomPort;

/// One signed term: `[+-]` followed by `[count]D<sides>` or a bare integer.
static TERM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])?(?:(\d*)D(\d+)|(\d+))$").expect("valid regex"));

/// Error when parsing or evaluating dice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The notation does not match the dice grammar
    #[error("'{notation}': {reason}")]
    MalformedNotation { notation: String, reason: String },
    /// A die needs at least one side
    #[error("Die sides must be at least 1, got {0}")]
    InvalidSides(i64),
    /// A dice group needs at least one die
    #[error("Dice repeat count must be at least 1, got {0}")]
    InvalidRepeatCount(i64),
    /// Spreading needs at least one bucket
    #[error("Bucket count must be at least 1, got {0}")]
    InvalidBucketCount(i64),
}

impl DiceError {
    fn malformed(notation: &str, reason: impl Into<String>) -> Self {
        Self::MalformedNotation {
            notation: notation.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// DieSpec / FixedTerm / DiceTerm
// ============================================================================

/// A single die, identified only by its side count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DieSpec {
    sides: i32,
}

impl DieSpec {
    /// Create a die with `sides` faces (at least 1).
    pub fn new(sides: i32) -> Result<Self, DiceError> {
        if sides < 1 {
            return Err(DiceError::InvalidSides(i64::from(sides)));
        }
        Ok(Self { sides })
    }

    pub fn sides(&self) -> i32 {
        self.sides
    }

    /// Roll the die: a uniform value in `[1, sides]`.
    pub fn roll(&self, random: &dyn RandomPort) -> i32 {
        random.gen_range(1, self.sides)
    }
}

impl fmt::Display for DieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.sides)
    }
}

/// A signed constant contributed to a roll total (the "+6" in "2D6+6").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedTerm(i32);

impl FixedTerm {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// One term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiceTerm {
    /// A constant
    Fixed(FixedTerm),
    /// `count` rolls of `die`, summed, then added (or subtracted when `negated`)
    Dice {
        count: u32,
        die: DieSpec,
        negated: bool,
    },
}

impl DiceTerm {
    fn min(&self) -> i64 {
        match *self {
            Self::Fixed(fixed) => i64::from(fixed.value()),
            Self::Dice {
                count,
                die,
                negated,
            } => {
                if negated {
                    -(i64::from(count) * i64::from(die.sides()))
                } else {
                    i64::from(count)
                }
            }
        }
    }

    fn max(&self) -> i64 {
        match *self {
            Self::Fixed(fixed) => i64::from(fixed.value()),
            Self::Dice {
                count,
                die,
                negated,
            } => {
                if negated {
                    -i64::from(count)
                } else {
                    i64::from(count) * i64::from(die.sides())
                }
            }
        }
    }

    fn magnitude(&self) -> i64 {
        self.min().abs().max(self.max().abs())
    }
}

// ============================================================================
// DiceExpression
// ============================================================================

/// A parsed dice expression like "2D6+6".
///
/// The term list is fixed at construction; every [`evaluate`](Self::evaluate)
/// is an independent roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpression {
    notation: Cow<'static, str>,
    terms: Cow<'static, [DiceTerm]>,
}

macro_rules! well_known_die {
    ($(#[$meta:meta])* $name:ident, $sides:literal) => {
        $(#[$meta])*
        pub static $name: DiceExpression = DiceExpression {
            notation: Cow::Borrowed(concat!("D", $sides)),
            terms: Cow::Borrowed(&[DiceTerm::Dice {
                count: 1,
                die: DieSpec { sides: $sides },
                negated: false,
            }]),
        };
    };
}

well_known_die!(
    /// One three-sided die
    D3, 3
);
well_known_die!(
    /// One four-sided die
    D4, 4
);
well_known_die!(
    /// One five-sided die
    D5, 5
);
well_known_die!(
    /// One six-sided die
    D6, 6
);
well_known_die!(
    /// One eight-sided die
    D8, 8
);
well_known_die!(
    /// One ten-sided die
    D10, 10
);
well_known_die!(
    /// Percentile die
    D100, 100
);

/// Three six-sided dice
pub static ROLL_3D6: DiceExpression = DiceExpression {
    notation: Cow::Borrowed("3D6"),
    terms: Cow::Borrowed(&[DiceTerm::Dice {
        count: 3,
        die: DieSpec { sides: 6 },
        negated: false,
    }]),
};

/// Two six-sided dice plus six
pub static ROLL_2D6_PLUS_6: DiceExpression = DiceExpression {
    notation: Cow::Borrowed("2D6+6"),
    terms: Cow::Borrowed(&[
        DiceTerm::Dice {
            count: 2,
            die: DieSpec { sides: 6 },
            negated: false,
        },
        DiceTerm::Fixed(FixedTerm(6)),
    ]),
};

impl DiceExpression {
    /// Parse a dice notation string.
    ///
    /// Supported terms, joined by `+` or `-`:
    /// - "XDY" - roll X dice with Y sides
    /// - "DY" - roll one die with Y sides
    /// - "Z" - add the constant Z
    ///
    /// Whitespace is allowed at either end and around signs, but not inside
    /// a term ("1 0D6" is malformed). `d` is accepted for `D`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let normalized = notation.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(DiceError::malformed(notation, "empty notation"));
        }

        let terms = split_signed(&normalized)
            .into_iter()
            .map(|piece| parse_term(notation, &close_sign_gap(piece)))
            .collect::<Result<Vec<_>, _>>()?;

        let magnitude: i64 = terms.iter().map(DiceTerm::magnitude).sum();
        if magnitude > i64::from(i32::MAX) {
            return Err(DiceError::malformed(
                notation,
                "possible total exceeds the integer range",
            ));
        }

        tracing::debug!(notation, terms = terms.len(), "Parsed dice notation");
        Ok(Self {
            notation: Cow::Owned(notation.to_string()),
            terms: Cow::Owned(terms),
        })
    }

    /// The notation this expression was built from.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn terms(&self) -> &[DiceTerm] {
        &self.terms
    }

    /// Roll every die independently and sum dice and constants.
    pub fn evaluate(&self, random: &dyn RandomPort) -> i32 {
        let mut total = 0;
        for term in self.terms.iter() {
            match *term {
                DiceTerm::Fixed(fixed) => {
                    total += fixed.value();
                    tracing::debug!(value = fixed.value(), subtotal = total, "Adding constant");
                }
                DiceTerm::Dice {
                    count,
                    die,
                    negated,
                } => {
                    let mut group = 0;
                    for _ in 0..count {
                        let face = die.roll(random);
                        group += face;
                        tracing::debug!(die = %die, face, group, "Rolling");
                    }
                    if negated {
                        total -= group;
                    } else {
                        total += group;
                    }
                    tracing::debug!(subtotal = total, "Dice group applied");
                }
            }
        }
        total
    }

    /// Lowest possible result.
    pub fn min(&self) -> i32 {
        // Bounded by the magnitude check in `parse`.
        self.terms.iter().map(DiceTerm::min).sum::<i64>() as i32
    }

    /// Highest possible result.
    pub fn max(&self) -> i32 {
        self.terms.iter().map(DiceTerm::max).sum::<i64>() as i32
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical notation, e.g. "2D6+6", "D100", "-2D6".
impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, term) in self.terms.iter().enumerate() {
            match *term {
                DiceTerm::Fixed(fixed) => {
                    if index > 0 && fixed.value() >= 0 {
                        write!(f, "+")?;
                    }
                    write!(f, "{}", fixed.value())?;
                }
                DiceTerm::Dice {
                    count,
                    die,
                    negated,
                } => {
                    if negated {
                        write!(f, "-")?;
                    } else if index > 0 {
                        write!(f, "+")?;
                    }
                    if count == 1 {
                        write!(f, "{die}")?;
                    } else {
                        write!(f, "{count}{die}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Split "2D6+6-D4" into ["2D6", "+6", "-D4"]; each piece keeps its sign.
fn split_signed(input: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, ch) in input.char_indices() {
        if (ch == '+' || ch == '-') && index > start {
            pieces.push(&input[start..index]);
            start = index;
        }
    }
    pieces.push(&input[start..]);
    pieces
}

/// Trim a piece and drop any whitespace between its sign and its body.
fn close_sign_gap(piece: &str) -> String {
    let piece = piece.trim();
    match piece.strip_prefix(['+', '-']) {
        Some(body) => format!("{}{}", &piece[..1], body.trim_start()),
        None => piece.to_string(),
    }
}

fn parse_term(notation: &str, raw: &str) -> Result<DiceTerm, DiceError> {
    if raw.contains(char::is_whitespace) {
        return Err(DiceError::malformed(
            notation,
            format!("whitespace inside term '{raw}'"),
        ));
    }
    let captures = TERM_REGEX
        .captures(raw)
        .ok_or_else(|| DiceError::malformed(notation, format!("unexpected term '{raw}'")))?;
    let negated = captures.get(1).is_some_and(|sign| sign.as_str() == "-");

    if let Some(fixed) = captures.get(4) {
        let value: i32 = fixed.as_str().parse().map_err(|_| {
            DiceError::malformed(notation, format!("constant '{}' too large", fixed.as_str()))
        })?;
        return Ok(DiceTerm::Fixed(FixedTerm::new(if negated {
            -value
        } else {
            value
        })));
    }

    let count = match captures.get(2).map(|m| m.as_str()) {
        None | Some("") => 1,
        Some(digits) => digits.parse::<u32>().map_err(|_| {
            DiceError::malformed(notation, format!("repeat count '{digits}' too large"))
        })?,
    };
    if count == 0 {
        return Err(DiceError::InvalidRepeatCount(0));
    }

    let sides_str = captures.get(3).map(|m| m.as_str()).unwrap_or_default();
    let sides: i32 = sides_str.parse().map_err(|_| {
        DiceError::malformed(notation, format!("side count '{sides_str}' too large"))
    })?;

    Ok(DiceTerm::Dice {
        count,
        die: DieSpec::new(sides)?,
        negated,
    })
}

// ============================================================================
// Spread
// ============================================================================

/// Distribute `total` over `bucket_count` buckets.
///
/// Performs `|total|` unit steps, each landing in a uniformly random bucket,
/// then negates every bucket if `total` was negative. The result always has
/// `bucket_count` entries summing to `total`, each sharing its sign (or zero).
pub fn spread(
    total: i32,
    bucket_count: usize,
    random: &dyn RandomPort,
) -> Result<Vec<i32>, DiceError> {
    if bucket_count == 0 {
        return Err(DiceError::InvalidBucketCount(0));
    }
    let last = i32::try_from(bucket_count - 1)
        .map_err(|_| DiceError::InvalidBucketCount(bucket_count as i64))?;

    tracing::debug!(total, bucket_count, "Spreading over buckets");

    let step = if total < 0 { -1 } else { 1 };
    let mut buckets = vec![0; bucket_count];
    for _ in 0..total.unsigned_abs() {
        let index = random.gen_range(0, last).clamp(0, last) as usize;
        buckets[index] += step;
    }
    Ok(buckets)
}
