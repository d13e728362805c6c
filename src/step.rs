use crate::Error;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{all_consuming, map_res, value},
    multi::many1,
    sequence::pair,
    IResult,
};
use nom_locate::LocatedSpan;
use std::{str::FromStr, time::Duration};

type RawSpan<'a> = LocatedSpan<&'a str>;

type ParseResult<'a, T> = IResult<RawSpan<'a>, T>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
    Millis,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Year,
}

impl Unit {
    const DESCENDING: [Self; 7] = [
        Self::Year,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millis,
    ];

    const fn millis(self) -> u64 {
        match self {
            Self::Millis => 1,
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
            Self::Week => 604_800_000,
            Self::Year => 31_536_000_000,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Millis => "ms",
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
            Self::Year => "y",
        }
    }
}

fn parse_unit(input: RawSpan) -> ParseResult<Unit> {
    // NOTE: "ms" must be tried before "m"
    alt((
        value(Unit::Millis, tag("ms")),
        value(Unit::Second, tag("s")),
        value(Unit::Minute, tag("m")),
        value(Unit::Hour, tag("h")),
        value(Unit::Day, tag("d")),
        value(Unit::Week, tag("w")),
        value(Unit::Year, tag("y")),
    ))(input)
}

fn parse_number(input: RawSpan) -> ParseResult<u64> {
    map_res(digit1, |s: RawSpan| s.fragment().parse::<u64>())(input)
}

fn parse_components(input: RawSpan) -> ParseResult<Vec<(u64, Unit)>> {
    all_consuming(many1(pair(parse_number, parse_unit)))(input)
}

/// Sampling interval of a range query.
///
/// Accepts the Prometheus duration syntax (`30s`, `1h`, `1h30m`, `500ms`)
/// or a plain number of seconds (`3600`, `1.5`).
///
/// ```
/// use poolusage::Step;
///
/// let step: Step = "1h30m".parse()?;
/// assert_eq!(5_400, step.as_duration().as_secs());
/// assert_eq!("1h30m", step.to_string());
/// #
/// # Ok::<(), poolusage::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step(Duration);

impl Step {
    /// Creates a step from a duration.
    ///
    /// # Errors
    ///
    /// Returns error if the duration is shorter than one millisecond,
    /// not a whole number of milliseconds, or too large to be counted in milliseconds.
    pub fn new(duration: Duration) -> crate::Result<Self> {
        let millis = u64::try_from(duration.as_millis()).map_err(|_| {
            Error::InvalidArgument(format!("step {duration:?} is too large"))
        })?;

        if millis == 0 {
            return Err(Error::InvalidArgument(
                "step must be at least 1ms".to_string(),
            ));
        }

        if duration.subsec_nanos() % 1_000_000 != 0 {
            return Err(Error::InvalidArgument(format!(
                "step {duration:?} has a sub-millisecond part"
            )));
        }

        Ok(Self(duration))
    }

    /// Returns the step as duration.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Never 0, checked in [`Step::new`].
    pub(crate) fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn from_secs_f64(s: &str, secs: f64) -> crate::Result<Self> {
        let invalid = || Error::InvalidArgument(format!("invalid step {s:?}"));

        let millis = secs * 1_000.0;
        let rounded = millis.round();

        // NOTE: Tolerate binary representation error (0.1 * 1000), but not real sub-millisecond steps
        if !millis.is_finite()
            || rounded < 0.0
            || rounded >= u64::MAX as f64
            || (millis - rounded).abs() > 1e-6
        {
            return Err(invalid());
        }

        Self::new(Duration::from_millis(rounded as u64))
    }

    fn from_components(s: &str, components: &[(u64, Unit)]) -> crate::Result<Self> {
        let invalid = || Error::InvalidArgument(format!("invalid step {s:?}"));

        // Units have to be given from largest to smallest, each at most once
        if components.windows(2).any(|w| match w {
            [(_, a), (_, b)] => a <= b,
            _ => false,
        }) {
            return Err(invalid());
        }

        let mut millis: u64 = 0;

        for &(n, unit) in components {
            millis = n
                .checked_mul(unit.millis())
                .and_then(|x| millis.checked_add(x))
                .ok_or_else(invalid)?;
        }

        Self::new(Duration::from_millis(millis))
    }
}

impl Default for Step {
    fn default() -> Self {
        Self(Duration::from_secs(3_600))
    }
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match parse_components(RawSpan::new(s)) {
            Ok((_, components)) => Self::from_components(s, &components),
            Err(e) => {
                if let Ok(secs) = s.parse::<f64>() {
                    return Self::from_secs_f64(s, secs);
                }

                let offset = match e {
                    nom::Err::Error(e) | nom::Err::Failure(e) => e.input.location_offset(),
                    nom::Err::Incomplete(_) => s.len(),
                };

                Err(Error::InvalidArgument(format!(
                    "invalid step {s:?} at offset {offset}"
                )))
            }
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut millis = self.as_millis();

        for unit in Unit::DESCENDING {
            let n = millis / unit.millis();

            if n > 0 {
                write!(f, "{n}{}", unit.suffix())?;
                millis -= n * unit.millis();
            }
        }

        Ok(())
    }
}
