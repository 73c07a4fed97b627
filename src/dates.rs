use std::fmt::Write as _;

use chrono::format::{self, Fixed, Item, Numeric, Parsed, StrftimeItems};
use chrono::{Days, Locale, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{Result, VaxError};
use crate::locale::{locale_name_for, LocaleContext};

/// Canonical output format for every date leaving this crate.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Starts on Monday to line up with 2001-01-01.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Extracts a date from `text` written in a given locale.
///
/// `language` is a two-letter code (e.g. `"fr"`); when recognised it replaces
/// `locale_name`. An empty `locale_name` means the environment default.
/// `days_to_subtract` is applied after parsing. The process locale is switched
/// for the duration of the parse and always restored.
///
/// ```
/// let d = vax_india::extract_date("01 janvier 2021", "%d %B %Y", Some("fr"), "", 1).unwrap();
/// assert_eq!(d, "2020-12-31");
/// ```
pub fn extract_date(
    text: &str,
    format: &str,
    language: Option<&str>,
    locale_name: &str,
    days_to_subtract: i64,
) -> Result<String> {
    let name = locale_name_for(language, locale_name);

    let date = {
        let ctx = LocaleContext::enter(&name)?;
        parse_localized_date(text, format, ctx.locale())?
    };

    let date = days_to_subtract
        .checked_neg()
        .and_then(|days| shift_days(date, days))
        .ok_or_else(|| VaxError::DateOutOfRange(format!("{date} minus {days_to_subtract} days")))?;
    debug!(text, format, locale = %name, %date, "dates.extract");
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Re-renders every date of `dates` from `input_format` to `output_format`
/// (default [`DATE_FORMAT`]). Fails on the first element that does not parse.
pub fn normalize_date_sequence<S: AsRef<str>>(
    dates: &[S],
    input_format: &str,
    output_format: Option<&str>,
) -> Result<Vec<String>> {
    let output_format = output_format.unwrap_or(DATE_FORMAT);
    check_format(output_format)?;

    dates
        .iter()
        .map(|d| {
            let d = d.as_ref();
            let dt = parse_date_time(d, input_format).map_err(|source| VaxError::DateParse {
                text: d.to_string(),
                format: input_format.to_string(),
                source,
            })?;
            render(&dt, output_format)
        })
        .collect()
}

/// Formats `value` with a strftime string, rejecting malformed specifiers
/// instead of panicking.
pub fn render<T>(value: &T, fmt: &str) -> Result<String>
where
    T: FormatWith,
{
    check_format(fmt)?;
    let mut out = String::new();
    write!(out, "{}", value.format_with(fmt)).map_err(|_| VaxError::InvalidFormat(fmt.to_string()))?;
    Ok(out)
}

pub trait FormatWith {
    fn format_with<'a>(&self, fmt: &'a str) -> format::DelayedFormat<StrftimeItems<'a>>;
}

impl FormatWith for NaiveDate {
    fn format_with<'a>(&self, fmt: &'a str) -> format::DelayedFormat<StrftimeItems<'a>> {
        self.format(fmt)
    }
}

impl FormatWith for NaiveDateTime {
    fn format_with<'a>(&self, fmt: &'a str) -> format::DelayedFormat<StrftimeItems<'a>> {
        self.format(fmt)
    }
}

fn check_format(fmt: &str) -> Result<()> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(VaxError::InvalidFormat(fmt.to_string()));
    }
    Ok(())
}

pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Parses a date, also accepting formats that carry a time of day.
fn parse_date_time(text: &str, fmt: &str) -> std::result::Result<NaiveDateTime, format::ParseError> {
    let items: Vec<Item> = StrftimeItems::new(fmt).collect();
    parse_items(text, &items)
}

/// Fields the format leaves out default to year 1900, January and the 1st.
fn parse_items(text: &str, items: &[Item]) -> std::result::Result<NaiveDateTime, format::ParseError> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, items.iter())?;

    let has = |pred: fn(&Item) -> bool| items.iter().any(pred);
    let dated_otherwise = has(|i| {
        matches!(
            i,
            Item::Numeric(
                Numeric::Ordinal
                    | Numeric::WeekFromSun
                    | Numeric::WeekFromMon
                    | Numeric::IsoWeek
                    | Numeric::Timestamp,
                _
            )
        )
    });
    let has_year = has(|i| {
        matches!(
            i,
            Item::Numeric(
                Numeric::Year
                    | Numeric::YearDiv100
                    | Numeric::YearMod100
                    | Numeric::IsoYear
                    | Numeric::IsoYearDiv100
                    | Numeric::IsoYearMod100
                    | Numeric::Timestamp,
                _
            )
        )
    });
    let has_month = has(|i| {
        matches!(
            i,
            Item::Numeric(Numeric::Month, _) | Item::Fixed(Fixed::ShortMonthName | Fixed::LongMonthName)
        )
    });
    let has_day = has(|i| matches!(i, Item::Numeric(Numeric::Day, _)));

    if !has_year {
        parsed.set_year(1900)?;
    }
    if !dated_otherwise {
        if !has_month {
            parsed.set_month(1)?;
        }
        if !has_day {
            parsed.set_day(1)?;
        }
    }

    let date = parsed.to_naive_date()?;
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
    Ok(date.and_time(time))
}

fn parse_localized_date(text: &str, fmt: &str, locale: Locale) -> Result<NaiveDate> {
    let items: Vec<Item> = StrftimeItems::new(fmt).collect();
    let mut candidates = posix_candidates(text, locale, &items).into_iter();

    let first = candidates.next().unwrap_or_else(|| text.to_string());
    let source = match parse_items(&first, &items) {
        Ok(dt) => return Ok(dt.date()),
        Err(e) => e,
    };
    if let Some(dt) = candidates.find_map(|c| parse_items(&c, &items).ok()) {
        return Ok(dt.date());
    }
    Err(VaxError::DateParse {
        text: text.to_string(),
        format: fmt.to_string(),
        source,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Month,
    Weekday,
}

struct LocalName {
    kind: NameKind,
    native: String,
    dotted: bool,
    posix: String,
}

/// Month and weekday names of `locale`, abbreviations first so that the
/// three-letter English form is tried first whenever a word is ambiguous.
fn local_names(locale: Locale) -> Vec<LocalName> {
    let months = (1..=12).filter_map(|m| NaiveDate::from_ymd_opt(2001, m, 1));
    let weekdays = (1..=7).filter_map(|d| NaiveDate::from_ymd_opt(2001, 1, d));

    let mut names = Vec::with_capacity(38);
    for (kind, short, long, dates, english) in [
        (NameKind::Month, "%b", "%B", months.collect::<Vec<_>>(), &MONTHS[..]),
        (NameKind::Weekday, "%a", "%A", weekdays.collect::<Vec<_>>(), &WEEKDAYS[..]),
    ] {
        for (spec, abbreviate) in [(short, true), (long, false)] {
            for (date, &english) in dates.iter().zip(english) {
                let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
                    continue;
                };
                let native = Utc
                    .from_utc_datetime(&midnight)
                    .format_localized(spec, locale)
                    .to_string()
                    .to_lowercase();
                let dotted = native.ends_with('.');
                let posix = if abbreviate { &english[..3] } else { english };
                names.push(LocalName {
                    kind,
                    native: native.trim_end_matches('.').to_string(),
                    dotted,
                    posix: posix.to_string(),
                });
            }
        }
    }
    names
}

const MAX_CANDIDATES: usize = 64;

/// Spellings of `text` with localized month and weekday names rewritten in
/// POSIX (English) form so chrono's `%b`/`%B`/`%a`/`%A` can read them.
///
/// Only the name kinds the format actually asks for are considered. A word
/// that is both a month and a weekday (es `mar`) yields one spelling per
/// reading, month first.
fn posix_candidates(text: &str, locale: Locale, items: &[Item]) -> Vec<String> {
    let wants = |kind| {
        items.iter().any(|i| match (kind, i) {
            (NameKind::Month, Item::Fixed(Fixed::ShortMonthName | Fixed::LongMonthName)) => true,
            (NameKind::Weekday, Item::Fixed(Fixed::ShortWeekdayName | Fixed::LongWeekdayName)) => true,
            _ => false,
        })
    };
    let (months, weekdays) = (wants(NameKind::Month), wants(NameKind::Weekday));
    if locale == Locale::POSIX || !(months || weekdays) {
        return vec![text.to_string()];
    }
    let names: Vec<LocalName> = local_names(locale)
        .into_iter()
        .filter(|n| match n.kind {
            NameKind::Month => months,
            NameKind::Weekday => weekdays,
        })
        .collect();

    let mut segments: Vec<Vec<String>> = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !c.is_alphabetic() {
            segments.push(vec![c.to_string()]);
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_alphabetic() {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }

        let word = &text[start..end];
        let lower = word.to_lowercase();
        let matches: Vec<&LocalName> = names.iter().filter(|n| n.native == lower).collect();
        if matches.is_empty() {
            segments.push(vec![word.to_string()]);
            continue;
        }

        let eat_dot = matches.iter().any(|n| n.dotted) && matches!(chars.peek(), Some((_, '.')));
        if eat_dot {
            chars.next();
        }
        let mut options: Vec<String> = Vec::with_capacity(matches.len());
        for n in matches {
            let option = if eat_dot && !n.dotted {
                format!("{}.", n.posix)
            } else {
                n.posix.clone()
            };
            if !options.contains(&option) {
                options.push(option);
            }
        }
        segments.push(options);
    }

    segments.iter().fold(vec![String::new()], |acc, options| {
        acc.iter()
            .flat_map(|prefix| options.iter().map(move |o| format!("{prefix}{o}")))
            .take(MAX_CANDIDATES)
            .collect()
    })
}
