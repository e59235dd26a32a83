//! Quick-add parsing
//!
//! Turns a single line of free text into a note or a task, pulling out a
//! due date, a priority and `#tags` along the way. The parser never fails:
//! anything it does not recognize stays in the title.
//!
//! Parsing is a fixed pipeline. Each stage takes the remaining text and
//! returns what it extracted plus the text left for the next stage:
//!
//! 1. type indicator prefix (`note:`, `todo:`, `[ ]`, ...)
//! 2. `#tags`
//! 3. priority keyword (`high`, `urgent`, `!!`, ...)
//! 4. trailing exclamation marks (may override stage 3)
//! 5. date keyword (`today`, `tomorrow`, weekday names)
//! 6. explicit date (`15/3`, `15-3`, `Mar 15`), only when stage 5 found nothing
//! 7. whitespace cleanup and the long-text note fallback

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::task::Priority;

const NOTE_INDICATORS: &[&str] = &["note:", "memo:", "#note", "remember:"];
const TASK_INDICATORS: &[&str] = &["todo:", "task:", "do:", "[]", "[ ]"];

const PRIORITY_KEYWORDS: &[(&str, Priority)] = &[
    ("low", Priority::Low),
    ("medium", Priority::Medium),
    ("high", Priority::High),
    ("urgent", Priority::High),
    ("important", Priority::High),
    ("!", Priority::High),
    ("!!", Priority::High),
    ("!!!", Priority::High),
];

const TRAILING_BANGS: &[(&str, Priority)] = &[
    ("!!!", Priority::High),
    ("!!", Priority::High),
    ("!", Priority::Medium),
];

const ACTION_VERBS: &[&str] = &[
    "buy", "get", "call", "email", "send", "finish", "complete", "submit", "meet", "review",
    "check", "fix", "update", "create", "make", "do", "schedule",
];

const MONTH_ABBREVIATIONS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Titles longer than this (in characters) without a date, priority or
/// leading action verb are treated as notes.
const NOTE_FALLBACK_MIN_CHARS: usize = 50;

/// Date keywords in match order
const DATE_KEYWORDS: &[(&str, DateKeyword)] = &[
    ("today", DateKeyword::Today),
    ("tomorrow", DateKeyword::Tomorrow),
    ("monday", DateKeyword::Weekday(Weekday::Mon)),
    ("tuesday", DateKeyword::Weekday(Weekday::Tue)),
    ("wednesday", DateKeyword::Weekday(Weekday::Wed)),
    ("thursday", DateKeyword::Weekday(Weekday::Thu)),
    ("friday", DateKeyword::Weekday(Weekday::Fri)),
    ("saturday", DateKeyword::Weekday(Weekday::Sat)),
    ("sunday", DateKeyword::Weekday(Weekday::Sun)),
];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

static DATE_KEYWORD_RES: LazyLock<Vec<(Regex, DateKeyword)>> = LazyLock::new(|| {
    DATE_KEYWORDS
        .iter()
        .map(|(word, keyword)| (Regex::new(&format!(r"(?i)\b{}\b", word)).unwrap(), *keyword))
        .collect()
});

static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{1,2})[/\-]([0-9]{1,2})\b").unwrap());

static MONTH_NAME_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+([0-9]{1,2})\b").unwrap()
});

/// What a quick-add line turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Note,
    #[default]
    Task,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Note => write!(f, "note"),
            EntryKind::Task => write!(f, "task"),
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "note" | "n" => Ok(EntryKind::Note),
            "task" | "t" | "todo" => Ok(EntryKind::Task),
            _ => Err(format!("Unknown entry type: {} (expected note or task)", s)),
        }
    }
}

/// How weekday keywords such as `tuesday` become dates.
///
/// `Anchored` counts Monday through Thursday from the next Monday and Friday
/// through Sunday from the next Friday. On a Monday this puts `tuesday` eight
/// days out instead of one. `NextOccurrence` always picks the next matching
/// weekday after today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayResolution {
    #[default]
    Anchored,
    NextOccurrence,
}

/// Result of parsing a quick-add line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInput {
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Text with indicators, tags, keywords and dates removed
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Lowercased tags in order of appearance
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKeyword {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

/// Quick-add parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickInputParser {
    weekday_resolution: WeekdayResolution,
}

impl QuickInputParser {
    /// Creates a parser with the default (anchored) weekday resolution
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(weekday_resolution: WeekdayResolution) -> Self {
        Self { weekday_resolution }
    }

    /// Parses one line of input relative to `now`
    pub fn parse(&self, input: &str, now: NaiveDateTime) -> ParsedInput {
        let today = now.date();
        let text = input.trim().to_string();
        let mut kind = EntryKind::Task;

        let (note_marked, text) = strip_indicator(&text, NOTE_INDICATORS);
        if note_marked {
            kind = EntryKind::Note;
        }
        let (task_marked, text) = strip_indicator(&text, TASK_INDICATORS);
        if task_marked {
            kind = EntryKind::Task;
        }

        let (tags, text) = extract_tags(&text);
        let (keyword_priority, text) = extract_priority_keyword(&text);
        let (bang_priority, text) = extract_trailing_bangs(&text);
        let priority = bang_priority.or(keyword_priority);

        let (mut due_date, mut text) = extract_date_keyword(&text, today, self.weekday_resolution);
        if due_date.is_none() {
            (due_date, text) = extract_explicit_date(&text, today.year());
        }
        if due_date.is_some() {
            kind = EntryKind::Task;
        }

        let title = collapse_whitespace(&text);

        if due_date.is_none() && priority.is_none() && reads_like_note(&title) {
            kind = EntryKind::Note;
        }

        log::debug!(
            "quick input {:?} -> {} (due: {:?}, priority: {:?}, tags: {:?})",
            input,
            kind,
            due_date,
            priority,
            tags
        );

        ParsedInput {
            kind,
            title,
            due_date,
            priority,
            tags,
        }
    }
}

/// Parses a quick-add line with the default parser settings
pub fn parse_quick_input(input: &str, now: NaiveDateTime) -> ParsedInput {
    QuickInputParser::new().parse(input, now)
}

/// Strips the first matching indicator prefix (case-insensitive)
fn strip_indicator(text: &str, indicators: &[&str]) -> (bool, String) {
    for indicator in indicators {
        let matches = text
            .get(..indicator.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(indicator));
        if matches {
            return (true, text[indicator.len()..].trim().to_string());
        }
    }
    (false, text.to_string())
}

fn extract_tags(text: &str) -> (Vec<String>, String) {
    let tags = TAG_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_lowercase())
        .collect();
    let rest = TAG_RE.replace_all(text, "").trim().to_string();
    (tags, rest)
}

fn priority_keyword(word: &str) -> Option<Priority> {
    let word = word.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == word)
        .map(|(_, priority)| *priority)
}

/// Finds the first whitespace-separated priority keyword and removes it
fn extract_priority_keyword(text: &str) -> (Option<Priority>, String) {
    for token in TOKEN_RE.find_iter(text) {
        if let Some(priority) = priority_keyword(token.as_str()) {
            return (Some(priority), remove_span(text, token.start(), token.end()));
        }
    }
    (None, text.to_string())
}

fn extract_trailing_bangs(text: &str) -> (Option<Priority>, String) {
    for (suffix, priority) in TRAILING_BANGS {
        if let Some(rest) = text.strip_suffix(suffix) {
            return (Some(*priority), rest.trim().to_string());
        }
    }
    (None, text.to_string())
}

fn extract_date_keyword(
    text: &str,
    today: NaiveDate,
    resolution: WeekdayResolution,
) -> (Option<NaiveDate>, String) {
    for (re, keyword) in DATE_KEYWORD_RES.iter() {
        if let Some(m) = re.find(text) {
            return match resolve_keyword(*keyword, today, resolution) {
                Some(date) => (Some(date), remove_span(text, m.start(), m.end())),
                None => (None, text.to_string()),
            };
        }
    }
    (None, text.to_string())
}

/// Tries `D/M` (or `D-M`), then `Mon D`, in the given year
fn extract_explicit_date(text: &str, year: i32) -> (Option<NaiveDate>, String) {
    if let Some(caps) = NUMERIC_DATE_RE.captures(text) {
        let day = caps[1].parse::<u32>().ok();
        let month = caps[2].parse::<u32>().ok();
        let date = day
            .zip(month)
            .and_then(|(day, month)| NaiveDate::from_ymd_opt(year, month, day));
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            return (Some(date), remove_span(text, m.start(), m.end()));
        }
    }

    if let Some(caps) = MONTH_NAME_DATE_RE.captures(text) {
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|abbr| caps[1].eq_ignore_ascii_case(abbr))
            .map(|idx| idx as u32 + 1);
        let day = caps[2].parse::<u32>().ok();
        let date = month
            .zip(day)
            .and_then(|(month, day)| NaiveDate::from_ymd_opt(year, month, day));
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            return (Some(date), remove_span(text, m.start(), m.end()));
        }
    }

    (None, text.to_string())
}

fn resolve_keyword(
    keyword: DateKeyword,
    today: NaiveDate,
    resolution: WeekdayResolution,
) -> Option<NaiveDate> {
    match keyword {
        DateKeyword::Today => Some(today),
        DateKeyword::Tomorrow => today.succ_opt(),
        DateKeyword::Weekday(day) => match resolution {
            WeekdayResolution::NextOccurrence => next_weekday(today, day),
            WeekdayResolution::Anchored => {
                let offset = day.num_days_from_monday();
                if offset <= 3 {
                    next_weekday(today, Weekday::Mon)?.checked_add_days(Days::new(offset.into()))
                } else {
                    next_weekday(today, Weekday::Fri)?
                        .checked_add_days(Days::new((offset - 4).into()))
                }
            }
        },
    }
}

/// Next date with the given weekday, strictly after `after`
fn next_weekday(after: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = after.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let ahead = match (7 + wanted - current) % 7 {
        0 => 7,
        n => n,
    };
    after.checked_add_days(Days::new(ahead.into()))
}

fn remove_span(text: &str, start: usize, end: usize) -> String {
    format!("{}{}", &text[..start], &text[end..]).trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn reads_like_note(title: &str) -> bool {
    if title.chars().count() <= NOTE_FALLBACK_MIN_CHARS {
        return false;
    }
    let first_word = title.split(' ').next().unwrap_or("").to_lowercase();
    !ACTION_VERBS.contains(&first_word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Wednesday, 2024-01-10 09:30
    fn wednesday() -> NaiveDateTime {
        date(2024, 1, 10).and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
    }

    fn at(day: NaiveDate) -> NaiveDateTime {
        day.and_time(NaiveTime::MIN)
    }

    fn parse(input: &str) -> ParsedInput {
        parse_quick_input(input, wednesday())
    }

    #[test]
    fn todo_with_date_and_priority() {
        let parsed = parse("todo: Buy milk tomorrow high");

        assert_eq!(
            parsed,
            ParsedInput {
                kind: EntryKind::Task,
                title: "Buy milk".to_string(),
                due_date: Some(date(2024, 1, 11)),
                priority: Some(Priority::High),
                tags: vec![],
            }
        );
    }

    #[test]
    fn plain_text_defaults_to_task() {
        let parsed = parse("  water the plants  ");

        assert_eq!(parsed.kind, EntryKind::Task);
        assert_eq!(parsed.title, "water the plants");
        assert_eq!(parsed.due_date, None);
        assert_eq!(parsed.priority, None);
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn empty_input() {
        let parsed = parse("   ");

        assert_eq!(parsed.kind, EntryKind::Task);
        assert_eq!(parsed.title, "");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn note_indicator_forces_note_for_long_text() {
        let parsed = parse(
            "note: Long term thoughts about the future of this project and where it is headed next year",
        );

        assert_eq!(parsed.kind, EntryKind::Note);
        assert_eq!(
            parsed.title,
            "Long term thoughts about the future of this project and where it is headed next year"
        );
    }

    #[test]
    fn note_indicators_are_case_insensitive() {
        assert_eq!(parse("MEMO: call back").kind, EntryKind::Note);
        assert_eq!(parse("Remember: gate code 4411").title, "gate code 4411");

        let hashed = parse("#note meeting recap");
        assert_eq!(hashed.kind, EntryKind::Note);
        assert_eq!(hashed.title, "meeting recap");
        assert!(hashed.tags.is_empty());
    }

    #[test]
    fn task_indicators_strip_prefix() {
        assert_eq!(parse("[ ] water plants").title, "water plants");
        assert_eq!(parse("[]water plants").title, "water plants");
        assert_eq!(parse("Task: file taxes").title, "file taxes");
    }

    #[test]
    fn task_indicator_after_note_indicator_wins() {
        let parsed = parse("note: todo: mixed signals");

        assert_eq!(parsed.kind, EntryKind::Task);
        assert_eq!(parsed.title, "mixed signals");
    }

    #[test]
    fn tags_are_lowercased_in_order() {
        let parsed = parse("Plan trip #Travel #family ideas #travel");

        assert_eq!(parsed.tags, vec!["travel", "family", "travel"]);
        assert_eq!(parsed.title, "Plan trip ideas");
    }

    #[test]
    fn trailing_bangs_set_priority() {
        let high = parse("Finish the report!!!");
        assert_eq!(high.priority, Some(Priority::High));
        assert_eq!(high.title, "Finish the report");

        let double = parse("Finish the report!!");
        assert_eq!(double.priority, Some(Priority::High));
        assert_eq!(double.title, "Finish the report");

        let single = parse("Call mom!");
        assert_eq!(single.priority, Some(Priority::Medium));
        assert_eq!(single.title, "Call mom");
    }

    #[test]
    fn trailing_bang_overrides_keyword() {
        let parsed = parse("urgent fix login bug!");

        assert_eq!(parsed.priority, Some(Priority::Medium));
        assert_eq!(parsed.title, "fix login bug");
    }

    #[test]
    fn priority_keywords_map_to_levels() {
        assert_eq!(parse("low sweep garage").priority, Some(Priority::Low));
        assert_eq!(parse("sweep garage MEDIUM").priority, Some(Priority::Medium));
        assert_eq!(parse("important: sweep garage").priority, None);
        assert_eq!(parse("sweep important garage").priority, Some(Priority::High));
    }

    #[test]
    fn only_first_priority_keyword_is_consumed() {
        let parsed = parse("low effort high reward");

        assert_eq!(parsed.priority, Some(Priority::Low));
        assert_eq!(parsed.title, "effort high reward");
    }

    #[test]
    fn priority_keyword_removed_at_its_own_position() {
        let parsed = parse("high-level plan high");

        assert_eq!(parsed.priority, Some(Priority::High));
        assert_eq!(parsed.title, "high-level plan");
    }

    #[test]
    fn standalone_bang_token_is_consumed() {
        let parsed = parse("Finish report !");

        assert_eq!(parsed.priority, Some(Priority::High));
        assert_eq!(parsed.title, "Finish report");
    }

    #[test]
    fn date_keywords_resolve_relative_to_now() {
        assert_eq!(parse("Meeting TODAY").due_date, Some(date(2024, 1, 10)));
        assert_eq!(parse("gym tomorrow").due_date, Some(date(2024, 1, 11)));
        assert_eq!(parse("gym monday").due_date, Some(date(2024, 1, 15)));
        assert_eq!(parse("gym thursday").due_date, Some(date(2024, 1, 18)));
        assert_eq!(parse("gym friday").due_date, Some(date(2024, 1, 12)));
        assert_eq!(parse("gym sunday").due_date, Some(date(2024, 1, 14)));
        assert_eq!(parse("gym sunday").title, "gym");
    }

    #[test]
    fn date_keywords_match_whole_words_only() {
        let parsed = parse("todays agenda");

        assert_eq!(parsed.due_date, None);
        assert_eq!(parsed.title, "todays agenda");
    }

    #[test]
    fn first_keyword_in_table_order_wins() {
        let parsed = parse("move friday meeting to today");

        assert_eq!(parsed.due_date, Some(date(2024, 1, 10)));
        assert_eq!(parsed.title, "move friday meeting to");
    }

    #[test]
    fn anchored_weekdays_count_from_next_monday_or_friday() {
        let monday = at(date(2024, 1, 15));
        let parsed = parse_quick_input("standup tuesday", monday);
        assert_eq!(parsed.due_date, Some(date(2024, 1, 23)));

        let saturday = at(date(2024, 1, 13));
        let parsed = parse_quick_input("brunch sunday", saturday);
        assert_eq!(parsed.due_date, Some(date(2024, 1, 21)));
    }

    #[test]
    fn next_occurrence_weekdays() {
        let parser = QuickInputParser::with_resolution(WeekdayResolution::NextOccurrence);

        let monday = at(date(2024, 1, 15));
        assert_eq!(parser.parse("standup tuesday", monday).due_date, Some(date(2024, 1, 16)));
        assert_eq!(parser.parse("standup monday", monday).due_date, Some(date(2024, 1, 22)));

        let saturday = at(date(2024, 1, 13));
        assert_eq!(parser.parse("brunch sunday", saturday).due_date, Some(date(2024, 1, 14)));
    }

    #[test]
    fn numeric_dates_are_day_first() {
        let parsed = parse("Dentist 15/3");
        assert_eq!(parsed.due_date, Some(date(2024, 3, 15)));
        assert_eq!(parsed.title, "Dentist");

        let dashed = parse("Dentist 2-11 at noon");
        assert_eq!(dashed.due_date, Some(date(2024, 11, 2)));
        assert_eq!(dashed.title, "Dentist at noon");
    }

    #[test]
    fn month_name_dates() {
        let parsed = parse("Pay rent Feb 1");
        assert_eq!(parsed.due_date, Some(date(2024, 2, 1)));
        assert_eq!(parsed.title, "Pay rent");

        assert_eq!(parse("pay rent DEC 24").due_date, Some(date(2024, 12, 24)));
    }

    #[test]
    fn invalid_dates_are_left_in_text() {
        let parsed = parse("Dentist 31/2");
        assert_eq!(parsed.due_date, None);
        assert_eq!(parsed.title, "Dentist 31/2");

        let parsed = parse("Pay rent feb 30");
        assert_eq!(parsed.due_date, None);
        assert_eq!(parsed.title, "Pay rent feb 30");
    }

    #[test]
    fn invalid_numeric_date_falls_through_to_month_name() {
        let parsed = parse("Ship 45/45 build Mar 3");

        assert_eq!(parsed.due_date, Some(date(2024, 3, 3)));
        assert_eq!(parsed.title, "Ship 45/45 build");
    }

    #[test]
    fn date_keyword_skips_explicit_dates() {
        let parsed = parse("Submit 15/3 friday");

        assert_eq!(parsed.due_date, Some(date(2024, 1, 12)));
        assert_eq!(parsed.title, "Submit 15/3");
    }

    #[test]
    fn date_forces_task_even_with_note_indicator() {
        let parsed = parse("note: dentist tomorrow");

        assert_eq!(parsed.kind, EntryKind::Task);
        assert_eq!(parsed.title, "dentist");
    }

    #[test]
    fn long_text_without_action_verb_becomes_note() {
        let parsed =
            parse("Thinking about how the garden could look with more native plants next spring");

        assert_eq!(parsed.kind, EntryKind::Note);
    }

    #[test]
    fn long_text_with_action_verb_stays_task() {
        let parsed =
            parse("Schedule a long conversation with the team about the roadmap for the quarter");

        assert_eq!(parsed.kind, EntryKind::Task);
    }

    #[test]
    fn long_text_with_priority_stays_task() {
        let parsed = parse(
            "Thinking about how the garden could look with more native plants next spring!",
        );

        assert_eq!(parsed.kind, EntryKind::Task);
        assert_eq!(parsed.priority, Some(Priority::Medium));
    }

    #[test]
    fn internal_whitespace_is_collapsed() {
        let parsed = parse("buy   #food  eggs\tand    milk");

        assert_eq!(parsed.title, "buy eggs and milk");
    }

    #[test]
    fn serialized_shape_omits_absent_fields() {
        let json = serde_json::to_value(parse("plain words")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "task", "title": "plain words", "tags": []})
        );

        let json = serde_json::to_value(parse("gym tomorrow high #health")).unwrap();
        assert_eq!(json["dueDate"], "2024-01-11");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["tags"], serde_json::json!(["health"]));
    }

    #[test]
    fn entry_kind_from_str() {
        assert_eq!("note".parse::<EntryKind>(), Ok(EntryKind::Note));
        assert_eq!("TASK".parse::<EntryKind>(), Ok(EntryKind::Task));
        assert!("event".parse::<EntryKind>().is_err());
    }

    proptest! {
        #[test]
        fn parsing_is_deterministic(input in "\\PC{0,80}") {
            prop_assert_eq!(parse(&input), parse(&input));
        }

        #[test]
        fn tags_round_trip(
            words in prop::collection::vec("[a-z]{1,8}", 1..6),
            tags in prop::collection::vec("[A-Za-z][A-Za-z0-9]{0,7}", 0..5),
        ) {
            let tag_text: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
            let input = format!("{} {}", words.join(" "), tag_text.join(" "));
            let parsed = parse(&input);

            let expected: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            prop_assert_eq!(&parsed.tags, &expected);
            prop_assert!(!parsed.title.contains('#'));
        }

        // Filler words avoid the vowels every date and priority keyword uses
        #[test]
        fn title_drops_consumed_markers(
            indicator in prop::option::of(prop::sample::select(
                NOTE_INDICATORS.iter().chain(TASK_INDICATORS).copied().collect::<Vec<_>>(),
            )),
            filler in prop::collection::vec("[bcdefgjklmnpqrstvwxyz]{1,8}", 1..5),
            tags in prop::collection::vec("[A-Za-z][A-Za-z0-9]{0,7}", 0..4),
            priority in prop::option::of(prop::sample::select(
                PRIORITY_KEYWORDS.iter().map(|(word, _)| *word).collect::<Vec<_>>(),
            )),
            date_word in prop::option::of(prop::sample::select(
                DATE_KEYWORDS.iter().map(|(word, _)| *word).collect::<Vec<_>>(),
            )),
            shout in any::<bool>(),
            bangs in prop::sample::select(vec!["", "!", "!!", "!!!"]),
            rotate in 0usize..8,
            last in "[bcdefgjklmnpqrstvwxyz]{1,8}",
        ) {
            let mut tokens: Vec<String> = filler.clone();
            tokens.extend(tags.iter().map(|t| format!("#{}", t)));
            tokens.extend(priority.map(str::to_string));
            if let Some(word) = date_word {
                tokens.push(if shout { word.to_uppercase() } else { word.to_string() });
            }
            let len = tokens.len();
            tokens.rotate_left(rotate % len);

            let mut input = tokens.join(" ");
            if let Some(indicator) = indicator {
                input = format!("{} {}", indicator, input);
            }
            input = format!("{} {}{}", input, last, bangs);

            let parsed = parse(&input);
            let title = parsed.title.to_lowercase();

            prop_assert!(!TAG_RE.is_match(&parsed.title), "tag left in {:?}", parsed.title);

            if let Some(word) = date_word {
                prop_assert!(parsed.due_date.is_some());
                let whole_word = Regex::new(&format!(r"\b{}\b", word)).unwrap();
                prop_assert!(!whole_word.is_match(&title), "{:?} left in {:?}", word, title);
            }

            if let Some(word) = priority {
                prop_assert!(parsed.priority.is_some());
                prop_assert!(!title.split(' ').any(|token| token == word));
            }

            if let Some(indicator) = indicator {
                prop_assert!(!title.starts_with(indicator));
            }
        }
    }
}
