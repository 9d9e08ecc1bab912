use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::log;

use crate::models::{MatchRecord, MatchStatus};
use crate::rest_client::{DocumentSource, FetchError};
use crate::text_normalizer::normalize;

lazy_static! {
    static ref CONTAINERS: Selector = Selector::parse("section, .mec-container, .elementor-widget-wrap, div").unwrap();
    static ref HEADINGS: Selector = Selector::parse("h2, h3, h4, h5").unwrap();
    static ref ROWS: Selector = Selector::parse(".mec-row, .match-item, li, .mec, .mec-table").unwrap();
    static ref IMAGES: Selector = Selector::parse("img[src]").unwrap();

    static ref DATE: Regex = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
    static ref TIME: Regex = Regex::new(r"\b([01]?\d|2[0-3]):[0-5]\d\b").unwrap();
    static ref TEAM_SPLIT: Regex = Regex::new(r"\s+vs\.?\s+|\s+مقابل\s+|\s+[-–—:]\s+").unwrap();
}

const ENDED: &str = "انتهت";
const NOT_STARTED: &str = "لم تبدأ";
const LIVE: &str = "مباشر";
const LIVE_LATIN: &str = "Live";

const MIN_TITLE_LEN: usize = 3;

type TitleCheck = fn(&str) -> bool;
type RowCheck = fn(&RowCandidate, &str) -> bool;

const TITLE_CHECKS: &[TitleCheck] = &[is_long_enough];
const ROW_CHECKS: &[RowCheck] = &[has_text, is_today];

fn is_long_enough(title: &str) -> bool {
    title.chars().count() >= MIN_TITLE_LEN
}

fn has_text(row: &RowCandidate, _today: &str) -> bool {
    !row.text.is_empty()
}

/// Rows stamped with another day are dropped, unstamped rows count as today.
fn is_today(row: &RowCandidate, today: &str) -> bool {
    row.text.contains(today) || !DATE.is_match(&row.text)
}

pub struct RowCandidate<'a> {
    pub element: ElementRef<'a>,
    pub text: String,
}

impl<'a> RowCandidate<'a> {
    pub fn new(element: ElementRef<'a>) -> RowCandidate<'a> {
        RowCandidate { element, text: flatten_text(element) }
    }
}

pub struct MatchExtractor {
    source: Arc<dyn DocumentSource>,
}

impl MatchExtractor {
    pub fn new(source: Arc<dyn DocumentSource>) -> MatchExtractor {
        MatchExtractor { source }
    }

    /// `Err` only when the page could not be fetched, an unparseable page yields `Ok` with no matches.
    pub async fn extract(&self, today: NaiveDate) -> Result<Vec<MatchRecord>, FetchError> {
        let html = self.source.fetch().await?;
        Ok(parse(&html, self.source.base_url(), today))
    }
}

pub fn parse(html: &str, base_url: &str, today: NaiveDate) -> Vec<MatchRecord> {
    let before = Instant::now();
    let document = Html::parse_document(html);
    let today = today.format("%Y-%m-%d").to_string();

    let mut titles = HashMap::new();
    let mut seen = HashSet::new();
    let mut result = vec![];
    let mut nr_rows = 0;

    for element in document.select(&ROWS) {
        nr_rows += 1;
        // nearest enclosing container whose heading passes the title checks
        let league = element.ancestors()
            .filter_map(ElementRef::wrap)
            .filter(|e| CONTAINERS.matches(e))
            .find_map(|container| {
                titles.entry(container.id())
                    .or_insert_with(|| league_title(container))
                    .clone()
            });
        let Some(league) = league else {
            continue;
        };
        let row = RowCandidate::new(element);
        if !ROW_CHECKS.iter().all(|check| check(&row, today.as_str())) {
            continue;
        }
        let Some(record) = to_record(&league, &row, base_url) else {
            continue;
        };
        if seen.insert(record.key()) {
            result.push(record);
        }
    }

    log::info!("[EXTRACT] {} matches from {nr_rows} rows {:.2?}", result.len(), before.elapsed());
    result
}

fn league_title(container: ElementRef) -> Option<String> {
    let heading = container.select(&HEADINGS).next()?;
    let title = flatten_text(heading);
    if TITLE_CHECKS.iter().all(|check| check(title.as_str())) {
        Some(title)
    } else {
        None
    }
}

fn to_record(league: &str, row: &RowCandidate, base_url: &str) -> Option<MatchRecord> {
    let teams: Vec<String> = TEAM_SPLIT.split(&row.text)
        .filter(|e| !e.trim().is_empty())
        .map(normalize)
        .filter(|e| !e.is_empty())
        .collect();
    if teams.len() < 2 {
        log::debug!("[EXTRACT] Skip row {:?}", row.text);
        return None;
    }

    let mut logos = row.element.select(&IMAGES)
        .filter_map(|e| e.value().attr("src"))
        .filter(|e| !e.is_empty())
        .map(|e| normalize_src(e, base_url));

    let mut teams = teams.into_iter();
    Some(MatchRecord {
        league: league.to_string(),
        home: teams.next().unwrap_or_default(),
        away: teams.next().unwrap_or_default(),
        time: get_time(&row.text),
        status: get_status(&row.text),
        logohome: logos.next().unwrap_or_default(),
        logoaway: logos.next().unwrap_or_default(),
    })
}

fn flatten_text(element: ElementRef) -> String {
    element.text()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn get_time(text: &str) -> String {
    TIME.find(text)
        .map(|e| format!("{}:00", e.as_str()))
        .unwrap_or_default()
}

pub fn get_status(text: &str) -> MatchStatus {
    if text.contains(ENDED) {
        MatchStatus::Ended
    } else if text.contains(NOT_STARTED) {
        MatchStatus::NotStarted
    } else if text.contains(LIVE) || text.contains(LIVE_LATIN) {
        MatchStatus::Live
    } else {
        MatchStatus::Unknown
    }
}

pub fn normalize_src(src: &str, base_url: &str) -> String {
    if src.is_empty() {
        String::new()
    } else if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else if src.starts_with('/') {
        format!("{}{src}", base_url.trim_end_matches('/'))
    } else {
        src.to_string()
    }
}
