use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "match page", "time remaining until match ...", "not started", "ended", "live"
    static ref NOISE: Regex = Regex::new(r"(?i)(صفحة المباراة|باقي على المباراة.*|لم تبدأ|انتهت|مباشر|live)").unwrap();
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

const SEPARATORS: [char; 4] = ['-', '–', '—', ':'];

/// Strips status labels, digit runs and edge separators from a team name fragment.
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    let without_noise = NOISE.replace_all(text, "");
    let without_digits = DIGITS.replace_all(&without_noise, "");
    let collapsed = SPACES.replace_all(&without_digits, " ");
    collapsed
        .trim_matches(|ch: char| ch.is_whitespace() || SEPARATORS.contains(&ch))
        .to_string()
}
