use regex::Regex;
use std::sync::OnceLock;

use crate::models::ExperienceLevel;

const ENTRY_KEYWORDS: &[&str] = &[
    "entry", "junior", "jr", "graduate", "intern", "trainee", "associate",
];
const SENIOR_KEYWORDS: &[&str] = &["senior", "sr", "lead", "experienced"];
const PRINCIPAL_KEYWORDS: &[&str] = &[
    "principal", "staff", "director", "architect", "head", "vp", "chief",
];

fn years_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\s*\+?\s*(?:years?|yrs?)").expect("valid regex"))
}

/// Derive the normalized experience category from the free-text hint,
/// falling back to a "N years" pattern in the hint or description.
/// Defaults to mid-level.
pub fn normalize_experience(
    hint: Option<&str>,
    description: Option<&str>,
) -> ExperienceLevel {
    if let Some(hint) = hint {
        let lower = hint.to_lowercase();
        let has_keyword = |set: &[&str]| {
            set.iter()
                .any(|k| lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == *k))
        };
        // Principal first so "senior staff engineer" lands on the
        // higher band.
        if has_keyword(PRINCIPAL_KEYWORDS) {
            return ExperienceLevel::Principal;
        }
        if has_keyword(SENIOR_KEYWORDS) {
            return ExperienceLevel::Senior;
        }
        if has_keyword(ENTRY_KEYWORDS) {
            return ExperienceLevel::Entry;
        }
        if let Some(level) = level_from_years(&lower) {
            return level;
        }
    }
    if let Some(desc) = description {
        if let Some(level) = level_from_years(&desc.to_lowercase()) {
            return level;
        }
    }
    ExperienceLevel::Mid
}

fn level_from_years(text: &str) -> Option<ExperienceLevel> {
    let caps = years_re().captures(text)?;
    let years: u8 = caps.get(1)?.as_str().parse().ok()?;
    Some(match years {
        0..=2 => ExperienceLevel::Entry,
        3..=6 => ExperienceLevel::Mid,
        7..=11 => ExperienceLevel::Senior,
        _ => ExperienceLevel::Principal,
    })
}
