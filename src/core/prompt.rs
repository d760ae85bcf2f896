use std::fmt::Write;

use crate::models::{CandidateSource, CountryProfile, ExperienceLevel, JobQuery, PayType, QuotePeriod};

/// Indicative currency->USD rates baked into the prompt so the model
/// does not guess wildly when a snippet quotes local currency. Display
/// conversion always uses the live FX table, never these.
const FX_CHEAT_SHEET: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 1.08),
    ("GBP", 1.27),
    ("CHF", 1.12),
    ("PLN", 0.25),
    ("BRL", 0.18),
    ("MXN", 0.055),
    ("ARS", 0.0011),
    ("INR", 0.012),
    ("JPY", 0.0067),
    ("CNY", 0.14),
    ("AUD", 0.66),
    ("CAD", 0.73),
];

/// Build the single extraction prompt. Deterministic string template,
/// no network calls; candidates contribute URL, title and snippet only.
pub fn build_prompt(
    query: &JobQuery,
    experience: ExperienceLevel,
    profile: &CountryProfile,
    candidates: &[CandidateSource],
) -> String {
    let mut p = String::with_capacity(4096);

    p.push_str(
        "You are estimating compensation ranges from search results for salary pages and job listings.\n\n",
    );

    let unit = match query.pay_type {
        PayType::Hourly => "HOURLY (hourly rate)",
        PayType::Annual => "ANNUAL (yearly salary)",
    };
    writeln!(p, "Task:").ok();
    writeln!(p, "- Job title: \"{}\"", query.job_title).ok();
    writeln!(p, "- Experience level: {}", experience.label()).ok();
    if let Some(desc) = query.job_description.as_deref() {
        let trimmed: String = desc.chars().take(600).collect();
        writeln!(p, "- Job description excerpt: \"{}\"", trimmed).ok();
    }
    writeln!(p, "- Location: \"{}\"", query.location_label()).ok();
    writeln!(p, "- Output unit: {} in USD.", unit).ok();
    p.push('\n');

    push_country_guidance(&mut p, profile, query.pay_type);
    push_cheat_sheet(&mut p);
    push_candidates(&mut p, candidates);
    push_sanity_anchors(&mut p, query.pay_type);
    push_schema(&mut p, query.pay_type);

    p
}

fn push_country_guidance(p: &mut String, profile: &CountryProfile, pay_type: PayType) {
    writeln!(p, "Local conventions for {}:", profile.name).ok();
    writeln!(p, "- Local currency: {}.", profile.currency).ok();
    match profile.quote_period {
        QuotePeriod::Monthly => {
            writeln!(
                p,
                "- Salary listings are customarily quoted PER MONTH. Multiply monthly figures by {} (the country pays {} salary installments per year) before reporting annual USD.",
                profile.pay_periods_per_year, profile.pay_periods_per_year
            )
            .ok();
        }
        QuotePeriod::Annual => {
            writeln!(p, "- Salary listings are customarily quoted per year.").ok();
            if profile.pay_periods_per_year > 12 {
                writeln!(
                    p,
                    "- Note: {} installments per year; a quoted monthly wage annualizes with that factor.",
                    profile.pay_periods_per_year
                )
                .ok();
            }
        }
    }
    if pay_type == PayType::Hourly {
        writeln!(p, "- Convert annual figures to hourly using 2080 working hours per year.").ok();
    }
    p.push('\n');
}

fn push_cheat_sheet(p: &mut String) {
    writeln!(p, "Currency conversion cheat sheet (to USD):").ok();
    for (code, rate) in FX_CHEAT_SHEET {
        writeln!(p, "- 1 {} = {} USD", code, rate).ok();
    }
    p.push('\n');
}

fn push_candidates(p: &mut String, candidates: &[CandidateSource]) {
    writeln!(
        p,
        "Candidate sources (some may be irrelevant; rely only on those that truly support the range):"
    )
    .ok();
    if candidates.is_empty() {
        writeln!(p, "- (no links found)").ok();
    }
    for c in candidates {
        writeln!(p, "- {}", c.url).ok();
        if !c.title.is_empty() {
            writeln!(p, "  title: {}", c.title).ok();
        }
        if !c.snippet.is_empty() {
            writeln!(p, "  snippet: {}", c.snippet).ok();
        }
    }
    p.push('\n');
}

fn push_sanity_anchors(p: &mut String, pay_type: PayType) {
    match pay_type {
        PayType::Hourly => {
            writeln!(
                p,
                "Sanity check: hourly rates almost always fall between 3 and 500 USD. A number like 60000 for an hourly rate is an annual salary misread."
            )
            .ok();
        }
        PayType::Annual => {
            writeln!(
                p,
                "Sanity check: annual salaries almost always fall between 3,000 and 2,000,000 USD. A number like 4,500 for a professional annual salary in a monthly-quoting country is probably a monthly figure left unannualized."
            )
            .ok();
        }
    }
    p.push('\n');
}

fn push_schema(p: &mut String, pay_type: PayType) {
    let echo = match pay_type {
        PayType::Hourly => "HOURLY",
        PayType::Annual => "ANNUAL",
    };
    p.push_str("Output STRICT JSON only (no markdown, no commentary) in this exact shape:\n");
    p.push_str("{\n");
    p.push_str("  \"min_usd\": <number>,\n");
    p.push_str("  \"max_usd\": <number>,\n");
    writeln!(p, "  \"pay_type\": \"{}\",", echo).ok();
    p.push_str("  \"sources\": [\n");
    p.push_str("    {\"url\": \"<one of the candidate URLs above>\", \"range_tag\": \"min\"|\"max\"|\"general\", \"strength\": <0-100>, \"note\": \"<what numeric value was found>\"}\n");
    p.push_str("  ]\n");
    p.push_str("}\n\n");
    p.push_str("Rules:\n");
    p.push_str("- min_usd <= max_usd, both realistic for the role and location.\n");
    p.push_str("- Cite only URLs from the candidate list, and only those you actually relied on.\n");
    p.push_str("- strength expresses how directly the source supports the figure.\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::profile_for;
    use crate::models::GeoRelevance;

    fn query(country: &str) -> JobQuery {
        JobQuery {
            job_title: "Nurse".to_string(),
            experience_hint: None,
            job_description: None,
            country: country.to_string(),
            state: None,
            city: None,
            pay_type: PayType::Annual,
            display_currency: "USD".to_string(),
        }
    }

    fn candidate(url: &str) -> CandidateSource {
        CandidateSource {
            url: url.to_string(),
            title: "Nurse Salary".to_string(),
            snippet: "around $70k".to_string(),
            host: "salary.com".to_string(),
            geo_tag: GeoRelevance::Country,
            reliability_boost: 30,
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let q = query("Brazil");
        let profile = profile_for("Brazil");
        let c = vec![candidate("https://salary.com/nurse")];
        let a = build_prompt(&q, ExperienceLevel::Mid, &profile, &c);
        let b = build_prompt(&q, ExperienceLevel::Mid, &profile, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn test_monthly_country_guidance() {
        let p = build_prompt(
            &query("Brazil"),
            ExperienceLevel::Mid,
            &profile_for("Brazil"),
            &[],
        );
        assert!(p.contains("PER MONTH"));
        assert!(p.contains("13"));
        assert!(p.contains("BRL"));
    }

    #[test]
    fn test_candidates_listed_without_page_content() {
        let p = build_prompt(
            &query("United States"),
            ExperienceLevel::Senior,
            &profile_for("United States"),
            &[candidate("https://salary.com/nurse")],
        );
        assert!(p.contains("https://salary.com/nurse"));
        assert!(p.contains("snippet: around $70k"));
        assert!(p.contains("senior"));
    }

    #[test]
    fn test_schema_and_anchors_present() {
        let p = build_prompt(
            &query("United States"),
            ExperienceLevel::Mid,
            &profile_for("United States"),
            &[],
        );
        assert!(p.contains("STRICT JSON"));
        assert!(p.contains("\"pay_type\": \"ANNUAL\""));
        assert!(p.contains("Sanity check"));
        assert!(p.contains("1 EUR = 1.08 USD"));
    }
}
