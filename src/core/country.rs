use crate::models::{CountryProfile, QuotePeriod};

/// Hosts whose compensation data we never trust: social, video, forum
/// and wiki sites surface in salary searches constantly but carry
/// anecdotes, not listings.
const BLOCKED_HOSTS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "youtube.com",
    "reddit.com",
    "quora.com",
    "wikipedia.org",
    "pinterest.com",
    "medium.com",
];

/// Known salary-data aggregators. A match earns the reliability boost
/// regardless of country.
const AGGREGATOR_HOSTS: &[&str] = &[
    "glassdoor.com",
    "salary.com",
    "payscale.com",
    "levels.fyi",
    "indeed.com",
    "ziprecruiter.com",
    "talent.com",
    "salaryexpert.com",
];

/// Fixed bonus for a curated aggregator or local job-board host.
pub const RELIABILITY_BOOST: u8 = 30;

static PROFILES: &[CountryProfile] = &[
    CountryProfile {
        name: "United States",
        aliases: &["USA", "US", "United States of America", "America"],
        local_name: None,
        currency: "USD",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["salary.com", "levels.fyi", "glassdoor.com"],
    },
    CountryProfile {
        name: "United Kingdom",
        aliases: &["UK", "Great Britain", "England", "Britain"],
        local_name: None,
        currency: "GBP",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["glassdoor.co.uk", "reed.co.uk", "totaljobs.com"],
    },
    CountryProfile {
        name: "Germany",
        aliases: &["Deutschland", "DE"],
        local_name: Some("Deutschland"),
        currency: "EUR",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["gehalt.de", "stepstone.de", "glassdoor.de", "kununu.com"],
    },
    CountryProfile {
        name: "France",
        aliases: &["FR"],
        local_name: Some("France"),
        currency: "EUR",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["glassdoor.fr", "apec.fr", "hellowork.com"],
    },
    CountryProfile {
        name: "Spain",
        aliases: &["España", "ES"],
        local_name: Some("España"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 14,
        local_hosts: &["infojobs.net", "glassdoor.es"],
    },
    CountryProfile {
        name: "Italy",
        aliases: &["Italia", "IT"],
        local_name: Some("Italia"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 13,
        local_hosts: &["glassdoor.it", "indeed.it"],
    },
    CountryProfile {
        name: "Netherlands",
        aliases: &["Holland", "NL", "Nederland"],
        local_name: Some("Nederland"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 12,
        local_hosts: &["glassdoor.nl", "intermediair.nl"],
    },
    CountryProfile {
        name: "Switzerland",
        aliases: &["Schweiz", "Suisse", "CH"],
        local_name: Some("Schweiz"),
        currency: "CHF",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 13,
        local_hosts: &["jobs.ch", "lohncomputer.ch"],
    },
    CountryProfile {
        name: "Austria",
        aliases: &["Österreich", "AT"],
        local_name: Some("Österreich"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 14,
        local_hosts: &["karriere.at", "gehalt.at"],
    },
    CountryProfile {
        name: "Poland",
        aliases: &["Polska", "PL"],
        local_name: Some("Polska"),
        currency: "PLN",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 12,
        local_hosts: &["wynagrodzenia.pl", "pracuj.pl", "nofluffjobs.com"],
    },
    CountryProfile {
        name: "Portugal",
        aliases: &["PT"],
        local_name: Some("Portugal"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 14,
        local_hosts: &["net-empregos.com", "glassdoor.pt"],
    },
    CountryProfile {
        name: "Greece",
        aliases: &["Hellas", "GR"],
        local_name: Some("Ελλάδα"),
        currency: "EUR",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 14,
        local_hosts: &["kariera.gr", "skywalker.gr"],
    },
    CountryProfile {
        name: "Brazil",
        aliases: &["Brasil", "BR"],
        local_name: Some("Brasil"),
        currency: "BRL",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 13,
        local_hosts: &["vagas.com.br", "catho.com.br", "glassdoor.com.br"],
    },
    CountryProfile {
        name: "Mexico",
        aliases: &["México", "MX"],
        local_name: Some("México"),
        currency: "MXN",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 13,
        local_hosts: &["occ.com.mx", "computrabajo.com.mx"],
    },
    CountryProfile {
        name: "Argentina",
        aliases: &["AR"],
        local_name: Some("Argentina"),
        currency: "ARS",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 13,
        local_hosts: &["bumeran.com.ar", "zonajobs.com.ar"],
    },
    CountryProfile {
        name: "India",
        aliases: &["IN", "Bharat"],
        local_name: None,
        currency: "INR",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["naukri.com", "ambitionbox.com", "glassdoor.co.in"],
    },
    CountryProfile {
        name: "Japan",
        aliases: &["JP", "Nippon"],
        local_name: Some("日本"),
        currency: "JPY",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["doda.jp", "openwork.jp", "japan-dev.com"],
    },
    CountryProfile {
        name: "China",
        aliases: &["CN", "PRC", "People's Republic of China"],
        local_name: Some("中国"),
        currency: "CNY",
        quote_period: QuotePeriod::Monthly,
        pay_periods_per_year: 13,
        local_hosts: &["zhaopin.com", "liepin.com"],
    },
    CountryProfile {
        name: "Australia",
        aliases: &["AU"],
        local_name: None,
        currency: "AUD",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["seek.com.au", "glassdoor.com.au"],
    },
    CountryProfile {
        name: "Canada",
        aliases: &["CA"],
        local_name: None,
        currency: "CAD",
        quote_period: QuotePeriod::Annual,
        pay_periods_per_year: 12,
        local_hosts: &["glassdoor.ca", "jobbank.gc.ca"],
    },
];

/// Look up a country profile by canonical name, falling back to alias
/// and local-name matching. Unknown countries get the default profile.
pub fn profile_for(country: &str) -> CountryProfile {
    let needle = country.trim();
    PROFILES
        .iter()
        .find(|p| {
            p.name.eq_ignore_ascii_case(needle)
                || p.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
                || p.local_name
                    .map(|l| l.eq_ignore_ascii_case(needle))
                    .unwrap_or(false)
        })
        .cloned()
        .unwrap_or_default()
}

/// True when the host (or a parent domain of it) is on the block-list.
pub fn is_blocked_host(host: &str) -> bool {
    let host = host.trim_start_matches("www.");
    BLOCKED_HOSTS
        .iter()
        .any(|b| host == *b || host.ends_with(&format!(".{}", b)))
}

/// Reliability boost for a host: curated aggregators and the country's
/// local job boards earn the fixed bonus, everything else gets zero.
pub fn reliability_boost(host: &str, profile: &CountryProfile) -> u8 {
    let host = host.trim_start_matches("www.");
    let known = AGGREGATOR_HOSTS
        .iter()
        .chain(profile.local_hosts.iter())
        .any(|b| host == *b || host.ends_with(&format!(".{}", b)));
    if known {
        RELIABILITY_BOOST
    } else {
        0
    }
}

/// English-majority countries skip the search API locale hint.
pub fn is_english_majority(profile: &CountryProfile) -> bool {
    matches!(
        profile.name,
        "United States" | "United Kingdom" | "Australia" | "Canada" | "India" | "Unknown"
    )
}

/// Lowercase two-letter country code to pass as the search API's
/// geography hint, for countries where localized results matter.
pub fn locale_hint(profile: &CountryProfile) -> Option<String> {
    if is_english_majority(profile) {
        return None;
    }
    profile
        .aliases
        .iter()
        .find(|a| a.len() == 2 && a.chars().all(|c| c.is_ascii_uppercase()))
        .map(|a| a.to_lowercase())
}
