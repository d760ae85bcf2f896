use crate::models::{CountryProfile, JobQuery};

/// Aggregator used for the site-restricted query variant.
const SITE_RESTRICTED_HOST: &str = "glassdoor.com";

/// Cap on skill tokens mined from a job description.
const MAX_SKILLS: usize = 6;

/// Common technical / business / design / medical terms worth carrying
/// into a search query. Lowercase; matched against description words.
const SKILL_VOCABULARY: &[&str] = &[
    // engineering
    "rust", "python", "java", "javascript", "typescript", "golang", "kotlin",
    "swift", "react", "angular", "vue", "kubernetes", "docker", "terraform",
    "linux", "postgresql", "mysql", "mongodb", "redis", "kafka", "spark",
    "hadoop", "tensorflow", "pytorch", "devops", "backend", "frontend",
    "fullstack", "microservices", "embedded", "android", "ios", "salesforce",
    // business
    "accounting", "payroll", "auditing", "forecasting", "logistics",
    "procurement", "compliance", "underwriting", "actuarial", "bookkeeping",
    "marketing", "seo", "crm", "sales", "negotiation",
    // design
    "figma", "photoshop", "illustrator", "typography", "wireframing",
    "prototyping", "autocad", "revit", "sketchup",
    // medical
    "phlebotomy", "radiology", "oncology", "pediatrics", "anesthesia",
    "nursing", "pharmacology", "surgical", "icu", "triage",
];

/// Compound tokens that word splitting would mangle.
const COMPOUND_TOKENS: &[&str] = &[
    "node.js", "vue.js", "react.js", "next.js", ".net", "c++", "c#",
    "objective-c", "scikit-learn", "ci/cd",
];

/// Build the diversified query set for one estimation run (3-6 queries).
/// Deduplication happens later by result URL, not here.
pub fn build_queries(query: &JobQuery, profile: &CountryProfile) -> Vec<String> {
    let location = query.location_label();
    let pay_keyword = query.pay_type.keyword();
    let hint = query.experience_hint.as_deref().unwrap_or("");

    let mut queries = Vec::with_capacity(6);

    // Baseline: title + hint + full location + pay-period keyword.
    queries.push(
        format!("{} {} salary range {} {}", query.job_title, hint, location, pay_keyword)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    );

    // Description-hinted variant, quoted around the narrowest location
    // part to tighten locality.
    if let Some(desc) = query.job_description.as_deref() {
        let skills = mine_skills(desc);
        if !skills.is_empty() {
            let narrow = query
                .city
                .as_deref()
                .or(query.state.as_deref())
                .unwrap_or(&query.country);
            queries.push(format!(
                "{} {} salary \"{}\" {}",
                query.job_title,
                skills.join(" "),
                narrow,
                profile.currency
            ));
        }
    }

    // Site-restricted aggregator variant.
    queries.push(format!(
        "site:{} {} salary {}",
        SITE_RESTRICTED_HOST, query.job_title, location
    ));

    // Localized variants: local-language country name and/or the top
    // locally authoritative host.
    if let Some(local_name) = profile.local_name {
        if !local_name.eq_ignore_ascii_case(&query.country) {
            queries.push(format!(
                "{} {} {} {}",
                query.job_title, pay_keyword, local_name, profile.currency
            ));
        }
    }
    if let Some(top_host) = profile.local_hosts.first() {
        queries.push(format!(
            "site:{} {} {}",
            top_host, query.job_title, query.pay_type.keyword()
        ));
    }

    queries
}

/// Mine up to [`MAX_SKILLS`] skill/requirement tokens from a job
/// description: vocabulary matches, compound tokens ("Node.js"), and
/// capitalized acronyms (AWS, SQL).
pub fn mine_skills(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut skills: Vec<String> = Vec::new();

    let mut push = |token: String| {
        if skills.len() < MAX_SKILLS && !skills.iter().any(|s| s.eq_ignore_ascii_case(&token)) {
            skills.push(token);
        }
    };

    for compound in COMPOUND_TOKENS {
        if lower.contains(compound) {
            push((*compound).to_string());
        }
    }

    let words: Vec<&str> = description
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
        .collect();

    for word in &words {
        let lower_word = word.to_lowercase();
        if SKILL_VOCABULARY.contains(&lower_word.as_str()) {
            push(lower_word);
        }
    }

    // Capitalized acronyms: 2-6 uppercase letters, not a common stop word.
    for word in &words {
        if word.len() >= 2
            && word.len() <= 6
            && word.chars().all(|c| c.is_ascii_uppercase())
            && !matches!(*word, "I" | "A" | "THE" | "AND" | "OR" | "NOT" | "USA" | "UK")
        {
            push(word.to_string());
        }
    }

    skills
}
