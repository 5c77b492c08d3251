//! Secondary scores computed locally from a candidate's skills and
//! employers, using fixed keyword tables.

use serde::Serialize;

/// Skill categories and the lowercase keywords that put a skill in them.
/// A skill matches a keyword when it contains it as a substring.
pub static SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "programming",
        &[
            "javascript", "python", "java", "c#", "c++", "go", "rust", "php", "ruby", "swift",
            "kotlin",
        ],
    ),
    (
        "frontend",
        &[
            "react", "angular", "vue", "html", "css", "sass", "less", "bootstrap", "tailwind",
        ],
    ),
    (
        "backend",
        &[
            "node", "express", "django", "spring", "flask", "laravel", "rails", "asp.net",
        ],
    ),
    (
        "database",
        &[
            "sql", "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "cassandra",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins"],
    ),
    (
        "mobile",
        &["ios", "android", "react native", "flutter", "xamarin"],
    ),
    (
        "data",
        &[
            "machine learning", "ai", "data science", "analytics", "tableau", "power bi",
        ],
    ),
    (
        "tools",
        &["git", "jira", "confluence", "slack", "figma", "photoshop"],
    ),
];

pub static PRESTIGE_COMPANIES: &[&str] = &[
    "google", "microsoft", "amazon", "apple", "facebook", "meta", "netflix", "tesla", "uber",
    "airbnb", "spotify", "stripe", "salesforce", "oracle", "ibm", "intel", "nvidia", "adobe",
    "twitter", "linkedin", "dropbox", "slack", "zoom", "shopify",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Share of skill categories covered, in [0, 1].
    pub skill_diversity: f64,
    /// Share of employers matching a prestige keyword, in [0, 1].
    pub company_prestige: f64,
}

pub fn compute_derived_metrics(skills: &[String], employers: &[String]) -> DerivedMetrics {
    DerivedMetrics {
        skill_diversity: skill_diversity(skills),
        company_prestige: company_prestige(employers),
    }
}

pub fn skill_diversity(skills: &[String]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let lowered: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let covered = SKILL_CATEGORIES
        .iter()
        .filter(|(_, keywords)| {
            lowered
                .iter()
                .any(|skill| keywords.iter().any(|keyword| skill.contains(keyword)))
        })
        .count();
    (covered as f64 / SKILL_CATEGORIES.len() as f64).min(1.0)
}

pub fn company_prestige(employers: &[String]) -> f64 {
    if employers.is_empty() {
        return 0.0;
    }
    let prestigious = employers
        .iter()
        .filter(|employer| {
            let employer = employer.to_lowercase();
            PRESTIGE_COMPANIES.iter().any(|name| employer.contains(name))
        })
        .count();
    (prestigious as f64 / employers.len() as f64).min(1.0)
}
