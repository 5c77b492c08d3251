use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seniority tier derived from (clamped) years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
}

impl ExperienceLevel {
    pub fn from_years(years: f64) -> Self {
        if years <= 2.0 {
            ExperienceLevel::Entry
        } else if years <= 7.0 {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Senior
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// One validated candidate. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Uuid,
    pub candidate_name: String,
    pub contact_info: ContactInfo,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub education: String,
    pub certifications: Vec<String>,
    pub notable_companies: Vec<String>,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_score: f64,
    pub recommendation: String,
    pub is_relevant: bool,
    pub issues_detected: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub interview_questions: Vec<String>,
    pub salary_range: String,
    pub hire_probability: f64,
    pub experience_level: ExperienceLevel,
    pub skill_diversity: f64,
    pub company_prestige: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_boundaries() {
        assert_eq!(ExperienceLevel::from_years(0.0), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(2.0), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(2.5), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(7.0), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(7.1), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(50.0), ExperienceLevel::Senior);
    }

    #[test]
    fn test_experience_level_wire_names() {
        assert_eq!(
            serde_json::to_value(ExperienceLevel::Entry).unwrap(),
            "Entry Level"
        );
        assert_eq!(
            serde_json::to_value(ExperienceLevel::Senior).unwrap(),
            "Senior Level"
        );
    }
}
