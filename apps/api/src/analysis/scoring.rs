//! Evaluation Scorer: combines extracted signals with a requirement profile.
//!
//! Every rule is computed on every call; eligibility is derived afterwards:
//! 1. experience_years >= min_experience_years
//! 2. education tier >= min tier ("no degree" ranks below every tier)
//! 3. mandatory fraction = meets / evaluated (1.0 when not applicable, 0.0 when evaluated but empty)
//! 4. coverage = matched / required
//! 5. matched count
//!
//! Eligible candidates rank by coverage, highest first; ties keep input order.

use std::cmp::Ordering;

use crate::models::screening::{
    CandidateSignals, MandatorySkillStatus, RequirementProfile, SkillStatus, Verdict,
};

pub fn score(signals: &CandidateSignals, profile: &RequirementProfile) -> Verdict {
    let passes_experience = signals.experience_years >= profile.min_experience_years;
    let passes_education = signals.education >= Some(profile.min_education_tier);

    let mandatory_skill_fraction = match &signals.mandatory_skills {
        MandatorySkillStatus::NotApplicable => 1.0,
        MandatorySkillStatus::Evaluated(statuses) if statuses.is_empty() => 0.0,
        MandatorySkillStatus::Evaluated(statuses) => {
            let met = statuses
                .values()
                .filter(|status| **status == SkillStatus::Meets)
                .count();
            met as f64 / statuses.len() as f64
        }
    };

    let matched_skill_count = signals.matched_skills.len();
    // Profiles are validated upstream to carry at least one required skill.
    let skill_coverage_fraction =
        matched_skill_count as f64 / profile.required_skills.len().max(1) as f64;

    Verdict {
        passes_experience,
        passes_education,
        mandatory_skill_fraction,
        skill_coverage_fraction,
        matched_skill_count,
    }
}

/// Keeps eligible candidates, orders them by skill coverage (stable), and truncates to `limit`.
pub fn rank_shortlist<T>(candidates: Vec<(T, Verdict)>, limit: usize) -> Vec<(T, Verdict)> {
    let mut eligible: Vec<(T, Verdict)> = candidates
        .into_iter()
        .filter(|(_, verdict)| verdict.is_shortlist_eligible())
        .collect();

    eligible.sort_by(|(_, a), (_, b)| {
        b.skill_coverage_fraction
            .partial_cmp(&a.skill_coverage_fraction)
            .unwrap_or(Ordering::Equal)
    });
    eligible.truncate(limit);
    eligible
}

/// Human-readable list of the gates a shortlisted candidate has passed.
pub fn describe_criteria(profile: &RequirementProfile) -> Vec<String> {
    let mut criteria = vec![
        format!(
            "{} years of working experience",
            profile.min_experience_years
        ),
        format!("At least a {} degree", profile.min_education_tier),
    ];

    if profile.has_mandatory_skills() {
        let mandatory: Vec<String> = profile
            .mandatory_skill_years
            .iter()
            .map(|(skill, years)| format!("{skill} ({years}+ years)"))
            .collect();
        criteria.push(format!(
            "All mandatory skills ({}) with the required experience level",
            mandatory.join(", ")
        ));
    }

    criteria.push(format!(
        "Possess the highest number of additional relevant skills (out of {} skills)",
        profile.required_skills.len()
    ));
    criteria
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::resume::DegreeTier;

    fn profile(mandatory: &[(&str, u32)]) -> RequirementProfile {
        RequirementProfile {
            min_experience_years: 3,
            min_education_tier: DegreeTier::Bachelor,
            required_skills: vec!["python".to_string(), "sql".to_string()],
            mandatory_skill_years: mandatory
                .iter()
                .map(|(skill, years)| (skill.to_string(), *years))
                .collect(),
        }
    }

    fn signals(years: u32, education: Option<DegreeTier>, skills: &[&str]) -> CandidateSignals {
        CandidateSignals {
            experience_years: years,
            education,
            matched_skills: skills.iter().map(|s| s.to_string()).collect(),
            mandatory_skills: MandatorySkillStatus::NotApplicable,
        }
    }

    #[test]
    fn test_strong_candidate_is_eligible_with_full_coverage() {
        let verdict = score(
            &signals(5, Some(DegreeTier::Master), &["python", "sql"]),
            &profile(&[]),
        );
        assert!(verdict.passes_experience);
        assert!(verdict.passes_education);
        assert_eq!(verdict.mandatory_skill_fraction, 1.0);
        assert_eq!(verdict.skill_coverage_fraction, 1.0);
        assert_eq!(verdict.matched_skill_count, 2);
        assert!(verdict.is_shortlist_eligible());
    }

    #[test]
    fn test_insufficient_experience_never_eligible() {
        let verdict = score(
            &signals(2, Some(DegreeTier::PhD), &["python", "sql"]),
            &profile(&[]),
        );
        assert!(!verdict.passes_experience);
        assert_eq!(verdict.skill_coverage_fraction, 1.0);
        assert!(!verdict.is_shortlist_eligible());
    }

    #[test]
    fn test_experience_threshold_is_inclusive() {
        let verdict = score(&signals(3, Some(DegreeTier::Bachelor), &[]), &profile(&[]));
        assert!(verdict.passes_experience);
        assert!(verdict.passes_education);
    }

    #[test]
    fn test_no_degree_fails_education() {
        let verdict = score(&signals(10, None, &["python"]), &profile(&[]));
        assert!(!verdict.passes_education);
        assert!(!verdict.is_shortlist_eligible());
    }

    #[test]
    fn test_lower_tier_fails_education() {
        let verdict = score(&signals(10, Some(DegreeTier::Diploma), &[]), &profile(&[]));
        assert!(!verdict.passes_education);
    }

    #[test]
    fn test_mandatory_fraction_counts_meets() {
        let mut statuses = BTreeMap::new();
        statuses.insert("python".to_string(), SkillStatus::Meets);
        statuses.insert("sql".to_string(), SkillStatus::DoesNotMeet);
        let mut s = signals(5, Some(DegreeTier::Master), &["python", "sql"]);
        s.mandatory_skills = MandatorySkillStatus::Evaluated(statuses);

        let verdict = score(&s, &profile(&[("python", 3), ("sql", 2)]));
        assert!((verdict.mandatory_skill_fraction - 0.5).abs() < f64::EPSILON);
        assert!(!verdict.is_shortlist_eligible());
    }

    #[test]
    fn test_evaluated_but_empty_mandatory_map_is_zero() {
        let mut s = signals(5, Some(DegreeTier::Master), &["python"]);
        s.mandatory_skills = MandatorySkillStatus::Evaluated(BTreeMap::new());
        let verdict = score(&s, &profile(&[("python", 3)]));
        assert_eq!(verdict.mandatory_skill_fraction, 0.0);
        assert!(!verdict.is_shortlist_eligible());
    }

    #[test]
    fn test_rank_orders_by_coverage_and_drops_ineligible() {
        let p = profile(&[]);
        let candidates = vec![
            ("half", score(&signals(5, Some(DegreeTier::Master), &["python"]), &p)),
            ("junior", score(&signals(1, Some(DegreeTier::Master), &["python", "sql"]), &p)),
            ("full", score(&signals(5, Some(DegreeTier::Master), &["python", "sql"]), &p)),
        ];

        let ranked = rank_shortlist(candidates, 3);
        let names: Vec<&str> = ranked.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["full", "half"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order_and_truncate() {
        let p = profile(&[]);
        let verdict = score(&signals(5, Some(DegreeTier::Master), &["python"]), &p);
        let candidates = vec![
            ("a", verdict.clone()),
            ("b", verdict.clone()),
            ("c", verdict.clone()),
            ("d", verdict),
        ];

        let ranked = rank_shortlist(candidates, 3);
        let names: Vec<&str> = ranked.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_criteria_mentions_mandatory_skills_only_when_present() {
        let without = describe_criteria(&profile(&[]));
        assert_eq!(without.len(), 3);
        assert!(without[1].contains("Bachelor"));
        assert!(without[2].contains("out of 2 skills"));

        let with = describe_criteria(&profile(&[("python", 3)]));
        assert_eq!(with.len(), 4);
        assert!(with[2].contains("python (3+ years)"));
    }
}
