use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The raw profile document as submitted by the owner. Every section is
/// optional; an absent section simply produces no chunks. Maps are ordered
/// so normalization walks them deterministically.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub meta: Option<ProfileMeta>,
	#[serde(rename = "_savedAt")]
	pub saved_at: Option<String>,
	pub personal_info: Option<PersonalInfo>,
	pub social_links: Option<Map<String, Value>>,
	pub career_preferences: Option<CareerPreferences>,
	pub interests: Option<Vec<Interest>>,
	pub education: Option<Vec<Education>>,
	pub achievements: Option<Achievements>,
	pub experience: Option<Vec<Experience>>,
	pub projects: Option<Vec<Project>>,
	pub skills: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMeta {
	pub version: Option<String>,
	pub owner: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
	pub name: Option<String>,
	pub title: Option<String>,
	pub university: Option<String>,
	pub location: Option<String>,
	pub current_location: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub timezone: Option<String>,
	pub bio: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPreferences {
	pub availability: Option<String>,
	pub work_mode_preferences: Option<Vec<String>>,
	pub job_types: Option<Vec<String>>,
	pub target_roles: Option<Vec<String>>,
	pub preferred_domains: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
	pub name: Option<String>,
	pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
	pub degree: Option<String>,
	pub institution: Option<String>,
	pub duration: Option<String>,
	pub location: Option<String>,
	pub status: Option<String>,
	pub courses: Option<Vec<String>>,
	pub activities: Option<Vec<String>>,
	pub cgpa: Option<Value>,
	pub percentage: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
	pub awards: Option<Vec<Award>>,
	pub competitive_programming: Option<CompetitiveProgramming>,
	pub overall_stats: Option<OverallStats>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
	pub title: Option<String>,
	pub year: Option<Value>,
	pub description: Option<String>,
}

/// Per-platform stats; each platform is skipped individually when absent.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveProgramming {
	pub leetcode: Option<LeetcodeStats>,
	pub codechef: Option<CodechefStats>,
	pub codeforces: Option<CodeforcesStats>,
	pub geeksforgeeks: Option<GeeksforgeeksStats>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeStats {
	pub rating: Option<Value>,
	pub max_rating: Option<Value>,
	pub percentile: Option<Value>,
	pub global_ranking: Option<Value>,
	pub problems_solved: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodechefStats {
	pub stars: Option<Value>,
	pub division: Option<Value>,
	pub rating: Option<Value>,
	pub max_rating: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesStats {
	pub rating: Option<Value>,
	pub max_rating: Option<Value>,
	pub rank: Option<Value>,
	pub problems_solved: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeeksforgeeksStats {
	pub problems_solved: Option<Value>,
	pub rank: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
	pub years_experience: Option<Value>,
	pub commits: Option<Value>,
	pub total_problems_solved: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
	pub role: Option<String>,
	pub organization: Option<String>,
	pub description: Option<String>,
	pub skills: Option<Vec<String>>,
	pub location: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub name: Option<String>,
	pub status: Option<String>,
	pub category: Option<String>,
	pub description: Option<String>,
	pub tech_stack: Option<Vec<String>>,
	pub features: Option<Vec<String>>,
	pub links: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_camel_case_document() {
		let profile: Profile = serde_json::from_value(serde_json::json!({
			"meta": { "version": "1.0.0", "owner": "Asha" },
			"_savedAt": "2025-12-27T10:30:00Z",
			"personalInfo": {
				"name": "Asha",
				"title": "Backend Engineer",
				"currentLocation": "Pune",
			},
			"careerPreferences": {
				"workModePreferences": ["remote", "hybrid"],
			},
			"achievements": {
				"competitiveProgramming": {
					"leetcode": { "maxRating": 1901, "problemsSolved": 540 },
				},
				"overallStats": { "yearsExperience": 4 },
			},
			"skills": { "Languages": ["Rust", "Go"] },
		}))
		.expect("deserialize failed");

		assert_eq!(profile.saved_at.as_deref(), Some("2025-12-27T10:30:00Z"));
		assert_eq!(
			profile.personal_info.as_ref().and_then(|p| p.current_location.as_deref()),
			Some("Pune")
		);

		let leetcode = profile
			.achievements
			.as_ref()
			.and_then(|a| a.competitive_programming.as_ref())
			.and_then(|cp| cp.leetcode.as_ref())
			.expect("leetcode stats missing");

		assert_eq!(leetcode.max_rating, Some(serde_json::json!(1901)));
		assert_eq!(profile.skills.as_ref().and_then(|s| s.get("Languages")).map(Vec::len), Some(2));
	}

	#[test]
	fn unknown_sections_are_ignored() {
		let profile: Profile =
			serde_json::from_value(serde_json::json!({ "unknownSection": { "x": 1 } }))
				.expect("deserialize failed");

		assert!(profile.meta.is_none());
		assert!(profile.personal_info.is_none());
	}
}
