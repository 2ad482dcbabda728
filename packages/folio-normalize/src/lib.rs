//! Turns a raw profile document into an ordered list of self-contained
//! first-person chunks. Traversal order is fixed so repeated runs over the
//! same document produce byte-identical output.

pub mod text;

use serde_json::{Map, Value};
use time::OffsetDateTime;

use folio_domain::{
	Achievements, CareerPreferences, Chunk, ChunkType, Education, Experience, Interest,
	NormalizedChunks, Profile, Project,
};

use crate::text::{slugify, strip_name_is_prefix, to_first_person};

/// Normalizes the whole profile. Sections that are absent produce no chunks;
/// the identity and contact chunks are always emitted.
pub fn normalize_profile(profile: &Profile, generated_at: OffsetDateTime) -> NormalizedChunks {
	let name = profile
		.personal_info
		.as_ref()
		.and_then(|p| p.name.as_deref())
		.unwrap_or("User");
	let mut chunks = Vec::new();

	push_meta(&mut chunks, profile, name);
	push_audit(&mut chunks, profile, name);
	push_identity(&mut chunks, profile, name);
	push_contact(&mut chunks, profile, name);
	push_social(&mut chunks, profile, name);
	push_bio(&mut chunks, profile, name);
	push_career(&mut chunks, profile.career_preferences.as_ref(), name);
	push_interests(&mut chunks, profile.interests.as_deref());
	push_education(&mut chunks, profile.education.as_deref());
	push_achievements(&mut chunks, profile.achievements.as_ref());
	push_experience(&mut chunks, profile.experience.as_deref());
	push_projects(&mut chunks, profile.projects.as_deref());
	push_skills(&mut chunks, profile);

	NormalizedChunks { generated_at, count: chunks.len(), chunks }
}

/// Stable chunk id: section prefix plus the slug of the title. Untitled
/// chunks slug the literal "item".
pub fn chunk_id(chunk_type: ChunkType, title: &str) -> String {
	let base = if title.is_empty() { "item" } else { title };

	format!("{}-{}", chunk_type.as_str(), slugify(base))
}

struct Draft {
	chunk_type: ChunkType,
	source: &'static str,
	title: String,
	text: String,
	tags: Vec<String>,
	meta: Map<String, Value>,
	should_embed: bool,
}
impl Draft {
	fn new(chunk_type: ChunkType, source: &'static str, title: String, text: String) -> Self {
		Self {
			chunk_type,
			source,
			title,
			text,
			tags: Vec::new(),
			meta: Map::new(),
			should_embed: true,
		}
	}

	fn tags(mut self, tags: &[&str]) -> Self {
		self.tags = tags.iter().map(|t| t.to_string()).collect();

		self
	}

	fn push_tag(mut self, tag: String) -> Self {
		self.tags.push(tag);

		self
	}

	fn meta(mut self, meta: Map<String, Value>) -> Self {
		self.meta = meta;

		self
	}

	fn display_only(mut self) -> Self {
		self.should_embed = false;

		self
	}
}

fn push(chunks: &mut Vec<Chunk>, draft: Draft) {
	chunks.push(Chunk {
		id: chunk_id(draft.chunk_type, &draft.title),
		chunk_type: draft.chunk_type,
		source: draft.source.to_string(),
		title: draft.title,
		tags: draft.tags,
		text: to_first_person(&draft.text),
		meta: draft.meta,
		should_embed: draft.should_embed,
	});
}

fn opt(value: Option<&str>) -> &str {
	value.unwrap_or("")
}

fn value_text(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
		None => String::new(),
	}
}

fn join(list: Option<&[String]>, separator: &str) -> String {
	list.unwrap_or_default().join(separator)
}

fn meta_insert(meta: &mut Map<String, Value>, key: &str, value: Option<&str>) {
	if let Some(value) = value {
		meta.insert(key.to_string(), Value::from(value));
	}
}

fn meta_insert_list(meta: &mut Map<String, Value>, key: &str, list: Option<&[String]>) {
	if let Some(list) = list {
		meta.insert(key.to_string(), Value::from(list.to_vec()));
	}
}

fn push_meta(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let Some(meta) = profile.meta.as_ref() else {
		return;
	};
	let owner = meta.owner.as_deref().unwrap_or(name);
	let version = opt(meta.version.as_deref());

	push(
		chunks,
		Draft::new(
			ChunkType::Meta,
			"meta",
			format!("Profile metadata for {name}"),
			format!("This profile belongs to {owner} and is currently at version {version}."),
		)
		.tags(&["meta"])
		.display_only(),
	);
}

fn push_audit(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let owner = profile.meta.as_ref().and_then(|m| m.owner.as_deref());
	let saved_at = profile.saved_at.as_deref();

	if owner.is_none() && saved_at.is_none() {
		return;
	}

	let mut meta = Map::new();

	meta_insert(&mut meta, "owner", owner);
	meta_insert(&mut meta, "savedAt", saved_at);
	push(
		chunks,
		Draft::new(
			ChunkType::MetaAudit,
			"meta",
			format!("{name} — Profile Audit"),
			format!(
				"This profile is owned by {} and was last saved at {}.",
				owner.unwrap_or(name),
				opt(saved_at)
			),
		)
		.tags(&["meta", "audit"])
		.meta(meta)
		.display_only(),
	);
}

fn push_identity(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let info = profile.personal_info.clone().unwrap_or_default();
	let based_in = info.current_location.as_deref().or(info.location.as_deref());

	push(
		chunks,
		Draft::new(
			ChunkType::Identity,
			"personalInfo",
			format!("{name} — Overview"),
			format!(
				"I am {name}, a {}. I am a B.Tech Computer Science student at {} and currently \
				 based in {}.",
				opt(info.title.as_deref()),
				opt(info.university.as_deref()),
				opt(based_in)
			),
		)
		.tags(&["identity"]),
	);
}

fn push_contact(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let info = profile.personal_info.clone().unwrap_or_default();
	let prefs = profile.career_preferences.clone().unwrap_or_default();
	let work_modes = prefs.work_mode_preferences.as_deref();
	let mut meta = Map::new();

	meta_insert(&mut meta, "email", info.email.as_deref());
	meta_insert(&mut meta, "phone", info.phone.as_deref());
	meta_insert(&mut meta, "availability", prefs.availability.as_deref());
	meta_insert_list(&mut meta, "workModes", work_modes);
	meta_insert(&mut meta, "timezone", info.timezone.as_deref());
	meta_insert(&mut meta, "location", info.location.as_deref());
	meta_insert(&mut meta, "currentLocation", info.current_location.as_deref());
	push(
		chunks,
		Draft::new(
			ChunkType::Contact,
			"personalInfo",
			format!("{name} — Contact & Availability"),
			format!(
				"I can be contacted via email at {} and phone at {}. I am currently {} and \
				 prefer {} work modes. I operate in the {} timezone.",
				opt(info.email.as_deref()),
				opt(info.phone.as_deref()),
				opt(prefs.availability.as_deref()),
				join(work_modes, ", "),
				opt(info.timezone.as_deref())
			),
		)
		.tags(&["contact", "availability"])
		.meta(meta),
	);
}

fn push_social(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let Some(links) = profile.social_links.as_ref() else {
		return;
	};

	push(
		chunks,
		Draft::new(
			ChunkType::Social,
			"socialLinks",
			format!("{name} — Social & Coding Profiles"),
			"I maintain active profiles across platforms such as GitHub, LinkedIn, LeetCode, \
			 CodeChef, Codeforces, GeeksForGeeks, Twitter, and Instagram."
				.to_string(),
		)
		.tags(&["social"])
		.meta(links.clone())
		.display_only(),
	);
}

fn push_bio(chunks: &mut Vec<Chunk>, profile: &Profile, name: &str) {
	let Some(bio) = profile.personal_info.as_ref().and_then(|p| p.bio.as_ref()) else {
		return;
	};

	for (kind, text) in bio {
		push(
			chunks,
			Draft::new(
				ChunkType::Bio,
				"personalInfo.bio",
				format!("{name} — Bio ({kind})"),
				text.clone(),
			)
			.tags(&["bio"])
			.push_tag(kind.clone()),
		);
	}
}

fn push_career(chunks: &mut Vec<Chunk>, prefs: Option<&CareerPreferences>, name: &str) {
	let Some(prefs) = prefs else {
		return;
	};

	push(
		chunks,
		Draft::new(
			ChunkType::CareerPreference,
			"careerPreferences",
			format!("{name} — Career Preferences"),
			format!(
				"I am seeking {} roles such as {} in domains including {}.",
				join(prefs.job_types.as_deref(), " and "),
				join(prefs.target_roles.as_deref(), ", "),
				join(prefs.preferred_domains.as_deref(), ", ")
			),
		)
		.tags(&["career"]),
	);
}

fn push_interests(chunks: &mut Vec<Chunk>, interests: Option<&[Interest]>) {
	for interest in interests.unwrap_or_default() {
		push(
			chunks,
			Draft::new(
				ChunkType::Interest,
				"interests",
				opt(interest.name.as_deref()).to_string(),
				format!(
					"When I'm not coding, I enjoy {}.",
					opt(interest.description.as_deref())
				),
			)
			.tags(&["interest"]),
		);
	}
}

fn push_education(chunks: &mut Vec<Chunk>, entries: Option<&[Education]>) {
	for entry in entries.unwrap_or_default() {
		let degree = opt(entry.degree.as_deref());
		let institution = opt(entry.institution.as_deref());
		let activities = match entry.activities.as_deref() {
			Some(activities) if !activities.is_empty() => activities.join(", "),
			_ => "academic coursework".to_string(),
		};
		let cgpa = entry.cgpa.as_ref().or(entry.percentage.as_ref());
		let mut meta = Map::new();

		meta_insert(&mut meta, "location", entry.location.as_deref());
		meta_insert(&mut meta, "status", entry.status.as_deref());

		if let Some(cgpa) = cgpa {
			meta.insert("cgpa".to_string(), cgpa.clone());
		}

		push(
			chunks,
			Draft::new(
				ChunkType::Education,
				"education",
				format!("{degree} — {institution}"),
				format!(
					"{degree} at {institution}. Duration: {}. Courses include {}. Activities \
					 include {activities}.",
					opt(entry.duration.as_deref()),
					join(entry.courses.as_deref(), ", ")
				),
			)
			.tags(&["education"])
			.meta(meta),
		);
	}
}

fn push_achievements(chunks: &mut Vec<Chunk>, achievements: Option<&Achievements>) {
	let Some(achievements) = achievements else {
		return;
	};

	for award in achievements.awards.as_deref().unwrap_or_default() {
		push(
			chunks,
			Draft::new(
				ChunkType::Achievement,
				"achievements.awards",
				opt(award.title.as_deref()).to_string(),
				format!(
					"I earned the {} in {}. {}",
					opt(award.title.as_deref()),
					value_text(award.year.as_ref()),
					opt(award.description.as_deref())
				),
			)
			.tags(&["achievement"]),
		);
	}

	let cp = achievements.competitive_programming.as_ref();

	if let Some(stats) = cp.and_then(|cp| cp.leetcode.as_ref()) {
		push(
			chunks,
			Draft::new(
				ChunkType::Stat,
				"achievements.competitiveProgramming.leetcode",
				"LeetCode Performance".to_string(),
				format!(
					"I have a LeetCode rating of {} with a maximum rating of {}. I rank in the \
					 top {} globally with a global rank of {} and have solved {} problems.",
					value_text(stats.rating.as_ref()),
					value_text(stats.max_rating.as_ref()),
					value_text(stats.percentile.as_ref()),
					value_text(stats.global_ranking.as_ref()),
					value_text(stats.problems_solved.as_ref())
				),
			)
			.tags(&["leetcode", "competitive-programming"]),
		);
	}

	if let Some(stats) = cp.and_then(|cp| cp.codechef.as_ref()) {
		push(
			chunks,
			Draft::new(
				ChunkType::Stat,
				"achievements.competitiveProgramming.codechef",
				"CodeChef Performance".to_string(),
				format!(
					"I am a {} rated CodeChef programmer competing in {}. My rating is {} with \
					 a maximum of {}.",
					value_text(stats.stars.as_ref()),
					value_text(stats.division.as_ref()),
					value_text(stats.rating.as_ref()),
					value_text(stats.max_rating.as_ref())
				),
			)
			.tags(&["codechef", "competitive-programming"]),
		);
	}

	if let Some(stats) = cp.and_then(|cp| cp.codeforces.as_ref()) {
		push(
			chunks,
			Draft::new(
				ChunkType::Stat,
				"achievements.competitiveProgramming.codeforces",
				"Codeforces Performance".to_string(),
				format!(
					"I have a Codeforces rating of {} with a maximum of {}. My rank is {} and I \
					 have solved {} problems.",
					value_text(stats.rating.as_ref()),
					value_text(stats.max_rating.as_ref()),
					value_text(stats.rank.as_ref()),
					value_text(stats.problems_solved.as_ref())
				),
			)
			.tags(&["codeforces", "competitive-programming"]),
		);
	}

	if let Some(stats) = cp.and_then(|cp| cp.geeksforgeeks.as_ref()) {
		push(
			chunks,
			Draft::new(
				ChunkType::Stat,
				"achievements.competitiveProgramming.geeksforgeeks",
				"GeeksForGeeks Performance".to_string(),
				format!(
					"I have solved {} problems on GeeksForGeeks and hold a global rank of {}.",
					value_text(stats.problems_solved.as_ref()),
					value_text(stats.rank.as_ref())
				),
			)
			.tags(&["geeksforgeeks", "competitive-programming"]),
		);
	}

	if let Some(stats) = achievements.overall_stats.as_ref() {
		push(
			chunks,
			Draft::new(
				ChunkType::Stat,
				"achievements.overallStats",
				"Overall Coding Statistics".to_string(),
				format!(
					"I have over {} years of coding experience, made more than {} commits, and \
					 solved over {} algorithmic problems.",
					value_text(stats.years_experience.as_ref()),
					value_text(stats.commits.as_ref()),
					value_text(stats.total_problems_solved.as_ref())
				),
			)
			.tags(&["stats"]),
		);
	}
}

fn push_experience(chunks: &mut Vec<Chunk>, entries: Option<&[Experience]>) {
	for entry in entries.unwrap_or_default() {
		let role = opt(entry.role.as_deref());
		let organization = opt(entry.organization.as_deref());
		let mut meta = Map::new();

		meta_insert_list(&mut meta, "skills", entry.skills.as_deref());
		meta_insert(&mut meta, "location", entry.location.as_deref());
		push(
			chunks,
			Draft::new(
				ChunkType::Experience,
				"experience",
				format!("{role} at {organization}"),
				format!(
					"As a {role} at {organization}, I {}",
					opt(entry.description.as_deref())
				),
			)
			.tags(&["experience"])
			.meta(meta),
		);
	}
}

fn push_projects(chunks: &mut Vec<Chunk>, projects: Option<&[Project]>) {
	for project in projects.unwrap_or_default() {
		let name = opt(project.name.as_deref());
		// Avoid "I built ChatApp, ChatApp is a ..." when the description
		// restates the project name.
		let description = strip_name_is_prefix(name, opt(project.description.as_deref()));
		let mut draft = Draft::new(
			ChunkType::Project,
			"projects",
			format!("{name} — {}", opt(project.status.as_deref())),
			format!(
				"I built {name}, {description}. I used {} to implement features such as {}.",
				join(project.tech_stack.as_deref(), ", "),
				join(project.features.as_deref(), ", ")
			),
		)
		.tags(&["project"]);

		if let Some(category) = project.category.clone() {
			draft = draft.push_tag(category);
		}

		if let Some(links) = project.links.clone() {
			draft = draft.meta(links);
		}

		push(chunks, draft);
	}
}

fn push_skills(chunks: &mut Vec<Chunk>, profile: &Profile) {
	let Some(skills) = profile.skills.as_ref() else {
		return;
	};

	for (category, entries) in skills {
		push(
			chunks,
			Draft::new(
				ChunkType::Skill,
				"skills",
				format!("Skills — {category}"),
				format!("I am proficient in {}.", entries.join(", ")),
			)
			.tags(&["skills"])
			.push_tag(category.clone()),
		);
	}
}
