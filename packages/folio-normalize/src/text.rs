//! Lexical helpers shared by the section builders: whitespace cleanup, the
//! first-person grammar guard, slugs, and the project-name prefix strip.

use std::sync::LazyLock;

use regex::Regex;

static CRLF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r").expect("static regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("static regex"));
static NON_ALNUM: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

static LEADING_I: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^i\s+").expect("static regex"));
static LEADING_I_AM: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^i\s+am\s+").expect("static regex"));
static LEADING_I_AS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^i\s+as\s+").expect("static regex"));
static LEADING_I_WHEN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^i\s+when").expect("static regex"));
static LEADING_AS_A: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^as a").expect("static regex"));
static LEADING_WHEN_I: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^when i").expect("static regex"));

/// Collapses CR/LF variants to `\n`, runs of blank lines to a single blank
/// line, and trims surrounding whitespace.
pub fn clean_text(text: &str) -> String {
	let unified = CRLF.replace_all(text, "\n");
	let collapsed = BLANK_RUNS.replace_all(&unified, "\n\n");

	collapsed.trim().to_string()
}

/// The grammar guard: an ordered chain of anchored fixups. Later fixups see
/// the output of earlier ones, so the order is load-bearing.
pub fn to_first_person(text: &str) -> String {
	let cleaned = clean_text(text);
	let staged = LEADING_I.replace(&cleaned, "I ");
	let staged = LEADING_I_AM.replace(&staged, "I am ");
	let staged = LEADING_I_AS.replace(&staged, "As a ");
	let staged = LEADING_I_WHEN.replace(&staged, "When");
	let staged = LEADING_AS_A.replace(&staged, "As a");
	let staged = LEADING_WHEN_I.replace(&staged, "When I");

	capitalize_first(&staged)
}

/// Lowercase, trim, collapse non-alphanumeric runs to single hyphens, strip
/// edge hyphens, and cap at 80 characters.
pub fn slugify(text: &str) -> String {
	let lowered = text.to_lowercase();
	let hyphenated = NON_ALNUM.replace_all(lowered.trim(), "-");

	hyphenated.trim_matches('-').chars().take(80).collect()
}

/// Removes a leading "`<name> is `" (case-insensitive, any whitespace) from a
/// project description so it can be spliced after "I built `<name>`, ".
pub fn strip_name_is_prefix<'a>(name: &str, description: &'a str) -> &'a str {
	let Some(head) = description.get(..name.len()) else {
		return description;
	};

	if !head.eq_ignore_ascii_case(name) {
		return description;
	}

	let after_name = &description[name.len()..];
	let at_is = after_name.trim_start();

	if at_is.len() == after_name.len() {
		return description;
	}

	let Some(is_word) = at_is.get(..2) else {
		return description;
	};

	if !is_word.eq_ignore_ascii_case("is") {
		return description;
	}

	let after_is = &at_is[2..];
	let rest = after_is.trim_start();

	if rest.len() == after_is.len() { description } else { rest }
}

fn capitalize_first(text: &str) -> String {
	let mut chars = text.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
		None => String::new(),
	}
}
