//! File-backed storage for the profile document and the normalized chunk
//! snapshot. The latest profile always overwrites the previous one; history
//! is not kept.

use std::{
	fs, io,
	path::{Path, PathBuf},
};

use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use folio_domain::{NormalizedChunks, Profile};

use crate::{Error, Result};

pub const LATEST_PROFILE_FILE: &str = "portfolio.latest.json";
pub const NORMALIZED_FILE: &str = "normalized.json";

pub struct ProfileStore {
	data_dir: PathBuf,
}
impl ProfileStore {
	pub fn new(data_dir: impl Into<PathBuf>) -> Self {
		Self { data_dir: data_dir.into() }
	}

	/// Stamps `_savedAt` on the document and persists it as the latest
	/// profile. Returns the stamp written.
	pub fn save_latest(&self, document: &Value, saved_at: OffsetDateTime) -> Result<String> {
		let Value::Object(fields) = document else {
			return Err(Error::InvalidArgument(
				"Profile document must be a JSON object.".to_string(),
			));
		};
		let stamp =
			saved_at.format(&Rfc3339).map_err(|err| Error::InvalidArgument(err.to_string()))?;
		let mut fields = fields.clone();

		fields.insert("_savedAt".to_string(), Value::String(stamp.clone()));

		fs::create_dir_all(&self.data_dir)?;
		fs::write(self.latest_path(), serde_json::to_vec_pretty(&Value::Object(fields))?)?;

		Ok(stamp)
	}

	pub fn load_latest(&self) -> Result<Profile> {
		let raw = self.read_file(&self.latest_path())?;

		Ok(serde_json::from_slice(&raw)?)
	}

	pub fn load_latest_raw(&self) -> Result<Value> {
		let raw = self.read_file(&self.latest_path())?;

		Ok(serde_json::from_slice(&raw)?)
	}

	pub fn exists(&self) -> bool {
		self.latest_path().is_file()
	}

	/// Returns whether a profile was actually removed.
	pub fn delete_latest(&self) -> Result<bool> {
		match fs::remove_file(self.latest_path()) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}

	pub fn save_normalized(&self, chunks: &NormalizedChunks) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;
		fs::write(self.normalized_path(), serde_json::to_vec_pretty(chunks)?)?;

		Ok(())
	}

	pub fn load_normalized(&self) -> Result<NormalizedChunks> {
		let raw = self.read_file(&self.normalized_path())?;

		Ok(serde_json::from_slice(&raw)?)
	}

	fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
		match fs::read(path) {
			Ok(raw) => Ok(raw),
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				Err(Error::NotFound(format!("{} is missing.", path.display())))
			},
			Err(err) => Err(err.into()),
		}
	}

	fn latest_path(&self) -> PathBuf {
		self.data_dir.join(LATEST_PROFILE_FILE)
	}

	fn normalized_path(&self) -> PathBuf {
		self.data_dir.join(NORMALIZED_FILE)
	}
}

#[cfg(test)]
mod tests {
	use std::{
		env,
		sync::atomic::{AtomicU64, Ordering},
		time::{SystemTime, UNIX_EPOCH},
	};

	use time::macros::datetime;

	use super::*;

	fn temp_data_dir() -> PathBuf {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System time must be valid.")
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let mut path = env::temp_dir();

		path.push(format!("folio_profile_store_{nanos}_{pid}_{ordinal}"));

		path
	}

	#[test]
	fn save_stamps_and_load_round_trips() {
		let dir = temp_data_dir();
		let store = ProfileStore::new(&dir);
		let document = serde_json::json!({
			"personalInfo": { "name": "Asha" },
		});
		let stamp = store
			.save_latest(&document, datetime!(2025-12-27 10:30 UTC))
			.expect("save failed");

		assert_eq!(stamp, "2025-12-27T10:30:00Z");
		assert!(store.exists());

		let raw = store.load_latest_raw().expect("load failed");

		assert_eq!(raw["_savedAt"], serde_json::json!("2025-12-27T10:30:00Z"));

		let profile = store.load_latest().expect("load failed");

		assert_eq!(
			profile.personal_info.as_ref().and_then(|p| p.name.as_deref()),
			Some("Asha")
		);

		fs::remove_dir_all(&dir).expect("cleanup failed");
	}

	#[test]
	fn delete_reports_whether_a_profile_existed() {
		let dir = temp_data_dir();
		let store = ProfileStore::new(&dir);

		assert!(!store.delete_latest().expect("delete failed"));

		store
			.save_latest(&serde_json::json!({}), datetime!(2025-12-27 10:30 UTC))
			.expect("save failed");

		assert!(store.delete_latest().expect("delete failed"));
		assert!(!store.delete_latest().expect("delete failed"));
		assert!(!store.exists());

		fs::remove_dir_all(&dir).expect("cleanup failed");
	}

	#[test]
	fn missing_profile_is_a_not_found_error() {
		let store = ProfileStore::new(temp_data_dir());
		let err = store.load_latest().expect_err("expected missing profile error");

		assert!(matches!(err, Error::NotFound(_)), "unexpected error: {err}");
	}

	#[test]
	fn rejects_non_object_documents() {
		let store = ProfileStore::new(temp_data_dir());
		let err = store
			.save_latest(&serde_json::json!(["not", "an", "object"]), datetime!(2025-12-27 10:30 UTC))
			.expect_err("expected invalid document error");

		assert!(matches!(err, Error::InvalidArgument(_)), "unexpected error: {err}");
	}
}
