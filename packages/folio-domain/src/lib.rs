pub mod chunk;
pub mod profile;

pub use chunk::{
	Chunk, ChunkPayload, ChunkType, EmbeddingRecord, NormalizedChunks, RetrievedContext,
	ScoredChunk,
};
pub use profile::{
	Achievements, Award, CareerPreferences, CodechefStats, CodeforcesStats,
	CompetitiveProgramming, Education, Experience, GeeksforgeeksStats, Interest, LeetcodeStats,
	OverallStats, PersonalInfo, Profile, ProfileMeta, Project,
};
