pub mod answers;
pub mod perfume;
pub mod question;
pub mod recommendation;

pub use answers::AnswerSet;
pub use perfume::{PerfumeRecord, GENDER_FIELD, MOOD_FIELD, OCCASION_FIELD, SCENT_PROFILE_FIELD};
pub use question::{QuestionKey, UnknownQuestion};
pub use recommendation::Recommendation;
