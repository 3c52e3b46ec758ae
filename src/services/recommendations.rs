use std::sync::Arc;

use crate::{
    models::{
        AnswerSet, PerfumeRecord, QuestionKey, Recommendation, GENDER_FIELD, MOOD_FIELD,
        OCCASION_FIELD, SCENT_PROFILE_FIELD,
    },
    services::catalog::CatalogSource,
};

/// Points every candidate gets for surviving the gender filter
pub const BASE_BONUS: u32 = 2;

pub const CATALOG_LOAD_FAILED: &str = "Failed to load perfumes data.";
pub const NO_GENDER_MATCH: &str = "No perfumes match your gender preference.";
pub const NO_MATCH: &str = "No matching perfume found.";

const DEFAULT_MOOD: &str = "neutral";
const DEFAULT_SCENTS: &str = "your favorite scents";

/// Which of the two recommendation flows a session asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfumeType {
    /// Pick an existing perfume from the catalog
    Designer,
    /// Describe a custom blend; the catalog is never read
    Customized,
}

impl PerfumeType {
    /// Anything other than "designer" (any case, surrounding whitespace ignored)
    /// selects the customized flow
    pub fn from_answers(answers: &AnswerSet) -> Self {
        if answers.normalized(QuestionKey::Type) == "designer" {
            PerfumeType::Designer
        } else {
            PerfumeType::Customized
        }
    }
}

/// Gender constraint derived from the user's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderPreference {
    Men,
    Women,
    Any,
}

impl GenderPreference {
    pub fn from_answer(normalized: &str) -> Self {
        match normalized {
            "men" => GenderPreference::Men,
            "women" => GenderPreference::Women,
            _ => GenderPreference::Any,
        }
    }

    /// Whether a perfume's normalized Gender field is compatible
    ///
    /// Plain substring tests: "men" is contained in "women", so women's
    /// perfumes pass the `Men` filter.
    pub fn admits(self, perfume_gender: &str) -> bool {
        match self {
            GenderPreference::Men => {
                perfume_gender.contains("men") || perfume_gender.contains("unisex")
            }
            GenderPreference::Women => {
                perfume_gender.contains("women") || perfume_gender.contains("unisex")
            }
            GenderPreference::Any => true,
        }
    }
}

/// Normalized matching signals extracted from an answer set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub gender: GenderPreference,
    pub occasion: String,
    pub mood: String,
    pub scents: Vec<String>,
}

impl Preferences {
    pub fn from_answers(answers: &AnswerSet) -> Self {
        Self {
            gender: GenderPreference::from_answer(&answers.normalized(QuestionKey::Gender)),
            occasion: answers.normalized(QuestionKey::Occasion),
            mood: answers.normalized(QuestionKey::Mood),
            scents: scent_tokens(answers.get(QuestionKey::Scents).unwrap_or_default()),
        }
    }
}

/// Splits a free-text scent answer on commas and periods into lower-cased,
/// trimmed, non-empty tokens
pub fn scent_tokens(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split([',', '.'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Catalog records compatible with the gender preference, in catalog order
pub fn gender_filter<'a>(
    prefs: &Preferences,
    catalog: &'a [PerfumeRecord],
) -> Vec<&'a PerfumeRecord> {
    catalog
        .iter()
        .filter(|perfume| prefs.gender.admits(&perfume.normalized(GENDER_FIELD)))
        .collect()
}

/// Heuristic score of a gender-compatible candidate
///
/// Starts at [`BASE_BONUS`], then adds one for an occasion match, one for a
/// mood match and one per scent token found in the scent profile.
pub fn score_candidate(prefs: &Preferences, perfume: &PerfumeRecord) -> u32 {
    let mut score = BASE_BONUS;

    if !prefs.occasion.is_empty() && perfume.normalized(OCCASION_FIELD).contains(&prefs.occasion)
    {
        score += 1;
    }

    if !prefs.mood.is_empty() && perfume.normalized(MOOD_FIELD).contains(&prefs.mood) {
        score += 1;
    }

    let scent_profile = perfume.normalized(SCENT_PROFILE_FIELD);
    score += prefs
        .scents
        .iter()
        .filter(|scent| scent_profile.contains(scent.as_str()))
        .count() as u32;

    score
}

/// Highest-scoring candidate; on ties the earliest one wins
pub fn select_best<'a>(
    prefs: &Preferences,
    candidates: &[&'a PerfumeRecord],
) -> Option<(&'a PerfumeRecord, u32)> {
    let mut best: Option<(&'a PerfumeRecord, u32)> = None;

    for (position, perfume) in candidates.iter().enumerate() {
        let score = score_candidate(prefs, perfume);
        tracing::debug!(position, score, "Scored candidate");

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*perfume, score));
        }
    }

    best
}

/// Designer flow over an already loaded catalog
pub fn match_designer(answers: &AnswerSet, catalog: &[PerfumeRecord]) -> Recommendation {
    let prefs = Preferences::from_answers(answers);

    let candidates = gender_filter(&prefs, catalog);
    if candidates.is_empty() {
        tracing::info!(
            catalog_size = catalog.len(),
            gender = ?prefs.gender,
            "No perfumes left after gender filter"
        );
        return Recommendation::Message(NO_GENDER_MATCH.to_string());
    }

    match select_best(&prefs, &candidates) {
        Some((perfume, score)) => {
            tracing::info!(
                candidates = candidates.len(),
                score,
                "Selected designer perfume"
            );
            Recommendation::Match(perfume.clone())
        }
        None => Recommendation::Message(NO_MATCH.to_string()),
    }
}

/// Customized flow: a one-sentence blend description
pub fn custom_blend(answers: &AnswerSet) -> Recommendation {
    let mood = answers.answered(QuestionKey::Mood).unwrap_or(DEFAULT_MOOD);
    let scents = answers
        .answered(QuestionKey::Scents)
        .unwrap_or(DEFAULT_SCENTS);

    Recommendation::Customized(format!(
        "Custom blend for a {} mood, infused with hints of {}.",
        mood, scents
    ))
}

/// Recommends from answers and a catalog that may have failed to load
///
/// `None` stands for a failed load and yields the error result on the
/// designer path; the customized path ignores the catalog entirely.
pub fn recommend(answers: &AnswerSet, catalog: Option<&[PerfumeRecord]>) -> Recommendation {
    match PerfumeType::from_answers(answers) {
        PerfumeType::Customized => custom_blend(answers),
        PerfumeType::Designer => match catalog {
            Some(catalog) => match_designer(answers, catalog),
            None => Recommendation::Error(CATALOG_LOAD_FAILED.to_string()),
        },
    }
}

/// Recommendation engine bound to a catalog source
///
/// The catalog is loaded only on the designer path, once per call.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogSource>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Produces a recommendation; never fails, load errors become
    /// [`Recommendation::Error`]
    pub fn recommend(&self, answers: &AnswerSet) -> Recommendation {
        if PerfumeType::from_answers(answers) == PerfumeType::Customized {
            return custom_blend(answers);
        }

        match self.catalog.load() {
            Ok(records) => recommend(answers, Some(records.as_slice())),
            Err(e) => {
                tracing::error!(error = %e, details = ?e, "Error loading perfume catalog");
                recommend(answers, None)
            }
        }
    }
}
