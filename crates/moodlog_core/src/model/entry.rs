//! Mood entry domain model.
//!
//! # Responsibility
//! - Define the record appended on every mood submission.
//! - Validate raw presentation-layer input into typed values.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `timestamp` is stamped once at creation and never edited.
//! - Submissions without a recognized mood or activity never become entries.
//!
//! # See also
//! - `repo::entry_store` for the persisted JSON shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one mood entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d6f_6f64_6c6f_4700_8000_656e_7472_7969);

/// Self-reported emotional state.
///
/// Persisted as a lowercase label. Values written by older clients that are
/// not part of the closed set survive as `Unrecognized` so reads never fail
/// on them and rewrites preserve the original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Good,
    Okay,
    Bad,
    Unrecognized(String),
}

impl Mood {
    /// Recognized moods in display order.
    pub const ALL: [Mood; 3] = [Mood::Good, Mood::Okay, Mood::Bad];

    /// Parses a recognized mood label or emoji symbol.
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "good" | "😄" => Some(Self::Good),
            "ok" | "okay" | "😐" => Some(Self::Okay),
            "bad" | "😞" => Some(Self::Bad),
            _ => None,
        }
    }

    /// Stable persisted label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Good => "good",
            Self::Okay => "ok",
            Self::Bad => "bad",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Ordinal used by trend charts: good=3, ok=2, bad=1, unrecognized=0.
    pub fn score(&self) -> u8 {
        match self {
            Self::Good => 3,
            Self::Okay => 2,
            Self::Bad => 1,
            Self::Unrecognized(_) => 0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Mood {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or(Self::Unrecognized(value))
    }
}

impl From<Mood> for String {
    fn from(value: Mood) -> Self {
        match value {
            Mood::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user was doing when logging a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Activity {
    Work,
    Leisure,
    Exercise,
    Study,
    Social,
    Eating,
    Commute,
}

impl Activity {
    /// The fixed activity set, in chart order.
    pub const ALL: [Activity; 7] = [
        Activity::Work,
        Activity::Leisure,
        Activity::Exercise,
        Activity::Study,
        Activity::Social,
        Activity::Eating,
        Activity::Commute,
    ];

    /// Parses an activity label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Some(Self::Work),
            "leisure" => Some(Self::Leisure),
            "exercise" => Some(Self::Exercise),
            "study" => Some(Self::Study),
            "social" => Some(Self::Social),
            "eating" => Some(Self::Eating),
            "commute" => Some(Self::Commute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Leisure => "leisure",
            Self::Exercise => "exercise",
            Self::Study => "study",
            Self::Social => "social",
            Self::Eating => "eating",
            Self::Commute => "commute",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Leisure => "Leisure",
            Self::Exercise => "Exercise",
            Self::Study => "Study",
            Self::Social => "Social",
            Self::Eating => "Eating",
            Self::Commute => "Commute",
        }
    }
}

impl TryFrom<String> for Activity {
    type Error = EntryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(EntryValidationError::UnrecognizedActivity(value))
    }
}

impl From<Activity> for String {
    fn from(value: Activity) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-submitted record of emotional state, context and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Nil for entries persisted before ids existed; see
    /// `assign_legacy_id`.
    #[serde(default)]
    pub id: EntryId,
    pub mood: Mood,
    pub activity: Activity,
    /// Companions; empty means alone or unspecified.
    #[serde(default)]
    pub people: String,
    #[serde(default)]
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

impl MoodEntry {
    /// Creates an entry with a generated stable ID.
    pub fn new(
        mood: Mood,
        activity: Activity,
        people: impl Into<String>,
        note: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mood,
            activity,
            people: people.into(),
            note: note.into(),
            timestamp,
        }
    }

    /// Gives an id-less legacy entry a deterministic id.
    ///
    /// The id is derived from the entry's position in the stored collection
    /// and its content, so repeated reads of the same payload agree, and the
    /// next rewrite persists the same value.
    pub(crate) fn assign_legacy_id(&mut self, index: usize) {
        if !self.id.is_nil() {
            return;
        }
        let canonical = format!(
            "{index}|{}|{}|{}|{}|{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.mood.as_str(),
            self.activity.as_str(),
            self.people,
            self.note
        );
        self.id = Uuid::new_v5(&LEGACY_ID_NAMESPACE, canonical.as_bytes());
    }

    /// Whether the user logged this mood in company.
    pub fn has_company(&self) -> bool {
        !self.people.trim().is_empty()
    }
}

/// Raw form input as handed over by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodSubmission {
    pub mood: Option<String>,
    pub activity: Option<String>,
    pub people: String,
    pub note: String,
}

impl MoodSubmission {
    /// Validates this submission and stamps it into an entry.
    ///
    /// # Errors
    /// - `MissingMood` / `MissingActivity` when a selection is absent or blank.
    /// - `UnrecognizedMood` / `UnrecognizedActivity` for values outside the
    ///   closed sets.
    pub fn into_entry(self, timestamp: DateTime<Utc>) -> Result<MoodEntry, EntryValidationError> {
        let mood = match normalize_selection(self.mood) {
            None => return Err(EntryValidationError::MissingMood),
            Some(value) => {
                Mood::parse(&value).ok_or(EntryValidationError::UnrecognizedMood(value))?
            }
        };
        let activity = match normalize_selection(self.activity) {
            None => return Err(EntryValidationError::MissingActivity),
            Some(value) => Activity::try_from(value)?,
        };

        Ok(MoodEntry::new(
            mood,
            activity,
            self.people.trim(),
            self.note.trim(),
            timestamp,
        ))
    }
}

fn normalize_selection(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Submission validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    MissingMood,
    UnrecognizedMood(String),
    MissingActivity,
    UnrecognizedActivity(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMood => write!(f, "mood must be selected"),
            Self::UnrecognizedMood(value) => write!(f, "mood is not recognized: `{value}`"),
            Self::MissingActivity => write!(f, "activity must be selected"),
            Self::UnrecognizedActivity(value) => {
                write!(f, "activity is not recognized: `{value}`")
            }
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::{Activity, EntryValidationError, Mood, MoodEntry, MoodSubmission};
    use chrono::{TimeZone, Utc};

    fn submission(mood: Option<&str>, activity: Option<&str>) -> MoodSubmission {
        MoodSubmission {
            mood: mood.map(str::to_string),
            activity: activity.map(str::to_string),
            people: "  Sam  ".to_string(),
            note: " long day ".to_string(),
        }
    }

    #[test]
    fn mood_parses_labels_and_emoji_aliases() {
        assert_eq!(Mood::parse("good"), Some(Mood::Good));
        assert_eq!(Mood::parse("😐"), Some(Mood::Okay));
        assert_eq!(Mood::parse(" BAD "), Some(Mood::Bad));
        assert_eq!(Mood::parse("ecstatic"), None);
    }

    #[test]
    fn mood_scores_follow_fixed_ordinals() {
        assert_eq!(Mood::Good.score(), 3);
        assert_eq!(Mood::Okay.score(), 2);
        assert_eq!(Mood::Bad.score(), 1);
        assert_eq!(Mood::Unrecognized("meh".to_string()).score(), 0);
    }

    #[test]
    fn unknown_persisted_mood_is_preserved_verbatim() {
        let mood = Mood::from("meh".to_string());
        assert_eq!(mood, Mood::Unrecognized("meh".to_string()));
        assert_eq!(String::from(mood), "meh");
    }

    #[test]
    fn activity_parse_is_case_insensitive() {
        assert_eq!(Activity::parse("Work"), Some(Activity::Work));
        assert_eq!(Activity::parse(" COMMUTE"), Some(Activity::Commute));
        assert_eq!(Activity::parse("gardening"), None);
        assert_eq!(Activity::ALL.len(), 7);
    }

    #[test]
    fn submission_becomes_trimmed_entry() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let entry = submission(Some("😄"), Some("Exercise"))
            .into_entry(at)
            .expect("valid submission");

        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.activity, Activity::Exercise);
        assert_eq!(entry.people, "Sam");
        assert_eq!(entry.note, "long day");
        assert_eq!(entry.timestamp, at);
        assert!(entry.has_company());
    }

    #[test]
    fn submission_requires_mood_and_activity() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(
            submission(None, Some("work")).into_entry(at),
            Err(EntryValidationError::MissingMood)
        );
        assert_eq!(
            submission(Some("   "), Some("work")).into_entry(at),
            Err(EntryValidationError::MissingMood)
        );
        assert_eq!(
            submission(Some("good"), None).into_entry(at),
            Err(EntryValidationError::MissingActivity)
        );
    }

    #[test]
    fn submission_rejects_unrecognized_values() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(
            submission(Some("meh"), Some("work")).into_entry(at),
            Err(EntryValidationError::UnrecognizedMood("meh".to_string()))
        );
        assert_eq!(
            submission(Some("good"), Some("naps")).into_entry(at),
            Err(EntryValidationError::UnrecognizedActivity(
                "naps".to_string()
            ))
        );
    }

    #[test]
    fn legacy_payload_without_id_deserializes() {
        let raw = r#"{"mood":"😞","activity":"Social","people":"","note":"","timestamp":"2024-05-01T10:00:00.000Z"}"#;
        let entry: MoodEntry = serde_json::from_str(raw).expect("legacy entry should parse");
        assert_eq!(entry.mood, Mood::Bad);
        assert_eq!(entry.activity, Activity::Social);
        assert!(!entry.has_company());
        assert!(entry.id.is_nil());
    }

    #[test]
    fn legacy_id_is_deterministic_and_position_sensitive() {
        let raw = r#"{"mood":"good","activity":"Work","timestamp":"2024-05-01T10:00:00Z"}"#;
        let mut first: MoodEntry = serde_json::from_str(raw).expect("legacy entry should parse");
        let mut again: MoodEntry = serde_json::from_str(raw).expect("legacy entry should parse");
        let mut twin: MoodEntry = serde_json::from_str(raw).expect("legacy entry should parse");

        first.assign_legacy_id(0);
        again.assign_legacy_id(0);
        twin.assign_legacy_id(1);
        assert!(!first.id.is_nil());
        assert_eq!(first.id, again.id);
        assert_ne!(first.id, twin.id);

        let before = first.id;
        first.assign_legacy_id(7);
        assert_eq!(first.id, before);
    }
}
