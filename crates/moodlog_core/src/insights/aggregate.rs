//! Mood trend and activity frequency aggregation.

use crate::model::entry::{Activity, Mood, MoodEntry};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Entries shown in the insights "recent" list.
pub const RECENT_ENTRIES_DEFAULT: usize = 5;

/// One point of the mood-over-time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPoint {
    pub timestamp: DateTime<Utc>,
    /// See `Mood::score`.
    pub score: u8,
}

/// Entry counts per activity, covering the whole fixed activity set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCounts {
    counts: BTreeMap<Activity, usize>,
}

impl ActivityCounts {
    fn zeroed() -> Self {
        Self {
            counts: Activity::ALL.iter().map(|activity| (*activity, 0)).collect(),
        }
    }

    pub fn get(&self, activity: Activity) -> usize {
        self.counts.get(&activity).copied().unwrap_or(0)
    }

    /// Iterates in `Activity::ALL` order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Activity, usize)> + '_ {
        self.counts.iter().map(|(activity, count)| (*activity, *count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Activity with the most entries; earliest in chart order on ties.
    pub fn most_frequent(&self) -> Option<Activity> {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .fold(None, |best: Option<(Activity, usize)>, (activity, count)| {
                match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((activity, count)),
                }
            })
            .map(|(activity, _)| activity)
    }
}

/// Mood scores sorted ascending by timestamp. Ties keep input order.
pub fn time_series(entries: &[MoodEntry]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = entries
        .iter()
        .map(|entry| MoodPoint {
            timestamp: entry.timestamp,
            score: entry.mood.score(),
        })
        .collect();
    points.sort_by_key(|point| point.timestamp);
    points
}

/// Counts entries per activity with zero-fill for unused categories.
pub fn activity_counts(entries: &[MoodEntry]) -> ActivityCounts {
    let mut counts = ActivityCounts::zeroed();
    for entry in entries {
        *counts.counts.entry(entry.activity).or_insert(0) += 1;
    }
    counts
}

/// The `n` most recent entries, newest first.
pub fn recent(entries: &[MoodEntry], n: usize) -> Vec<MoodEntry> {
    let mut sorted: Vec<&MoodEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.into_iter().take(n).cloned().collect()
}

/// Mean score over recognized moods, `None` when there are none.
pub fn average_score(entries: &[MoodEntry]) -> Option<f64> {
    let (sum, count) = entries
        .iter()
        .filter(|entry| entry.mood.is_recognized())
        .fold((0u64, 0u64), |(sum, count), entry| {
            (sum + u64::from(entry.mood.score()), count + 1)
        });
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Counts entries per recognized mood, zero-filled.
pub fn mood_counts(entries: &[MoodEntry]) -> Vec<(Mood, usize)> {
    Mood::ALL
        .iter()
        .map(|mood| {
            let count = entries.iter().filter(|entry| &entry.mood == mood).count();
            (mood.clone(), count)
        })
        .collect()
}

/// Everything the insights view renders, computed in one pass over a
/// snapshot of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsSnapshot {
    pub series: Vec<MoodPoint>,
    pub activity_counts: ActivityCounts,
    pub mood_counts: Vec<(Mood, usize)>,
    pub top_activity: Option<Activity>,
    pub average_score: Option<f64>,
    pub recent: Vec<MoodEntry>,
}

impl InsightsSnapshot {
    pub fn build(entries: &[MoodEntry], recent_limit: usize) -> Self {
        let activity_counts = activity_counts(entries);
        Self {
            series: time_series(entries),
            top_activity: activity_counts.most_frequent(),
            activity_counts,
            mood_counts: mood_counts(entries),
            average_score: average_score(entries),
            recent: recent(entries, recent_limit),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{activity_counts, average_score, mood_counts, recent, time_series, InsightsSnapshot};
    use crate::model::entry::{Activity, Mood, MoodEntry};
    use chrono::{Duration, TimeZone, Utc};

    fn entry_at(hours: i64, mood: Mood, activity: Activity) -> MoodEntry {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        MoodEntry::new(mood, activity, "", "", base + Duration::hours(hours))
    }

    #[test]
    fn time_series_sorts_unsorted_input() {
        let entries = vec![
            entry_at(5, Mood::Bad, Activity::Work),
            entry_at(1, Mood::Good, Activity::Work),
            entry_at(3, Mood::Unrecognized("meh".to_string()), Activity::Work),
        ];

        let series = time_series(&entries);
        let scores: Vec<u8> = series.iter().map(|point| point.score).collect();
        assert_eq!(scores, vec![3, 0, 1]);
        assert!(series.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn activity_counts_zero_fill_and_sum_to_len() {
        let entries = vec![
            entry_at(1, Mood::Good, Activity::Work),
            entry_at(2, Mood::Okay, Activity::Work),
            entry_at(3, Mood::Bad, Activity::Commute),
        ];

        let counts = activity_counts(&entries);
        assert_eq!(counts.iter().count(), Activity::ALL.len());
        assert_eq!(counts.get(Activity::Work), 2);
        assert_eq!(counts.get(Activity::Commute), 1);
        assert_eq!(counts.get(Activity::Study), 0);
        assert_eq!(counts.total(), entries.len());
        assert_eq!(counts.most_frequent(), Some(Activity::Work));
    }

    #[test]
    fn empty_input_still_lists_every_activity() {
        let counts = activity_counts(&[]);
        assert!(counts.iter().all(|(_, count)| count == 0));
        assert_eq!(counts.iter().count(), Activity::ALL.len());
        assert_eq!(counts.most_frequent(), None);
    }

    #[test]
    fn recent_returns_newest_first_and_caps_length() {
        let t1 = entry_at(1, Mood::Good, Activity::Work);
        let t2 = entry_at(2, Mood::Okay, Activity::Social);
        let t3 = entry_at(3, Mood::Bad, Activity::Eating);
        let entries = vec![t2.clone(), t3.clone(), t1.clone()];

        assert_eq!(recent(&entries, 2), vec![t3.clone(), t2.clone()]);
        assert_eq!(recent(&entries, 10), vec![t3, t2, t1]);
        assert!(recent(&entries, 0).is_empty());
    }

    #[test]
    fn average_ignores_unrecognized_moods() {
        let entries = vec![
            entry_at(1, Mood::Good, Activity::Work),
            entry_at(2, Mood::Bad, Activity::Work),
            entry_at(3, Mood::Unrecognized("?".to_string()), Activity::Work),
        ];
        assert_eq!(average_score(&entries), Some(2.0));
        assert_eq!(average_score(&entries[2..]), None);
    }

    #[test]
    fn mood_counts_cover_recognized_moods() {
        let entries = vec![
            entry_at(1, Mood::Good, Activity::Work),
            entry_at(2, Mood::Good, Activity::Leisure),
        ];
        assert_eq!(
            mood_counts(&entries),
            vec![(Mood::Good, 2), (Mood::Okay, 0), (Mood::Bad, 0)]
        );
    }

    #[test]
    fn snapshot_bundles_all_views() {
        let entries = vec![
            entry_at(2, Mood::Okay, Activity::Study),
            entry_at(1, Mood::Good, Activity::Exercise),
        ];
        let snapshot = InsightsSnapshot::build(&entries, 1);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.recent, vec![entries[0].clone()]);
        assert_eq!(snapshot.activity_counts.total(), 2);
        assert_eq!(snapshot.top_activity, Some(Activity::Study));
        assert_eq!(
            snapshot.mood_counts,
            vec![(Mood::Good, 1), (Mood::Okay, 1), (Mood::Bad, 0)]
        );
        assert_eq!(snapshot.average_score, Some(2.5));
    }
}
