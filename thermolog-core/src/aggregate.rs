//! Stateless aggregation over reading sets.
//!
//! Nothing here checks whether a thermometer or location exists. Callers
//! validate references first and hand in whatever readings they hold.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{Reading, Stats, ThermometerId};

/// Running min/max/sum/count over the values seen so far.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    fn update_single(&mut self, value: f64) {
        self.min = f64::min(self.min, value);
        self.max = f64::max(self.max, value);
        self.sum += value;
        self.count += 1;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "reading counts stay far below 2^52"
    )]
    fn finish(self) -> Stats {
        Stats {
            min: Some(self.min),
            max: Some(self.max),
            avg: Some(self.sum / self.count as f64),
            count: Some(self.count),
        }
    }
}

/// Orders readings newest first. Equal timestamps fall back to the higher id,
/// i.e. the reading that was inserted last.
fn newest_first(left: &Reading, right: &Reading) -> Ordering {
    right
        .timestamp
        .cmp(&left.timestamp)
        .then_with(|| right.id.cmp(&left.id))
}

/// Pick the most recent reading of every thermometer present in `readings`.
///
/// Exactly one reading is returned per thermometer, ordered by thermometer id.
/// Thermometers without readings simply do not appear.
#[must_use]
pub fn latest_per_thermometer<'a, I>(readings: I) -> Vec<Reading>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut latest: BTreeMap<ThermometerId, &Reading> = BTreeMap::new();

    for reading in readings {
        latest
            .entry(reading.thermometer_id)
            .and_modify(|current| {
                if newest_first(reading, current).is_lt() {
                    *current = reading;
                }
            })
            .or_insert(reading);
    }

    latest.into_values().cloned().collect()
}

/// Up to `limit` readings of one thermometer, newest first.
#[must_use]
pub fn recent_window<'a, I>(
    readings: I,
    thermometer_id: ThermometerId,
    limit: usize,
) -> Vec<Reading>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut window: Vec<&Reading> = readings
        .into_iter()
        .filter(|reading| reading.thermometer_id == thermometer_id)
        .collect();

    window.sort_by(|left, right| newest_first(left, right));
    window.into_iter().take(limit).cloned().collect()
}

/// Compute min, max, mean, and count in one pass.
///
/// An empty input yields [`Stats::empty`].
#[must_use]
pub fn summarize<'a, I>(readings: I) -> Stats
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings
        .into_iter()
        .fold(None, |acc: Option<Accumulator>, reading| match acc {
            Some(mut running) => {
                running.update_single(reading.value);
                Some(running)
            }
            None => Some(Accumulator::new(reading.value)),
        })
        .map_or_else(Stats::empty, Accumulator::finish)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::model::ReadingId;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    fn reading(id: i64, thermometer: i64, value: f64, secs: i64) -> Reading {
        Reading {
            id: ReadingId(id),
            thermometer_id: ThermometerId(thermometer),
            value,
            timestamp: at(secs),
        }
    }

    #[test]
    fn latest_picks_max_timestamp_per_thermometer() {
        let readings = vec![
            reading(1, 1, 10.0, 100),
            reading(2, 2, 20.0, 300),
            reading(3, 1, 11.0, 200),
            reading(4, 2, 19.0, 250),
            reading(5, 1, 9.0, 150),
        ];

        let latest = latest_per_thermometer(&readings);

        assert_eq!(latest.len(), 2, "one entry per thermometer");
        for entry in &latest {
            let newest_other = readings
                .iter()
                .filter(|other| other.thermometer_id == entry.thermometer_id)
                .map(|other| other.timestamp)
                .max();
            assert_eq!(Some(entry.timestamp), newest_other);
        }
        let ids: Vec<_> = latest.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![ReadingId(3), ReadingId(2)]);
    }

    #[test]
    fn latest_breaks_timestamp_ties_by_highest_id() {
        let readings = vec![
            reading(7, 4, 1.0, 500),
            reading(9, 4, 3.0, 500),
            reading(8, 4, 2.0, 500),
        ];

        let latest = latest_per_thermometer(&readings);

        assert_eq!(latest.len(), 1);
        assert_eq!(latest.first().map(|entry| entry.id), Some(ReadingId(9)));

        let reversed: Vec<_> = readings.iter().rev().cloned().collect();
        assert_eq!(latest_per_thermometer(&reversed), latest, "input order must not matter");
    }

    #[test]
    fn latest_of_nothing_is_empty() {
        assert!(latest_per_thermometer(&[]).is_empty());
    }

    #[test]
    fn recent_window_is_newest_first_and_truncated() {
        let readings: Vec<_> = (1..=6)
            .map(|idx| reading(idx, 1, 20.0, idx * 10))
            .chain([reading(100, 2, 99.0, 1_000)])
            .collect();

        let window = recent_window(&readings, ThermometerId(1), 4);

        let stamps: Vec<_> = window.iter().map(|entry| entry.timestamp).collect();
        assert_eq!(stamps, vec![at(60), at(50), at(40), at(30)]);
        assert!(window.iter().all(|entry| entry.thermometer_id == ThermometerId(1)));
    }

    #[test]
    fn recent_window_never_pads() {
        let readings = vec![reading(1, 3, 5.0, 10), reading(2, 3, 6.0, 20)];

        let window = recent_window(&readings, ThermometerId(3), 25);

        assert_eq!(window.len(), 2);
        assert_eq!(window.first().map(|entry| entry.id), Some(ReadingId(2)));
    }

    #[test]
    fn summarize_computes_min_max_avg_count() {
        let readings = vec![
            reading(1, 1, 1.0, 1),
            reading(2, 1, 5.0, 2),
            reading(3, 1, 3.0, 3),
        ];

        let stats = summarize(&readings);

        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(5.0));
        assert_eq!(stats.avg, Some(3.0));
        assert_eq!(stats.count, Some(3));
    }

    #[test]
    fn summarize_spans_thermometers() {
        let readings = vec![
            reading(1, 11, 2.0, 1),
            reading(2, 12, 7.0, 2),
            reading(3, 11, 4.5, 3),
            reading(4, 12, 4.5, 4),
        ];

        let stats = summarize(&readings);

        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(7.0));
        assert_eq!(stats.avg, Some(4.5));
        assert_eq!(stats.count, Some(4));
    }

    #[test]
    fn summarize_empty_is_absent_not_zero() {
        let stats = summarize(&[]);

        assert_eq!(stats, Stats::empty());
        assert!(stats.is_empty());
    }

    #[test]
    fn summarize_keeps_zero_average_distinct() {
        let readings = vec![reading(1, 1, -2.0, 1), reading(2, 1, 2.0, 2)];

        let stats = summarize(&readings);

        assert_eq!(stats.avg, Some(0.0));
        assert!(!stats.is_empty());
    }
}
