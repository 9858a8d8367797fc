use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::{CropStage, QueryRecord};

pub const RECENT_LIMIT: usize = 10;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Count {
    pub label: String,
    pub queries: usize,
    /// Percentage of all queries, for pie-style charts.
    pub share: f64,
}

/// One row of the recent queries table.  The recommendation text is left out.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RecentQuery {
    pub id: usize,
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub crop: String,
    pub stage: CropStage,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_queries: usize,
    pub unique_crops: usize,
    pub most_queried_crop: String,
    pub crop_distribution: Vec<Count>,
    pub stage_distribution: Vec<Count>,
    pub recent: Vec<RecentQuery>,
}

/// Builds every derived view at once.  None when there is nothing to show.
pub fn summarize(records: &[QueryRecord]) -> Option<Analytics> {
    let most_queried_crop = most_frequent_crop(records)?;

    Some(Analytics {
        total_queries: total_count(records),
        unique_crops: distinct_crop_count(records),
        most_queried_crop,
        crop_distribution: crop_distribution(records),
        stage_distribution: stage_distribution(records),
        recent: recent(records, RECENT_LIMIT),
    })
}

pub fn total_count(records: &[QueryRecord]) -> usize {
    records.len()
}

pub fn distinct_crop_count(records: &[QueryRecord]) -> usize {
    records
        .iter()
        .map(|r| r.crop.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// The mode of the crop values, ties going to whichever appeared first.
pub fn most_frequent_crop(records: &[QueryRecord]) -> Option<String> {
    crop_distribution(records)
        .into_iter()
        .next()
        .map(|count| count.label)
}

pub fn crop_distribution(records: &[QueryRecord]) -> Vec<Count> {
    count_by(records.iter().map(|r| r.crop.as_str()))
}

pub fn stage_distribution(records: &[QueryRecord]) -> Vec<Count> {
    count_by(records.iter().map(|r| r.stage.label()))
}

/// Newest first by timestamp, keeping at most `limit` rows.  Records with the
/// same timestamp keep the later append first.
pub fn recent(records: &[QueryRecord], limit: usize) -> Vec<RecentQuery> {
    let mut rows: Vec<(usize, &QueryRecord)> = records.iter().enumerate().collect();
    rows.sort_by(|(lhs_pos, lhs), (rhs_pos, rhs)| {
        rhs.timestamp
            .cmp(&lhs.timestamp)
            .then_with(|| rhs_pos.cmp(lhs_pos))
    });
    rows.truncate(limit);

    rows.into_iter()
        .map(|(_, r)| RecentQuery {
            id: r.id,
            timestamp: r.timestamp,
            location: r.location.clone(),
            crop: r.crop.clone(),
            stage: r.stage,
        })
        .collect()
}

/// Counts each distinct value, most common first.  Equal counts stay in the
/// order the values were first seen.
fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Count> {
    let mut order: Vec<&str> = vec![];
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let total: usize = counts.values().sum();
    let mut distribution: Vec<Count> = order
        .into_iter()
        .map(|label| {
            let queries = counts[label];
            Count {
                label: label.to_string(),
                queries,
                share: queries as f64 * 100.0 / total as f64,
            }
        })
        .collect();

    // sort_by is stable, which is what keeps ties in first-seen order.
    distribution.sort_by(|lhs, rhs| rhs.queries.cmp(&lhs.queries));

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: usize, minute: u32, crop: &str, stage: CropStage) -> QueryRecord {
        QueryRecord {
            id,
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(8, minute, 0)
                .unwrap(),
            location: "Punjab".to_string(),
            crop: crop.to_string(),
            stage,
            recommendation: format!("advice for {crop}"),
        }
    }

    fn records(crops: &[&str]) -> Vec<QueryRecord> {
        crops
            .iter()
            .enumerate()
            .map(|(i, crop)| record(i, i as u32, crop, CropStage::Germination))
            .collect()
    }

    #[test]
    fn test_most_frequent_crop() {
        let records = records(&["wheat", "rice", "wheat"]);
        assert_eq!(most_frequent_crop(&records), Some("wheat".to_string()));
    }

    #[test]
    fn test_most_frequent_crop_tie_goes_to_first_seen() {
        let records = records(&["rice", "wheat", "wheat", "rice", "cotton"]);
        assert_eq!(most_frequent_crop(&records), Some("rice".to_string()));
    }

    #[test]
    fn test_distinct_crop_count() {
        let records = records(&["wheat", "rice", "wheat", "cotton"]);
        assert_eq!(distinct_crop_count(&records), 3);
    }

    #[test]
    fn test_crop_names_are_case_sensitive() {
        let records = records(&["Wheat", "wheat"]);
        assert_eq!(distinct_crop_count(&records), 2);
    }

    #[test]
    fn test_distributions_sum_to_total() {
        let mut records = records(&["wheat", "rice", "wheat", "cotton", "rice", "wheat"]);
        records[1].stage = CropStage::Harvest;
        records[4].stage = CropStage::Sowing;

        let crops = crop_distribution(&records);
        let stages = stage_distribution(&records);

        assert_eq!(crops.iter().map(|c| c.queries).sum::<usize>(), 6);
        assert_eq!(stages.iter().map(|c| c.queries).sum::<usize>(), 6);

        assert_eq!(crops[0].label, "wheat");
        assert_eq!(crops[0].queries, 3);
        assert_eq!(crops[0].share, 50.0);

        let share_total: f64 = stages.iter().map(|c| c.share).sum();
        assert!((share_total - 100.0).abs() < 1e-9);
        assert_eq!(stages[0].label, "Germination");
        assert_eq!(stages[0].queries, 4);
    }

    #[test]
    fn test_recent_truncates_to_ten_newest_first() {
        let records = records(&["wheat"; 12]);

        let recent = recent(&records, RECENT_LIMIT);
        assert_eq!(recent.len(), 10);

        let ids: Vec<usize> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
        assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_recent_sorts_by_timestamp_not_append_order() {
        let records = vec![
            record(0, 30, "wheat", CropStage::Flowering),
            record(1, 10, "rice", CropStage::Flowering),
            record(2, 20, "cotton", CropStage::Flowering),
        ];

        let crops: Vec<String> = recent(&records, RECENT_LIMIT)
            .into_iter()
            .map(|r| r.crop)
            .collect();
        assert_eq!(crops, ["wheat", "cotton", "rice"]);
    }

    #[test]
    fn test_recent_same_timestamp_keeps_later_append_first() {
        let records = vec![
            record(0, 5, "wheat", CropStage::Flowering),
            record(1, 5, "rice", CropStage::Flowering),
        ];

        let ids: Vec<usize> = recent(&records, RECENT_LIMIT)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(total_count(&[]), 0);
        assert!(crop_distribution(&[]).is_empty());
    }

    #[test]
    fn test_summarize() {
        let records = records(&["wheat", "rice", "wheat", "cotton"]);
        let summary = summarize(&records).unwrap();

        assert_eq!(summary.total_queries, 4);
        assert_eq!(summary.unique_crops, 3);
        assert_eq!(summary.most_queried_crop, "wheat");
        assert_eq!(summary.crop_distribution.len(), 3);
        assert_eq!(summary.stage_distribution.len(), 1);
        assert_eq!(summary.recent.len(), 4);
    }
}
