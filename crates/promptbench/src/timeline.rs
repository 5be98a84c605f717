//! Timeline Builder
//!
//! The other shape of the history view: one input's results grouped by
//! calendar day, newest day first, newest result first within a day.

use chrono::NaiveDate;

use crate::presentation::{ResultRecord, ResultView};

/// One day's worth of results
#[derive(Debug, Clone)]
pub struct TimelineDay {
    pub date: NaiveDate,
    /// Newest first
    pub results: Vec<ResultView>,
}

impl TimelineDay {
    /// Header form, e.g. `2025-05-01`
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Group a flat history by day. The first returned day is the newest and
/// is the default selection.
pub fn build_timeline(records: &[ResultRecord]) -> Vec<TimelineDay> {
    let mut days: Vec<TimelineDay> = Vec::new();

    for record in records {
        let view = ResultView::from_record(record);
        let date = view.created_at.date_naive();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.results.push(view),
            None => days.push(TimelineDay {
                date,
                results: vec![view],
            }),
        }
    }

    for day in &mut days {
        day.results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(output_id: i64, created_at: &str) -> ResultRecord {
        serde_json::from_value(serde_json::json!({
            "output_id": output_id,
            "model_id": 1,
            "prompt_id": 2,
            "created_at": created_at
        }))
        .unwrap()
    }

    #[test]
    fn days_are_newest_first_and_results_descend_within_a_day() {
        let records = vec![
            record(1, "2025-05-01T09:00:00Z"),
            record(2, "2025-05-02T08:00:00Z"),
            record(3, "2025-05-01T15:00:00Z"),
            record(4, "2025-05-02T11:00:00Z"),
        ];

        let days = build_timeline(&records);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label(), "2025-05-02");
        let newest: Vec<i64> = days[0].results.iter().filter_map(|r| r.output_id).collect();
        assert_eq!(newest, vec![4, 2]);
        let older: Vec<i64> = days[1].results.iter().filter_map(|r| r.output_id).collect();
        assert_eq!(older, vec![3, 1]);
    }

    #[test]
    fn empty_history_yields_no_days() {
        assert!(build_timeline(&[]).is_empty());
    }
}
