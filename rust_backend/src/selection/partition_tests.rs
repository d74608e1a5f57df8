#[cfg(test)]
mod tests {
    use crate::logging::OperationLog;
    use crate::models::{Band, ExposureRecord, ExposureTable, Night};
    use crate::selection::partition::{
        consecutive_runs, latest_consecutive_run, PartitionOutcome, Partitioner, RunSelection,
    };
    use crate::selection::policy::{HighestQuality, SelectionPolicy};

    /// Helper to build an exposure on a given night
    fn exposure(id: i64, night: u32) -> ExposureRecord {
        ExposureRecord {
            exposure_id: id,
            night: Night::new(night),
            mjd: 59000.0 + id as f64 * 0.01,
            ra: 60.0,
            dec: -30.0,
            band: Band::I,
            exposure_time: 90.0,
            quality_metric: 0.3,
            propid: "2023A-0001".to_string(),
            obs_type: "object".to_string(),
            object: "GW field".to_string(),
            is_search: false,
        }
    }

    /// Helper to build a table with `count` exposures per night, ids in order
    fn table(nights: &[(u32, usize)]) -> ExposureTable {
        let mut next_id = 1;
        let mut records = Vec::new();
        for &(night, count) in nights {
            for _ in 0..count {
                records.push(exposure(next_id, night));
                next_id += 1;
            }
        }
        ExposureTable::new(records).unwrap()
    }

    fn search_nights(table: &ExposureTable) -> Vec<u32> {
        let mut nights: Vec<u32> = table.search().map(|r| r.night.code()).collect();
        nights.dedup();
        nights
    }

    fn partition(table: ExposureTable) -> crate::selection::Partition {
        Partitioner::default().partition(table, &OperationLog::disabled())
    }

    #[test]
    fn test_single_night_marks_everything_search() {
        let result = partition(table(&[(20230101, 4)]));

        assert_eq!(result.table.search().count(), 4);
        assert!(result.outcome.is_degenerate());
        assert_eq!(result.outcome, PartitionOutcome::Degenerate { nights: 1 });
    }

    #[test]
    fn test_empty_batch_is_degenerate() {
        let result = partition(ExposureTable::default());
        assert_eq!(result.outcome, PartitionOutcome::Degenerate { nights: 0 });
        assert!(result.table.is_empty());
    }

    #[test]
    fn test_two_nights_later_one_is_search() {
        let result = partition(table(&[(20230101, 3), (20230105, 2)]));

        let search: Vec<i64> = result.table.search_ids();
        assert_eq!(search, vec![4, 5]);
        assert_eq!(result.table.templates().count(), 3);
        assert_eq!(
            result.outcome,
            PartitionOutcome::LatestOfTwo {
                night: Night::new(20230105)
            }
        );
    }

    #[test]
    fn test_two_nights_ignore_input_order() {
        let records = vec![exposure(1, 20230105), exposure(2, 20230101), exposure(3, 20230105)];
        let result = partition(ExposureTable::new(records).unwrap());
        assert_eq!(result.table.search_ids(), vec![1, 3]);
    }

    #[test]
    fn test_consecutive_run_preferred_over_isolated_recent_night() {
        let result = partition(table(&[(20230101, 3), (20230102, 3), (20230110, 3)]));

        assert_eq!(search_nights(&result.table), vec![20230101, 20230102]);
        assert_eq!(result.table.search().count(), 6);
        assert_eq!(
            result.outcome,
            PartitionOutcome::ConsecutiveRun {
                nights: vec![Night::new(20230101), Night::new(20230102)],
                over_cap: 0,
            }
        );
    }

    #[test]
    fn test_most_recent_run_wins() {
        let result = partition(table(&[
            (20230101, 3),
            (20230102, 3),
            (20230110, 3),
            (20230111, 3),
            (20230112, 3),
        ]));

        assert_eq!(search_nights(&result.table), vec![20230110, 20230111, 20230112]);
    }

    #[test]
    fn test_sparse_nights_do_not_qualify() {
        // 20230103 has only two exposures, so it breaks the run
        let result = partition(table(&[(20230101, 3), (20230102, 2), (20230103, 5)]));

        assert_eq!(search_nights(&result.table), vec![20230103]);
        assert_eq!(
            result.outcome,
            PartitionOutcome::SingleNight {
                night: Night::new(20230103),
                over_cap: 0,
            }
        );
    }

    #[test]
    fn test_no_run_falls_back_to_latest_qualifying_night() {
        let result = partition(table(&[(20230101, 3), (20230105, 4), (20230110, 2)]));

        assert_eq!(search_nights(&result.table), vec![20230105]);
        assert_eq!(result.table.search().count(), 4);
    }

    #[test]
    fn test_no_qualifying_night_uses_latest_night() {
        let result = partition(table(&[(20230101, 1), (20230105, 2), (20230110, 2)]));

        assert_eq!(search_nights(&result.table), vec![20230110]);
        assert_eq!(result.table.search().count(), 2);
    }

    #[test]
    fn test_run_across_month_boundary() {
        let result = partition(table(&[(20230115, 3), (20230131, 3), (20230201, 3)]));
        assert_eq!(search_nights(&result.table), vec![20230131, 20230201]);
    }

    #[test]
    fn test_search_cap_keeps_input_order() {
        let result = partition(table(&[(20230101, 5), (20230110, 12), (20230111, 13)]));

        let search = result.table.search_ids();
        assert_eq!(search.len(), 20);
        // Run nights start at id 6; the first 20 of them in input order are search
        assert_eq!(search, (6..26).collect::<Vec<i64>>());
        let late_templates: Vec<i64> = result
            .table
            .templates()
            .filter(|r| r.night.code() >= 20230110)
            .map(|r| r.exposure_id)
            .collect();
        assert_eq!(late_templates, vec![26, 27, 28, 29, 30]);
        assert!(matches!(
            result.outcome,
            PartitionOutcome::ConsecutiveRun { over_cap: 5, .. }
        ));
    }

    #[test]
    fn test_cap_follows_interleaved_input_order() {
        // Nights interleaved in the input; the cap counts in encounter order
        let mut records = Vec::new();
        for id in 1..=4 {
            records.push(exposure(id, 20230101));
        }
        for id in 5..=30 {
            let night = if id % 2 == 0 { 20230111 } else { 20230110 };
            records.push(exposure(id, night));
        }
        let result = partition(ExposureTable::new(records).unwrap());

        assert_eq!(result.table.search_ids(), (5..25).collect::<Vec<i64>>());
    }

    #[test]
    fn test_highest_quality_policy() {
        let mut records = Vec::new();
        for id in 1..=3 {
            records.push(exposure(id, 20230101));
        }
        for id in 4..=8 {
            let mut r = exposure(id, 20230105);
            r.quality_metric = id as f64 / 10.0;
            records.push(r);
        }
        for id in 9..=11 {
            records.push(exposure(id, 20230120));
        }
        let table = ExposureTable::new(records).unwrap();

        // No run; 20230120 is the latest qualifying night
        let by_quality = Partitioner::new(2, SelectionPolicy::HighestQuality)
            .partition(table.clone(), &OperationLog::disabled());
        assert_eq!(by_quality.table.search_ids().len(), 2);

        let boxed = Partitioner::new(2, SelectionPolicy::EncounterOrder)
            .with_strategy(Box::new(HighestQuality));
        let result = boxed.partition(table, &OperationLog::disabled());
        assert_eq!(result.table.search_ids(), vec![9, 10]);
    }

    #[test]
    fn test_existing_flags_are_ignored() {
        let original = table(&[(20230101, 3), (20230102, 3), (20230110, 3)]);
        let mut flagged = original.clone();
        for record in flagged.records_mut() {
            record.is_search = record.night.code() == 20230110;
        }

        let from_original = partition(original);
        let from_flagged = partition(flagged);
        assert_eq!(from_original, from_flagged);

        let again = partition(from_original.table.clone());
        assert_eq!(again, from_original);
    }

    #[test]
    fn test_consecutive_runs_grouping() {
        let nights: Vec<Night> = [20230101, 20230102, 20230104, 20230105, 20230106, 20230110]
            .into_iter()
            .map(Night::new)
            .collect();
        let runs = consecutive_runs(&nights);
        let lengths: Vec<usize> = runs.iter().map(|r| r.len()).collect();
        assert_eq!(lengths, vec![2, 3, 1]);
    }

    #[test]
    fn test_latest_run_selection() {
        let isolated: Vec<Night> = [20230101, 20230103, 20230105].into_iter().map(Night::new).collect();
        assert_eq!(latest_consecutive_run(&isolated, 2), RunSelection::NoRunFound);
        assert_eq!(latest_consecutive_run(&[], 2), RunSelection::NoRunFound);

        let mixed: Vec<Night> = [20230101, 20230102, 20230105].into_iter().map(Night::new).collect();
        assert_eq!(
            latest_consecutive_run(&mixed, 2),
            RunSelection::RunFound(vec![Night::new(20230101), Night::new(20230102)])
        );
    }

    #[test]
    fn test_zero_cap_still_selects_one_search_exposure() {
        let partitioner = Partitioner::new(0, SelectionPolicy::EncounterOrder);
        assert_eq!(partitioner.max_search(), 1);

        let result = partitioner.partition(
            table(&[(20230101, 3), (20230102, 3), (20230110, 3)]),
            &OperationLog::disabled(),
        );

        assert_eq!(result.table.search_ids(), vec![1]);
        assert!(matches!(
            result.outcome,
            PartitionOutcome::ConsecutiveRun { over_cap: 5, .. }
        ));
    }
}
