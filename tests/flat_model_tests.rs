#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use kinview::data::loaders::store_from_json_str;
    use kinview::data::record::{EntityKind, Handle, RawRecord, Tag};
    use kinview::data::store::{InMemoryStore, RecordStore};
    use kinview::data::value::FieldValue;
    use kinview::entities::source;
    use kinview::model::flat::FlatModel;
    use kinview::model::predicate::{ColumnSearch, PatternRule, Predicate, RuleChain};
    use kinview::model::progress::{CancelToken, IntervalProgress, NullProgress, RebuildOutcome};

    /// Store wrapper that stays mutable behind the models' `Arc`, the way
    /// a live database keeps changing underneath the views
    struct SharedStore(RwLock<InMemoryStore>);

    impl RecordStore for SharedStore {
        fn count(&self, kind: EntityKind) -> usize {
            self.0.read().unwrap().count(kind)
        }

        fn cursor<'a>(
            &'a self,
            kind: EntityKind,
        ) -> Box<dyn Iterator<Item = (Handle, RawRecord)> + 'a> {
            let pairs: Vec<(Handle, RawRecord)> = self.0.read().unwrap().cursor(kind).collect();
            Box::new(pairs.into_iter())
        }

        fn get(&self, kind: EntityKind, handle: &str) -> Option<RawRecord> {
            self.0.read().unwrap().get(kind, handle)
        }

        fn tag(&self, handle: &str) -> Option<Tag> {
            self.0.read().unwrap().tag(handle)
        }
    }

    fn source_record(handle: &str, id: &str, title: &str, change: i64, tags: &[&str]) -> RawRecord {
        RawRecord::new(vec![
            FieldValue::Str(handle.to_string()),
            FieldValue::Str(id.to_string()),
            FieldValue::Str(title.to_string()),
            FieldValue::Str(String::new()),
            FieldValue::Str(String::new()),
            FieldValue::Str(String::new()),
            FieldValue::Bool(false),
            FieldValue::Int(change),
            FieldValue::List(
                tags.iter()
                    .map(|t| FieldValue::Str(t.to_string()))
                    .collect(),
            ),
        ])
    }

    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.insert(
            EntityKind::Source,
            "S1",
            source_record("S1", "SRC0001", "Smith", 300, &[]),
        );
        store.insert(
            EntityKind::Source,
            "S2",
            source_record("S2", "SRC0002", "Jones", 100, &[]),
        );
        store.insert(
            EntityKind::Source,
            "S3",
            source_record("S3", "SRC0003", "Smithson", 200, &[]),
        );
        store
    }

    fn source_model() -> FlatModel {
        FlatModel::new(
            Arc::new(seeded_store()),
            EntityKind::Source,
            source::projection(),
        )
    }

    #[test]
    fn test_rebuild_shows_all_records() {
        let mut model = source_model();
        let outcome = model.rebuild(&CancelToken::new());

        assert_eq!(outcome, RebuildOutcome::Completed);
        assert_eq!(model.total(), 3);
        assert_eq!(model.displayed(), 3);
        assert_eq!(model.indexed(), model.displayed());
    }

    #[test]
    fn test_rows_round_trip_through_the_index() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());

        for handle in ["S1", "S2", "S3"] {
            let position = model.position_of(handle).unwrap();
            let row = model.row(position).unwrap();
            assert_eq!(row.handle(), handle);
            assert_eq!(model.handle_at(position), Some(handle));
        }
    }

    #[test]
    fn test_substring_search_on_title_column() {
        let mut model = source_model();
        model.set_predicate(Predicate::Search(ColumnSearch::substring(0, "Smith", false)));
        model.rebuild(&CancelToken::new());

        assert_eq!(model.displayed(), 2);
        assert!(model.position_of("S1").is_some());
        assert!(model.position_of("S3").is_some());
        assert!(model.position_of("S2").is_none());
    }

    #[test]
    fn test_exact_search_excludes_prefix_matches() {
        let mut model = source_model();
        model.set_predicate(Predicate::Search(ColumnSearch::exact(0, "smith", false)));
        model.rebuild(&CancelToken::new());

        assert_eq!(model.displayed(), 1);
        assert!(model.position_of("S1").is_some());
    }

    #[test]
    fn test_inverted_search_accepts_non_matches() {
        let mut model = source_model();
        model.set_predicate(Predicate::Search(ColumnSearch::substring(0, "Smith", true)));
        model.rebuild(&CancelToken::new());

        assert_eq!(model.displayed(), 1);
        assert!(model.position_of("S2").is_some());
    }

    #[test]
    fn test_set_predicate_alone_does_not_rebuild() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());
        assert_eq!(model.displayed(), 3);

        model.set_predicate(Predicate::Search(ColumnSearch::substring(0, "Smith", false)));
        // still showing the stale rows until the caller rebuilds
        assert_eq!(model.displayed(), 3);

        model.rebuild(&CancelToken::new());
        assert_eq!(model.displayed(), 2);
    }

    #[test]
    fn test_rebuild_is_idempotent_under_one_predicate() {
        let mut model = source_model();
        model.set_predicate(Predicate::Search(ColumnSearch::substring(0, "Smith", false)));

        model.rebuild(&CancelToken::new());
        let first: Vec<(String, Vec<String>)> = model
            .rows()
            .iter()
            .map(|row| {
                (
                    row.handle().to_string(),
                    (0..row.column_count()).map(|c| row.display(c)).collect(),
                )
            })
            .collect();

        model.rebuild(&CancelToken::new());
        let second: Vec<(String, Vec<String>)> = model
            .rows()
            .iter()
            .map(|row| {
                (
                    row.handle().to_string(),
                    (0..row.column_count()).map(|c| row.display(c)).collect(),
                )
            })
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_chain_runs_as_prepass() {
        let mut model = source_model();
        let chain = RuleChain::new().with_rule(Box::new(
            PatternRule::new(source::TITLE, "^smith").unwrap(),
        ));
        model.set_predicate(Predicate::Chain(Arc::new(chain)));

        // one heartbeat per record for the pre-pass, one for the cursor pass
        let mut heartbeats = 0;
        {
            let mut progress = IntervalProgress::new(1, |_, _| heartbeats += 1);
            model.rebuild_with_progress(&CancelToken::new(), &mut progress);
        }

        assert_eq!(model.displayed(), 2);
        assert!(model.position_of("S1").is_some());
        assert!(model.position_of("S3").is_some());
        assert_eq!(heartbeats, 6);
    }

    #[test]
    fn test_skip_set_excludes_handles() {
        let skip = ["S2".to_string()].into_iter().collect();
        let mut model = FlatModel::new(
            Arc::new(seeded_store()),
            EntityKind::Source,
            source::projection(),
        )
        .with_skip(skip);
        model.rebuild(&CancelToken::new());

        assert_eq!(model.displayed(), 2);
        assert!(model.position_of("S2").is_none());
    }

    #[test]
    fn test_cancellation_keeps_partial_rows() {
        let mut model = source_model();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        let outcome = {
            let mut progress = IntervalProgress::new(1, move |done, _| {
                if done == 2 {
                    trigger.cancel();
                }
            });
            model.rebuild_with_progress(&cancel, &mut progress)
        };

        assert!(outcome.was_cancelled());
        assert_eq!(model.displayed(), 1);
        assert!(model.displayed() < model.total());
        assert_eq!(model.indexed(), model.displayed());
    }

    #[test]
    fn test_cancelled_before_start_yields_empty_model() {
        let mut model = source_model();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = model.rebuild(&cancel);
        assert!(outcome.was_cancelled());
        assert_eq!(model.displayed(), 0);
    }

    #[test]
    fn test_add_then_delete_leaves_model_unchanged() {
        let mut model = source_model();
        // show a subset so an undisplayed record is available to add
        model.set_predicate(Predicate::Search(ColumnSearch::substring(0, "Smith", false)));
        model.rebuild(&CancelToken::new());

        let before: Vec<String> = model.rows().iter().map(|r| r.handle().to_string()).collect();
        let displayed = model.displayed();

        // add does not re-check the predicate
        model.add_row_by_handle("S2").unwrap();
        assert_eq!(model.displayed(), displayed + 1);
        assert_eq!(model.indexed(), model.displayed());

        model.delete_row_by_handle("S2").unwrap();
        let after: Vec<String> = model.rows().iter().map(|r| r.handle().to_string()).collect();
        assert_eq!(before, after);
        assert_eq!(model.displayed(), displayed);
        assert_eq!(model.indexed(), model.displayed());
    }

    #[test]
    fn test_duplicate_add_fails_loudly() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());

        let err = model.add_row_by_handle("S1").unwrap_err();
        assert!(err.to_string().contains("already displayed"));
        assert_eq!(model.displayed(), 3);
    }

    #[test]
    fn test_update_and_delete_of_unknown_handle_fail_loudly() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());

        assert!(model
            .update_row_by_handle("S404")
            .unwrap_err()
            .to_string()
            .contains("not displayed"));
        assert!(model
            .delete_row_by_handle("S404")
            .unwrap_err()
            .to_string()
            .contains("not displayed"));
    }

    #[test]
    fn test_update_reprojects_in_place() {
        let shared = Arc::new(SharedStore(RwLock::new(seeded_store())));
        let mut model = FlatModel::new(
            shared.clone(),
            EntityKind::Source,
            source::projection(),
        );
        model.rebuild(&CancelToken::new());

        let position = model.position_of("S2").unwrap();

        shared.0.write().unwrap().insert(
            EntityKind::Source,
            "S2",
            source_record("S2", "SRC0002", "Jones & Sons", 150, &[]),
        );
        model.update_row_by_handle("S2").unwrap();

        // same position, new projection
        assert_eq!(model.position_of("S2"), Some(position));
        assert_eq!(model.row(position).unwrap().display(0), "Jones & Sons");
        let others: Vec<Option<usize>> =
            vec![model.position_of("S1"), model.position_of("S3")];
        assert_eq!(others, vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_add_row_for_record_created_after_rebuild() {
        let shared = Arc::new(SharedStore(RwLock::new(seeded_store())));
        let mut model = FlatModel::new(
            shared.clone(),
            EntityKind::Source,
            source::projection(),
        );
        model.rebuild(&CancelToken::new());

        shared.0.write().unwrap().insert(
            EntityKind::Source,
            "S4",
            source_record("S4", "SRC0004", "Census", 400, &[]),
        );
        model.add_row_by_handle("S4").unwrap();

        assert_eq!(model.displayed(), 4);
        assert_eq!(model.total(), 4);
        assert_eq!(model.row_by_handle("S4").unwrap().display(0), "Census");
    }

    #[test]
    fn test_delete_shifts_later_positions() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());

        model.delete_row_by_handle("S1").unwrap();
        assert_eq!(model.position_of("S2"), Some(0));
        assert_eq!(model.position_of("S3"), Some(1));
        assert_eq!(model.indexed(), 2);
    }

    #[test]
    fn test_sort_by_change_uses_numeric_keys() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());

        // column 7 is change time; its sort key is raw epoch seconds
        model.sort_by(7, true).unwrap();
        let ascending: Vec<&str> = model.rows().iter().map(|r| r.handle()).collect();
        assert_eq!(ascending, vec!["S2", "S3", "S1"]);

        model.sort_by(7, false).unwrap();
        let descending: Vec<&str> = model.rows().iter().map(|r| r.handle()).collect();
        assert_eq!(descending, vec!["S1", "S3", "S2"]);

        // index follows the new order
        assert_eq!(model.position_of("S1"), Some(0));
    }

    #[test]
    fn test_sort_by_out_of_bounds_column_fails() {
        let mut model = source_model();
        model.rebuild(&CancelToken::new());
        assert!(model.sort_by(99, true).is_err());
    }

    #[test]
    fn test_color_column_comes_from_projection() {
        let model = source_model();
        assert_eq!(model.color_column(), Some(8));
    }

    #[test]
    fn test_model_over_json_fixture() {
        let fixture = r##"{
            "tags": {
                "T1": {"name": "Keep", "priority": 2, "color": "#AAAA"}
            },
            "source": [
                ["H1", "SRC0001", "Tagged", "", "", "", false, 100, ["T1"]],
                ["H2", "SRC0002", "Untagged", "", "", "", false, 200, []]
            ]
        }"##;
        let store = store_from_json_str(fixture).unwrap();
        let mut model = FlatModel::new(Arc::new(store), EntityKind::Source, source::projection());
        let mut progress = NullProgress;
        model.rebuild_with_progress(&CancelToken::new(), &mut progress);

        assert_eq!(model.displayed(), 2);
        let color = model.color_column().unwrap();
        assert_eq!(model.row_by_handle("H1").unwrap().display(color), "#AAAA");
        assert_eq!(
            model.row_by_handle("H2").unwrap().display(color),
            "#000000000000"
        );
    }
}
