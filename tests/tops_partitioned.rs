#[path = "common/mod.rs"]
mod common;

use common::*;
use querytop::{
    partition_output, Action, Aggregation, CheckType, Event, KeyTransform, NullSink, QueryTop, RecordPipeline,
    RecordingSink, SplitByKey, TopOptions,
};

/// Rows (US,x), (US,x), (RU,y) → US→{x:2}, RU→{y:1}.
#[test]
fn partitions_by_key_column() {
    let opts = TopOptions::default().with_query_column(2).with_split_by_key(SplitByKey::new(1));
    let pipeline = RecordPipeline::compile(&opts).unwrap();
    let tally = pipeline.process_text("t", "US\tx\nUS\tx\nRU\ty\n", &mut NullSink).unwrap();

    let Aggregation::Partitioned(t) = tally.table else { panic!("expected partitions") };
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("US").unwrap().get("x"), Some(2));
    assert_eq!(t.get("US").unwrap().len(), 1);
    assert_eq!(t.get("RU").unwrap().get("y"), Some(1));
    assert_eq!(t.get("RU").unwrap().len(), 1);
}

/// Region ids are remapped through the key file; id 7 is unknown and lands under
/// the default key with one warning event. The run still finishes.
///
/// Layout: Output/queries/{US,RU,!KeyNotInDict}.txt
#[test]
fn transformed_keys_with_default_fallback() {
    let (input, output, key_file) = make_query_log();
    let mut sink = RecordingSink::new();

    let report = QueryTop::new()
        .input_dir(&input)
        .output_dir(&output)
        .count_column(3)
        .split_by_key(
            SplitByKey::new(2).with_transform(KeyTransform { path: key_file, ..Default::default() }),
        )
        .run(&mut sink)
        .unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.files[0].outputs.len(), 3);
    assert_eq!(report.files[0].stats.key_misses, 1);

    let dir = output.join("queries");
    assert_eq!(read_top(&dir.join("US.txt")), vec![(5, "rust book".to_string())]);
    assert_eq!(
        read_top(&dir.join("RU.txt")),
        vec![(5, "weather".to_string()), (4, "rust  tokio".to_string())]
    );
    assert_eq!(read_top(&dir.join("!KeyNotInDict.txt")), vec![(1, "weather".to_string())]);

    let warnings: Vec<&Event> = sink.warnings().collect();
    assert_eq!(
        warnings,
        vec![&Event::KeyNotInTable {
            name: "queries".into(),
            line: 4,
            key: "7".into(),
            substituted: "!KeyNotInDict".into(),
        }]
    );
    assert!(matches!(sink.events.last(), Some(Event::RunFinished { done: 1, failed: 0 })));
}

/// Custom default key, and a compliance filter applied before partitioning:
/// rows whose items are all dropped never touch the key column.
#[test]
fn custom_default_key_and_filter_before_key() {
    let base = tempfile::tempdir().unwrap();
    let key_file = base.path().join("keys.txt");
    write_lines(&key_file, &["1\tUS"]);

    let opts = TopOptions::default()
        .with_split_by_key(
            SplitByKey::new(2)
                .with_transform(KeyTransform { path: key_file, ..Default::default() })
                .with_default_key("ZZ"),
        )
        .with_compliance_test(
            CheckType::ExactMembership { items: vec!["drop".into()] },
            Action::Delete,
        );

    let pipeline = RecordPipeline::compile(&opts).unwrap();
    let mut sink = RecordingSink::new();
    // Row 2 is dropped by the filter and has no key column at all.
    let tally = pipeline.process_text("t", "a\t1\ndrop\nb\t2\n", &mut sink).unwrap();

    let Aggregation::Partitioned(t) = tally.table else { panic!("expected partitions") };
    assert_eq!(t.get("US").unwrap().get("a"), Some(1));
    assert_eq!(t.get("ZZ").unwrap().get("b"), Some(1));
    assert_eq!(tally.stats.dropped, 1);
    assert_eq!(sink.warnings().count(), 1);
}

/// Path separators inside a key cannot escape the per-source directory, and keys
/// that differ only in a separator versus `_` or `%2F` still get their own files.
#[test]
fn keys_with_separators_stay_inside_source_dir() {
    let base = tempfile::tempdir().unwrap();
    let input = base.path().join("in");
    write_lines(&input.join("log.txt"), &["a/b\tq", "a/b\tq", "a_b\tr", "a%2Fb\ts", "a\\b\tt"]);
    let output = base.path().join("out");

    let report = QueryTop::new()
        .input_dir(&input)
        .output_dir(&output)
        .query_column(2)
        .split_by_key(SplitByKey::new(1))
        .run(&mut NullSink)
        .unwrap();

    let dir = output.join("log");
    assert_eq!(read_top(&dir.join("a%2Fb.txt")), vec![(2, "q".to_string())]);
    assert_eq!(read_top(&dir.join("a_b.txt")), vec![(1, "r".to_string())]);
    assert_eq!(read_top(&dir.join("a%252Fb.txt")), vec![(1, "s".to_string())]);
    assert_eq!(read_top(&dir.join("a%5Cb.txt")), vec![(1, "t".to_string())]);

    let mut outputs = report.files[0].outputs.clone();
    outputs.sort();
    outputs.dedup();
    assert_eq!(outputs.len(), 4);
    assert_eq!(partition_output(&output, "log", "a/b", ".txt"), dir.join("a%2Fb.txt"));
}
