//! Integration tests for jobs driven by caller-supplied hooks

use eyre::Result;
use record_etl::record::stringify;
use record_etl::{EtlError, HookRegistry, Job, OutputConfig, RecordSet, SourceReader};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

fn pipe_registry(events: Rc<RefCell<Vec<&'static str>>>) -> HookRegistry {
    let (pre, post) = (events.clone(), events);
    HookRegistry::new()
        .with_transform("pipe", |record| {
            let fields: Vec<String> = record.values().map(stringify).collect();
            Ok(format!("{}\n", fields.join("|")))
        })
        .with_lifecycle("pipe_pre", move || {
            pre.borrow_mut().push("pre");
            Ok(())
        })
        .with_lifecycle("pipe_post", move || {
            post.borrow_mut().push("post");
            Ok(())
        })
}

#[test]
fn test_hook_output_is_concatenated_verbatim() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("in.csv");
    std::fs::write(&source, "a;b\n1;2\n3;4\n")?;
    let destination = temp_dir.path().join("out.txt");
    let events = Rc::new(RefCell::new(Vec::new()));

    let report = Job::new(
        SourceReader::new(&source, "CSV"),
        OutputConfig::new(&destination, "CSV").with_hook("pipe"),
        pipe_registry(events.clone()),
    )?
    .run()?;

    assert_eq!(report.loaded, 2);
    assert_eq!(std::fs::read_to_string(&destination)?, "1|2\n3|4\n");
    assert_eq!(*events.borrow(), vec!["pre", "post"]);
    Ok(())
}

#[test]
fn test_lifecycle_hooks_run_for_an_empty_record_set() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let destination = temp_dir.path().join("out.txt");
    let events = Rc::new(RefCell::new(Vec::new()));

    let report = Job::new(
        RecordSet::new(),
        OutputConfig::new(&destination, "CSV").with_hook("pipe"),
        pipe_registry(events.clone()),
    )?
    .run()?;

    assert!(!report.written());
    assert!(!destination.exists());
    assert_eq!(*events.borrow(), vec!["pre", "post"]);
    Ok(())
}

#[test]
fn test_hook_bypasses_target_format() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let destination = temp_dir.path().join("out.yaml");
    let records: RecordSet = vec![record_etl::record::record_from_pairs([("k", "v")])];

    Job::new(
        records,
        OutputConfig::new(&destination, "YAML").with_hook("pipe"),
        pipe_registry(Rc::new(RefCell::new(Vec::new()))),
    )?
    .run()?;

    assert_eq!(std::fs::read_to_string(&destination)?, "v\n");
    Ok(())
}

#[test]
fn test_missing_hook_fails_before_reading() {
    let output = OutputConfig::new("never-written.csv", "CSV").with_hook("absent");
    let err = Job::new(
        SourceReader::new("does-not-exist.csv", "CSV"),
        output,
        HookRegistry::new(),
    )
    .err()
    .unwrap();

    assert!(matches!(
        err.downcast_ref::<EtlError>(),
        Some(EtlError::MethodNotFound(name)) if name == "absent"
    ));
}

#[test]
fn test_failing_pre_hook_stops_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let destination = temp_dir.path().join("out.txt");
    let rows = Rc::new(RefCell::new(0));
    let counter = rows.clone();

    let registry = HookRegistry::new()
        .with_transform("count", move |_| {
            *counter.borrow_mut() += 1;
            Ok(String::new())
        })
        .with_lifecycle("count_pre", || eyre::bail!("not ready"));

    let records: RecordSet = vec![record_etl::record::record_from_pairs([("k", "v")])];
    let err = Job::new(
        records,
        OutputConfig::new(&destination, "CSV").with_hook("count"),
        registry,
    )?
    .run()
    .unwrap_err();

    assert!(format!("{:#}", err).contains("not ready"));
    assert_eq!(*rows.borrow(), 0);
    assert!(!destination.exists());
    Ok(())
}
