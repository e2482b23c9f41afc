//! Functional tests for retention guarantees across whole runs

use crate::common::{CliTestRunner, TestFixture};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Three apps with different histories, including a reused installer
fn populate(fixture: &TestFixture) {
    // unchanged installer over four backups
    for stamp in ["20230101-000000", "20230201-000000", "20230301-000000", "20230401-000000"] {
        fixture.create_backup("com.shared", stamp, Some("same")).unwrap();
    }
    fixture.create_installer("com.shared", "same").unwrap();

    // new installer every time
    for (stamp, md5) in [
        ("20230105-120000", "v1"),
        ("20230210-120000", "v2"),
        ("20230315-120000", "v3"),
    ] {
        fixture.create_app_backup("com.updated", stamp, md5).unwrap();
    }

    fixture.create_backup("misc.data", "20221231-235959", None).unwrap();
}

#[test]
fn test_dry_run_matches_real_run() {
    for keep in ["1", "2", "3"] {
        let runner = CliTestRunner::new().unwrap();
        let fixture = runner.fixture();
        populate(fixture);
        let before: BTreeSet<String> = fixture.file_names().into_iter().collect();

        let planned = runner.expect_success(&["--dryrun", "--keep", keep]);
        assert_eq!(
            fixture.file_names().into_iter().collect::<BTreeSet<_>>(),
            before
        );

        let actual = runner.expect_success(&["--keep", keep]);
        assert_eq!(planned.removed_paths(), actual.removed_paths(), "keep={}", keep);
        assert_eq!(planned.summary(), actual.summary(), "keep={}", keep);

        let after: BTreeSet<String> = fixture.file_names().into_iter().collect();
        let removed: BTreeSet<String> = before.difference(&after).cloned().collect();
        let reported: BTreeSet<String> = actual
            .removed_paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(removed, reported, "keep={}", keep);
    }
}

#[test]
fn test_second_run_removes_nothing() {
    let runner = CliTestRunner::new().unwrap();
    populate(runner.fixture());

    let first = runner.expect_success(&["-k", "2"]);
    assert!(first.summary().files_removed > 0);

    let before = runner.fixture().file_names();
    let second = runner.expect_success(&["-k", "2"]);
    assert_eq!(second.summary().files_removed, 0);
    assert_eq!(second.summary().purged_groups, 0);
    assert_eq!(runner.fixture().file_names(), before);
}

#[test]
fn test_exactly_keep_newest_remain() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    populate(fixture);

    runner.expect_success(&["-k", "2"]);

    let expected: Vec<&str> = vec![
        "com.shared-20230301-000000.properties",
        "com.shared-20230301-000000.tar.gz",
        "com.shared-20230401-000000.properties",
        "com.shared-20230401-000000.tar.gz",
        "com.shared-same.apk.gz",
        "com.updated-20230210-120000.properties",
        "com.updated-20230210-120000.tar.gz",
        "com.updated-20230315-120000.properties",
        "com.updated-20230315-120000.tar.gz",
        "com.updated-v2.apk.gz",
        "com.updated-v3.apk.gz",
        "misc.data-20221231-235959.properties",
        "misc.data-20221231-235959.tar.gz",
    ];
    assert_eq!(fixture.file_names(), expected);
}

#[test]
fn test_keep_equal_to_count_removes_nothing() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    for stamp in ["20230101-000000", "20230201-000000", "20230301-000000"] {
        fixture.create_backup("foo", stamp, None).unwrap();
    }
    let before = fixture.file_names();

    let report = runner.expect_success(&["-k", "3"]);

    assert_eq!(report.summary().files_removed, 0);
    assert_eq!(report.apps[0].kept.len(), 3);
    assert_eq!(fixture.file_names(), before);
}

#[test]
fn test_shared_installer_never_removed_while_kept() {
    for keep in ["1", "2", "3", "4"] {
        let runner = CliTestRunner::new().unwrap();
        let fixture = runner.fixture();
        populate(fixture);
        let installer: PathBuf = fixture.path("com.shared-same.apk.gz");

        let report = runner.expect_success(&["-k", keep]);

        assert!(installer.exists(), "keep={}", keep);
        assert!(!report.removed_paths().contains(&installer));
        let purged = report
            .apps
            .iter()
            .find(|app| app.app_name == "com.shared")
            .map(|app| app.purged.len())
            .unwrap();
        assert_eq!(
            report.summary().installers_preserved,
            purged,
            "keep={}",
            keep
        );
    }
}
