mod common;

use anyhow::Result;
use common::{error_body, sample_site, write_file, Call, RecordingTransport};
use neosync::inventory::RemoteListingEntry;
use neosync::logger::{NoopLogger, TextLogger};
use neosync::{SiteSync, SyncError};
use std::collections::HashSet;
use std::path::Path;

#[test]
fn push_uploads_supported_files_one_request_each() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let site = tmp.path().join("a");
    sample_site(&site)?;

    let transport = RecordingTransport::default();
    let report = SiteSync::new(&transport, &NoopLogger).push(&site)?;

    // Files before subdirectories, names in order
    assert_eq!(
        transport.uploaded_remote_names(),
        vec!["index.html", "notes.txt", "img/logo.png"]
    );
    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|c| matches!(c, Call::Upload(pairs) if pairs.len() == 1)));
    match &calls[2] {
        Call::Upload(pairs) => {
            assert_eq!(pairs[0].0, site.join("img").join("logo.png").display().to_string());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(report.skipped, vec![site.join("data.bin")]);
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn push_never_sends_unsupported_extensions() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    for rel in ["a.exe", "b.zip", "deep/c.PDF", "d.HTML", "Makefile"] {
        write_file(tmp.path(), rel)?;
    }
    let transport = RecordingTransport::default();
    SiteSync::new(&transport, &NoopLogger).push(tmp.path())?;
    assert_eq!(transport.uploaded_remote_names(), vec!["d.HTML"]);
    Ok(())
}

#[test]
fn push_keeps_going_after_a_refused_file() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    sample_site(tmp.path())?;
    let transport = RecordingTransport {
        refuse_uploads: HashSet::from(["index.html".to_string()]),
        ..Default::default()
    };
    let report = SiteSync::new(&transport, &NoopLogger).push(tmp.path())?;
    assert_eq!(report.uploaded, vec!["notes.txt", "img/logo.png"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "index.html");
    assert_eq!(report.failures[0].1, error_body());
    assert!(!report.is_clean());
    Ok(())
}

#[test]
fn push_of_missing_directory_is_fatal() {
    let transport = RecordingTransport::default();
    let err = SiteSync::new(&transport, &NoopLogger)
        .push(Path::new("/no/such/site/dir"))
        .unwrap_err();
    assert!(matches!(err, SyncError::Filesystem { .. }));
    assert!(transport.calls().is_empty());
}

#[test]
fn upload_rejects_destination_without_extension() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_file(tmp.path(), "report.html")?;
    let transport = RecordingTransport::default();
    let sync = SiteSync::new(&transport, &NoopLogger);

    let err = sync
        .upload(&tmp.path().join("report.html"), Some("report"))
        .unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(transport.calls().is_empty());

    sync.upload(&tmp.path().join("report.html"), Some("report.html"))?;
    assert_eq!(transport.calls().len(), 1);
    assert_eq!(transport.uploaded_remote_names(), vec!["report.html"]);
    Ok(())
}

#[test]
fn upload_bypasses_extension_filter() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_file(tmp.path(), "blob.bin")?;
    let transport = RecordingTransport::default();
    SiteSync::new(&transport, &NoopLogger).upload(&tmp.path().join("blob.bin"), Some("files/blob.dat"))?;
    assert_eq!(transport.uploaded_remote_names(), vec!["files/blob.dat"]);
    Ok(())
}

#[test]
fn upload_of_absolute_source_uses_file_name() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    write_file(tmp.path(), "drafts/page.html")?;
    let source = tmp.path().join("drafts").join("page.html");
    let transport = RecordingTransport::default();
    let report = SiteSync::new(&transport, &NoopLogger).upload(&source, Some(""))?;
    assert_eq!(transport.uploaded_remote_names(), vec!["page.html"]);
    assert_eq!(report.uploaded, vec!["page.html"]);
    Ok(())
}

#[test]
fn upload_of_missing_source_sends_nothing() {
    let transport = RecordingTransport::default();
    let err = SiteSync::new(&transport, &NoopLogger)
        .upload(Path::new("/no/such/file.html"), None)
        .unwrap_err();
    assert!(matches!(err, SyncError::Filesystem { .. }));
    assert!(transport.calls().is_empty());
}

#[test]
fn upload_root_sends_one_unfiltered_batch() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    sample_site(tmp.path())?;
    let transport = RecordingTransport::default();
    let report = SiteSync::new(&transport, &NoopLogger).upload_root(Some(tmp.path()))?;

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let Call::Upload(pairs) = &calls[0] else {
        panic!("expected an upload, got {calls:?}");
    };
    // An absolute root names files relative to itself
    let remotes: Vec<&str> = pairs.iter().map(|(_, r)| r.as_str()).collect();
    assert_eq!(remotes, vec!["data.bin", "index.html", "notes.txt", "img/logo.png"]);
    assert_eq!(pairs[3].0, tmp.path().join("img").join("logo.png").display().to_string());
    assert_eq!(report.uploaded, remotes);
    Ok(())
}

#[test]
fn upload_root_of_empty_tree_sends_nothing() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    std::fs::create_dir_all(tmp.path().join("empty"))?;
    let transport = RecordingTransport::default();
    let report = SiteSync::new(&transport, &NoopLogger).upload_root(Some(tmp.path()))?;
    assert!(report.uploaded.is_empty());
    assert!(transport.calls().is_empty());
    Ok(())
}

#[test]
fn delete_all_removes_files_then_dirs_and_keeps_index() -> Result<()> {
    let transport = RecordingTransport::with_listing(vec![
        RemoteListingEntry::file("index.html"),
        RemoteListingEntry::file("about.html"),
        RemoteListingEntry::dir("img"),
    ]);
    let report = SiteSync::new(&transport, &NoopLogger).delete_all()?;
    assert_eq!(
        transport.calls(),
        vec![
            Call::List(None),
            Call::Delete(vec!["about.html".into()]),
            Call::Delete(vec!["img".into()]),
        ]
    );
    assert_eq!(report.deleted, vec!["about.html", "img"]);
    Ok(())
}

#[test]
fn delete_all_on_bare_site_only_lists() -> Result<()> {
    let transport = RecordingTransport::with_listing(vec![RemoteListingEntry::dir("index.html")]);
    SiteSync::new(&transport, &NoopLogger).delete_all()?;
    assert_eq!(transport.calls(), vec![Call::List(None)]);
    Ok(())
}

#[test]
fn delete_all_aborts_on_refused_listing() {
    let transport = RecordingTransport {
        fail_list: true,
        ..Default::default()
    };
    let err = SiteSync::new(&transport, &NoopLogger).delete_all().unwrap_err();
    match err {
        SyncError::RemoteProtocol { raw, .. } => assert_eq!(raw["error_type"], "invalid_auth"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(transport.calls(), vec![Call::List(None)]);
}

#[test]
fn delete_sends_one_batch() -> Result<()> {
    let transport = RecordingTransport::default();
    let names = vec!["a.html".to_string(), "img".to_string()];
    SiteSync::new(&transport, &NoopLogger).delete(&names)?;
    assert_eq!(transport.calls(), vec![Call::Delete(names)]);
    Ok(())
}

#[test]
fn info_and_list_normalize_site_names() -> Result<()> {
    let transport = RecordingTransport::default();
    let sync = SiteSync::new(&transport, &NoopLogger);
    let info = sync.info(Some("kyle.neocities.org"))?;
    assert_eq!(info["sitename"], "kyle");
    sync.list(None)?;
    assert_eq!(
        transport.calls(),
        vec![Call::Info(Some("kyle".into())), Call::List(None)]
    );
    Ok(())
}

#[test]
fn log_file_records_each_operation() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let site = tmp.path().join("site");
    sample_site(&site)?;
    let log_path = tmp.path().join("sync.log");
    let logger = TextLogger::new(&log_path)?;

    let transport = RecordingTransport::with_listing(vec![RemoteListingEntry::file("old.css")]);
    let sync = SiteSync::new(&transport, &logger);
    sync.push(&site)?;
    sync.delete_all()?;
    drop(logger);

    let log = std::fs::read_to_string(&log_path)?;
    assert_eq!(log.lines().filter(|l| l.contains("UPLOAD ")).count(), 3);
    assert_eq!(log.lines().filter(|l| l.contains("SKIP ")).count(), 1);
    assert!(log.lines().any(|l| l.ends_with("DELETE path=old.css")));
    assert!(log.lines().any(|l| l.contains("DONE op=push files=3 failed=0")));
    Ok(())
}
