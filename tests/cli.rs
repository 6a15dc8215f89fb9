use std::fs;
use std::path::Path;
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_tf-idf-similarity");

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn writes_single_result_line() {
    let dir = tempfile::tempdir().unwrap();
    let orig = write(dir.path(), "orig.txt", "the cat sat on the mat");
    let copy = write(dir.path(), "copy.txt", "the cat sat on the mat!");
    let out = dir.path().join("out.txt");

    let status = Command::new(BIN)
        .arg(&orig)
        .arg(&copy)
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let content = fs::read_to_string(&out).unwrap();
    let prefix = format!("{} vs {} similarity: ", orig.display(), copy.display());
    assert!(content.starts_with(&prefix), "{content}");
    assert!(content.ends_with('\n'));
    assert_eq!(content.lines().count(), 1);
    assert_eq!(&content[prefix.len()..], "1.0\n");
}

#[test]
fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let orig = write(dir.path(), "orig.txt", "some text");
    let out = dir.path().join("out.txt");

    let output = Command::new(BIN)
        .arg(&orig)
        .arg(dir.path().join("missing.txt"))
        .arg(&out)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.txt"));
    assert!(!out.exists());
}

#[test]
fn empty_document_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let orig = write(dir.path(), "orig.txt", "some text");
    let empty = write(dir.path(), "empty.txt", "，。！");
    let out = dir.path().join("out.txt");

    let output = Command::new(BIN).arg(&orig).arg(&empty).arg(&out).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("empty after normalization"));
    assert!(!out.exists());
}

#[test]
fn snapshot_and_segmenter_flags() {
    let dir = tempfile::tempdir().unwrap();
    let orig = write(dir.path(), "orig.txt", "alpha beta gamma");
    let copy = write(dir.path(), "copy.txt", "alpha beta delta");
    let out = dir.path().join("out.txt");
    let snapshot = dir.path().join("cmp.cbor");

    let status = Command::new(BIN)
        .arg(&orig)
        .arg(&copy)
        .arg(&out)
        .args(["--segmenter", "whitespace", "--idf", "plain", "--snapshot"])
        .arg(&snapshot)
        .status()
        .unwrap();
    assert!(status.success());

    let cmp = tf_idf_similarity::Comparison::read_snapshot(&snapshot).unwrap();
    assert_eq!(cmp.vocabulary().len(), 4);
    let line = fs::read_to_string(&out).unwrap();
    assert_eq!(line, format!("{}\n", cmp.report_line()));
}

#[test]
fn failed_output_write_removes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let orig = write(dir.path(), "orig.txt", "alpha beta gamma");
    let copy = write(dir.path(), "copy.txt", "alpha beta delta");
    // a directory cannot be written as a file
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let snapshot = dir.path().join("cmp.cbor");

    let output = Command::new(BIN)
        .arg(&orig)
        .arg(&copy)
        .arg(&out)
        .arg("--snapshot")
        .arg(&snapshot)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot write"));
    assert!(!snapshot.exists());
}

#[test]
fn wrong_argument_count_fails() {
    let output = Command::new(BIN).arg("only-one").output().unwrap();
    assert!(!output.status.success());
}
