use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const ARTIST_LIST_XML: &str = "<?xml version=\"1.0\"?>
<artist-list>
    <artist><name>Fleetwood Mac</name></artist>
    <artist><name>Fleetwood</name></artist>
    <artist><name>Mick Fleetwood</name></artist>
</artist-list>";

fn revmap(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_revmap"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("REVMAP_NAMING")
        .env_remove("REVMAP_PRETTY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn revmap");
    {
        let mut pipe = child.stdin.take().expect("stdin");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }
    child.wait_with_output().expect("wait for revmap")
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("revmap-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_convert_xml_file_to_json() {
    let input = scratch_file("artist_list.xml", ARTIST_LIST_XML);
    let output = revmap(&["convert", input.to_str().unwrap()], None);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"artist-list":{"artist":[{"name":"Fleetwood Mac"},{"name":"Fleetwood"},{"name":"Mick Fleetwood"}]}}"#
    );
}

#[test]
fn test_convert_stdin_json_to_xml_file() {
    let target = scratch_file("out.xml", "");
    let output = revmap(
        &["convert", "-", "--from", "json", "--output", target.to_str().unwrap()],
        Some(r#"{"artist-list":{"artist":{"name":"Fleetwood Mac"}}}"#),
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.ends_with(
        "<artist-list><artist><name>Fleetwood Mac</name></artist></artist-list>"
    ));
}

#[test]
fn test_reports_decode_errors() {
    let output = revmap(
        &["convert", "-", "--from", "xml"],
        Some("<artist-list><artist><name>a</name><name>b</name></artist></artist-list>"),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ambiguous cardinality"), "{}", stderr);
}

#[test]
fn test_stdin_without_format_fails() {
    let output = revmap(&["convert", "-"], Some("{}"));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--from"));
}
