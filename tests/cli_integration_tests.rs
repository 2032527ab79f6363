mod utils;

use utils::{run_bin, stdout, template_dir, vars_file, write_files};

const MARKER: &str = "#<Slim_Error_for_python>: ";

#[test]
fn renders_template_relative_to_include_dir() {
    let dir = template_dir(&[("greet.slim", "| Hello #{name}")]);
    let vars = vars_file(dir.path(), r#"{"name": "World"}"#);

    let output = run_bin(&[dir.path().to_str().unwrap(), "greet.slim", vars.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Hello World\n");
}

#[test]
fn temp_template_path_ignores_include_dir() {
    let tmp = tempfile::Builder::new().prefix("tmp").tempdir_in("/tmp").unwrap();
    assert!(tmp.path().to_str().unwrap().contains("/tmp/tmp"));
    write_files(tmp.path(), &[("page.slim", "p= title")]);
    let vars = vars_file(tmp.path(), r#"{"title": "From temp"}"#);
    let template = tmp.path().join("page.slim");

    let output = run_bin(&[
        "/nonexistent/include/dir",
        template.to_str().unwrap(),
        vars.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "<p>From temp</p>\n");
}

#[test]
fn malformed_json_prints_marker_and_exits_zero() {
    let dir = template_dir(&[("greet.slim", "| Hello #{name}")]);
    let vars = vars_file(dir.path(), "{\"name\": ");

    let output = run_bin(&[dir.path().to_str().unwrap(), "greet.slim", vars.to_str().unwrap()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with(MARKER), "unexpected output: {out}");
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn missing_vars_file_prints_marker() {
    let dir = template_dir(&[("greet.slim", "| Hello")]);
    let missing = dir.path().join("absent.json");

    let output = run_bin(&[dir.path().to_str().unwrap(), "greet.slim", missing.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with(MARKER));
}

#[test]
fn undefined_binding_prints_marker() {
    let dir = template_dir(&[("greet.slim", "| Hello #{name}")]);
    let vars = vars_file(dir.path(), "{}");

    let output = run_bin(&[dir.path().to_str().unwrap(), "greet.slim", vars.to_str().unwrap()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with(MARKER));
    assert!(!out.contains("Hello"));
}

#[test]
fn missing_arguments_are_fatal() {
    let output = run_bin(&["/templates", "home.slim"]);
    assert!(!output.status.success());
    assert!(!stdout(&output).contains(MARKER));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = template_dir(&[(
        "list.slim",
        "ul#items.list data-count=items.size\n  - items.each do |item|\n    li= item",
    )]);
    let vars = vars_file(dir.path(), r#"{"items": ["a", "b", "c"]}"#);
    let args = [dir.path().to_str().unwrap(), "list.slim", vars.to_str().unwrap()];

    let first = run_bin(&args);
    let second = run_bin(&args);
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(
        stdout(&first),
        "<ul id=\"items\" class=\"list\" data-count=\"3\"><li>a</li><li>b</li><li>c</li></ul>\n"
    );
}

#[test]
fn logs_stay_off_stdout() {
    let dir = template_dir(&[("greet.slim", "| Hi")]);
    let vars = vars_file(dir.path(), "{}");
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_slimbridge"))
        .args([dir.path().to_str().unwrap(), "greet.slim", vars.to_str().unwrap()])
        .env("SLIMBRIDGE_LOG", "debug")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hi\n");
}
