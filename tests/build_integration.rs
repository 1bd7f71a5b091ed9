//! Integration tests for `mdsite build`, `render` and `title`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn mdsite_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdsite"))
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title> {{ Title }} </title><link href="/index.css" rel="stylesheet"></head>
<body><article>{{ Content }}</article></body>
</html>
"#;

/// Lay out a small site: static assets, nested content, and a template.
fn scaffold(root: &Path) {
    fs::create_dir_all(root.join("static/images")).unwrap();
    fs::write(root.join("static/index.css"), "body { color: #333; }").unwrap();
    fs::write(root.join("static/images/tolkien.png"), [137u8, 80, 78, 71]).unwrap();

    fs::create_dir_all(root.join("content/blog/glorfindel")).unwrap();
    fs::write(
        root.join("content/index.md"),
        "# Tolkien Fan Club\n\n![JRR Tolkien sitting](/images/tolkien.png)\n\nHere's the deal, **I like Tolkien**.\n",
    )
    .unwrap();
    fs::write(
        root.join("content/blog/glorfindel/index.md"),
        "# Why Glorfindel is More Impressive than Legolas\n\n- one\n- two\n\n[Back Home](/)\n",
    )
    .unwrap();
    fs::write(root.join("content/notes.txt"), "not markdown").unwrap();

    fs::write(root.join("template.html"), TEMPLATE).unwrap();
}

fn build(root: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(mdsite_bin())
        .args(["build", "--quiet", "--root"])
        .arg(root)
        .args(extra)
        .output()
        .expect("failed to run mdsite build")
}

#[test]
fn build_produces_mirrored_tree() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());

    let output = build(dir.path(), &[]);
    assert!(output.status.success(), "build failed: {}", String::from_utf8_lossy(&output.stderr));

    let public = dir.path().join("public");
    assert!(public.join("index.html").exists());
    assert!(public.join("blog/glorfindel/index.html").exists());
    assert!(public.join("index.css").exists());
    assert!(public.join("images/tolkien.png").exists());
    assert!(!public.join("notes.html").exists(), "only .md files become pages");
}

#[test]
fn build_renders_title_and_content() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    assert!(build(dir.path(), &[]).status.success());

    let html = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
    assert!(html.contains("<title> Tolkien Fan Club </title>"));
    assert!(html.contains(
        r#"<div><h1>Tolkien Fan Club</h1><p><img src="/images/tolkien.png" alt="JRR Tolkien sitting"></p><p>Here's the deal, <b>I like Tolkien</b>.</p></div>"#
    ));

    let post = fs::read_to_string(dir.path().join("public/blog/glorfindel/index.html")).unwrap();
    assert!(post.contains("<ul><li>one</li><li>two</li></ul>"));
    assert!(post.contains(r#"<a href="/">Back Home</a>"#));
}

#[test]
fn basepath_rewrites_links() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    assert!(build(dir.path(), &["--basepath", "/fanclub/", "--out", "docs"]).status.success());

    let html = fs::read_to_string(dir.path().join("docs/index.html")).unwrap();
    assert!(html.contains(r#"<link href="/fanclub/index.css""#));
    assert!(html.contains(r#"src="/fanclub/images/tolkien.png""#));
}

#[test]
fn config_file_sets_directories() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    fs::write(dir.path().join("mdsite.json"), r#"{ "outDir": "site" }"#).unwrap();

    assert!(build(dir.path(), &[]).status.success());
    assert!(dir.path().join("site/index.html").exists());
    assert!(!dir.path().join("public").exists());
}

#[test]
fn clean_removes_stale_output() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    fs::create_dir_all(dir.path().join("public")).unwrap();
    fs::write(dir.path().join("public/stale.html"), "old").unwrap();

    assert!(build(dir.path(), &["--clean"]).status.success());
    assert!(!dir.path().join("public/stale.html").exists());
    assert!(dir.path().join("public/index.html").exists());
}

#[test]
fn malformed_page_fails_build_with_path() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    fs::write(dir.path().join("content/broken.md"), "# Broken\n\nodd **bold").unwrap();

    let output = build(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.md"), "stderr: {stderr}");
    assert!(stderr.contains("Unbalanced delimiter"), "stderr: {stderr}");
}

#[test]
fn render_prints_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("page.md");
    fs::write(&file, "# Title\n\nHello **world**").unwrap();

    let output = Command::new(mdsite_bin())
        .arg("render")
        .arg(&file)
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "<div><h1>Title</h1><p>Hello <b>world</b></p></div>"
    );
}

#[test]
fn render_json_tree() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("page.md");
    fs::write(&file, "plain").unwrap();

    let output = Command::new(mdsite_bin())
        .args(["render", "--format", "json"])
        .arg(&file)
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tag"], "div");
    assert_eq!(json["children"][0]["tag"], "p");
    assert_eq!(json["children"][0]["children"][0]["value"], "plain");
}

#[test]
fn title_command() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("page.md");
    fs::write(&file, "intro\n\n# The Title\n").unwrap();

    let output = Command::new(mdsite_bin())
        .arg("title")
        .arg(&file)
        .output()
        .expect("failed to run mdsite title");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "The Title");
}

#[test]
fn render_page_applies_config_basepath() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    fs::write(dir.path().join("mdsite.json"), r#"{ "basepath": "/fanclub/" }"#).unwrap();

    let output = Command::new(mdsite_bin())
        .args(["render", "--format", "page", "--root"])
        .arg(dir.path())
        .arg(dir.path().join("content/index.md"))
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success(), "render failed: {}", String::from_utf8_lossy(&output.stderr));

    let html = String::from_utf8_lossy(&output.stdout);
    assert!(html.contains("<title> Tolkien Fan Club </title>"));
    assert!(html.contains(r#"<link href="/fanclub/index.css""#));
    assert!(html.contains(r#"src="/fanclub/images/tolkien.png""#));
}

#[test]
fn render_page_basepath_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    fs::write(dir.path().join("mdsite.json"), r#"{ "basepath": "/fanclub/" }"#).unwrap();

    let output = Command::new(mdsite_bin())
        .args(["render", "--format", "page", "--basepath", "/x/", "--root"])
        .arg(dir.path())
        .arg(dir.path().join("content/index.md"))
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success(), "render failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains(r#"<link href="/x/index.css""#));
}
