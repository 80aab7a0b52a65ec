use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("digidocs-engine")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn render_writes_html_document() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("article.html");
    let config = temp_dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(&config)
        .arg("render")
        .arg(fixture_path("article.md"))
        .arg("--out")
        .arg(&out)
        .arg("--title")
        .arg("Чайная статья");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("article.html"));

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<title>Чайная статья</title>"));
    assert!(html.contains("<h1>Чайная статья</h1>"));
    assert!(html.contains("<strong>важной</strong>"));
}

#[test]
fn render_uses_configured_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    let out_dir = temp_dir.path().join("out");
    std::fs::write(
        &config,
        format!("output_dir = {:?}\n", out_dir.to_string_lossy()),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(&config)
        .arg("render")
        .arg(fixture_path("titled_crlf.md"));

    cmd.assert().success();
    assert!(out_dir.join("titled_crlf.html").exists());
}

#[test]
fn render_uses_configured_template() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    let template = temp_dir.path().join("page.html");
    let out = temp_dir.path().join("page-out.html");
    std::fs::write(
        &template,
        "<title>{{title}}</title>\n<article>\n{{body}}</article>\n",
    )
    .unwrap();
    std::fs::write(
        &config,
        format!("template_id = {:?}\n", template.to_string_lossy()),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(&config)
        .arg("render")
        .arg(fixture_path("titled_crlf.md"))
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with(
        "<title>Свой заголовок</title>\n<article>\n<h1>Свой заголовок</h1>"
    ));
    assert!(html.ends_with("</article>\n"));
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[test]
fn render_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(temp_dir.path().join("config.toml"))
        .arg("render")
        .arg(temp_dir.path().join("missing.md"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing.md"));
}

#[test]
fn settings_set_then_show_masks_keys() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");

    let mut set = cargo_bin_cmd!("digidocs");
    set.arg("--config")
        .arg(&config)
        .args(["settings", "set", "OPENROUTER_KEY", "sk-or-v1-abcdef"]);
    set.assert().success();

    let mut show = cargo_bin_cmd!("digidocs");
    show.arg("--config").arg(&config).args(["settings", "show"]);
    show.assert().success().stdout(
        predicate::str::contains("sk-o••••cdef")
            .and(predicate::str::contains("\"OPENROUTER_MODEL\": \"gpt-4o\""))
            .and(predicate::str::contains("abcdef").not()),
    );
}

#[test]
fn settings_set_rejects_unknown_key() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(temp_dir.path().join("config.toml"))
        .args(["settings", "set", "NOPE", "x"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting NOPE"));
}

#[test]
fn prompt_uses_stored_model() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "openrouter_model = \"stored-model\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("digidocs");
    cmd.arg("--config")
        .arg(&config)
        .args(["prompt", "Про чай", "--format", "новость", "--json"]);

    cmd.assert().success().stdout(
        predicate::str::contains("\"model\": \"stored-model\"")
            .and(predicate::str::contains("Новостная заметка"))
            .and(predicate::str::contains("ТЗ: Про чай")),
    );
}
