//! Integration tests for the `backhoe` CLI binary.
//!
//! The CLI runs as a subprocess against the small fixture topology, so no
//! test needs the network.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Helper: locate the `backhoe` binary built by `cargo test`.
fn backhoe_bin() -> String {
    let path = env!("CARGO_BIN_EXE_backhoe");
    assert!(Path::new(path).exists(), "backhoe binary not found at {path}");
    path.to_owned()
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mini-states.json")
}

/// Helper: run backhoe with args and return (`exit_code`, stdout, stderr).
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(backhoe_bin())
        .args(args)
        .env_remove("BACKHOE_TOPOLOGY_FILE")
        .env_remove("BACKHOE_TOPOLOGY_URL")
        .env_remove("BACKHOE_SERVICE_AREAS_FILE")
        .env_remove("BACKHOE_LOG_LEVEL")
        .output()
        .expect("failed to execute backhoe");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("backhoe"), "version output: {stdout}");
}

#[test]
fn test_help_lists_commands() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("export"));
    assert!(stdout.contains("render-map"));
}

#[test]
fn test_no_command_fails() {
    let (code, _, _) = run(&[]);
    assert_ne!(code, 0);
}

// ── Export ───────────────────────────────────────────────────────────

#[test]
fn test_export_writes_the_site() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site");
    let topo = fixture();

    let (code, stdout, stderr) = run(&[
        "export",
        "--out",
        out.to_str().unwrap(),
        "--topology-file",
        topo.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Site exported"), "stdout: {stdout}");

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains(r#"class="usa-map""#));
    assert!(index.contains(r#"width="1280""#));
    assert!(index.contains("/static/site.css"));

    for width in [375, 768, 1280] {
        let svg = fs::read_to_string(out.join(format!("map-{width}.svg"))).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&format!(r#"width="{width}""#)));
        assert!(!svg.contains("usa-map-loading"));
    }

    assert!(!fs::read_to_string(out.join("static/site.css")).unwrap().is_empty());
    let directory = fs::read_to_string(out.join("service-areas/index.html")).unwrap();
    assert!(directory.contains(r#"href="/service-areas/california/""#));
    let california = fs::read_to_string(out.join("service-areas/california/index.html")).unwrap();
    assert!(california.contains("Equipment Rental in California"));
    assert!(out.join("service-areas/new-york/index.html").exists());
}

#[test]
fn test_export_custom_widths() {
    let dir = tempfile::tempdir().unwrap();
    let topo = fixture();

    let (code, _, stderr) = run(&[
        "export",
        "--out",
        dir.path().to_str().unwrap(),
        "--topology-file",
        topo.to_str().unwrap(),
        "--widths",
        "480,960",
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(dir.path().join("map-480.svg").exists());
    assert!(dir.path().join("map-960.svg").exists());
    assert!(!dir.path().join("map-1280.svg").exists());

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains(r#"width="960""#));
}

#[test]
fn test_export_rejects_out_of_range_width() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(&[
        "export",
        "--out",
        dir.path().to_str().unwrap(),
        "--widths",
        "100",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("100"), "stderr: {stderr}");
    assert!(!dir.path().join("index.html").exists());
}

#[test]
fn test_export_without_topology_uses_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(&[
        "export",
        "--out",
        dir.path().to_str().unwrap(),
        "--topology-file",
        "/no/such/topology.json",
        "--widths",
        "768",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Topology unavailable"), "stdout: {stdout}");

    let svg = fs::read_to_string(dir.path().join("map-768.svg")).unwrap();
    assert!(svg.contains("usa-map-loading"));
    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("map-spinner"));
}

#[test]
fn test_export_custom_service_areas() {
    let dir = tempfile::tempdir().unwrap();
    let areas = dir.path().join("areas.json");
    fs::write(&areas, r#"{"New Mexico": ["Albuquerque", "Santa Fe"]}"#).unwrap();
    let out = dir.path().join("site");
    let topo = fixture();

    let (code, _, stderr) = run(&[
        "export",
        "--out",
        out.to_str().unwrap(),
        "--topology-file",
        topo.to_str().unwrap(),
        "--service-areas",
        areas.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let page = fs::read_to_string(out.join("service-areas/new-mexico/index.html")).unwrap();
    assert!(page.contains("Santa Fe"));
    assert!(!out.join("service-areas/california").exists());
}

#[test]
fn test_export_bad_service_areas_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(&[
        "export",
        "--out",
        dir.path().to_str().unwrap(),
        "--service-areas",
        "/no/such/areas.json",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to load service areas"), "stderr: {stderr}");
}

#[test]
fn test_export_rejects_state_names_outside_the_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let areas = dir.path().join("areas.json");
    fs::write(&areas, r#"{"../escape": ["Nowhere"], "Utah": ["Ogden"]}"#).unwrap();
    let out = dir.path().join("site");

    let (code, _, stderr) = run(&[
        "export",
        "--out",
        out.to_str().unwrap(),
        "--topology-file",
        "/no/such/topology.json",
        "--service-areas",
        areas.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to load service areas"), "stderr: {stderr}");
    assert!(stderr.contains("../escape"), "stderr: {stderr}");
    assert!(!dir.path().join("escape").exists());
    assert!(!out.join("index.html").exists());
}

// ── Render map ───────────────────────────────────────────────────────

#[test]
fn test_render_map_with_active_marker() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.svg");
    let topo = fixture();

    let (code, stdout, stderr) = run(&[
        "render-map",
        "--width",
        "960",
        "--active",
        "houston",
        "--out",
        out.to_str().unwrap(),
        "--topology-file",
        topo.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("960px"));

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains(r#"width="960""#));
    assert!(svg.contains(r#"class="marker marker-active" data-location="houston""#));
    assert!(svg.contains(r#"class="state state-highlighted" id="state-TX""#));
}

#[test]
fn test_render_map_unknown_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.svg");
    let topo = fixture();

    let (code, _, stderr) = run(&[
        "render-map",
        "--active",
        "atlantis",
        "--out",
        out.to_str().unwrap(),
        "--topology-file",
        topo.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no visible location 'atlantis'"), "stderr: {stderr}");
    assert!(!out.exists());
}

#[test]
fn test_render_map_requires_topology() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(&[
        "render-map",
        "--out",
        dir.path().join("map.svg").to_str().unwrap(),
        "--topology-file",
        "/no/such/topology.json",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to load topology"), "stderr: {stderr}");
}

#[test]
fn test_topology_file_conflicts_with_url() {
    let (code, _, _) = run(&[
        "render-map",
        "--out",
        "map.svg",
        "--topology-file",
        "a.json",
        "--topology-url",
        "https://example.com/us.json",
    ]);
    assert_eq!(code, 2);
}
