//! CLI tests for the `batch-label` binary.

use std::io::Read;
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use assert_cmd::cargo;

const REFERENCE: &str =
    "^XA^FO40,40^A0N,160,80^FDABC123^FS^FO40,184^A0N,64,48^FB480,1,,R^FDB001^FS^XZ";

/// The binary with a clean environment, so host `.env`/LABEL_* settings
/// cannot leak in.
fn label_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("batch-label"));
    cmd.env_clear()
        .current_dir(std::env::temp_dir())
        .env("RUST_LOG", "warn")
        .env("PREVIEW_URL", format!("http://127.0.0.1:{}", closed_port()))
        .env("PREVIEW_TIMEOUT_SECS", "1")
        .env("PRINT_TIMEOUT_SECS", "2");
    cmd
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"))
}

fn profile_path(name: &str) -> String {
    format!("{}/../../profiles/{name}", env!("CARGO_MANIFEST_DIR"))
}

// ── markup ──────────────────────────────────────────────────────────────

#[test]
fn markup_with_defaults_matches_reference_document() {
    let output = label_cmd()
        .args(["markup", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), REFERENCE);
}

#[test]
fn markup_rejects_invalid_sku() {
    let output = label_cmd()
        .args(["markup", "--sku", "AB C", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid print job"), "{stderr}");
    assert!(stderr.contains("sku"), "{stderr}");
}

#[test]
fn markup_rejects_control_syntax_in_batch() {
    let output = label_cmd()
        .args(["markup", "--sku", "ABC123", "--batch", "B^XZ"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn barcode_layout_from_environment() {
    let output = label_cmd()
        .env("LABEL_LAYOUT", "barcode")
        .args(["markup", "--sku", "SKU-9", "--batch", "LOT7"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let zpl = String::from_utf8_lossy(&output.stdout);
    assert_eq!(zpl.matches("^BC").count(), 1, "{zpl}");
    assert!(zpl.contains("^FDSKU-9^FS"));
}

#[test]
fn profile_replaces_builtin_layout() {
    let output = label_cmd()
        .env("LABEL_PROFILE", profile_path("plain-100x50-300dpi.json"))
        .args(["markup", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let zpl = String::from_utf8_lossy(&output.stdout);
    assert!(zpl.trim().starts_with("^XA"));
    assert_ne!(zpl.trim(), REFERENCE);
}

#[test]
fn invalid_label_size_aborts_at_startup() {
    let output = label_cmd()
        .env("LABEL_HEIGHT_MM", "-1")
        .args(["markup", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid label configuration"), "{stderr}");
}

#[test]
fn markup_and_config_do_not_need_a_preview_font() {
    for args in [&["markup", "--sku", "ABC123", "--batch", "B001"][..], &["config"][..]] {
        let output = label_cmd()
            .env("PREVIEW_STRATEGY", "local")
            .env("PREVIEW_FONT", "/nonexistent/font.ttf")
            .args(args)
            .output()
            .unwrap();
        assert!(output.status.success(), "{args:?}: {output:?}");
    }
}

#[test]
fn preview_with_unreadable_font_aborts() {
    let output = label_cmd()
        .env("PREVIEW_STRATEGY", "local")
        .env("PREVIEW_FONT", "/nonexistent/font.ttf")
        .args(["preview", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to set up label preview"), "{stderr}");
}

#[test]
fn dpi_beyond_printer_range_aborts_at_startup() {
    let output = label_cmd()
        .env("LABEL_DPI", "1000000")
        .args(["markup", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("label.dpi"), "{stderr}");
}

// ── config ──────────────────────────────────────────────────────────────

#[test]
fn config_prints_effective_profile() {
    let output = label_cmd()
        .env("LABEL_DPI", "300")
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let json = stdout_json(&output);
    assert_eq!(json["label"]["dpi"], 300);
    assert_eq!(json["fields"].as_array().unwrap().len(), 2);
}

// ── print ───────────────────────────────────────────────────────────────

#[test]
fn print_sends_every_copy_and_reports_json() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        let mut received = String::new();
        let _ = stream.read_to_string(&mut received);
        received
    });

    let output = label_cmd()
        .env("PRINTER_HOST", "127.0.0.1")
        .env("PRINTER_PORT", port.to_string())
        .args(["--output", "json", "print", "--sku", "ABC123", "--batch", "B001", "-n", "3"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["copies"], 3);
    assert_eq!(json["message"], "Sent 3 label(s) for SKU ABC123, batch B001");
    assert!(json["preview"].is_null());

    assert_eq!(server.join().unwrap(), REFERENCE.repeat(3));
}

#[test]
fn print_to_unreachable_printer_fails_cleanly() {
    let output = label_cmd()
        .env("PRINTER_HOST", "127.0.0.1")
        .env("PRINTER_PORT", closed_port().to_string())
        .args(["--output", "json", "print", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(
        json["message"].as_str().unwrap().starts_with("Print failed: "),
        "{json}"
    );
}

#[test]
fn print_rejects_copies_out_of_range() {
    let output = label_cmd()
        .args(["print", "--sku", "ABC123", "--batch", "B001", "--copies", "1000"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("copies"), "{stderr}");
}

// ── preview ─────────────────────────────────────────────────────────────

#[test]
fn preview_unavailable_exits_nonzero() {
    let output = label_cmd()
        .args(["preview", "--sku", "ABC123", "--batch", "B001"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no preview available"));
}

#[test]
fn help_lists_subcommands() {
    let output = label_cmd().arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["markup", "preview", "print", "config"] {
        assert!(stdout.contains(cmd), "missing {cmd} in help");
    }
}
