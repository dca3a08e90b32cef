//! Runs the binary against the mock engine, one process per command.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::{tempdir, TempDir};

/// A scratch directory holding the config and session of one test.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_config(&self, content: &str) {
        std::fs::write(self.path("config.toml"), content).unwrap();
    }

    fn command(&self, mock: bool) -> Command {
        let catalog = Path::new(env!("CARGO_MANIFEST_DIR")).join("questions.yaml");
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_batq"));
        cmd.current_dir(self.dir.path())
            .env_remove("BATFISH_SERVER")
            .env_remove("BATQ_SESSION")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.toml"))
            .arg("--session")
            .arg(self.path("session.json"))
            .arg("--catalog")
            .arg(catalog);
        if mock {
            cmd.arg("--mock-engine");
        }
        cmd
    }

    /// Runs a command against the mock engine.
    fn run(&self, args: &[&str]) -> (i32, String, String) {
        run(self.command(true).args(args))
    }
}

fn run(cmd: &mut Command) -> (i32, String, String) {
    let output = cmd.output().expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_probe_mock_engine() {
    let ws = Workspace::new();
    let (code, stdout, _) = ws.run(&["probe"]);

    assert_eq!(code, 0);
    assert!(stdout.starts_with("# Engine\n"));
    assert!(stdout.contains("Batfish host: 127.0.0.1:9996 (network NETWORK)"));
    assert!(stdout.contains("Using the in-memory mock engine"));
}

#[test]
fn test_unreachable_engine_exits_non_zero() {
    let ws = Workspace::new();
    ws.write_config(&format!(
        "[server]\nhost = \"127.0.0.1\"\nport = {0}\nprobe_port = {0}\n",
        closed_port()
    ));

    let (code, stdout, _) = run(ws.command(false).arg("snapshots"));
    assert_eq!(code, 1);
    assert!(stdout.contains("Error: Connection error: 127.0.0.1 is not reachable"));
}

#[test]
fn test_host_flag_overrides_config() {
    let ws = Workspace::new();
    ws.write_config("[server]\nhost = \"from-config\"\n");

    let (code, stdout, _) = ws.run(&["--host", "from-cli", "probe"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Batfish host: from-cli:9996"));
}

#[test]
fn test_invalid_output_format() {
    let ws = Workspace::new();
    let (code, stdout, stderr) = ws.run(&["--output", "xml", "probe"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Invalid output format: xml"));
}

#[test]
fn test_snapshots_select_first_and_persist() {
    let ws = Workspace::new();

    let (code, stdout, _) = ws.run(&["snapshots"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("│ base     │ active │"));
    assert!(ws.path("session.json").exists());

    let (code, stdout, _) = ws.run(&["snapshots", "--alternate", "changed"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Alternate snapshot changed selected"));
    assert!(stdout.contains("│ changed  │ alternate │"));

    let (_, stdout, _) = ws.run(&["snapshots", "--select", "missing"]);
    assert!(stdout.contains("Error: Snapshot 'missing' not found"));
}

#[test]
fn test_analyze_selected_questions_as_json() {
    let ws = Workspace::new();
    ws.run(&["snapshots"]);

    let (code, _, _) = ws.run(&[
        "questions",
        "select",
        "--category",
        "Routing and Forwarding Tables",
        "Routes",
    ]);
    assert_eq!(code, 0);
    ws.run(&["questions", "set", "Routes", "nodes", "as2core1"]);
    ws.run(&["questions", "clone", "Routes"]);
    ws.run(&["questions", "set", "Routes", "nodes", "as1border1", "--variant", "1"]);

    let (code, stdout, _) = ws.run(&["--output", "json", "analyze"]);
    assert_eq!(code, 0);

    let page: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(page["title"], "Analysis");
    assert_eq!(page["outputs"][0]["content"], "Active snapshot: base");

    let tabs = page["outputs"][1]["content"].as_array().unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0]["title"], "Routes");
    assert_eq!(tabs[1]["title"], "Routes_1");

    let first_rows = &tabs[0]["outputs"][0]["content"]["rows"];
    assert_eq!(first_rows.as_array().unwrap().len(), 1);
    assert_eq!(first_rows[0][0], "as2core1");
    assert_eq!(tabs[1]["outputs"][0]["content"]["rows"][0][0], "as1border1");
}

#[test]
fn test_analyze_without_selection_warns() {
    let ws = Workspace::new();
    ws.run(&["snapshots"]);

    let (code, stdout, _) = ws.run(&["analyze"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Warning: Select some questions to proceed."));
}

#[test]
fn test_fail_forks_active_snapshot() {
    let ws = Workspace::new();
    ws.run(&["snapshots"]);
    ws.run(&["questions", "select", "--category", "Topology", "Layer 3 Topology"]);

    let (code, stdout, _) = ws.run(&["fail"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Select failed nodes and/or interfaces."));

    let (code, stdout, _) = ws.run(&[
        "fail",
        "--node",
        "as2core1",
        "--interface",
        "as1border1[GigabitEthernet0/0]",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Running against base_Fail"));
    assert!(stdout.contains("[Layer 3 Topology]"));

    let session = std::fs::read_to_string(ws.path("session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&session).unwrap();
    assert_eq!(session["active"]["failed_nodes"][0], "as2core1");
}

#[test]
fn test_compare_requires_alternate() {
    let ws = Workspace::new();
    ws.run(&["snapshots"]);
    ws.run(&["questions", "select", "--category", "Topology", "Layer 3 Topology"]);

    let (code, stdout, _) = ws.run(&["compare"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Warning: Select two different snapshots"));

    ws.run(&["snapshots", "--alternate", "changed"]);
    let (code, stdout, _) = ws.run(&["compare"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Comparing changed against reference base"));
}

#[test]
fn test_questions_export_and_import() {
    let ws = Workspace::new();
    let file = ws.path("select_questions.yaml");
    let file_arg = file.to_string_lossy().to_string();

    ws.run(&["questions", "select", "--category", "Packet Forwarding", "Traceroute"]);
    let (code, stdout, _) = ws.run(&["questions", "export", &file_arg]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Saved 1 questions to"));
    assert!(file.exists());

    ws.run(&["questions", "clear"]);
    let (_, stdout, _) = ws.run(&["questions", "show"]);
    assert!(!stdout.contains("│ Traceroute"));

    let (code, stdout, _) = ws.run(&["questions", "import", &file_arg]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Loaded 1 questions from"));
    assert!(stdout.contains("│ Traceroute"));
}
