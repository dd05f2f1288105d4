use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestManifest {
    root: PathBuf,
}

impl TestManifest {
    fn new(file: &str, content: &str) -> Self {
        let root = unique_temp_dir("cycle-check");
        fs::create_dir_all(&root).expect("create temp dir");
        fs::write(root.join(file), content).expect("write manifest");
        Self { root }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(depsort_bin())
            .current_dir(&self.root)
            .env_remove("DEPSORT_CONFIG")
            .env_remove("DEPSORT_MANIFEST")
            .env_remove("DEPSORT_FORMAT")
            .arg("--no-color")
            .args(args)
            .output()
            .expect("run depsort")
    }
}

impl Drop for TestManifest {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn depsort_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_depsort"))
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("depsort-{prefix}-{pid}-{nanos}"))
}

const WITH_CYCLE: &str = r#"
[[packages]]
name = "app"
dependencies = ["lib"]

[[packages]]
name = "x"
dependencies = ["y"]

[[packages]]
name = "y"
dependencies = ["z"]

[[packages]]
name = "z"
dependencies = ["x"]
"#;

#[test]
fn unreachable_cycle_does_not_block_order() {
    let manifest = TestManifest::new("packages.toml", WITH_CYCLE);
    let output = manifest.run(&["order", "app"]);
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(output.status.success(), "stderr:\n{stderr}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "lib\napp\n");
}

#[test]
fn reachable_cycle_fails_order() {
    let manifest = TestManifest::new("packages.toml", WITH_CYCLE);
    let output = manifest.run(&["order", "x"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cycle encountered while finding the installation order for x: x -> y -> z -> x"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn order_all_and_max_deps_abort_on_any_cycle() {
    let manifest = TestManifest::new("packages.toml", WITH_CYCLE);
    for command in ["order-all", "max-deps"] {
        let output = manifest.run(&[command]);
        assert!(!output.status.success(), "{command} should fail");
        assert!(String::from_utf8_lossy(&output.stderr).contains("cycle"));
    }
}

#[test]
fn check_lists_cycles_and_exits_nonzero() {
    let manifest = TestManifest::new("packages.toml", WITH_CYCLE);
    let output = manifest.run(&["check", "--json"]);
    assert!(!output.status.success());
    let cycles: Vec<Vec<String>> =
        serde_json::from_slice(&output.stdout).expect("parse cycles json");
    assert_eq!(cycles, vec![vec!["x", "y", "z", "x"]]);
}

#[test]
fn check_passes_on_acyclic_manifest() {
    let manifest = TestManifest::new(
        "packages.yaml",
        "packages:\n  - name: app\n    dependencies: [lib]\n",
    );
    let output = manifest.run(&["check"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no cycles found"));
}

#[test]
fn unknown_package_is_reported() {
    let manifest = TestManifest::new("packages.toml", WITH_CYCLE);
    let output = manifest.run(&["order", "nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("package not found: nope"));

    let output = manifest.run(&["install", "app", "--installed", "nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("package not found: nope"));
}

#[test]
fn malformed_manifest_is_reported() {
    let manifest = TestManifest::new("packages.json", r#"{"packages": [{"name": ""}]}"#);
    let output = manifest.run(&["packages"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed dependency description"), "{stderr}");
    assert!(stderr.contains("has an empty name"), "{stderr}");

    let manifest = TestManifest::new("packages.json", r#"{"packages": ["#);
    let output = manifest.run(&["packages"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed dependency description"), "{stderr}");
    assert!(stderr.contains("packages.json"), "{stderr}");
}
