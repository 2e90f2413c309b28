use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const FIRMWARE_TARGET: &str = "riscv32imac-unknown-none-elf";
const LIB_NAME: &str = "libhifive_console.a";

fn run(cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("[RUN] {:?}", cmd);
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("command failed: {:?}", cmd);
    }
    Ok(())
}

fn cargo() -> Command {
    Command::new("cargo")
}

fn rustup() -> Command {
    Command::new("rustup")
}

fn root() -> anyhow::Result<PathBuf> {
    // xtask lives one level below the workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("xtask manifest has no parent directory"))
}

fn ensure_dist() -> anyhow::Result<PathBuf> {
    let dist = root()?.join("build/dist");
    fs::create_dir_all(&dist)?;
    Ok(dist)
}

fn task_fmt() -> anyhow::Result<()> {
    run(cargo().args(["fmt", "--all"]))
}

fn task_fmt_check() -> anyhow::Result<()> {
    run(cargo().args(["fmt", "--all", "--", "--check"]))
}

fn task_clippy() -> anyhow::Result<()> {
    run(cargo().args([
        "clippy",
        "--all-targets",
        "--features",
        "std",
        "--",
        "-D",
        "warnings",
    ]))
}

fn task_test() -> anyhow::Result<()> {
    run(cargo().args(["test", "-p", "hifive_console"]))
}

fn task_check() -> anyhow::Result<()> {
    task_fmt_check()?;
    task_clippy()?;
    task_test()
}

fn have(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let data = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn append_checksum(dist: &Path, path: &Path, name: &str) -> anyhow::Result<String> {
    let sum = sha256_file(path)?;
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dist.join("SHA256SUMS"))?;
    writeln!(f, "{}  {}", sum, name)?;
    eprintln!("[CHECKSUM] {}  {}", sum, name);
    Ok(sum)
}

fn tool_version(cmd: &str) -> Option<String> {
    let out = Command::new(cmd).arg("--version").output().ok()?;
    let line = String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .to_string();
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

fn write_manifest(dist: &Path, artifact: &Path, sha256: &str) -> anyhow::Result<()> {
    let manifest = serde_json::json!({
        "versions": {
            "rustc": tool_version("rustc"),
            "cargo": tool_version("cargo"),
        },
        "artifacts": [{
            "name": LIB_NAME,
            "target": FIRMWARE_TARGET,
            "path": artifact.to_string_lossy(),
            "bytes": artifact.metadata()?.len(),
            "sha256": sha256,
        }],
        "meta": {
            "timestamp": std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs()),
            "xtask_version": env!("CARGO_PKG_VERSION"),
        }
    });
    let out = dist.join("MANIFEST.json");
    fs::write(&out, serde_json::to_vec_pretty(&manifest)?)?;
    eprintln!("[ARTIFACT] {}", out.display());
    Ok(())
}

/// Static library for linking into the C firmware
fn task_firmware() -> anyhow::Result<()> {
    if have("rustup") {
        run(rustup()
            .args(["target", "add", FIRMWARE_TARGET])
            .stdout(Stdio::null())
            .stderr(Stdio::null()))?;
    } else {
        eprintln!("[WARN] rustup not found; assuming {} is installed", FIRMWARE_TARGET);
    }

    eprintln!("[BUILD] Building {} for {}...", LIB_NAME, FIRMWARE_TARGET);
    run(cargo().args([
        "rustc",
        "-p",
        "hifive_console",
        "--lib",
        "--release",
        "--target",
        FIRMWARE_TARGET,
        "--features",
        "panic-handler",
        "--crate-type",
        "staticlib",
    ]))?;

    let built = root()?.join(format!("target/{}/release/{}", FIRMWARE_TARGET, LIB_NAME));
    let dist = ensure_dist()?;
    let artifact = dist.join(LIB_NAME);
    fs::copy(&built, &artifact)?;

    let sum = append_checksum(&dist, &artifact, LIB_NAME)?;
    write_manifest(&dist, &artifact, &sum)
}

fn task_clean() -> anyhow::Result<()> {
    eprintln!("[CLEAN] Cleaning build artifacts...");
    run(cargo().args(["clean"]))?;

    let build_dir = root()?.join("build");
    if build_dir.exists() {
        fs::remove_dir_all(&build_dir)?;
        eprintln!("[CLEAN] Removed build directory: {}", build_dir.display());
    } else {
        eprintln!("[CLEAN] Build directory not found, skipping removal.");
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "xtask commands:\n  fmt | fmt-check | clippy | test | check\n  firmware   # static library for {}\n  clean\n\nExamples:\n  cargo run -p xtask -- check\n  cargo run -p xtask -- firmware",
        FIRMWARE_TARGET
    );
}

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "help".into());
    match cmd.as_str() {
        "fmt" => task_fmt(),
        "fmt-check" => task_fmt_check(),
        "clippy" => task_clippy(),
        "test" => task_test(),
        "check" => task_check(),
        "firmware" => task_firmware(),
        "clean" => task_clean(),
        _ => {
            print_help();
            Ok(())
        }
    }
}
