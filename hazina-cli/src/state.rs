use anyhow::{Context, Result};
use hazina_core::SavingsLog;
use std::fs;
use std::path::{Path, PathBuf};

/// `$HAZINA_HOME`, or `~/.hazina`
pub fn hazina_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("HAZINA_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".hazina"))
}

pub fn ensure_hazina_home() -> Result<PathBuf> {
    let dir = hazina_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn savings_path() -> Result<PathBuf> {
    Ok(ensure_hazina_home()?.join("savings.json"))
}

/// Missing file means no savings yet
pub fn read_savings_log(path: &Path) -> Result<SavingsLog> {
    if !path.exists() {
        return Ok(SavingsLog::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_savings_log(path: &Path, log: &SavingsLog) -> Result<()> {
    let json = serde_json::to_string_pretty(log)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
