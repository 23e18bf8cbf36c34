//! Discovery of the latest checkpoint in a directory.
//!
//! A directory written by a trainer may contain an index file named
//! `checkpoint` whose `model_checkpoint_path` entry points at the latest
//! checkpoint. Without it, the most recently modified `*.pt` file is taken.
use anyhow::Result;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Name of the index file.
const INDEX_FILE: &str = "checkpoint";

/// Extension of TorchScript modules.
const EXTENSION: &str = "pt";

/// Reads `model_checkpoint_path` from the index file.
fn from_index(dir: &Path) -> Result<Option<PathBuf>> {
    let index = dir.join(INDEX_FILE);
    if !index.is_file() {
        return Ok(None);
    }

    for line in fs::read_to_string(&index)?.lines() {
        let mut kv = line.splitn(2, ':');
        let (k, v) = match (kv.next(), kv.next()) {
            (Some(k), Some(v)) => (k.trim(), v.trim().trim_matches('"')),
            _ => continue,
        };
        if k != "model_checkpoint_path" || v.is_empty() {
            continue;
        }

        let path = PathBuf::from(v);
        let path = if path.is_absolute() { path } else { dir.join(path) };
        debug!("Index file {:?} points at {:?}", index, path);
        if path.is_file() {
            return Ok(Some(path));
        }
        // `model.ckpt-200` names `model.ckpt-200.pt`
        let mut path = path.into_os_string();
        path.push(".");
        path.push(EXTENSION);
        let path = PathBuf::from(path);
        return Ok(if path.is_file() { Some(path) } else { None });
    }

    Ok(None)
}

/// Returns the most recently modified TorchScript module in the directory.
///
/// Ties in modification time go to the greatest file name.
fn newest_module(dir: &Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |e| e != EXTENSION) {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        let candidate = (modified, path);
        if newest.as_ref().map_or(true, |n| candidate > *n) {
            newest = Some(candidate);
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Returns the latest checkpoint in `dir`, or `None` if there is none.
///
/// Fails only if the directory cannot be read; a missing directory has no
/// checkpoint.
pub fn latest_checkpoint(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(None);
    }

    match from_index(dir)? {
        Some(path) => Ok(Some(path)),
        None => newest_module(dir),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{fs::File, io::Write, time::Duration};
    use tempdir::TempDir;

    fn touch(path: &Path) -> Result<()> {
        File::create(path)?.write_all(b"0")?;
        Ok(())
    }

    #[test]
    fn test_empty_dir() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        assert_eq!(latest_checkpoint(dir.path())?, None);
        assert_eq!(latest_checkpoint(dir.path().join("missing"))?, None);
        Ok(())
    }

    #[test]
    fn test_index_file() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        touch(&dir.path().join("model-100.pt"))?;
        touch(&dir.path().join("model-200.pt"))?;
        let mut index = File::create(dir.path().join(INDEX_FILE))?;
        writeln!(index, "model_checkpoint_path: \"model-100\"")?;
        writeln!(index, "all_model_checkpoint_paths: \"model-100\"")?;

        assert_eq!(
            latest_checkpoint(dir.path())?,
            Some(dir.path().join("model-100.pt"))
        );
        Ok(())
    }

    #[test]
    fn test_stale_index_file() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        touch(&dir.path().join("model-200.pt"))?;
        let mut index = File::create(dir.path().join(INDEX_FILE))?;
        writeln!(index, "model_checkpoint_path: \"model-100\"")?;

        assert_eq!(
            latest_checkpoint(dir.path())?,
            Some(dir.path().join("model-200.pt"))
        );
        Ok(())
    }

    fn set_modified(path: &Path, t: SystemTime) -> Result<()> {
        File::options().write(true).open(path)?.set_modified(t)?;
        Ok(())
    }

    #[test]
    fn test_index_with_dotted_name() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        let older = dir.path().join("model.ckpt-100.pt");
        let named = dir.path().join("model.ckpt-200.pt");
        touch(&older)?;
        touch(&named)?;
        set_modified(&named, SystemTime::now() - Duration::from_secs(60))?;
        let mut index = File::create(dir.path().join(INDEX_FILE))?;
        writeln!(index, "model_checkpoint_path: \"model.ckpt-200\"")?;

        assert_eq!(latest_checkpoint(dir.path())?, Some(named));
        Ok(())
    }

    #[test]
    fn test_same_mtime_picks_greatest_name() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        let t = SystemTime::now() - Duration::from_secs(60);
        for name in ["model-3.pt", "model-9.pt", "model-5.pt"].iter() {
            let path = dir.path().join(name);
            touch(&path)?;
            set_modified(&path, t)?;
        }

        assert_eq!(
            latest_checkpoint(dir.path())?,
            Some(dir.path().join("model-9.pt"))
        );
        Ok(())
    }

    #[test]
    fn test_newest_module() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        touch(&dir.path().join("a.pt"))?;
        touch(&dir.path().join("b.pt"))?;
        touch(&dir.path().join("notes.txt"))?;
        set_modified(
            &dir.path().join("a.pt"),
            SystemTime::now() - Duration::from_secs(60),
        )?;

        assert_eq!(latest_checkpoint(dir.path())?, Some(dir.path().join("b.pt")));
        Ok(())
    }
}
