use std::path::PathBuf;
#[cfg(test)]
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Get the global nodetools home directory.
///
/// `NODETOOLS_HOME` wins when set and non-empty; otherwise `~/.nodetools`.
pub fn nodetools_home_dir() -> Result<PathBuf, std::io::Error> {
    if let Ok(v) = std::env::var("NODETOOLS_HOME")
        && !v.trim().is_empty()
    {
        return Ok(PathBuf::from(v));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;

    Ok(home.join(".nodetools"))
}

pub fn global_config_path() -> Result<PathBuf, std::io::Error> {
    Ok(nodetools_home_dir()?.join("config.toml"))
}

#[cfg(test)]
pub(crate) fn test_home_env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .expect("NODETOOLS_HOME test env lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn home_dir_respects_env_override() {
        let _lock = test_home_env_lock();
        let previous = std::env::var_os("NODETOOLS_HOME");
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::set_var("NODETOOLS_HOME", temp.path());
        }
        let got = nodetools_home_dir().unwrap();
        let config = global_config_path().unwrap();
        match previous {
            Some(value) => unsafe { std::env::set_var("NODETOOLS_HOME", value) },
            None => unsafe { std::env::remove_var("NODETOOLS_HOME") },
        }
        assert_eq!(got, temp.path());
        assert_eq!(config, temp.path().join("config.toml"));
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let _lock = test_home_env_lock();
        let previous = std::env::var_os("NODETOOLS_HOME");
        unsafe {
            std::env::set_var("NODETOOLS_HOME", "  ");
        }
        let got = nodetools_home_dir();
        match previous {
            Some(value) => unsafe { std::env::set_var("NODETOOLS_HOME", value) },
            None => unsafe { std::env::remove_var("NODETOOLS_HOME") },
        }
        if let Ok(path) = got {
            assert!(path.ends_with(".nodetools"));
        }
    }
}
