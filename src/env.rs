use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Process-wide state owned by a shell session.
///
/// - `vars`: environment handed to every spawned program.
/// - `current_dir`: working directory of the shell and its children.
/// - `should_exit`: raised by `exit`/`quit`; the read loop stops when set.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Snapshot the variables and working directory of this process.
    ///
    /// Variables whose name or value is not valid UTF-8 are left out of the
    /// snapshot; children still inherit them from the process environment.
    pub fn new() -> Self {
        let vars = Self::capture_vars(stdenv::vars_os());
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    fn capture_vars(
        vars: impl Iterator<Item = (std::ffi::OsString, std::ffi::OsString)>,
    ) -> HashMap<String, String> {
        vars.filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Value of `key` in the session, falling back to the process environment.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var_os(key)?.into_string().ok())
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Target of a bare `cd`.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get_var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    /// Resolve `path` against the session working directory.
    pub fn resolve_path(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn empty_env(dir: &str) -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from(dir),
            should_exit: false,
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = empty_env("/");
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(!env.should_exit);
    }

    #[test]
    #[cfg(unix)]
    fn test_capture_skips_non_utf8_entries() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("GOOD"), OsString::from("yes")),
            (OsString::from("BAD_VALUE"), OsString::from_vec(vec![0x66, 0xff])),
            (OsString::from_vec(vec![0xfe, 0x41]), OsString::from("x")),
        ];
        let captured = Environment::capture_vars(vars.into_iter());
        assert_eq!(captured.len(), 1);
        assert_eq!(captured.get("GOOD").map(String::as_str), Some("yes"));
    }

    #[test]
    fn test_home_dir_ignores_empty_value() {
        let mut env = empty_env("/");
        env.set_var("HOME", "");
        assert_eq!(env.home_dir(), None);

        env.set_var("HOME", "/home/user");
        assert_eq!(env.home_dir(), Some(PathBuf::from("/home/user")));
    }

    #[test]
    fn test_resolve_path_relative_to_session_dir() {
        let env = empty_env("/work");
        assert_eq!(env.resolve_path(Path::new("out.txt")), PathBuf::from("/work/out.txt"));
        assert_eq!(env.resolve_path(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
