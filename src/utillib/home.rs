use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub fn home_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .ok_or_else(|| anyhow!("can't get HOME environment variable"))?;
    Ok(home.into())
}

/// Change paths starting with `~/` to replace the `~` with the user's
/// home directory. Careful: if path is not representable as unicode
/// string, no expansion is attempted!
pub fn path_resolve_home(path: &Path) -> Result<PathBuf> {
    if let Some(path_str) = path.to_str() {
        Ok(str_resolve_home(path_str)?.into())
    } else {
        Ok(path.to_owned())
    }
}

fn str_resolve_home(s: &str) -> Result<String> {
    if s == "~" || s.starts_with("~/") {
        let home = home_dir()?;
        let home_str = home
            .to_str()
            .ok_or_else(|| anyhow!("home dir {home:?} can't be represented as unicode string"))?;
        Ok(format!("{home_str}{}", &s[1..]))
    } else {
        Ok(s.to_owned())
    }
}

/// Resolve `~/` at the start of every element of a `:`-separated list
/// like `LD_PRELOAD` or `PATH`.
pub fn path_list_resolve_home(list: &str) -> Result<String> {
    let elements: Vec<String> = list
        .split(':')
        .map(str_resolve_home)
        .collect::<Result<_>>()?;
    Ok(elements.join(":"))
}
