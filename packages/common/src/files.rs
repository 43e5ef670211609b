use crate::{CommonError, CommonResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CommonResult<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| CommonError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Read a JSON file if a path was given
pub fn read_json_opt<T: DeserializeOwned>(path: Option<&Path>) -> CommonResult<Option<T>> {
    path.map(read_json).transpose()
}

/// Write a value as pretty-printed JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CommonResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|source| CommonError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, content)?;
    Ok(())
}
