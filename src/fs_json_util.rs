use std::{
    any::type_name,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use fs_err::File;
use serde::{de::DeserializeOwned, Serialize};

fn read_parsed<T, E>(path: &Path, parse: impl FnOnce(&str) -> Result<T, E>) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let text = fs_err::read_to_string(path)?;
    parse(&text).with_context(|| format!("While trying to parse {path:?} as {}", type_name::<T>()))
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    read_parsed(path.as_ref(), |text| serde_json::from_str(text))
}

pub fn read_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    read_parsed(path.as_ref(), |text| toml::from_str(text))
}

/// Human-readable dump, used for the `--debug` files.
pub fn write_json_pretty<T: Serialize>(path: impl AsRef<Path>, value: &T) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
