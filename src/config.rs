use crate::{
    vars::{Key, Value, VarMap},
    Error,
};
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};
use tracing::debug;

pub const CONFIG_DIR: &str = ".winpath";
pub const CONFIG_FILE: &str = "vars.toml";

#[derive(Debug, PartialEq, Deserialize, Default)]
#[serde(transparent)]
pub struct ConfigFile {
    vars: HashMap<Key, Value>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    fn load(p: &PathBuf) -> Result<ConfigFile, Error> {
        let vars_file = p.join(CONFIG_FILE);
        let data = match std::fs::read_to_string(&vars_file) {
            Ok(r) => r,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no variables file at {:?}", vars_file);
                return Ok(Self::new());
            }
            Err(e) => return Err(Error::FileRead(vars_file, Error::lowerize(e.to_string()))),
        };
        debug!("loading variables from {:?}", vars_file);
        toml::de::from_str(&data)
            .map_err(|e| Error::TomlParse(vars_file, Error::lowerize(e.to_string())))
    }
}

#[derive(Debug, PartialEq)]
pub struct Config {
    root: PathBuf,
    data: ConfigFile,
}

impl Config {
    /// Loads the configuration stored under `p`, which is usually the user's
    /// home directory.
    pub fn new(p: PathBuf) -> Result<Self, Error> {
        let root = p.join(CONFIG_DIR);
        Ok(Self {
            data: ConfigFile::load(&root)?,
            root: root,
        })
    }

    /// Loads the configuration from the user's home directory, or an empty
    /// configuration when there is no home directory.
    pub fn from_home() -> Result<Self, Error> {
        match home::home_dir() {
            Some(home) => Self::new(home),
            None => Ok(Self {
                root: PathBuf::new(),
                data: ConfigFile::new(),
            }),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn vars(&self) -> VarMap {
        VarMap::from(self.data.vars.clone())
    }
}
