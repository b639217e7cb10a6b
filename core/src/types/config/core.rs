use std::path::PathBuf;

/// Data directory layout for the on-disk backends.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("gtracker.redb")
    }
}
