use std::{fs, io, path::Path};

use crate::Status;

/// Credentials used by the bots, each read from its own plaintext key file.
#[derive(Default, Debug, Clone)]
pub struct Keys {
    pub rawg: String,
    pub wikidata: Option<String>,
}

impl Keys {
    /// Reads the RAWG key and, unless `dry_run` is set, the Wikidata token.
    pub fn from_files(rawg_key: &str, wikidata_key: &str, dry_run: bool) -> Result<Self, Status> {
        Ok(Keys {
            rawg: read_key(rawg_key)?,
            wikidata: match dry_run {
                true => None,
                false => Some(read_key(wikidata_key)?),
            },
        })
    }
}

/// Returns the trimmed contents of the key file at `path`.
///
/// A missing or empty file is a configuration error.
pub fn read_key(path: impl AsRef<Path>) -> Result<String, Status> {
    let path = path.as_ref();
    let key = match fs::read_to_string(path) {
        Ok(text) => text.trim().to_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Status::invalid_argument(format!(
                "key unspecified, expected file '{}'",
                path.display()
            )))
        }
        Err(e) => return Err(Status::new("Failed to read key file", e)),
    };

    match key.is_empty() {
        false => Ok(key),
        true => Err(Status::invalid_argument(format!(
            "key file '{}' is empty",
            path.display()
        ))),
    }
}
