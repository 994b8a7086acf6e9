use directories::ProjectDirs;
use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{MetegoError, Result};

/// Credential name of the OpenWeather API token.
pub const OPENWEATHER: &str = "openweather";
/// Credential name of the Pushover application token.
pub const PUSHOVER: &str = "pushover";
/// Credential name of the Pushover user key receiving the forecast.
pub const RECIPIENT: &str = "recipient";

const FILE_NAME: &str = "tokens.txt";

/// Tokens loaded from the local credentials file.
///
/// Example file:
/// ```text
/// openweather 0123456789abcdef
/// pushover azGDORePK8gMaC0QOYAMyEEuzJnyUi
/// recipient uQiRzpo4DXghDmr9QzzfQu27cmVRsG
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    tokens: HashMap<String, String>,
}

impl Credentials {
    /// Read and parse the credentials file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| MetegoError::CredentialsIo {
            path: path.to_path_buf(),
            source,
        })?;

        let credentials = Self::parse(path, &contents)?;
        debug!(path = %path.display(), count = credentials.len(), "loaded credentials");
        Ok(credentials)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut tokens = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split(' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(token), None) if !name.is_empty() && !token.is_empty() => {
                    tokens.insert(name.to_string(), token.to_string());
                }
                _ => {
                    return Err(MetegoError::CredentialsParse {
                        path: path.to_path_buf(),
                        line: idx + 1,
                    });
                }
            }
        }

        Ok(Self { tokens })
    }

    /// Returns the token for `name`, failing when it is absent or empty.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| MetegoError::MissingCredential { name: name.to_string() })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str).filter(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Resolve where the credentials file lives when no path is given:
    /// `tokens.txt` in the working directory if present, otherwise the
    /// platform config directory.
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(FILE_NAME);
        if local.exists() {
            return local;
        }

        ProjectDirs::from("dev", "metego", "metego")
            .map(|dirs| dirs.config_dir().join(FILE_NAME))
            .unwrap_or(local)
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// Tokens are secrets; only the names are shown.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tokens.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Credentials").field("names", &names).finish()
    }
}
