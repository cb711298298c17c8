use std::collections::HashMap;
use std::fmt;

use sgp4::{Constants, Elements};
use thiserror::Error;

use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog source configured (set catalog.url or catalog.file)")]
    SourceNotConfigured,
    #[error("feed request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    HttpStatus(u16),
    #[error("feed file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("feed ends with an incomplete record starting at line {line}")]
    Truncated { line: usize },
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("invalid TLE for {name}: {message}")]
    InvalidTle { name: String, message: String },
}

/// One satellite: its name and the parsed SGP4 state.
pub struct TleRecord {
    pub name: String,
    pub elements: Elements,
    pub constants: Constants,
}

impl TleRecord {
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, CatalogError> {
        let invalid = |message: String| CatalogError::InvalidTle {
            name: name.to_string(),
            message,
        };
        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            elements,
            constants,
        })
    }
}

impl fmt::Debug for TleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TleRecord")
            .field("name", &self.name)
            .field("norad_id", &self.elements.norad_id)
            .field("epoch", &self.elements.datetime)
            .finish()
    }
}

/// Read-only set of satellites, iterated in feed order.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<TleRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(records: impl IntoIterator<Item = TleRecord>) -> Self {
        let mut catalog = Catalog::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    // A repeated name keeps its first position and takes the newer elements.
    fn insert(&mut self, record: TleRecord) {
        match self.index.get(&record.name) {
            Some(&i) => {
                log::warn!("Duplicate satellite {} in feed, keeping latest TLE", record.name);
                self.records[i] = record;
            }
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Parse a feed of three-line records (name, line 1, line 2).
    ///
    /// Blank lines are ignored. Records that `sgp4` rejects are skipped with a warning;
    /// a structurally broken feed is an error.
    pub fn parse_feed(content: &str) -> Result<Self, CatalogError> {
        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();

        let mut records = Vec::new();
        for chunk in lines.chunks(3) {
            let [(line, name), (_, line1), (_, line2)] = chunk else {
                return Err(CatalogError::Truncated { line: chunk[0].0 });
            };
            if !line1.starts_with("1 ") || !line2.starts_with("2 ") {
                return Err(CatalogError::MalformedRecord {
                    line: *line,
                    message: format!("expected TLE lines after name {:?}", name),
                });
            }
            match TleRecord::parse(name, line1, line2) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping record at line {}: {}", line, e),
            }
        }

        Ok(Catalog::new(records))
    }

    pub fn get(&self, name: &str) -> Option<&TleRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TleRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the catalog once from the configured source.
pub async fn load(config: &CatalogConfig) -> Result<Catalog, CatalogError> {
    let content = if let Some(path) = &config.file {
        log::info!("Reading satellite feed from {}", path.display());
        tokio::fs::read_to_string(path).await?
    } else if let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) {
        log::info!("Downloading satellite feed from {}", url);
        fetch(url, config).await?
    } else {
        return Err(CatalogError::SourceNotConfigured);
    };

    let catalog = Catalog::parse_feed(&content)?;
    if catalog.is_empty() {
        log::warn!("Satellite feed contained no usable records");
    } else {
        log::info!("Loaded {} satellites", catalog.len());
    }
    Ok(catalog)
}

async fn fetch(url: &str, config: &CatalogConfig) -> Result<String, CatalogError> {
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .build()?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(CatalogError::HttpStatus(response.status().as_u16()));
    }

    Ok(response.text().await?)
}
