//! Enzyme name lookup backed by the ExPASy ENZYME flat file (`enzyme.dat`).
//!
//! Each entry is a block of two-letter keyed lines terminated by `//`:
//!
//! ```text
//! ID   1.1.1.1
//! DE   Alcohol dehydrogenase.
//! //
//! ```
//!
//! Only the `ID` (EC number) and `DE` (recommended name) lines are kept.

use crate::utils::{open_text_reader, Error, Result};
use std::{collections::HashMap, io::BufRead, path::Path};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnzymeNames {
    names: HashMap<String, String>,
}

impl EnzymeNames {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        let names = Self::from_reader(reader).map_err(|e| match e {
            Error::EnzymeDatabase(msg) => {
                Error::EnzymeDatabase(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        if names.is_empty() {
            log::warn!("No enzyme entries found in {}", path.display());
        }
        log::info!(
            "Loaded {} enzyme entries from {}",
            names.len(),
            path.display()
        );
        Ok(names)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut names = HashMap::new();
        let mut id: Option<String> = None;
        let mut description = String::new();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                Error::EnzymeDatabase(format!("error reading line {}: {}", line_number + 1, e))
            })?;
            let (key, value) = split_keyed_line(&line);
            match key {
                "ID" => {
                    if let Some(previous) = &id {
                        return Err(Error::EnzymeDatabase(format!(
                            "entry {} is not terminated by '//' (line {})",
                            previous,
                            line_number + 1
                        )));
                    }
                    id = Some(value.to_string());
                }
                "DE" => {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(value);
                }
                "//" => {
                    // The leading comment block also ends with '//' and carries no ID
                    if let Some(ec) = id.take() {
                        names.insert(ec, std::mem::take(&mut description));
                    }
                    description.clear();
                }
                _ => {}
            }
        }

        if let Some(ec) = id {
            names.insert(ec, description);
        }

        Ok(Self { names })
    }

    pub fn get(&self, ec_number: &str) -> Option<&str> {
        self.names.get(ec_number).map(|s| s.as_str())
    }

    pub fn resolve(&self, ec_number: &str) -> Result<&str> {
        self.get(ec_number)
            .ok_or_else(|| Error::UnknownECNumber(ec_number.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnzymeNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn split_keyed_line(line: &str) -> (&str, &str) {
    let line = line.trim_end();
    match line.get(..2) {
        Some(key) => (key, line.get(2..).unwrap_or("").trim()),
        None => (line, ""),
    }
}
