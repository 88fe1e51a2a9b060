//! Population definitions: first line is the population name, following lines are sample identifiers.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    collections::{BTreeMap, btree_map::Entry},
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::{add_path, error},
    ext,
};

/// Population name -> sample identifiers, iterated in the lexicographic order of names.
#[derive(Default, Debug, Clone)]
pub struct Populations {
    map: BTreeMap<String, Vec<String>>,
}

impl Populations {
    /// Loads populations from a list of files.
    pub fn load(paths: &[PathBuf]) -> Result<Self, Error> {
        let mut pops = Self::default();
        for path in paths {
            let f = File::open(path).map_err(add_path!(path))?;
            pops.add_from(BufReader::new(f), path)?;
        }
        log::info!("Loaded {} populations: {}", pops.len(),
            pops.iter().map(|(name, members)| format!("{} ({})", name, members.len()))
                .collect::<Vec<_>>().join(", "));
        Ok(pops)
    }

    /// Reads one population definition. `path` is used only for messages.
    /// If the population already exists, its members are replaced.
    pub fn add_from(&mut self, stream: impl BufRead, path: &Path) -> Result<(), Error> {
        let mut lines = stream.lines();
        let name = match lines.next() {
            Some(line) => line.map_err(add_path!(path))?.trim().to_owned(),
            None => return Err(error!(InvalidData, "Population file {} is empty", ext::fmt::path(path))),
        };
        if name.is_empty() {
            return Err(error!(InvalidData, "Population file {} has an empty population name on the first line",
                ext::fmt::path(path)));
        }

        let mut new_members = Vec::new();
        for line in lines {
            let line = line.map_err(add_path!(path))?;
            let line = line.trim();
            if !line.is_empty() {
                new_members.push(line.to_owned());
            }
        }
        if new_members.is_empty() {
            log::warn!("Population {} ({}) contains no samples", name, ext::fmt::path(path));
        }
        match self.map.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(new_members);
            }
            Entry::Occupied(mut entry) => {
                log::warn!("Population {} is defined more than once, replacing {} earlier samples with {} from {}",
                    entry.key(), entry.get().len(), new_members.len(), ext::fmt::path(path));
                entry.insert(new_members);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over populations and their members in the order of population names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.map.iter().map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.map.get(name).map(Vec::as_slice)
    }

    /// Iterates over all unordered pairs of population names `(a, b)` with `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.names().enumerate()
            .flat_map(move |(i, first)| self.names().skip(i + 1).map(move |second| (first, second)))
    }
}
