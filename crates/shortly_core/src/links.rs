/// One original-URL / short-URL pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkRecord {
    pub original: String,
    pub short: String,
}

impl LinkRecord {
    pub fn new(original: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            short: short.into(),
        }
    }
}

/// Ordered list of records. Positions are the only identity at this level;
/// duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkCollection {
    records: Vec<LinkRecord>,
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LinkRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkRecord> {
        self.records.iter()
    }

    /// Returns a copy with `record` added at the end.
    pub fn appended(&self, record: LinkRecord) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend(self.records.iter().cloned());
        records.push(record);
        Self { records }
    }

    /// Returns a copy without the element at `index`. Out of range returns an
    /// unchanged copy.
    pub fn removed_at(&self, index: usize) -> Self {
        if index >= self.records.len() {
            return self.clone();
        }
        let records = self
            .records
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, record)| record.clone())
            .collect();
        Self { records }
    }
}

impl From<Vec<LinkRecord>> for LinkCollection {
    fn from(records: Vec<LinkRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<LinkRecord> for LinkCollection {
    fn from_iter<I: IntoIterator<Item = LinkRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LinkCollection {
    type Item = LinkRecord;
    type IntoIter = std::vec::IntoIter<LinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a LinkRecord;
    type IntoIter = std::slice::Iter<'a, LinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
