use std::fmt;

/// Width of every name field in the WAD formats.
pub const NAME_LEN: usize = 8;

/// A lump, texture or patch name.
///
/// On disk names are 8 null-padded bytes. Only the bytes up to the first zero
/// (or all 8) are significant, so two fields that differ after the terminator
/// compare equal once decoded. Bytes map one-to-one onto chars (Latin-1), so
/// odd bytes survive the conversion and still compare exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LumpName(String);

impl LumpName {
    pub fn from_bytes(raw: &[u8]) -> LumpName {
        let raw = &raw[..raw.len().min(NAME_LEN)];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());

        LumpName(raw[..end].iter().map(|&b| b as char).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for LumpName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LumpName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LumpName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
