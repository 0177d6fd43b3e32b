use crate::assets::source::SharedSource;

/// Placeholder standing for the numeric part of a file name.
pub const PLACEHOLDER: &str = "{n}";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Parsed `<prefix>{n}<suffix>` naming pattern.
pub struct NamePattern {
    prefix: String,
    suffix: String,
}

impl NamePattern {
    /// Parse a pattern containing exactly one [`PLACEHOLDER`].
    pub fn parse(pattern: &str) -> Option<Self> {
        let (prefix, suffix) = pattern.split_once(PLACEHOLDER)?;
        if suffix.contains(PLACEHOLDER) {
            return None;
        }
        Some(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Numeric index of `stem` if it is exactly `<prefix><digits><suffix>`.
    pub fn index_of(&self, stem: &str) -> Option<u64> {
        let digits = stem
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Stem carrying index `n`, without zero padding.
    pub fn stem_for(&self, n: u64) -> String {
        format!("{}{n}{}", self.prefix, self.suffix)
    }

    /// Composite name of the pair starting at `n`: `<prefix><n>-<n+1>`.
    pub fn pair_name(&self, n: u64) -> String {
        format!("{}{n}-{}", self.prefix, n + 1)
    }
}

/// File name without its final extension (`"a.b.jpg"` -> `"a.b"`).
///
/// A trailing dot or a dot followed by a path separator is not an extension.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() && !name[pos + 1..].contains('/') => &name[..pos],
        _ => name,
    }
}

#[derive(Clone, Debug)]
/// Two files destined for one merged output.
pub struct BatchMatch {
    /// Composite key, `<prefix><n>-<n+1>`.
    pub name: String,
    /// Lower-numbered file first.
    pub files: [SharedSource; 2],
}

/// Pair files whose stems carry consecutive numbers under `pattern`.
///
/// Files are scanned in input order. For a file numbered `n`, the first unused file whose
/// stem is `<prefix><n+1><suffix>` becomes its partner and both are consumed, so a file
/// appears in at most one pair. Files without a partner are dropped. A pattern without
/// exactly one placeholder matches nothing.
pub fn find_matches(files: &[SharedSource], pattern: &str) -> Vec<BatchMatch> {
    let Some(pattern) = NamePattern::parse(pattern) else {
        tracing::debug!(pattern, "pattern has no single {PLACEHOLDER} placeholder");
        return Vec::new();
    };

    let stems: Vec<&str> = files.iter().map(|f| file_stem(f.name())).collect();
    let mut used = vec![false; files.len()];
    let mut matches = Vec::new();

    for (i, stem) in stems.iter().enumerate() {
        if used[i] {
            continue;
        }
        let Some(n) = pattern.index_of(stem) else {
            continue;
        };
        let Some(next) = n.checked_add(1) else {
            continue;
        };
        let next_stem = pattern.stem_for(next);
        let partner = stems
            .iter()
            .enumerate()
            .position(|(j, s)| j != i && !used[j] && *s == next_stem);

        if let Some(j) = partner {
            used[i] = true;
            used[j] = true;
            matches.push(BatchMatch {
                name: pattern.pair_name(n),
                files: [files[i].clone(), files[j].clone()],
            });
        }
    }
    matches
}

#[cfg(test)]
#[path = "../../tests/unit/batch/pattern.rs"]
mod tests;
