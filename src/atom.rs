//! Addressable spans of the source markup.
//!
//! Atoms are stored in an [`AtomTable`], an arena indexed by [`AtomId`]. The parser may grow an
//! atom it already registered (when a script cluster is merged into its base) by updating the
//! entry through its id.
use std::{fmt, str::FromStr};

use thiserror::Error;

/// The prefix every atom id carries in instrumented markup.
pub const ID_PREFIX: &str = "ltx-";

/// The kind of syntactic unit an atom covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Command,
    /// A single character that is not an operator.
    Symbol,
    Group,
    /// A base together with its superscripts and subscripts, or a lone script.
    Script,
    /// A single arithmetic, relation or punctuation character.
    Operator,
}

impl AtomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtomKind::Command => "command",
            AtomKind::Symbol => "symbol",
            AtomKind::Group => "group",
            AtomKind::Script => "script",
            AtomKind::Operator => "operator",
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier of an atom, unique within one parse.
///
/// Ids are allocated from a counter and displayed in base 36 under [`ID_PREFIX`], e.g.
/// `ltx-0`, `ltx-z`, `ltx-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(u32);

impl AtomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut buf = [0u8; 8];
        let mut pos = buf.len();
        let mut value = self.0;
        loop {
            pos -= 1;
            buf[pos] = DIGITS[(value % 36) as usize];
            value /= 36;
            if value == 0 {
                break;
            }
        }
        f.write_str(ID_PREFIX)?;
        // Only ascii digits were written.
        f.write_str(std::str::from_utf8(&buf[pos..]).map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid atom id")]
pub struct ParseAtomIdError;

impl FromStr for AtomId {
    type Err = ParseAtomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(ID_PREFIX).ok_or(ParseAtomIdError)?;
        if digits.is_empty()
            || digits.len() > 1 && digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        {
            return Err(ParseAtomIdError);
        }
        u32::from_str_radix(digits, 36)
            .map(AtomId)
            .map_err(|_| ParseAtomIdError)
    }
}

/// A span `[start, end)` of the source markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub id: AtomId,
    /// The exact source text `source[start..end]`.
    pub snippet: String,
    pub start: usize,
    pub end: usize,
    pub kind: AtomKind,
}

impl Atom {
    /// Whether `other` lies within this atom's span. An atom contains itself.
    pub fn contains(&self, other: &Atom) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_disjoint(&self, other: &Atom) -> bool {
        self.end <= other.start || other.end <= self.start
    }
}

/// Arena of the atoms registered during one parse, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomTable {
    atoms: Vec<Atom>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new atom covering `source[start..end]`.
    pub(crate) fn register(
        &mut self,
        source: &str,
        start: usize,
        end: usize,
        kind: AtomKind,
    ) -> AtomId {
        let id = AtomId(self.atoms.len() as u32);
        self.atoms.push(Atom {
            id,
            snippet: source[start..end].to_owned(),
            start,
            end,
            kind,
        });
        id
    }

    /// Grow an already registered atom so that it ends at `end`, and relabel its kind.
    pub(crate) fn extend(&mut self, source: &str, id: AtomId, end: usize, kind: AtomKind) {
        if let Some(atom) = self.atoms.get_mut(id.index()) {
            atom.end = end;
            atom.snippet = source[atom.start..end].to_owned();
            atom.kind = kind;
        }
    }

    pub fn get(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.index())
    }

    /// Look an atom up by the id string found in the rendered output.
    pub fn get_by_str(&self, id: &str) -> Option<&Atom> {
        id.parse().ok().and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterate over the atoms in allocation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// The snippets of every atom, in allocation order.
    pub fn snippets(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(|atom| atom.snippet.as_str())
    }
}

impl<'a> IntoIterator for &'a AtomTable {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display() {
        assert_eq!(AtomId(0).to_string(), "ltx-0");
        assert_eq!(AtomId(35).to_string(), "ltx-z");
        assert_eq!(AtomId(36).to_string(), "ltx-10");
        assert_eq!(AtomId(u32::MAX).to_string(), "ltx-1z141z3");
    }

    #[test]
    fn id_parse() {
        assert_eq!("ltx-10".parse(), Ok(AtomId(36)));
        assert_eq!("ltx-z".parse(), Ok(AtomId(35)));
        assert!("ltx-".parse::<AtomId>().is_err());
        assert!("ltx-01".parse::<AtomId>().is_err());
        assert!("ltx-A".parse::<AtomId>().is_err());
        assert!("unknown".parse::<AtomId>().is_err());
        assert_eq!(ParseAtomIdError.to_string(), "invalid atom id");
    }

    #[test]
    fn extend_in_place() {
        let source = "x^{2}";
        let mut table = AtomTable::new();
        let base = table.register(source, 0, 1, AtomKind::Symbol);
        let group = table.register(source, 2, 5, AtomKind::Group);
        table.extend(source, base, 5, AtomKind::Script);

        let atom = table.get(base).unwrap();
        assert_eq!(atom.snippet, "x^{2}");
        assert_eq!(atom.kind, AtomKind::Script);
        assert_eq!(table.get(group).unwrap().snippet, "{2}");
        assert_eq!(table.get_by_str("ltx-1").unwrap().snippet, "{2}");
    }

    #[test]
    fn span_relations() {
        let source = r"rac{a}{b} c";
        let mut table = AtomTable::new();
        let frac = table.register(source, 0, 11, AtomKind::Command);
        let a = table.register(source, 6, 7, AtomKind::Symbol);
        let c = table.register(source, 12, 13, AtomKind::Symbol);
        let [frac, a, c] = [frac, a, c].map(|id| table.get(id).unwrap());

        assert!(frac.contains(a));
        assert!(!a.contains(frac));
        assert!(frac.contains(frac));
        assert!(frac.is_disjoint(c));
        assert!(!frac.is_disjoint(a));
    }
}
