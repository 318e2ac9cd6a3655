//! Nogoods and deduplicated nogood sets
//!
//! A nogood is a set of literals that must never hold at the same time.
//! Literals reuse [`Literal`]: a positive literal `T a` holds when `a` is
//! true, a negative literal `F a` when `a` is false.
//!
//! [`NogoodSet`] stores nogoods by index. Adding a nogood that is already
//! present returns its existing index; removed indices are reused by later
//! additions. Lookup goes through a hash that does not depend on the order
//! in which literals were inserted.

use asp_core::{Literal, Registry};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

fn literal_hash(literal: &Literal) -> u64 {
    let mut hasher = DefaultHasher::new();
    literal.atom.kind.hash(&mut hasher);
    literal.atom.address.hash(&mut hasher);
    literal.naf.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, Default, Eq)]
pub struct Nogood {
    literals: BTreeSet<Literal>,
    hash: u64,
}

impl Nogood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a literal; returns false if it was already present
    pub fn insert(&mut self, literal: Literal) -> bool {
        if self.literals.insert(literal) {
            self.hash = self.hash.wrapping_add(literal_hash(&literal));
            true
        } else {
            false
        }
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.literals.iter()
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    pub fn display<'a>(&'a self, registry: &'a Registry) -> DisplayNogood<'a> {
        DisplayNogood {
            nogood: self,
            registry,
        }
    }
}

impl PartialEq for Nogood {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.literals == other.literals
    }
}

impl Hash for Nogood {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl FromIterator<Literal> for Nogood {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut nogood = Nogood::new();
        for literal in iter {
            nogood.insert(literal);
        }
        nogood
    }
}

impl fmt::Display for Nogood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let sign = if literal.naf { "F" } else { "T" };
            write!(f, "{} {:?}", sign, literal.atom)?;
        }
        write!(f, " }}")
    }
}

pub struct DisplayNogood<'a> {
    nogood: &'a Nogood,
    registry: &'a Registry,
}

impl fmt::Display for DisplayNogood<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, literal) in self.nogood.literals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let sign = if literal.naf { "F" } else { "T" };
            write!(f, "{} {}", sign, self.registry.display(literal.atom))?;
        }
        write!(f, " }}")
    }
}

/// Indexed, deduplicated collection of nogoods
#[derive(Debug, Clone, Default)]
pub struct NogoodSet {
    nogoods: Vec<Option<Nogood>>,
    add_count: Vec<u32>,
    free_indices: Vec<usize>,
    by_hash: HashMap<u64, Vec<usize>>,
}

impl NogoodSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, nogood: &Nogood) -> Option<usize> {
        self.by_hash.get(&nogood.hash)?.iter().copied().find(|&index| {
            self.nogoods[index]
                .as_ref()
                .is_some_and(|stored| stored == nogood)
        })
    }

    /// Add a nogood and return its index
    ///
    /// An equal nogood that is already stored keeps its index; only its add
    /// count grows.
    pub fn add(&mut self, nogood: Nogood) -> usize {
        if let Some(index) = self.find(&nogood) {
            self.add_count[index] += 1;
            return index;
        }
        let hash = nogood.hash;
        let index = match self.free_indices.pop() {
            Some(index) => {
                self.nogoods[index] = Some(nogood);
                self.add_count[index] = 1;
                index
            }
            None => {
                self.nogoods.push(Some(nogood));
                self.add_count.push(1);
                self.nogoods.len() - 1
            }
        };
        self.by_hash.entry(hash).or_default().push(index);
        index
    }

    /// Remove the nogood at `index`, freeing the index for reuse
    pub fn remove(&mut self, index: usize) -> Option<Nogood> {
        let nogood = self.nogoods.get_mut(index)?.take()?;
        if let Some(bucket) = self.by_hash.get_mut(&nogood.hash) {
            bucket.retain(|&i| i != index);
            if bucket.is_empty() {
                self.by_hash.remove(&nogood.hash);
            }
        }
        self.add_count[index] = 0;
        self.free_indices.push(index);
        Some(nogood)
    }

    /// Remove a nogood by content, returning the index it had
    pub fn remove_nogood(&mut self, nogood: &Nogood) -> Option<usize> {
        let index = self.find(nogood)?;
        self.remove(index);
        Some(index)
    }

    pub fn get(&self, index: usize) -> Option<&Nogood> {
        self.nogoods.get(index)?.as_ref()
    }

    pub fn contains(&self, nogood: &Nogood) -> bool {
        self.find(nogood).is_some()
    }

    pub fn add_count(&self, index: usize) -> u32 {
        self.add_count.get(index).copied().unwrap_or(0)
    }

    /// Number of stored nogoods
    pub fn len(&self) -> usize {
        self.nogoods.len() - self.free_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the highest index in use or free
    pub fn index_bound(&self) -> usize {
        self.nogoods.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Nogood)> + '_ {
        self.nogoods
            .iter()
            .enumerate()
            .filter_map(|(index, nogood)| nogood.as_ref().map(|n| (index, n)))
    }

    /// Close the gaps left by removals
    ///
    /// Indices handed out before are invalidated.
    pub fn defragment(&mut self) {
        let nogoods = std::mem::take(&mut self.nogoods);
        let counts = std::mem::take(&mut self.add_count);
        self.free_indices.clear();
        self.by_hash.clear();
        for (nogood, count) in nogoods.into_iter().zip(counts) {
            if let Some(nogood) = nogood {
                let index = self.nogoods.len();
                self.by_hash.entry(nogood.hash).or_default().push(index);
                self.nogoods.push(Some(nogood));
                self.add_count.push(count);
            }
        }
    }

    /// Drop nogoods added less than 5% as often as the most added one, then
    /// defragment
    pub fn forget_least_frequently_added(&mut self) {
        let max = self.iter().map(|(i, _)| self.add_count[i]).max().unwrap_or(0);
        let rare: Vec<usize> = self
            .iter()
            .map(|(index, _)| index)
            .filter(|&index| u64::from(self.add_count[index]) * 20 < u64::from(max))
            .collect();
        log::debug!("forgetting {} of {} nogoods", rare.len(), self.len());
        for index in rare {
            self.remove(index);
        }
        self.defragment();
    }
}

impl fmt::Display for NogoodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, (_, nogood)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", nogood)?;
        }
        write!(f, " }}")
    }
}
