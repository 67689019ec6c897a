//! Equivalence tables for shared vertices and shared texture coordinates.
//!
//! An [`EquivalenceTable`] assigns every index a class id. Indices in the same
//! class are treated as one logical point: coincident positions for the
//! shared-vertex table, welded UVs for the shared-texture table.
//!
//! The table is a flat `index -> class` mapping rather than a union-find.
//! Class ids handed out by [`EquivalenceTable::split`] and
//! [`EquivalenceTable::set_coincident`] are always higher than every id already
//! in use, so callers can rely on a freshly split index never aliasing an
//! existing class.

use nalgebra::Point2;

use super::uv::average;

/// Mapping from index to equivalence class id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceTable {
    /// Class id for each index.
    classes: Vec<usize>,
    /// Next unused class id (greater than every id in `classes`).
    next_class: usize,
}

impl EquivalenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table where each of `len` indices is its own class.
    pub fn with_singletons(len: usize) -> Self {
        Self {
            classes: (0..len).collect(),
            next_class: len,
        }
    }

    /// Create a table from explicit groups.
    ///
    /// Group `g` becomes class `g`; indices below `len` that appear in no group
    /// get singleton classes after the groups. An index listed in more than one
    /// group ends up in the last one.
    ///
    /// # Panics
    /// Panics if a group references an index `>= len`.
    pub fn from_groups(len: usize, groups: &[Vec<usize>]) -> Self {
        let mut classes = vec![usize::MAX; len];
        for (g, group) in groups.iter().enumerate() {
            for &i in group {
                classes[i] = g;
            }
        }

        let mut next_class = groups.len();
        for class in &mut classes {
            if *class == usize::MAX {
                *class = next_class;
                next_class += 1;
            }
        }

        Self {
            classes,
            next_class,
        }
    }

    /// Number of indices in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        let mut seen: Vec<usize> = self.classes.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Ensure `index` is present, giving it and any skipped indices singleton
    /// classes. Returns the class of `index`; an index that is already present
    /// keeps its class.
    pub fn add(&mut self, index: usize) -> usize {
        while self.classes.len() <= index {
            let class = self.fresh_class();
            self.classes.push(class);
        }
        self.classes[index]
    }

    /// Class id of `index`.
    #[inline]
    pub fn lookup(&self, index: usize) -> usize {
        self.classes[index]
    }

    /// True if both indices belong to the same class.
    #[inline]
    pub fn same_class(&self, a: usize, b: usize) -> bool {
        self.lookup(a) == self.lookup(b)
    }

    /// All indices in the class of `index`, ascending.
    pub fn members_of(&self, index: usize) -> Vec<usize> {
        let class = self.lookup(index);
        self.classes
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == class)
            .map(|(i, _)| i)
            .collect()
    }

    /// Union the classes of `a` and `b`. Members of `b`'s class take `a`'s id.
    /// Returns the surviving class id.
    pub fn merge(&mut self, a: usize, b: usize) -> usize {
        let keep = self.lookup(a);
        let drop = self.lookup(b);
        if keep != drop {
            for class in &mut self.classes {
                if *class == drop {
                    *class = keep;
                }
            }
        }
        keep
    }

    /// Put every index in `indices` into one brand-new class.
    pub fn set_coincident(&mut self, indices: &[usize]) -> usize {
        let class = self.fresh_class();
        for &i in indices {
            self.classes[i] = class;
        }
        class
    }

    /// Move each index into its own brand-new class.
    pub fn split(&mut self, indices: &[usize]) {
        for &i in indices {
            self.classes[i] = self.fresh_class();
        }
    }

    /// The `index -> class` mapping.
    #[inline]
    pub fn to_mapping(&self) -> &[usize] {
        &self.classes
    }

    /// Classes as lists of indices, ordered by their lowest member.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut slot_of_class = std::collections::HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, &class) in self.classes.iter().enumerate() {
            let slot = *slot_of_class.entry(class).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }
        groups
    }

    /// Weld every pair of `indices` whose coordinates are closer than `delta`.
    ///
    /// Each welded pair is moved to its midpoint and their classes are merged.
    /// Pairs already sharing a class are skipped. Comparison is pairwise over
    /// the candidate set, which is expected to be small (a seam, not a mesh).
    /// Returns the number of merges performed.
    pub fn sew(&mut self, uvs: &mut [Point2<f64>], indices: &[usize], delta: f64) -> usize {
        let mut merged = 0;

        for i in 0..indices.len().saturating_sub(1) {
            for n in (i + 1)..indices.len() {
                let (a, b) = (indices[i], indices[n]);
                if self.same_class(a, b) {
                    continue;
                }

                if nalgebra::distance(&uvs[a], &uvs[b]) < delta {
                    let center = nalgebra::center(&uvs[a], &uvs[b]);
                    uvs[a] = center;
                    uvs[b] = center;
                    self.merge(a, b);
                    merged += 1;
                }
            }
        }

        merged
    }

    /// Move every coordinate in `indices` to their mean and put them in one class.
    pub fn collapse(&mut self, uvs: &mut [Point2<f64>], indices: &[usize]) {
        if indices.is_empty() {
            return;
        }

        let center = average(uvs, indices);
        for &i in indices {
            uvs[i] = center;
        }
        self.set_coincident(indices);
    }

    fn fresh_class(&mut self) -> usize {
        let class = self.next_class;
        self.next_class += 1;
        class
    }
}
