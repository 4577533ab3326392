use ahash::AHashSet;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::error::Error;

/// Numeric ecoregion code as it appears in the upstream time-series files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EcoregionId(pub u32);

impl fmt::Display for EcoregionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EcoregionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(EcoregionId)
            .map_err(|e| Error::parse(format!("Invalid ecoregion ID '{}': {}", s, e)))
    }
}

impl From<u32> for EcoregionId {
    fn from(code: u32) -> Self {
        EcoregionId(code)
    }
}

/// Square matrix of pairwise distances, stored row-major and co-indexed
/// with an ordered list of ecoregion IDs.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> crate::Result<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::shape(format!(
                    "Row {} has {} columns, expected {}", i + 1, row.len(), size
                )));
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }

    pub fn zeros(size: usize) -> Self {
        Self { size, values: vec![0.0; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
    }

    /// Largest absolute difference between mirrored entries.
    pub fn max_asymmetry(&self) -> f64 {
        let mut worst = 0.0_f64;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                worst = worst.max((self.get(i, j) - self.get(j, i)).abs());
            }
        }
        worst
    }
}

/// One climate variable's pairwise distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableMatrix {
    pub name: String,
    pub matrix: DistanceMatrix,
}

/// Distance statistics over the off-diagonal, non-zero entries of the
/// overall distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityThresholds {
    pub mean: f64,
    pub std: f64,
    pub lower: f64,
    /// Reported only; not used to exclude pairs.
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarPair {
    pub distance: f64,
    pub first: EcoregionId,
    pub second: EcoregionId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    members: AHashSet<EcoregionId>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(a: EcoregionId, b: EcoregionId) -> Self {
        let mut cluster = Self::new();
        cluster.insert(a);
        cluster.insert(b);
        cluster
    }

    pub fn singleton(id: EcoregionId) -> Self {
        let mut cluster = Self::new();
        cluster.insert(id);
        cluster
    }

    pub fn insert(&mut self, id: EcoregionId) -> bool {
        self.members.insert(id)
    }

    pub fn contains(&self, id: &EcoregionId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EcoregionId> {
        self.members.iter()
    }

    pub fn union_len(&self, other: &Cluster) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    pub fn intersection_len(&self, other: &Cluster) -> usize {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.members.iter().filter(|id| large.contains(id)).count()
    }

    pub fn intersection(&self, other: &Cluster) -> Cluster {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.members.iter()
            .filter(|id| large.contains(id))
            .copied()
            .collect()
    }

    pub fn union(&self, other: &Cluster) -> Cluster {
        self.members.iter().chain(other.members.iter()).copied().collect()
    }

    pub fn remove_all(&mut self, other: &Cluster) {
        self.members.retain(|id| !other.contains(id));
    }

    /// Members in ascending order, as used for listing and reports.
    pub fn sorted(&self) -> Vec<EcoregionId> {
        let mut ids: Vec<EcoregionId> = self.members.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<EcoregionId> for Cluster {
    fn from_iter<I: IntoIterator<Item = EcoregionId>>(iter: I) -> Self {
        Self { members: iter.into_iter().collect() }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.sorted().iter().map(|id| id.to_string()).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

/// Clusters in creation order. Positions are meaningful: passes and logs
/// refer to clusters by index.
pub type ClusterList = Vec<Cluster>;

/// Non-fatal conditions recorded while clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An ecoregion was appended to more than one cluster for one pair.
    AmbiguousAssignment {
        ecoregion: EcoregionId,
        clusters: Vec<usize>,
    },
    /// Two clusters still share members after the split pass.
    ResidualOverlap {
        first: usize,
        second: usize,
        shared: Vec<EcoregionId>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousAssignment { ecoregion, clusters } => write!(
                f, "ecoregion {} appended to more than one cluster: {:?}",
                ecoregion, clusters.iter().map(|i| i + 1).collect::<Vec<_>>()
            ),
            Diagnostic::ResidualOverlap { first, second, shared } => write!(
                f, "clusters {} and {} still overlap on {:?}",
                first + 1, second + 1, shared.iter().map(|id| id.0).collect::<Vec<_>>()
            ),
        }
    }
}
