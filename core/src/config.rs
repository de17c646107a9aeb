use serde::{Deserialize, Serialize};

/// Distance between skip entries in a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SkipStride {
    /// `max(1, floor(sqrt(n)))` for a list of `n` postings.
    #[default]
    Sqrt,
    /// A fixed stride; zero is treated as one.
    Fixed(usize),
}

impl SkipStride {
    pub fn for_len(self, n: usize) -> usize {
        match self {
            SkipStride::Sqrt => (n as f64).sqrt().floor().max(1.0) as usize,
            SkipStride::Fixed(s) => s.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub skip_stride: SkipStride,
    /// Rebuild the skip tables of touched terms at the end of every ingest.
    #[serde(default = "default_eager")]
    pub eager_skip_rebuild: bool,
}

fn default_eager() -> bool { true }

impl Default for IndexConfig {
    fn default() -> Self {
        Self { skip_stride: SkipStride::Sqrt, eager_skip_rebuild: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_stride() {
        assert_eq!(SkipStride::Sqrt.for_len(0), 1);
        assert_eq!(SkipStride::Sqrt.for_len(3), 1);
        assert_eq!(SkipStride::Sqrt.for_len(9), 3);
        assert_eq!(SkipStride::Sqrt.for_len(15), 3);
        assert_eq!(SkipStride::Sqrt.for_len(16), 4);
    }

    #[test]
    fn fixed_stride_is_at_least_one() {
        assert_eq!(SkipStride::Fixed(0).for_len(100), 1);
        assert_eq!(SkipStride::Fixed(5).for_len(2), 5);
    }

    #[test]
    fn config_defaults_from_empty_json() {
        let cfg: IndexConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, IndexConfig::default());
    }
}
