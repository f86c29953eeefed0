//! Import configuration

use serde::{Deserialize, Serialize};

/// Track-add pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Files per metadata batch; 0 means `round(cores * 1.5)`
    #[serde(default)]
    pub batch_size: usize,

    /// Descend into subdirectories
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Resolve symlinks before duplicate checks
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
}

impl ImportSettings {
    /// Batch size actually used
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size > 0 {
            self.batch_size
        } else {
            default_batch_size()
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: 0,
            recursive: default_recursive(),
            follow_symlinks: default_follow_symlinks(),
        }
    }
}

/// One and a half loads per core keeps the disk busy while tags parse
fn default_batch_size() -> usize {
    let cores = num_cpus::get().max(1);
    ((cores as f64) * 1.5).round() as usize
}

fn default_recursive() -> bool {
    true
}

fn default_follow_symlinks() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_batch_size_scales_with_cores() {
        let settings = ImportSettings::default();
        let expected = ((num_cpus::get() as f64) * 1.5).round() as usize;
        assert_eq!(settings.effective_batch_size(), expected.max(1));
        assert!(settings.effective_batch_size() >= 2);
    }

    #[test]
    fn explicit_batch_size_wins() {
        let settings = ImportSettings {
            batch_size: 3,
            ..ImportSettings::default()
        };
        assert_eq!(settings.effective_batch_size(), 3);
    }
}
