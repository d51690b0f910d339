use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::layout::TreeItem;
use crate::tree::Row;

/// Assigns a row's relative importance from its depth in the tree.
pub trait WeightPolicy {
    fn weight(&self, depth: usize) -> f64;
}

/// Root and first level largest, second level a little larger, the rest at 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredWeights;

impl WeightPolicy for TieredWeights {
    fn weight(&self, depth: usize) -> f64 {
        match depth {
            0 | 1 => 2.0,
            2 => 1.2,
            _ => 1.0,
        }
    }
}

/// Every row weighs the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformWeights;

impl WeightPolicy for UniformWeights {
    fn weight(&self, _depth: usize) -> f64 {
        1.0
    }
}

/// Selectable weight policy, as it appears in config files and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    #[default]
    Tiered,
    Uniform,
}

impl WeightMode {
    pub fn policy(self) -> &'static dyn WeightPolicy {
        match self {
            WeightMode::Tiered => &TieredWeights,
            WeightMode::Uniform => &UniformWeights,
        }
    }
}

/// Turn traversal rows into layout items with weights from `policy`.
pub fn to_items(rows: &[Row], policy: &dyn WeightPolicy) -> Vec<TreeItem> {
    rows.iter()
        .map(|row| TreeItem::new(row.depth, row.name.clone(), policy.weight(row.depth)))
        .collect()
}
