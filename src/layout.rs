use crate::distribution::Distribution;

/// Enlargements at or below this are treated as noise and left unapplied.
pub const ENLARGEMENT_THRESHOLD: f64 = 1.5;

/// One visible row of the tree as seen by the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeItem {
    pub indent: usize,
    pub name: String,
    /// Relative importance; multiplies the row's natural height.
    pub weight: f64,
    /// Final factor applied to the unit size. Includes the weight.
    pub scale: f64,
}

impl TreeItem {
    pub fn new(indent: usize, name: impl Into<String>, weight: f64) -> Self {
        Self {
            indent,
            name: name.into(),
            weight,
            scale: 1.0,
        }
    }
}

/// Vertical band occupied by one row, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBand {
    pub top: f64,
    pub height: f64,
}

impl RowBand {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height * 0.5
    }
}

/// Shrink factor needed for `items` to fit `container_size` at `unit_size`.
pub fn global_scale(items: &[TreeItem], unit_size: f64, container_size: f64) -> f64 {
    let sum_item_sizes: f64 = items.iter().map(|item| unit_size * item.weight).sum();
    if sum_item_sizes > container_size {
        container_size / sum_item_sizes
    } else {
        1.0
    }
}

/// Whether a sampled enlargement is large enough to apply.
pub fn is_enlarged(enlargement: f64) -> bool {
    enlargement > ENLARGEMENT_THRESHOLD
}

/// Distribute `container_size` among `items`.
///
/// Every item is first shrunk uniformly so the whole list fits. With a
/// distribution, items whose midpoint samples above the threshold are
/// enlarged, and the height they gain is taken back from the other items in
/// proportion to their weight. Writes `item.scale` and returns the scales in
/// item order.
pub fn scale(
    items: &mut [TreeItem],
    unit_size: f64,
    container_size: f64,
    distribution: Option<&mut Distribution>,
) -> Vec<f64> {
    apply_scale(items, unit_size, container_size, distribution);
    items.iter().map(|item| item.scale).collect()
}

/// Same pass as `scale`, returning the global scale instead of the list.
pub fn apply_scale(
    items: &mut [TreeItem],
    unit_size: f64,
    container_size: f64,
    distribution: Option<&mut Distribution>,
) -> f64 {
    if items.is_empty() {
        return 1.0;
    }

    for item in items.iter_mut() {
        item.scale = 1.0;
    }

    let global = global_scale(items, unit_size, container_size);
    for item in items.iter_mut() {
        item.scale = global * item.weight;
    }

    // A collapsed container has no height to redistribute
    let Some(distribution) = distribution.filter(|_| global > 0.0) else {
        return global;
    };
    distribution.set_max_factor(global);
    if !distribution.max().is_finite() {
        return global;
    }

    let mut y = 0.0;
    let mut rest_size = 0.0;
    let mut remainder: Vec<usize> = Vec::new();
    let mut remainder_weight = 0.0;

    for (index, item) in items.iter_mut().enumerate() {
        let old_size = unit_size * item.scale;
        let enlargement = distribution.at(y + old_size / 2.0);
        y += old_size;

        if is_enlarged(enlargement) {
            item.scale = global * enlargement * item.weight;
            rest_size += unit_size * item.scale - old_size;
        } else {
            remainder.push(index);
            remainder_weight += item.weight;
        }
    }

    if rest_size > 0.0 && remainder_weight > 0.0 && unit_size > 0.0 {
        let per_weight = rest_size / remainder_weight / unit_size;
        for index in remainder {
            let item = &mut items[index];
            item.scale = (item.scale - item.weight * per_weight).max(0.0);
        }
    }

    global
}

/// Stack the scaled items top to bottom starting at 0.
pub fn row_geometry(items: &[TreeItem], unit_size: f64) -> Vec<RowBand> {
    let mut top = 0.0;
    items
        .iter()
        .map(|item| {
            let band = RowBand {
                top,
                height: unit_size * item.scale,
            };
            top += band.height;
            band
        })
        .collect()
}

/// Index of the band containing `y`, if any.
pub fn row_at(bands: &[RowBand], y: f64) -> Option<usize> {
    bands
        .iter()
        .position(|band| band.height > 0.0 && y >= band.top && y < band.bottom())
}
