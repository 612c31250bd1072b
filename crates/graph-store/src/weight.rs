//! Edge weight derivation from endpoint metrics.

use graph_types::NodeAttributes;

/// `(activity, interaction, connection_count)` of one node, with unset fields resolved.
///
/// An unset `connection_count` resolves to the node's live degree, so adding or removing
/// an edge elsewhere on a node changes the weights of all its other edges even though the
/// node's own attributes did not change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricVector {
    pub activity: f64,
    pub interaction: f64,
    pub connection_count: f64,
}

impl MetricVector {
    pub fn new(activity: f64, interaction: f64, connection_count: f64) -> Self {
        Self {
            activity,
            interaction,
            connection_count,
        }
    }

    pub fn from_attributes(attributes: &NodeAttributes, degree: usize) -> Self {
        Self {
            activity: attributes.activity.unwrap_or(0.0),
            interaction: attributes.interaction.unwrap_or(0.0),
            connection_count: attributes
                .connection_count
                .map(f64::from)
                .unwrap_or(degree as f64),
        }
    }

    pub fn distance(&self, other: &MetricVector) -> f64 {
        let da = self.activity - other.activity;
        let di = self.interaction - other.interaction;
        let dc = self.connection_count - other.connection_count;
        (da * da + di * di + dc * dc).sqrt()
    }
}

/// Similarity weight: `1 / (1 + euclidean distance)`, in `(0, 1]`.
pub struct WeightModel;

impl WeightModel {
    pub fn calculate(a: &MetricVector, b: &MetricVector) -> f64 {
        1.0 / (1.0 + a.distance(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_weigh_one() {
        let v = MetricVector::new(0.5, 10.0, 2.0);
        assert_eq!(WeightModel::calculate(&v, &v), 1.0);
    }

    #[test]
    fn weight_matches_inverse_distance() {
        let a = MetricVector::new(0.0, 0.0, 2.0);
        let b = MetricVector::new(1.0, 0.0, 0.0);
        let w = WeightModel::calculate(&a, &b);
        assert!((w - 1.0 / (1.0 + 5f64.sqrt())).abs() < 1e-12);
        assert!((w - 0.3090).abs() < 1e-4);
    }

    #[test]
    fn unset_connection_count_falls_back_to_degree() {
        let attrs = NodeAttributes::new(Some(0.3), None, None);
        let v = MetricVector::from_attributes(&attrs, 4);
        assert_eq!(v, MetricVector::new(0.3, 0.0, 4.0));

        let explicit = NodeAttributes::new(None, None, Some(0));
        assert_eq!(MetricVector::from_attributes(&explicit, 4).connection_count, 0.0);
    }
}
