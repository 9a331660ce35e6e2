//! Forest estimator: additive scalar-leaf decision trees.
//!
//! Trees are stored in a struct-of-arrays layout, one entry per node.
//! Internal nodes route on `features[feature] < threshold` (left on
//! true); a node with a negative left child is a leaf and contributes
//! `value`. Tree scores are summed with a base score, then passed
//! through the output transform.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::{Estimator, OutputTransform, TaskKind};

/// Structural errors in a serialized forest.
///
/// Raised at construction time; a validated forest cannot fail during
/// prediction.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error("tree {tree} node arrays disagree in length")]
    UnevenNodeArrays { tree: usize },
    #[error(
        "invalid child index in tree {tree}: node {node} references child {child} but tree has {n_nodes} nodes"
    )]
    InvalidChildIndex {
        tree: usize,
        node: usize,
        child: i32,
        n_nodes: usize,
    },
    #[error(
        "tree {tree} node {node} splits on feature {feature} but the model has {n_features} features"
    )]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: u32,
        n_features: usize,
    },
}

/// One decision tree in struct-of-arrays layout.
///
/// All vectors are parallel, one entry per node. Node 0 is the root.
/// A node is a leaf iff `left < 0`; leaves read `value` and ignore the
/// split fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Split feature index per node.
    pub feature: Vec<u32>,
    /// Split threshold per node.
    pub threshold: Vec<f32>,
    /// Left child index per node; negative marks a leaf.
    pub left: Vec<i32>,
    /// Right child index per node.
    pub right: Vec<i32>,
    /// Leaf value per node (meaningful for leaves only).
    pub value: Vec<f32>,
}

impl Tree {
    /// A single-leaf tree that always contributes `value`.
    pub fn leaf(value: f32) -> Self {
        Self {
            feature: vec![0],
            threshold: vec![0.0],
            left: vec![-1],
            right: vec![-1],
            value: vec![value],
        }
    }

    /// A depth-1 stump: `features[feature] < threshold` picks the left
    /// leaf value, otherwise the right.
    pub fn stump(feature: u32, threshold: f32, left_value: f32, right_value: f32) -> Self {
        Self {
            feature: vec![feature, 0, 0],
            threshold: vec![threshold, 0.0, 0.0],
            left: vec![1, -1, -1],
            right: vec![2, -1, -1],
            value: vec![0.0, left_value, right_value],
        }
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.left.len()
    }

    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ForestError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(ForestError::EmptyTree(tree));
        }
        if self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.right.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err(ForestError::UnevenNodeArrays { tree });
        }
        for node in 0..n_nodes {
            if self.left[node] < 0 {
                continue;
            }
            for child in [self.left[node], self.right[node]] {
                if child < 0 || child as usize >= n_nodes {
                    return Err(ForestError::InvalidChildIndex {
                        tree,
                        node,
                        child,
                        n_nodes,
                    });
                }
            }
            if self.feature[node] as usize >= n_features {
                return Err(ForestError::FeatureOutOfRange {
                    tree,
                    node,
                    feature: self.feature[node],
                    n_features,
                });
            }
        }
        Ok(())
    }

    /// Route one feature vector to a leaf value.
    ///
    /// NaN feature values fail the `<` comparison and route right,
    /// matching the serialization producer's convention.
    fn predict_row(&self, features: ArrayView1<'_, f32>) -> f32 {
        let mut node = 0usize;
        while self.left[node] >= 0 {
            let split = features[self.feature[node] as usize];
            node = if split < self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Additive ensemble of scalar-leaf trees.
///
/// # Example
///
/// ```
/// use admitcast::estimator::{Estimator, ForestEstimator, OutputTransform, TaskKind, Tree};
/// use ndarray::array;
///
/// let forest = ForestEstimator::new(
///     vec![Tree::stump(0, 50.0, -1.0, 1.0), Tree::leaf(0.5)],
///     2.0,
///     1,
///     TaskKind::Regression,
///     OutputTransform::Identity,
/// )
/// .unwrap();
/// // 30 < 50: stump contributes -1, leaf 0.5, base 2.0
/// assert_eq!(forest.predict(array![30.0].view()), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct ForestEstimator {
    trees: Vec<Tree>,
    base_score: f32,
    n_features: usize,
    task: TaskKind,
    transform: OutputTransform,
}

impl ForestEstimator {
    /// Create a validated forest.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError`] if any tree is empty, has unparallel node
    /// arrays, references a child out of range, or splits on a feature
    /// index outside `0..n_features`.
    pub fn new(
        trees: Vec<Tree>,
        base_score: f32,
        n_features: usize,
        task: TaskKind,
        transform: OutputTransform,
    ) -> Result<Self, ForestError> {
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }
        Ok(Self {
            trees,
            base_score,
            n_features,
            task,
            transform,
        })
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Base score added to the summed tree contributions.
    pub fn base_score(&self) -> f32 {
        self.base_score
    }
}

impl Estimator for ForestEstimator {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn task(&self) -> TaskKind {
        self.task
    }

    fn predict(&self, features: ArrayView1<'_, f32>) -> f32 {
        debug_assert_eq!(
            features.len(),
            self.n_features,
            "feature vector width must match trained width"
        );
        let margin = self
            .trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(features));
        self.transform.apply(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn stump_routes_on_threshold() {
        let forest = ForestEstimator::new(
            vec![Tree::stump(1, 10.0, 100.0, 200.0)],
            0.0,
            2,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap();
        assert_eq!(forest.predict(array![0.0, 5.0].view()), 100.0);
        assert_eq!(forest.predict(array![0.0, 10.0].view()), 200.0);
    }

    #[test]
    fn contributions_are_additive() {
        let forest = ForestEstimator::new(
            vec![Tree::leaf(1.0), Tree::leaf(2.0), Tree::leaf(4.0)],
            0.5,
            1,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap();
        assert_eq!(forest.predict(array![0.0].view()), 7.5);
    }

    #[test]
    fn nan_routes_right() {
        let forest = ForestEstimator::new(
            vec![Tree::stump(0, 10.0, -1.0, 1.0)],
            0.0,
            1,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap();
        assert_eq!(forest.predict(array![f32::NAN].view()), 1.0);
    }

    #[test]
    fn rejects_empty_tree() {
        let tree = Tree {
            feature: vec![],
            threshold: vec![],
            left: vec![],
            right: vec![],
            value: vec![],
        };
        let err = ForestEstimator::new(
            vec![tree],
            0.0,
            1,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap_err();
        assert!(matches!(err, ForestError::EmptyTree(0)));
    }

    #[test]
    fn rejects_child_out_of_range() {
        let mut tree = Tree::stump(0, 1.0, 0.0, 0.0);
        tree.right[0] = 9;
        let err = ForestEstimator::new(
            vec![tree],
            0.0,
            1,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ForestError::InvalidChildIndex { tree: 0, node: 0, child: 9, .. }
        ));
    }

    #[test]
    fn rejects_feature_out_of_range() {
        let err = ForestEstimator::new(
            vec![Tree::stump(3, 1.0, 0.0, 0.0)],
            0.0,
            2,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ForestError::FeatureOutOfRange { feature: 3, n_features: 2, .. }
        ));
    }

    #[test]
    fn rejects_uneven_node_arrays() {
        let mut tree = Tree::leaf(1.0);
        tree.value.push(2.0);
        let err = ForestEstimator::new(
            vec![tree],
            0.0,
            1,
            TaskKind::Regression,
            OutputTransform::Identity,
        )
        .unwrap_err();
        assert!(matches!(err, ForestError::UnevenNodeArrays { tree: 0 }));
    }
}
