use crate::distribution::ClassDistribution;
use crate::error::ModelError;
use crate::node::Node;

/// A fitted binary decision tree.
///
/// Stored as an arena `Vec<Node>` rooted at index 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Build a tree from its node arena.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::ZeroFeatures`] | `n_features == 0` |
    /// | [`ModelError::InvalidNode`] | empty arena, child not after its parent or out of range, feature out of range, non-finite threshold, or invalid leaf distribution |
    pub fn new(nodes: Vec<Node>, n_features: usize) -> Result<Self, ModelError> {
        let tree = Self { nodes, n_features };
        tree.validate()?;
        Ok(tree)
    }

    /// Check the arena invariants that make traversal total.
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::ZeroFeatures);
        }
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidNode {
                node_index: 0,
                reason: "tree has no nodes".to_string(),
            });
        }
        let n_nodes = self.nodes.len();
        for (node_index, node) in self.nodes.iter().enumerate() {
            let invalid = |reason: String| ModelError::InvalidNode { node_index, reason };
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature.index() >= self.n_features {
                        return Err(invalid(format!(
                            "feature {feature} out of range for {} features",
                            self.n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid("threshold is not finite".to_string()));
                    }
                    for child in [left, right] {
                        if child.index() <= node_index || child.index() >= n_nodes {
                            return Err(invalid(format!("child {child} is not in ({node_index}, {n_nodes})")));
                        }
                    }
                }
                Node::Leaf { distribution } => {
                    if !distribution.is_valid() {
                        return Err(invalid("leaf distribution is not a probability pair".to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Return the leaf distribution reached by `sample`.
    ///
    /// Goes left when `sample[feature] <= threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        if sample.len() != self.n_features {
            return Err(ModelError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return Ok(*distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[feature.index()] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    /// Return the number of features the tree expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }
}
