//! Mask propagation: one forward sweep of the transfer rules.

use super::diagnostics::Diagnostic;
use super::mask::{plain_set, weight_set, Mask};
use super::pipeline::{PruningStage, Transformation, Transformed};
use super::transfer::{
    backward_only, bidirectional, dot_product, DotProductMasks, ElementwiseMasks, TransferClass,
};
use super::{PruneError, Result};
use crate::graph::{Model, Node, OpKind};
use tracing::{debug, info, warn};

/// Apply the transfer rule of every node once, in stored node order.
///
/// Updated masks are written back immediately, so later nodes in the same
/// sweep see them, but earlier nodes are not revisited. Reconvergent paths
/// may need further sweeps; `changed` reports whether one is warranted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagateMasks {
    strict: bool,
}

impl PropagateMasks {
    /// Create a propagation stage that reports unknown operators as diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unknown operators instead of skipping them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Transformation for PropagateMasks {
    fn stage(&self) -> PruningStage {
        PruningStage::Propagating
    }

    fn apply(&self, mut model: Model) -> Result<Transformed> {
        let mut changed = false;
        let mut diagnostics = Vec::new();

        for idx in 0..model.nodes().len() {
            let Some(node) = model.node(idx).cloned() else {
                continue;
            };
            let node_changed = match TransferClass::of(&node.op) {
                TransferClass::Bidirectional => {
                    update_elementwise(&mut model, &node, bidirectional)?
                }
                TransferClass::BackwardOnly => {
                    update_elementwise(&mut model, &node, backward_only)?
                }
                TransferClass::DotProduct => update_dot_product(&mut model, &node)?,
                TransferClass::Opaque => {
                    if self.strict {
                        return Err(PruneError::UnsupportedOperator {
                            node: node.name.clone(),
                            op: node.op.to_string(),
                        });
                    }
                    let diagnostic = Diagnostic::unsupported_operator(&node.name, node.op.as_str());
                    warn!(node = %node.name, op = %node.op, "{}", diagnostic.message);
                    diagnostics.push(diagnostic);
                    false
                }
            };
            if node_changed {
                debug!(node = %node.name, op = %node.op, "masks updated");
            }
            changed |= node_changed;
        }

        info!(changed, diagnostics = diagnostics.len(), "mask propagation sweep done");
        Ok(Transformed::new(model, changed).with_diagnostics(diagnostics))
    }
}

fn update_elementwise(
    model: &mut Model,
    node: &Node,
    rule: fn(&ElementwiseMasks) -> ElementwiseMasks,
) -> Result<bool> {
    let read = |names: &[String]| {
        names
            .iter()
            .map(|t| plain_set(model.sparsity(t), t, &node.name))
            .collect::<Result<Vec<_>>>()
    };
    let before = ElementwiseMasks {
        inputs: read(&node.inputs)?,
        outputs: read(&node.outputs)?,
    };
    let after = rule(&before);

    for (name, set) in node.inputs.iter().zip(&after.inputs) {
        model.set_sparsity(name, Some(Mask::Plain(set.clone())));
    }
    for (name, set) in node.outputs.iter().zip(&after.outputs) {
        model.set_sparsity(name, Some(Mask::Plain(set.clone())));
    }
    Ok(after != before)
}

fn update_dot_product(model: &mut Model, node: &Node) -> Result<bool> {
    let depthwise = match node.op {
        OpKind::Conv => node.attr_int("group")? > 1,
        _ => false,
    };
    let data = node.input(0)?;
    let weight = node.input(1)?;
    let output = node.output(0)?;

    let before = DotProductMasks {
        data: plain_set(model.sparsity(data), data, &node.name)?,
        weight: weight_set(model.sparsity(weight), weight, &node.name)?,
        output: plain_set(model.sparsity(output), output, &node.name)?,
    };
    let after = dot_product(&before, depthwise);

    model.set_sparsity(data, Some(Mask::Plain(after.data.clone())));
    model.set_sparsity(weight, Some(Mask::Weight(after.weight.clone())));
    model.set_sparsity(output, Some(Mask::Plain(after.output.clone())));
    Ok(after != before)
}
