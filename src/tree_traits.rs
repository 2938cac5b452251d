/*
Conversion of price hierarchies into printable `termtree` trees.
Each label carries the node name and its computed price.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Node, NodeId, PriceTree, Priceable};

pub trait TreeNodeConvert {
    /// Rendered tree rooted at `root`; `None` if the handle is foreign.
    fn to_tree_string(
        &self,
        root: NodeId,
        format_amount: &dyn Fn(f64) -> String,
    ) -> Option<String>;
}

enum Visit {
    Enter(NodeId),
    /// Subtrees of `group`'s children are on the output stack from `base`
    Exit { group: NodeId, base: usize },
}

fn label(node: &Node, price: f64, format_amount: &dyn Fn(f64) -> String) -> String {
    match node {
        Node::Item(item) => match item.multiplier {
            Some(multiplier) => format!(
                "{} [{} x {} = {}]",
                item.name,
                format_amount(item.unit_price),
                multiplier,
                format_amount(price)
            ),
            None => format!("{} [{}]", item.name, format_amount(price)),
        },
        Node::Group(group) => format!("{} [{}]", group.name, format_amount(price)),
    }
}

/// Builds the display tree bottom-up, pricing every subtree once.
fn build_tree(
    tree: &PriceTree,
    root: NodeId,
    format_amount: &dyn Fn(f64) -> String,
) -> Option<Tree<String>> {
    let mut visits = vec![Visit::Enter(root)];
    let mut built: Vec<(Tree<String>, f64)> = Vec::new();

    while let Some(visit) = visits.pop() {
        match visit {
            Visit::Enter(id) => {
                let Some(node) = tree.get(id) else {
                    continue;
                };
                match node {
                    Node::Item(item) => {
                        let price = item.price();
                        built.push((Tree::new(label(node, price, format_amount)), price));
                    }
                    Node::Group(group) => {
                        visits.push(Visit::Exit {
                            group: id,
                            base: built.len(),
                        });
                        visits.extend(group.children().iter().rev().map(|&c| Visit::Enter(c)));
                    }
                }
            }
            Visit::Exit { group, base } => {
                let Some(node) = tree.get(group) else {
                    continue;
                };
                let children: Vec<_> = built.drain(base..).collect();
                let total = children.iter().fold(0.0, |acc, (_, price)| acc + price);
                let display = Tree::new(label(node, total, format_amount))
                    .with_leaves(children.into_iter().map(|(child, _)| child));
                built.push((display, total));
            }
        }
    }

    built.pop().map(|(display, _)| display)
}

/// Drops a display tree level by level; the derived drop recurses per level.
fn dismantle(display: Tree<String>) {
    let mut pending = vec![display];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}

impl TreeNodeConvert for PriceTree {
    #[instrument(level = "debug", skip(self, format_amount))]
    fn to_tree_string(
        &self,
        root: NodeId,
        format_amount: &dyn Fn(f64) -> String,
    ) -> Option<String> {
        let display = build_tree(self, root, format_amount)?;
        let rendered = display.to_string();
        dismantle(display);
        Some(rendered)
    }
}
