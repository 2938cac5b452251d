use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::entities::{Item, Priceable};
use crate::domain::error::{DomainError, DomainResult};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a node of one particular [`PriceTree`].
///
/// The handle carries the id of the tree that issued it, so a handle from
/// another tree never resolves, even when its arena slot is in use here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

/// Composite node: an ordered list of handles to other nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Child handles in insertion order, duplicates allowed
    children: Vec<NodeId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Node stored in the arena, either a leaf item or a group of nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Item(Item),
    Group(Group),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Item(item) => &item.name,
            Node::Group(group) => &group.name,
        }
    }

    /// Child handles; always empty for items.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Item(_) => &[],
            Node::Group(group) => group.children(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Arena-backed price hierarchy.
///
/// Every item and group lives in one generational arena and groups refer to
/// their children by [`NodeId`], so a node can be shared by several groups
/// without any of them owning it. Nodes are never removed: a handle handed
/// out by this tree stays valid for the tree's lifetime, and handles from
/// any other tree are rejected with [`DomainError::UnknownNode`].
///
/// Adding children is checked so that the structure stays acyclic, and
/// pricing walks it with an explicit stack, so arbitrarily deep nesting
/// cannot exhaust the call stack.
#[derive(Debug)]
pub struct PriceTree {
    id: u64,
    arena: Arena<Node>,
}

impl Default for PriceTree {
    fn default() -> Self {
        Self::new()
    }
}

enum Visit {
    Enter(NodeId),
    /// All children of `group` have been priced; their values start at `base`
    Exit { group: NodeId, base: usize },
}

impl PriceTree {
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
        }
    }

    fn handle(&self, index: Index) -> NodeId {
        NodeId {
            tree: self.id,
            index,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_item(&mut self, item: Item) -> NodeId {
        let index = self.arena.insert(Node::Item(item));
        self.handle(index)
    }

    #[instrument(level = "trace", skip(self, name))]
    pub fn insert_group(&mut self, name: impl Into<String>) -> NodeId {
        let index = self.arena.insert(Node::Group(Group::new(name)));
        self.handle(index)
    }

    /// Appends `child` to the children of the group `parent`.
    ///
    /// The same child may be added any number of times, to the same or to
    /// different groups. Fails if either handle is foreign, if `parent` is an
    /// item, or if `parent` is reachable from `child` (which includes adding a
    /// group to itself).
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        let child_name = self
            .get(child)
            .ok_or(DomainError::UnknownNode)?
            .name()
            .to_string();
        let parent_node = self.get(parent).ok_or(DomainError::UnknownNode)?;
        let parent_name = parent_node.name().to_string();
        if !parent_node.is_group() {
            return Err(DomainError::NotAGroup(parent_name));
        }

        if self.reaches(child, parent) {
            return Err(DomainError::CycleDetected {
                parent: parent_name,
                child: child_name,
            });
        }

        if let Some(Node::Group(group)) = self.arena.get_mut(parent.index) {
            group.children.push(child);
        }
        debug!("added '{}' to '{}'", child_name, parent_name);
        Ok(())
    }

    /// Whether `target` is `start` itself or one of its descendants.
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.get(current) {
                stack.extend(node.children().iter().copied());
            }
        }
        false
    }

    /// Node behind `id`; `None` for a handle issued by another tree.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.tree != self.id {
            return None;
        }
        self.arena.get(id.index)
    }

    /// Borrowed handle that can be priced through [`Priceable`].
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|node| NodeRef {
            tree: self,
            id,
            node,
        })
    }

    /// First node (in insertion order) carrying `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.arena
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(index, _)| self.handle(index))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Price of the node `id`.
    ///
    /// Items report their own price. Groups sum their children left to
    /// right in insertion order, recomputing the whole subtree on every call.
    /// An empty group costs zero.
    #[instrument(level = "debug", skip(self))]
    pub fn price(&self, id: NodeId) -> DomainResult<f64> {
        if self.get(id).is_none() {
            return Err(DomainError::UnknownNode);
        }
        Ok(self.aggregate(id))
    }

    fn aggregate(&self, start: NodeId) -> f64 {
        let mut visits = vec![Visit::Enter(start)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(visit) = visits.pop() {
            match visit {
                Visit::Enter(id) => match self.get(id) {
                    Some(Node::Item(item)) => values.push(item.price()),
                    Some(Node::Group(group)) => {
                        trace!(
                            group = %group.name,
                            children = group.children.len(),
                            "pricing group"
                        );
                        visits.push(Visit::Exit {
                            group: id,
                            base: values.len(),
                        });
                        // Reversed so the first child is popped first
                        visits.extend(group.children.iter().rev().map(|&c| Visit::Enter(c)));
                    }
                    None => {}
                },
                Visit::Exit { group, base } => {
                    let total = values.drain(base..).fold(0.0, |acc, price| acc + price);
                    if let Some(node) = self.get(group) {
                        trace!(group = %node.name(), total, "priced group");
                    }
                    values.push(total);
                }
            }
        }

        values.pop().unwrap_or_default()
    }

    /// Length of the longest path from `id` down to a leaf, counting nodes.
    ///
    /// An item or an empty group has depth 1; a foreign handle has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(id, 1)];

        while let Some((current, depth)) = stack.pop() {
            if let Some(node) = self.get(current) {
                max_depth = max_depth.max(depth);
                for &child in node.children() {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Items below `id` in pre-order. A shared item appears once per occurrence.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_items(&self, id: NodeId) -> Vec<&Item> {
        self.iter(id)
            .filter_map(|(_, node)| match node {
                Node::Item(item) => Some(item),
                Node::Group(_) => None,
            })
            .collect()
    }

    /// Nodes that are not the child of any group, in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        let children: HashSet<NodeId> = self
            .arena
            .iter()
            .flat_map(|(_, node)| node.children().iter().copied())
            .collect();
        self.arena
            .iter()
            .map(|(index, _)| self.handle(index))
            .filter(|id| !children.contains(id))
            .collect()
    }

    /// Pre-order walk from `start`; empty for a foreign handle.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, start: NodeId) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, start)
    }
}

/// A node together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a PriceTree,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }
}

impl Priceable for NodeRef<'_> {
    fn price(&self) -> f64 {
        self.tree.aggregate(self.id)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a PriceTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a PriceTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}
