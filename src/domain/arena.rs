use std::collections::{HashMap, VecDeque};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::classify::{StatusColors, SyncStatus};
use crate::domain::entities::{DomainPolicy, SiteRecord};

/// Role of a node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic `GPS` node at the top
    HierarchyRoot,
    /// Synthetic grouping node, one per region
    Region,
    /// A real site from the record set
    Site,
}

/// Tree node in the arena-based site hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Site data for this node (synthetic for root and regions)
    pub record: SiteRecord,
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for the hierarchy root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
    /// Site id of the governing grandmaster, set once at build time
    pub grandmaster_site_id: Option<String>,
    /// Last classification stamped by `classify_all`
    pub status: SyncStatus,
}

impl TreeNode {
    pub fn is_site(&self) -> bool {
        self.kind == NodeKind::Site
    }

    pub fn site_id(&self) -> &str {
        &self.record.site_id
    }

    pub fn colors(&self) -> StatusColors {
        self.status.colors()
    }
}

/// Arena-based site hierarchy.
///
/// Always rooted at a synthetic `GPS` node. Parent and child links are arena
/// indices, so upward walks are plain index chases.
#[derive(Debug, Clone)]
pub struct SiteTree {
    arena: Arena<TreeNode>,
    root: Index,
    by_site: HashMap<String, Index>,
    policy: DomainPolicy,
}

impl SiteTree {
    pub fn new(policy: DomainPolicy) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            record: SiteRecord::hierarchy_root(),
            kind: NodeKind::HierarchyRoot,
            parent: None,
            children: Vec::new(),
            grandmaster_site_id: None,
            status: SyncStatus::Dropped,
        });
        Self {
            arena,
            root,
            by_site: HashMap::new(),
            policy,
        }
    }

    #[instrument(level = "trace", skip(self, record), fields(site_id = %record.site_id))]
    pub fn insert_node(
        &mut self,
        record: SiteRecord,
        kind: NodeKind,
        parent: Index,
        grandmaster_site_id: Option<String>,
    ) -> Index {
        let site_id = record.site_id.clone();
        let node = TreeNode {
            record,
            kind,
            parent: Some(parent),
            children: Vec::new(),
            grandmaster_site_id,
            status: SyncStatus::Dropped,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        if kind == NodeKind::Site {
            self.by_site.insert(site_id, node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }

    /// Look up a site node by its site id. Synthetic nodes are not indexed.
    pub fn find(&self, site_id: &str) -> Option<Index> {
        self.by_site.get(site_id).copied()
    }

    pub fn parent_of(&self, idx: Index) -> Option<&TreeNode> {
        self.get_node(idx)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get_node(parent))
    }

    /// Number of site nodes, excluding synthetic ones.
    pub fn site_count(&self) -> usize {
        self.by_site.len()
    }

    /// Strict ancestors of `idx`, nearest first, ending at the hierarchy root.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        let next = self.get_node(idx).and_then(|node| node.parent);
        Ancestors { tree: self, next }
    }

    /// Breadth-first traversal from the hierarchy root.
    pub fn iter_level_order(&self) -> LevelOrderIterator<'_> {
        LevelOrderIterator::new(self)
    }

    /// Level-order indices, for passes that mutate nodes while walking.
    pub fn level_order_indices(&self) -> Vec<Index> {
        self.iter_level_order().map(|(idx, _)| idx).collect()
    }

    /// Longest root-to-leaf path counted in nodes, synthetic levels included.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::from([(self.root, 1)]);
        while let Some((idx, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                queue.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        max_depth
    }
}

pub struct Ancestors<'a> {
    tree: &'a SiteTree,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.tree.get_node(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}

pub struct LevelOrderIterator<'a> {
    tree: &'a SiteTree,
    queue: VecDeque<Index>,
}

impl<'a> LevelOrderIterator<'a> {
    fn new(tree: &'a SiteTree) -> Self {
        Self {
            tree,
            queue: VecDeque::from([tree.root()]),
        }
    }
}

impl<'a> Iterator for LevelOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.tree.get_node(current_idx) {
                self.queue.extend(node.children.iter().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Domain, SyncSolution};

    fn site(id: &str) -> SiteRecord {
        SiteRecord::new(id, "North", Domain::Ipmpls, SyncSolution::InBand)
    }

    //      GPS
    //       |
    //     North
    //     /   \
    //    a     b
    //    |
    //    c
    fn sample() -> (SiteTree, Index, Index, Index) {
        let mut tree = SiteTree::new(DomainPolicy::default());
        let region = tree.insert_node(
            SiteRecord::region_node("North"),
            NodeKind::Region,
            tree.root(),
            None,
        );
        let a = tree.insert_node(site("a"), NodeKind::Site, region, Some("a".into()));
        let b = tree.insert_node(site("b"), NodeKind::Site, region, Some("b".into()));
        let c = tree.insert_node(site("c"), NodeKind::Site, a, Some("a".into()));
        (tree, a, b, c)
    }

    #[test]
    fn given_tree_when_iterating_level_order_then_visits_parents_before_children() {
        let (tree, ..) = sample();
        let order: Vec<_> = tree
            .iter_level_order()
            .map(|(_, node)| node.site_id().to_string())
            .collect();
        assert_eq!(order, ["GPS", "North", "a", "b", "c"]);
    }

    #[test]
    fn given_leaf_when_walking_ancestors_then_ends_at_hierarchy_root() {
        let (tree, a, _, c) = sample();
        let ancestors: Vec<_> = tree.ancestors(c).map(|(idx, _)| idx).collect();
        assert_eq!(ancestors.len(), 3);
        assert_eq!(ancestors[0], a);
        assert_eq!(*ancestors.last().unwrap(), tree.root());
    }

    #[test]
    fn given_tree_when_measuring_then_reports_depth_and_site_count() {
        let (tree, _, b, _) = sample();
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.site_count(), 3);
        assert_eq!(tree.find("b"), Some(b));
        assert_eq!(tree.find("North"), None);
    }
}
