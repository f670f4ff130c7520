/*
termtree rendering lives behind a trait so the domain arena stays free of
display concerns.
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{SiteTree, TreeNode};

pub trait TreeNodeConvert {
    /// Rendering with a caller-supplied label per node.
    fn to_tree_with<F>(&self, label: F) -> Tree<String>
    where
        F: Fn(&TreeNode) -> String;
}

impl TreeNodeConvert for SiteTree {
    #[instrument(level = "debug", skip(self, label))]
    fn to_tree_with<F>(&self, label: F) -> Tree<String>
    where
        F: Fn(&TreeNode) -> String,
    {
        fn build<F: Fn(&TreeNode) -> String>(
            tree: &SiteTree,
            node_idx: Index,
            label: &F,
        ) -> Option<Tree<String>> {
            let node = tree.get_node(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child_idx| build(tree, child_idx, label))
                .collect();
            Some(Tree::new(label(node)).with_leaves(leaves))
        }

        build(self, self.root(), &label).unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_tree, DomainPolicy};
    use crate::util::testing::sample_sheet;

    #[test]
    fn given_sample_sheet_when_rendering_with_labels_then_every_node_uses_the_label() {
        let tree = build_tree(&sample_sheet(), DomainPolicy::default())
            .unwrap()
            .tree;

        let rendered = tree.to_tree_with(|node| format!("<{}>", node.site_id()));

        assert_eq!(rendered.root, "<GPS>");
        assert_eq!(rendered.leaves.len(), 2);
        let text = rendered.to_string();
        assert!(text.contains("<A2>"));
    }
}
