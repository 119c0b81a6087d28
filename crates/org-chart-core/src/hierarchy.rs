//! Hierarchy builder - flat member list to rooted forest
//!
//! Turns `{id, reports_to, roles}` records into roots, children and orphans.
//! The forest is an arena: one slot per input record, children stored as
//! index lists, and `TreeNode` is a borrowed view into it. Building is two
//! linear passes and never fails; a `reports_to` that does not resolve is
//! treated as "no manager".

use crate::model::{MemberId, OrgChartNode, Role};
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a [`Forest`] from a flat member list
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    /// Role tags that promote a top-level member to root
    leadership_roles: Vec<Role>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            leadership_roles: vec![Role::BusinessOwner, Role::Executive],
        }
    }

    /// Replace the set of leadership tags
    pub fn with_leadership_roles(mut self, roles: Vec<Role>) -> Self {
        self.leadership_roles = roles;
        self
    }

    fn is_leader(&self, node: &OrgChartNode) -> bool {
        node.roles.iter().any(|r| self.leadership_roles.contains(r))
    }

    /// Build the forest. Input order is preserved in every output list.
    pub fn build(&self, nodes: &[OrgChartNode]) -> Forest {
        let count = nodes.len();

        // First occurrence of an id owns the key
        let mut index: HashMap<MemberId, usize> = HashMap::with_capacity(count);
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(i);
        }

        let manager: Vec<Option<usize>> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                node.reports_to
                    .as_ref()
                    .and_then(|m| index.get(m).copied())
                    .filter(|&m| m != i)
            })
            .collect();

        let mut is_manager = vec![false; count];
        for &m in manager.iter().flatten() {
            is_manager[m] = true;
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut top_level = Vec::new();
        for (i, m) in manager.iter().enumerate() {
            match m {
                Some(m) => children[*m].push(i),
                None => top_level.push(i),
            }
        }

        let (mut roots, mut orphans): (Vec<usize>, Vec<usize>) = top_level
            .into_iter()
            .partition(|&i| is_manager[i] || self.is_leader(&nodes[i]));

        // Always show some tree rather than an empty one plus a full sidebar
        if roots.is_empty() {
            roots.append(&mut orphans);
        }

        let depth = compute_depths(count, &children, roots.iter().chain(orphans.iter()));
        let detached: Vec<usize> = (0..count).filter(|&i| depth[i].is_none()).collect();

        if !detached.is_empty() {
            let ids: Vec<&str> = detached.iter().map(|&i| nodes[i].id.as_str()).collect();
            tracing::warn!(
                count = detached.len(),
                members = ?ids,
                "Circular reporting lines: members unreachable from any top-level node"
            );
        }

        let forest = Forest {
            nodes: nodes.to_vec(),
            index,
            manager,
            children,
            depth,
            roots,
            orphans,
            detached,
        };

        tracing::debug!(stats = ?forest.stats(), "Built org chart forest");
        forest
    }
}

/// Build with the default leadership roles
pub fn build_hierarchy(nodes: &[OrgChartNode]) -> Forest {
    HierarchyBuilder::new().build(nodes)
}

/// Depth of every slot reachable from the given top-level slots
fn compute_depths<'a>(
    count: usize,
    children: &[Vec<usize>],
    top_level: impl Iterator<Item = &'a usize>,
) -> Vec<Option<usize>> {
    let mut depth = vec![None; count];
    let mut stack: Vec<(usize, usize)> = top_level.map(|&i| (i, 0)).collect();
    while let Some((i, d)) = stack.pop() {
        if depth[i].is_some() {
            continue;
        }
        depth[i] = Some(d);
        stack.extend(children[i].iter().map(|&c| (c, d + 1)));
    }
    depth
}

// =============================================================================
// FOREST
// =============================================================================

/// Rooted forest derived from a member list
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<OrgChartNode>,
    index: HashMap<MemberId, usize>,
    manager: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// `None` for detached slots
    depth: Vec<Option<usize>>,
    roots: Vec<usize>,
    orphans: Vec<usize>,
    detached: Vec<usize>,
}

/// Summary counts, used for logging and the chart header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    pub members: usize,
    pub roots: usize,
    pub orphans: usize,
    pub detached: usize,
    pub pending: usize,
    /// Deepest level below a top-level node (0 when flat)
    pub max_depth: usize,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn view(&self, idx: usize) -> TreeNode<'_> {
        TreeNode { forest: self, idx }
    }

    pub fn roots(&self) -> impl Iterator<Item = TreeNode<'_>> + '_ {
        self.roots.iter().map(move |&i| self.view(i))
    }

    pub fn orphans(&self) -> impl Iterator<Item = TreeNode<'_>> + '_ {
        self.orphans.iter().map(move |&i| self.view(i))
    }

    /// Members whose manager chain is circular
    pub fn detached(&self) -> impl Iterator<Item = TreeNode<'_>> + '_ {
        self.detached.iter().map(move |&i| self.view(i))
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    pub fn get(&self, id: &MemberId) -> Option<TreeNode<'_>> {
        self.index.get(id).map(|&i| self.view(i))
    }

    pub fn node(&self, id: &MemberId) -> Option<&OrgChartNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn manager_of(&self, id: &MemberId) -> Option<&OrgChartNode> {
        let idx = *self.index.get(id)?;
        self.manager[idx].map(|m| &self.nodes[m])
    }

    /// True when the roots carry structure: a report below them, or
    /// unassigned members beside them
    pub fn has_hierarchy(&self) -> bool {
        self.roots.iter().any(|&r| !self.children[r].is_empty())
            || (!self.roots.is_empty() && !self.orphans.is_empty())
    }

    /// Every resolvable manager -> report pair, in input order
    pub fn edges(&self) -> Vec<(MemberId, MemberId)> {
        self.manager
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.map(|m| (self.nodes[m].id.clone(), self.nodes[i].id.clone())))
            .collect()
    }

    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            members: self.nodes.len(),
            roots: self.roots.len(),
            orphans: self.orphans.len(),
            detached: self.detached.len(),
            pending: self.nodes.iter().filter(|n| n.is_pending()).count(),
            max_depth: self.depth.iter().flatten().copied().max().unwrap_or(0),
        }
    }

    /// Members that may become the manager of `id` without creating a cycle
    ///
    /// Excludes the member itself and everything below it. Unknown ids get
    /// the full list.
    pub fn manager_candidates(&self, id: &MemberId) -> Vec<&OrgChartNode> {
        let Some(&start) = self.index.get(id) else {
            return self.nodes.iter().collect();
        };

        let mut excluded = vec![false; self.nodes.len()];
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if excluded[i] {
                continue;
            }
            excluded[i] = true;
            stack.extend(self.children[i].iter().copied());
        }

        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| !excluded[*i])
            .map(|(_, n)| n)
            .collect()
    }

    /// Structural outline of the visible trees (roots then orphans)
    pub fn outline(&self) -> (Vec<Outline>, Vec<Outline>) {
        (
            self.roots().map(|r| r.outline()).collect(),
            self.orphans().map(|o| o.outline()).collect(),
        )
    }
}

// =============================================================================
// TREE NODE VIEW
// =============================================================================

/// Borrowed view of one member inside a [`Forest`]
#[derive(Clone, Copy)]
pub struct TreeNode<'a> {
    forest: &'a Forest,
    idx: usize,
}

impl std::fmt::Debug for TreeNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", self.id())
            .field("children", &self.child_count())
            .finish()
    }
}

impl<'a> TreeNode<'a> {
    pub fn node(&self) -> &'a OrgChartNode {
        &self.forest.nodes[self.idx]
    }

    pub fn id(&self) -> &'a MemberId {
        &self.forest.nodes[self.idx].id
    }

    pub fn children(&self) -> impl Iterator<Item = TreeNode<'a>> + 'a {
        let forest = self.forest;
        forest.children[self.idx]
            .iter()
            .map(move |&c| TreeNode { forest, idx: c })
    }

    pub fn child_count(&self) -> usize {
        self.forest.children[self.idx].len()
    }

    pub fn has_children(&self) -> bool {
        !self.forest.children[self.idx].is_empty()
    }

    /// Number of members below this one (cycle-safe)
    pub fn descendant_count(&self) -> usize {
        let mut seen = vec![false; self.forest.nodes.len()];
        seen[self.idx] = true;
        let mut stack: Vec<usize> = self.forest.children[self.idx].clone();
        let mut count = 0;
        while let Some(i) = stack.pop() {
            if seen[i] {
                continue;
            }
            seen[i] = true;
            count += 1;
            stack.extend(self.forest.children[i].iter().copied());
        }
        count
    }

    /// Level below the top-level node; `None` when detached
    pub fn depth(&self) -> Option<usize> {
        self.forest.depth[self.idx]
    }

    /// Owned outline of this subtree (cycle-safe)
    pub fn outline(&self) -> Outline {
        let forest = self.forest;
        let mut seen = vec![false; forest.nodes.len()];
        let mut entries = Vec::new();
        let mut stack = vec![(self.idx, 0)];
        while let Some((i, level)) = stack.pop() {
            if seen[i] {
                continue;
            }
            seen[i] = true;
            entries.push((level, forest.nodes[i].id.clone()));
            stack.extend(forest.children[i].iter().rev().map(|&c| (c, level + 1)));
        }
        Outline(entries)
    }
}

/// Owned id-only shape of a subtree: pre-order `(level, id)` pairs,
/// level 0 being the subtree's own top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline(pub Vec<(usize, MemberId)>);

// =============================================================================
// MEMOIZATION
// =============================================================================

/// Rebuilds the forest only when the input list is a different allocation
#[derive(Debug, Default)]
pub struct ForestCache {
    builder: HierarchyBuilder,
    source: Option<Arc<[OrgChartNode]>>,
    forest: Arc<Forest>,
    generation: u64,
}

impl ForestCache {
    pub fn new(builder: HierarchyBuilder) -> Self {
        Self {
            builder,
            ..Self::default()
        }
    }

    /// Forest for `nodes`, rebuilt if the list changed since the last call
    pub fn get(&mut self, nodes: &Arc<[OrgChartNode]>) -> Arc<Forest> {
        let fresh = self
            .source
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, nodes));
        if !fresh {
            self.forest = Arc::new(self.builder.build(nodes));
            self.source = Some(Arc::clone(nodes));
            self.generation += 1;
        }
        Arc::clone(&self.forest)
    }

    /// Incremented on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// =============================================================================
// TESTS
// =============================================================================
