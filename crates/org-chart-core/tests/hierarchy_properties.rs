//! Forest construction: fixed scenarios and randomized properties

use org_chart_core::{build_hierarchy, Forest, MemberId, OrgChartNode, Role, TreeNode};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;

fn ids<'a>(nodes: impl Iterator<Item = TreeNode<'a>>) -> Vec<String> {
    nodes.map(|n| n.id().to_string()).collect()
}

fn visit<'a>(node: TreeNode<'a>, seen: &mut HashMap<&'a MemberId, usize>) {
    *seen.entry(node.id()).or_default() += 1;
    for child in node.children() {
        visit(child, seen);
    }
}

/// How often each member is reachable from the forest's lists
fn placement_counts(forest: &Forest) -> HashMap<&MemberId, usize> {
    let mut seen = HashMap::new();
    for top in forest.roots().chain(forest.orphans()) {
        visit(top, &mut seen);
    }
    for node in forest.detached() {
        *seen.entry(node.id()).or_default() += 1;
    }
    seen
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn manager_of_someone_becomes_root() {
    let nodes = vec![
        OrgChartNode::new("A"),
        OrgChartNode::new("B").reporting_to("A"),
        OrgChartNode::new("C"),
    ];
    let forest = build_hierarchy(&nodes);
    assert_eq!(ids(forest.roots()), vec!["A"]);
    assert_eq!(ids(forest.orphans()), vec!["C"]);
}

#[test]
fn business_owner_promoted_without_reports() {
    let nodes = vec![
        OrgChartNode::new("A").with_role(Role::from_str("business_owner")),
        OrgChartNode::new("B"),
    ];
    let forest = build_hierarchy(&nodes);
    assert_eq!(ids(forest.roots()), vec!["A"]);
    assert_eq!(ids(forest.orphans()), vec!["B"]);
}

#[test]
fn near_miss_role_tags_stay_orphans() {
    let nodes = vec![
        OrgChartNode::new("A").with_role(Role::from_str("owner")),
        OrgChartNode::new("B").with_role(Role::from_str("executive")),
    ];
    let forest = build_hierarchy(&nodes);
    assert_eq!(ids(forest.roots()), vec!["B"]);
    assert_eq!(ids(forest.orphans()), vec!["A"]);
    assert_eq!(forest.node(&"A".into()).unwrap().roles[0].as_str(), "owner");
}

#[test]
fn flat_list_drains_into_roots() {
    let nodes = vec![OrgChartNode::new("A"), OrgChartNode::new("B")];
    let forest = build_hierarchy(&nodes);
    assert_eq!(ids(forest.roots()), vec!["A", "B"]);
    assert!(ids(forest.orphans()).is_empty());
}

#[test]
fn unknown_manager_behaves_like_none() {
    let dangling = vec![
        OrgChartNode::new("A").reporting_to("nobody"),
        OrgChartNode::new("B").reporting_to("C"),
        OrgChartNode::new("C"),
    ];
    let none = vec![
        OrgChartNode::new("A"),
        OrgChartNode::new("B").reporting_to("C"),
        OrgChartNode::new("C"),
    ];
    assert_eq!(build_hierarchy(&dangling).outline(), build_hierarchy(&none).outline());
}

#[test]
fn two_way_cycle_is_reported_not_lost() {
    let nodes = vec![
        OrgChartNode::new("A").reporting_to("B"),
        OrgChartNode::new("B").reporting_to("A"),
    ];
    let forest = build_hierarchy(&nodes);
    assert_eq!(forest.root_count(), 0);
    assert_eq!(ids(forest.detached()), vec!["A", "B"]);
    assert_eq!(placement_counts(&forest).len(), 2);
}

#[test]
fn empty_input_is_an_empty_forest() {
    let forest = build_hierarchy(&[]);
    assert!(forest.is_empty());
    assert_eq!(forest.root_count(), 0);
    assert_eq!(forest.orphan_count(), 0);
}

// =============================================================================
// PROPERTIES
// =============================================================================

/// Member lists with random (sometimes dangling, sometimes circular) managers
fn arb_members() -> impl Strategy<Value = Vec<OrgChartNode>> {
    (0usize..40).prop_flat_map(|n| {
        prop::collection::vec(
            (prop::option::of(0..n + 3), prop::bool::weighted(0.15)),
            n,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (manager, leader))| {
                    let mut node = OrgChartNode::new(format!("m{i}"));
                    if let Some(m) = manager {
                        node = node.reporting_to(format!("m{m}"));
                    }
                    if leader {
                        node = node.with_role(Role::Executive);
                    }
                    node
                })
                .collect::<Vec<_>>()
        })
    })
}

proptest! {
    #[test]
    fn every_member_placed_exactly_once(nodes in arb_members()) {
        let forest = build_hierarchy(&nodes);
        let seen = placement_counts(&forest);
        prop_assert_eq!(seen.len(), nodes.len());
        for node in &nodes {
            prop_assert_eq!(seen.get(&node.id).copied(), Some(1), "{}", node.id);
        }
    }

    #[test]
    fn orphans_have_no_reports_and_no_leadership(nodes in arb_members()) {
        let forest = build_hierarchy(&nodes);
        for orphan in forest.orphans() {
            prop_assert!(!orphan.has_children());
            prop_assert!(!orphan.node().has_leadership_role());
        }
        if forest.orphan_count() > 0 {
            prop_assert!(forest.root_count() > 0);
        }
    }

    #[test]
    fn drain_leaves_no_orphans_without_roots(nodes in arb_members()) {
        let forest = build_hierarchy(&nodes);
        prop_assert!(!(forest.root_count() == 0 && forest.orphan_count() > 0));
    }

    #[test]
    fn building_twice_is_identical(nodes in arb_members()) {
        prop_assert_eq!(build_hierarchy(&nodes).outline(), build_hierarchy(&nodes).outline());
    }

    #[test]
    fn candidates_never_include_self_or_reports(nodes in arb_members()) {
        let forest = build_hierarchy(&nodes);
        for node in &nodes {
            let candidates = forest.manager_candidates(&node.id);
            prop_assert!(candidates.iter().all(|c| c.id != node.id));
            if let Some(view) = forest.get(&node.id) {
                for child in view.children() {
                    prop_assert!(candidates.iter().all(|c| &c.id != child.id()));
                }
            }
        }
    }
}
