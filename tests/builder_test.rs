//! Tests for the tree builder

use rstest::rstest;

use synctrack::domain::{
    build_tree, Domain, DomainError, DomainPolicy, NodeKind, OrphanReason, SiteRecord, SiteTree,
    SyncSolution,
};
use synctrack::util::testing::{self, grandmaster, sample_sheet, tracked_site};

fn ids_in_level_order(tree: &SiteTree) -> Vec<String> {
    tree.iter_level_order()
        .map(|(_, node)| node.site_id().to_string())
        .collect()
}

fn child_ids(tree: &SiteTree, site_id: &str) -> Vec<String> {
    let idx = tree.find(site_id).unwrap();
    tree.get_node(idx)
        .unwrap()
        .children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().site_id().to_string())
        .collect()
}

// ============================================================
// rejected record sets
// ============================================================

#[test]
fn given_empty_record_set_when_building_then_configuration_error() {
    testing::init_test_setup();

    let result = build_tree(&[], DomainPolicy::default());

    assert!(matches!(result, Err(DomainError::Configuration(_))));
}

#[test]
fn given_duplicate_site_id_when_building_then_configuration_error() {
    testing::init_test_setup();
    let records = vec![
        grandmaster("GM1", "North"),
        tracked_site("S1", "North", SyncSolution::InBand),
        tracked_site("S1", "North", SyncSolution::DedicatedDf),
    ];

    let result = build_tree(&records, DomainPolicy::default());

    assert_eq!(
        result.err(),
        Some(DomainError::Configuration("duplicate site id: S1".into()))
    );
}

#[test]
fn given_no_grandmaster_when_building_then_configuration_error() {
    let records = vec![tracked_site("S1", "North", SyncSolution::InBand)];

    let result = build_tree(&records, DomainPolicy::default());

    assert!(matches!(result, Err(DomainError::Configuration(_))));
}

// ============================================================
// structure
// ============================================================

#[test]
fn given_sample_sheet_when_building_then_hierarchy_is_rooted_at_gps_with_regions() {
    testing::init_test_setup();

    // Act
    let outcome = build_tree(&sample_sheet(), DomainPolicy::default()).unwrap();
    let tree = outcome.tree;

    // Assert
    assert!(outcome.orphans.is_empty());
    assert_eq!(tree.site_count(), 7);
    assert_eq!(
        ids_in_level_order(&tree),
        ["GPS", "North", "South", "GM1", "GM2", "D1", "B1", "B2", "A1", "A2"]
    );
    let north = tree.get_node(tree.get_node(tree.root()).unwrap().children[0]).unwrap();
    assert_eq!(north.kind, NodeKind::Region);
    assert_eq!(north.record.sync_solution, SyncSolution::ImaginaryLink);
    assert_eq!(tree.depth(), 6);
}

#[test]
fn given_sample_sheet_when_building_then_grandmaster_is_inherited_down_the_branch() {
    let tree = build_tree(&sample_sheet(), DomainPolicy::default()).unwrap().tree;

    for (site, gm) in [("GM1", "GM1"), ("D1", "GM1"), ("A2", "GM1"), ("B2", "GM2")] {
        let node = tree.get_node(tree.find(site).unwrap()).unwrap();
        assert_eq!(node.grandmaster_site_id.as_deref(), Some(gm), "site {site}");
    }
}

#[test]
fn given_siblings_out_of_id_order_when_building_then_record_order_is_kept() {
    let records = vec![
        grandmaster("GM1", "North"),
        tracked_site("Z", "North", SyncSolution::InBand).with_source("GM1", Domain::Dwdm),
        tracked_site("A", "North", SyncSolution::InBand).with_source("GM1", Domain::Dwdm),
        tracked_site("M", "North", SyncSolution::InBand).with_source("GM1", Domain::Dwdm),
    ];

    let tree = build_tree(&records, DomainPolicy::default()).unwrap().tree;

    assert_eq!(child_ids(&tree, "GM1"), ["Z", "A", "M"]);
}

#[test]
fn given_grandmaster_with_source_link_when_building_then_stays_under_its_region() {
    let records = vec![
        grandmaster("GM1", "North"),
        grandmaster("GM2", "North").with_source("GM1", Domain::Dwdm),
    ];

    let tree = build_tree(&records, DomainPolicy::default()).unwrap().tree;

    assert!(child_ids(&tree, "GM1").is_empty());
    let gm2 = tree.find("GM2").unwrap();
    assert_eq!(tree.parent_of(gm2).unwrap().site_id(), "North");
}

// ============================================================
// orphans
// ============================================================

#[rstest]
#[case::no_link(None, OrphanReason::MissingSource)]
#[case::unknown_source(Some("NOPE"), OrphanReason::MissingSource)]
fn given_unresolvable_source_when_building_then_reports_orphan(
    #[case] source: Option<&str>,
    #[case] expected: OrphanReason,
) {
    let mut orphan = tracked_site("S1", "North", SyncSolution::InBand);
    orphan.upper_sync_source_site_id = source.map(str::to_string);
    let records = vec![grandmaster("GM1", "North"), orphan];

    let outcome = build_tree(&records, DomainPolicy::default()).unwrap();

    assert_eq!(outcome.orphans.len(), 1);
    assert_eq!(outcome.orphans[0].site_id, "S1");
    assert_eq!(outcome.orphans[0].reason, expected);
    assert!(outcome.tree.find("S1").is_none());
}

#[test]
fn given_source_cycle_when_building_then_cycle_and_descendants_are_unreachable_orphans() {
    testing::init_test_setup();
    let records = vec![
        grandmaster("GM1", "North"),
        tracked_site("X", "North", SyncSolution::InBand).with_source("Y", Domain::Dwdm),
        tracked_site("Y", "North", SyncSolution::InBand).with_source("X", Domain::Dwdm),
        tracked_site("C", "North", SyncSolution::InBand).with_source("X", Domain::Dwdm),
    ];

    let outcome = build_tree(&records, DomainPolicy::default()).unwrap();

    let orphaned: Vec<_> = outcome
        .orphans
        .iter()
        .map(|o| (o.site_id.as_str(), o.reason))
        .collect();
    assert_eq!(
        orphaned,
        [
            ("X", OrphanReason::UnreachableSource),
            ("Y", OrphanReason::UnreachableSource),
            ("C", OrphanReason::UnreachableSource),
        ]
    );
    assert_eq!(outcome.tree.site_count(), 1);
}

#[test]
fn given_orphan_when_displaying_then_names_the_missing_source() {
    let records: Vec<SiteRecord> = vec![
        grandmaster("GM1", "North"),
        tracked_site("S1", "North", SyncSolution::InBand).with_source("NOPE", Domain::Dwdm),
    ];

    let outcome = build_tree(&records, DomainPolicy::default()).unwrap();

    assert_eq!(outcome.orphans[0].to_string(), "S1 (source NOPE not found)");
}
