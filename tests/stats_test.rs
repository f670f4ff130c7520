//! Tests for rollout statistics

use rstest::rstest;

use synctrack::domain::{
    build_tree, compute_statistics, Domain, DomainPolicy, RolloutStats, SiteRecord, SyncSolution,
};
use synctrack::util::testing::{self, grandmaster, sample_sheet, tracked_site};

fn stats_for(records: Vec<SiteRecord>) -> RolloutStats {
    let tree = build_tree(&records, DomainPolicy::default()).unwrap().tree;
    compute_statistics(&tree)
}

#[test]
fn given_sample_sheet_when_computing_statistics_then_one_site_per_bucket() {
    testing::init_test_setup();

    let stats = stats_for(sample_sheet());

    assert_eq!(
        stats,
        RolloutStats {
            total_tracked_sites: 5,
            in_sync_sites_count: 1,
            total_blocked_locally: 1,
            blocked_by_parents_design: 1,
            pending_parents_sync: 1,
            pending_transmission: 1,
            ready_by_design: 0,
            total_sow_and_tech_data: 0,
            total_sow_no_tech_data: 0,
            total_doable_no_sow: 0,
            blocked_issued_sow: 0,
            total_blocked_sites: 3,
            total_affected_by_parent: 2,
        }
    );
}

#[test]
fn given_ready_sites_when_computing_statistics_then_split_by_paperwork() {
    let ready = |id: &str, sow: bool, tech: bool| SiteRecord {
        scope_of_work_issued: sow,
        tech_data_provided: tech,
        ..tracked_site(id, "North", SyncSolution::InBand).with_source("GM1", Domain::Dwdm)
    };
    let records = vec![
        grandmaster("GM1", "North"),
        ready("R1", true, true),
        ready("R2", true, false),
        ready("R3", false, false),
        ready("R4", false, true),
    ];

    let stats = stats_for(records);

    assert_eq!(stats.ready_by_design, 4);
    assert_eq!(stats.total_sow_and_tech_data, 1);
    assert_eq!(stats.total_sow_no_tech_data, 1);
    assert_eq!(stats.total_doable_no_sow, 2);
}

#[test]
fn given_blocked_sites_with_sow_issued_when_computing_statistics_then_counts_local_and_sync_blocks() {
    let mut records = sample_sheet();
    for record in records.iter_mut() {
        record.scope_of_work_issued = true;
    }

    let stats = stats_for(records);

    // GM2 (blocked locally) and A2 (blocked by parent sync); B1's design block does not count
    assert_eq!(stats.blocked_issued_sow, 2);
}

#[rstest]
#[case::sample(sample_sheet())]
#[case::all_undoable(sample_sheet().into_iter().map(|r| SiteRecord { site_doable: false, ..r }).collect())]
#[case::all_in_sync(sample_sheet().into_iter().map(|r| SiteRecord { ip_transport_in_sync: true, ..r }).collect())]
#[case::all_ready(sample_sheet().into_iter().map(|r| SiteRecord { site_doable: true, transmission_in_sync: true, ..r }).collect())]
fn given_any_sheet_when_computing_statistics_then_buckets_partition_tracked_sites(
    #[case] records: Vec<SiteRecord>,
) {
    let stats = stats_for(records);

    assert_eq!(stats.bucket_total(), stats.total_tracked_sites);
    assert_eq!(
        stats.total_blocked_sites,
        stats.total_blocked_locally + stats.blocked_by_parents_design + stats.pending_parents_sync
    );
    assert_eq!(
        stats.ready_by_design,
        stats.total_sow_and_tech_data + stats.total_sow_no_tech_data + stats.total_doable_no_sow
    );
}
