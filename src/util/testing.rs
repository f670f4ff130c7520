//! Shared test setup: one global tracing subscriber for all test binaries.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Domain, SiteRecord, SyncSolution};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins; otherwise only our own crate, at debug
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("synctrack=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
    debug!("RUST_LOG={:?}", env::var("RUST_LOG").ok());
}

/// Tracked (`IPMPLS`) site that is doable but not yet in sync.
pub fn tracked_site(site_id: &str, region: &str, sync: SyncSolution) -> SiteRecord {
    SiteRecord {
        site_doable: true,
        ..SiteRecord::new(site_id, region, Domain::Ipmpls, sync)
    }
}

/// Grandmaster (`Local to GM`) transport site with transmission in sync.
pub fn grandmaster(site_id: &str, region: &str) -> SiteRecord {
    SiteRecord {
        transmission_in_sync: true,
        site_doable: true,
        ..SiteRecord::new(site_id, region, Domain::Dwdm, SyncSolution::LocalToGm)
    }
}

/// Two-region sheet covering every tracked status except ReadyByDesign.
///
/// ```text
/// GPS
/// ├── North
/// │   └── GM1 (DWDM, Local to GM)
/// │       └── D1 (DWDM, not in transmission sync)
/// │           └── A1 (Dedicated DF)        PendingTransmission
/// │               └── A2 (In-Band)         BlockedByParentSync
/// └── South
///     └── GM2 (Local to GM, not doable)    BlockedLocally
///         ├── B1 (Dedicated DF)            BlockedByParentDesign
///         └── B2 (Local to DWDM, in sync)  InSync
/// ```
pub fn sample_sheet() -> Vec<SiteRecord> {
    vec![
        grandmaster("GM1", "North"),
        SiteRecord {
            site_doable: true,
            ..SiteRecord::new("D1", "North", Domain::Dwdm, SyncSolution::Other("Fiber".into()))
                .with_source("GM1", Domain::Dwdm)
        },
        tracked_site("A1", "North", SyncSolution::DedicatedDf).with_source("D1", Domain::Dwdm),
        tracked_site("A2", "North", SyncSolution::InBand).with_source("A1", Domain::Ipmpls),
        SiteRecord {
            site_doable: false,
            ..tracked_site("GM2", "South", SyncSolution::LocalToGm)
        },
        SiteRecord {
            scope_of_work_issued: true,
            ..tracked_site("B1", "South", SyncSolution::DedicatedDf)
                .with_source("GM2", Domain::Ipmpls)
        },
        SiteRecord {
            ip_transport_in_sync: true,
            ..tracked_site("B2", "South", SyncSolution::LocalToDwdm)
                .with_source("GM2", Domain::Ipmpls)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }
}
