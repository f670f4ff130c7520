//! Domain entities: site records and the vocabulary they are written in

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Name of the synthetic node at the top of every hierarchy.
pub const HIERARCHY_ROOT_ID: &str = "GPS";

/// Network domain a site belongs to.
///
/// Spelled as in the source sheet; unknown spellings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Dwdm,
    Ipmpls,
    Region,
    Other(String),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Dwdm => "DWDM",
            Domain::Ipmpls => "IPMPLS",
            Domain::Region => "REGION",
            Domain::Other(name) => name,
        }
    }
}

impl From<String> for Domain {
    fn from(value: String) -> Self {
        match value.trim() {
            "DWDM" => Domain::Dwdm,
            "IPMPLS" => Domain::Ipmpls,
            "REGION" => Domain::Region,
            other => Domain::Other(other.to_string()),
        }
    }
}

impl From<Domain> for String {
    fn from(value: Domain) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Domain {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Domain::from(s.to_string()))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a site receives its timing signal from its upper source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SyncSolution {
    LocalToGm,
    LocalToDwdm,
    DedicatedDf,
    InBand,
    ImaginaryLink,
    Other(String),
}

impl SyncSolution {
    pub fn as_str(&self) -> &str {
        match self {
            SyncSolution::LocalToGm => "Local to GM",
            SyncSolution::LocalToDwdm => "Local to DWDM",
            SyncSolution::DedicatedDf => "Dedicated DF",
            SyncSolution::InBand => "In-Band",
            SyncSolution::ImaginaryLink => "Imaginary Link",
            SyncSolution::Other(name) => name,
        }
    }

    /// Timing is carried over the access network (dark fiber or in-band).
    pub fn is_access_link(&self) -> bool {
        matches!(self, SyncSolution::DedicatedDf | SyncSolution::InBand)
    }

    /// Timing is handed over locally by the transport network or a grandmaster.
    pub fn is_local(&self) -> bool {
        matches!(self, SyncSolution::LocalToGm | SyncSolution::LocalToDwdm)
    }
}

impl From<String> for SyncSolution {
    fn from(value: String) -> Self {
        match value.trim() {
            "Local to GM" => SyncSolution::LocalToGm,
            "Local to DWDM" => SyncSolution::LocalToDwdm,
            "Dedicated DF" => SyncSolution::DedicatedDf,
            "In-Band" => SyncSolution::InBand,
            "Imaginary Link" => SyncSolution::ImaginaryLink,
            other => SyncSolution::Other(other.to_string()),
        }
    }
}

impl From<SyncSolution> for String {
    fn from(value: SyncSolution) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SyncSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the site sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub site_id: String,
    pub region: String,
    pub domain: Domain,
    pub sync_solution: SyncSolution,
    /// Parent link, empty for grandmaster sites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_sync_source_site_id: Option<String>,
    /// Domain of the parent, denormalized from the sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_sync_source_domain: Option<Domain>,
    #[serde(default)]
    pub transmission_in_sync: bool,
    #[serde(default)]
    pub ip_transport_in_sync: bool,
    #[serde(default)]
    pub site_doable: bool,
    #[serde(default)]
    pub scope_of_work_issued: bool,
    #[serde(default)]
    pub tech_data_provided: bool,
}

impl SiteRecord {
    /// Create a record with all readiness flags cleared and no source link.
    pub fn new(
        site_id: impl Into<String>,
        region: impl Into<String>,
        domain: Domain,
        sync_solution: SyncSolution,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            region: region.into(),
            domain,
            sync_solution,
            upper_sync_source_site_id: None,
            upper_sync_source_domain: None,
            transmission_in_sync: false,
            ip_transport_in_sync: false,
            site_doable: false,
            scope_of_work_issued: false,
            tech_data_provided: false,
        }
    }

    /// Set the upper sync source and its domain.
    pub fn with_source(mut self, site_id: impl Into<String>, domain: Domain) -> Self {
        self.upper_sync_source_site_id = Some(site_id.into());
        self.upper_sync_source_domain = Some(domain);
        self
    }

    pub fn is_grandmaster(&self) -> bool {
        self.sync_solution == SyncSolution::LocalToGm
    }

    /// Record backing the synthetic `GPS` node.
    pub(crate) fn hierarchy_root() -> Self {
        Self {
            transmission_in_sync: true,
            site_doable: true,
            ..Self::new(HIERARCHY_ROOT_ID, "", Domain::Dwdm, SyncSolution::Other(String::new()))
        }
    }

    /// Record backing a synthetic region node.
    pub(crate) fn region_node(region: &str) -> Self {
        Self {
            transmission_in_sync: true,
            site_doable: true,
            ..Self::new(region, region, Domain::Region, SyncSolution::ImaginaryLink)
        }
    }

    pub(crate) fn apply(&mut self, update: &SiteUpdate) {
        self.transmission_in_sync = update.transmission_in_sync;
        self.ip_transport_in_sync = update.ip_transport_in_sync;
        self.site_doable = update.site_doable;
    }
}

/// New values for the three mutable readiness flags of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUpdate {
    pub site_id: String,
    pub transmission_in_sync: bool,
    pub ip_transport_in_sync: bool,
    pub site_doable: bool,
}

/// Parse a readiness flag as the sheet writes it (`true`/`yes`/`1`, any case).
pub fn parse_flag(field: &'static str, value: &str) -> DomainResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(DomainError::InvalidValue {
            field,
            value: value.to_string(),
        }),
    }
}

/// Which domain is tracked for rollout and which one carries transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicy {
    /// Access-network domain whose rollout is tracked
    pub tracked: Domain,
    /// Transmission domain the tracked sites may depend on
    pub transport: Domain,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self {
            tracked: Domain::Ipmpls,
            transport: Domain::Dwdm,
        }
    }
}

impl DomainPolicy {
    pub fn is_tracked(&self, domain: &Domain) -> bool {
        *domain == self.tracked
    }

    pub fn is_transport(&self, domain: &Domain) -> bool {
        *domain == self.transport
    }

    /// Dependency id of a site's leg in the transport domain, e.g. `S1_DWDM`.
    pub fn transport_leg(&self, site_id: &str) -> String {
        format!("{}_{}", site_id, self.transport)
    }

    /// Dependency id of a site's leg in the tracked domain, e.g. `S1_IPMPLS`.
    pub fn access_leg(&self, site_id: &str) -> String {
        format!("{}_{}", site_id, self.tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_sheet_spelling_when_parsing_then_maps_known_variants() {
        assert_eq!(SyncSolution::from("Dedicated DF".to_string()), SyncSolution::DedicatedDf);
        assert_eq!(SyncSolution::from(" In-Band ".to_string()), SyncSolution::InBand);
        assert_eq!(
            SyncSolution::from("Microwave".to_string()),
            SyncSolution::Other("Microwave".into())
        );
        assert_eq!("IPMPLS".parse::<Domain>().unwrap(), Domain::Ipmpls);
        assert_eq!(Domain::Other("MW".into()).to_string(), "MW");
    }

    #[test]
    fn given_record_toml_without_flags_when_deserializing_then_flags_default_false() {
        let record: SiteRecord = toml::from_str(
            r#"
site_id = "S1"
region = "North"
domain = "IPMPLS"
sync_solution = "In-Band"
upper_sync_source_site_id = "S0"
upper_sync_source_domain = "IPMPLS"
site_doable = true
"#,
        )
        .unwrap();

        assert_eq!(record.sync_solution, SyncSolution::InBand);
        assert_eq!(record.upper_sync_source_domain, Some(Domain::Ipmpls));
        assert!(record.site_doable);
        assert!(!record.transmission_in_sync);
        assert!(!record.tech_data_provided);
    }

    #[test]
    fn given_default_policy_when_naming_legs_then_uses_domain_suffix() {
        let policy = DomainPolicy::default();
        assert_eq!(policy.transport_leg("S1"), "S1_DWDM");
        assert_eq!(policy.access_leg("S1"), "S1_IPMPLS");
    }

    #[test]
    fn given_sheet_flag_spellings_when_parsing_then_accepts_yes_no_and_rejects_garbage() {
        assert_eq!(parse_flag("site_doable", "Yes"), Ok(true));
        assert_eq!(parse_flag("site_doable", " 0 "), Ok(false));
        assert_eq!(
            parse_flag("site_doable", "maybe"),
            Err(DomainError::InvalidValue {
                field: "site_doable",
                value: "maybe".into()
            })
        );
    }
}
