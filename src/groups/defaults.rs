// The curated emission-reduction grouping.
//
// Groups were formed by reading the top words and sample documents of each
// of the 75 topics in the ESGnie emissions model. Besides reduction methods
// they cover company goals, locations and reporting metrics, which is why
// only part of them make it into the activity export.
//
// Order matters: the first group containing a topic id wins.

use super::domain::{DomainFilter, ReclassifyRule, UnionPolicy};
use super::table::{GroupRule, GroupTable, DEFAULT_LABEL};
use super::GroupConfig;

/// Group label of the SBTI documents that the keyword rule inspects.
pub const SBTI_GROUP: &str = "SBTI (+IPCC) and SDA/ADA";

/// Method assigned to SBTI documents that talk about sectoral decarbonization.
pub const SDA_METHOD: &str = "SDA/ADA";

/// (label, topic ids) in evaluation order.
pub const EMISSION_GROUPS: &[(&str, &[i64])] = &[
    (SBTI_GROUP, &[0, 32, 41, 72, 66, 47]),
    (
        "Goals for fiscal years for domestic and overseas locations (Asia)",
        &[1, 18, 52, 24, 58, 61, 68, 25],
    ),
    (
        "General Scope-3: Goods/Services, Supply-Chain, Commuting",
        &[2, 10, 19, 69],
    ),
    ("Net-Zero carbon emissions by 2030-2060", &[3, 8]),
    (
        "Electricity Efficient Lighting, Air-Conditioning and Refrigerants in Work Plants",
        &[5, 17, 26, 73, 43],
    ),
    (
        "Reduce Fuel Consumption (Modern Engines/Electric Vehicles)",
        &[6, 39, 53],
    ),
    ("General (Unclear)", &[7, 48, 49, 51, 74]),
    (
        "Replace Coal Plants with Natural Gas, Solar and Wind Powered Systems",
        &[11, 67],
    ),
    ("CO2 Emission Metrics (Tons/Year)", &[12, 22, 56, 54]),
    ("Discussion of Factories and Plants in Asia", &[13]),
    ("Reduce Scope1+2 Emissions in Office Spaces", &[14]),
    (
        "Purchase Electricy with Guarantees of Origin and Renewable Certificates",
        &[15, 70],
    ),
    ("Reduce Stationary Combustion Emissions", &[16]),
    ("Recycling", &[23, 55]),
    (
        "Renewable Energy (Switch/Invest) in Solar and Wind",
        &[28, 20, 21, 30],
    ),
    ("INDC", &[29]),
    ("Energy Efficiency in Sold Products", &[34]),
    ("3% Solution, WWF and CDP", &[36]),
    ("General Yearly Goals", &[38, 62, 31, 33]),
    ("Market-Based", &[40]),
    ("Reduce Fugitive Methane from Natural Gas Processes", &[44]),
    ("Gold Standard Certificates and Carbon Credits", &[46]),
    ("Waste/kg Calculations", &[50]),
    ("Reduce Flaring Emissions to Zero by 2025-2030", &[57]),
    (
        "Others",
        &[27, 37, 35, 4, 9, 42, 45, 59, 60, 63, 64, 65, 71],
    ),
];

/// Groups that describe an actual emission-reduction activity.
pub const EMISSION_REDUCTION_GROUPS: &[&str] = &[
    "Reduce Fuel Consumption (Modern Engines/Electric Vehicles)",
    "Renewable Energy (Switch/Invest) in Solar and Wind",
    "General Scope-3: Goods/Services, Supply-Chain, Commuting",
    "Purchase Electricy with Guarantees of Origin and Renewable Certificates",
    "Replace Coal Plants with Natural Gas, Solar and Wind Powered Systems",
    "Electricity Efficient Lighting, Air-Conditioning and Refrigerants in Work Plants",
    "Recycling",
    "Gold Standard Certificates and Carbon Credits",
    "Energy Efficiency in Sold Products",
    "Reduce Stationary Combustion Emissions",
    "Market-Based",
    "Reduce Fugitive Methane from Natural Gas Processes",
    "Reduce Flaring Emissions to Zero by 2025-2030",
];

/// Keywords (matched case-insensitively) that mark an SBTI document as SDA/ADA.
pub const SDA_KEYWORDS: &[&str] = &["decarbonization", "sda"];

/// The built-in group table.
pub fn emission_table() -> GroupTable {
    GroupTable {
        default_label: DEFAULT_LABEL.to_string(),
        groups: EMISSION_GROUPS
            .iter()
            .map(|(label, topics)| GroupRule {
                label: label.to_string(),
                topics: topics.to_vec(),
            })
            .collect(),
    }
}

/// The built-in emission-reduction filter.
pub fn emission_filter() -> DomainFilter {
    DomainFilter {
        allow_list: EMISSION_REDUCTION_GROUPS
            .iter()
            .map(|label| label.to_string())
            .collect(),
        reclassify: Some(ReclassifyRule {
            source_group: SBTI_GROUP.to_string(),
            keywords: SDA_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            method: SDA_METHOD.to_string(),
        }),
        union: UnionPolicy::KeepAll,
    }
}

/// Table and filter together, as used when no configuration file is given.
pub fn emission_groups() -> GroupConfig {
    GroupConfig {
        table: emission_table(),
        domain: emission_filter(),
    }
}
