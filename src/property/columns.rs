use super::Property;

/// How a column's values are compared, sorted and filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind { Text, Numeric }

/// A table column: display group, header label and attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub group: &'static str,
    pub label: &'static str,
    pub key: &'static str,
    pub kind: ColumnKind,
}

const fn text(group: &'static str, label: &'static str, key: &'static str) -> ColumnDef {
    ColumnDef { group, label, key, kind: ColumnKind::Text }
}

const fn num(group: &'static str, label: &'static str, key: &'static str) -> ColumnDef {
    ColumnDef { group, label, key, kind: ColumnKind::Numeric }
}

/// Every column the table knows about, in display order.
pub static COLUMNS: &[ColumnDef] = &[
    text("Place", "Name", "title"),
    text("Place", "Country", "country"),
    text("Address details", "Owner", "owner"),
    text("Address details", "Special Code", "special_co"),
    text("Address details", "Project", "project"),
    text("Address details", "Title by Document", "title_by_document"),
    text("Address details", "Region", "region"),
    text("Address details", "City", "city"),
    text("Address details", "Street", "street"),
    text("Address details", "Address", "address"),
    text("Building details", "Category", "category"),
    text("Building details", "Subcategory", "subcategory"),
    text("Building details", "Valuation Category", "valuation_category"),
    text("Building details", "Property Type", "property_type"),
    text("Building details", "Use Type", "use_type"),
    text("Building details", "Lease Status", "lease_status"),
    text("Building details", "No Lease Reason", "nolease_reason"),
    text("Building details", "Ownership Right", "ownership_right"),
    text("Building details", "Status X", "status_x"),
    text("Building details", "Property Use Type", "property_use_type"),
    text("Building details", "Rent Operant", "rent_opera"),
    text("Building details", "Legal Property Ownership", "legal_property_ownership_type"),
    text("Building details", "Legal Land Ownership", "legal_land_ownership_type"),
    text("Building details", "Property Ownership Type", "property_ownership_type"),
    text("Building details", "Land Ownership Type", "land_ownership_type"),
    num("Land & Area Info", "Total Area (m²)", "total_area"),
    num("Land & Area Info", "Lease Area", "lease_area"),
    num("Land & Area Info", "Land Area (ha)", "land_area"),
    num("Land & Area Info", "Actual Land Area", "actual_land_area"),
    num("Land & Area Info", "Tenant Business Area", "tenant_business_area"),
    text("Registration & Legal", "Property Registry No", "property_registry_no"),
    text("Registration & Legal", "Registration No", "registration_no"),
    text("Registration & Legal", "Serial No", "serial_no"),
    text("Registration & Legal", "Technical Passport Registry No", "technical_pasport_registry_no"),
    text("Registration & Legal", "Registration Date", "registration_date"),
    text("Registration & Legal", "Property Use Classification", "property_use_classification"),
    text("Lease Info", "Land Lease Start Date", "land_lease_start_date"),
    text("Lease Info", "Land Lease End Date", "land_lease_end_date"),
    num("Lease Info", "Lease Duration", "lease_duration"),
    num("Lease Info", "Monthly Rent", "monthly_rent"),
    text("Lease Info", "Lessor Party", "lessor_party"),
    num("Valuation", "Book Value", "book_value"),
    text("Valuation", "Valuation Method", "valuation_method"),
    num("Valuation", "Prior Year Valuation 2023", "prior_year_valuation_results_2023"),
    num("Valuation", "Current Year Valuation 2024", "current_year_valuation_resluts_2024"),
    num("Valuation", "Variance", "variance"),
    text("Attachments", "Attachment Title Deed", "attachment_title_deed"),
    text("Attachments", "Attachment Technical Passport", "attachment_technical_pasport"),
    text("Attachments", "Attachment Other", "attachemnt_other"),
    text("Coordinates", "Coordinate from Technical Passport", "coordinate_technical_pasport"),
    text("Strategy", "Date Added to Portfolio", "date_added_portfel"),
    text("Strategy", "Strategic Recommendation", "strategic_recomendation"),
    text("Strategy", "Recommended Use", "recomended_use"),
    text("Strategy", "Perspective Stage", "perspective_stage"),
    text("Strategy", "Phase", "phase"),
    text("Strategy", "Status Y", "status_y"),
    num("Other", "Year", "year"),
    num("Other", "Quarter", "quarter"),
    text("Other", "Note", "note"),
    text("Other", "Notes", "notes"),
    text("Other", "Type", "type"),
    text("CIP Details", "CIP No", "cip_no"),
    num("CIP Details", "Design (m²)", "des_m"),
    num("CIP Details", "Development (m²)", "dev_m"),
    num("CIP Details", "TC (m²)", "tc_m"),
    text("CIP Details", "RIBA Stage", "riba_stage"),
    text("CIP Details", "Project Code", "project_code"),
    text("CIP Details", "Feasibility", "feasibility"),
    text("CIP Details", "Preconcept", "preconcept"),
    text("CIP Details", "Detailed Feasibility", "detailed_feasibility"),
    text("CIP Details", "Final Concept", "final_concept"),
    text("CIP Details", "Urban Planning Justification", "urban_planning_justification"),
    text("CIP Details", "Detailed Design", "detailed_design"),
    text("CIP Details", "Technical Design", "technical_design"),
    text("CIP Details", "Construction Permit", "construction_permit"),
    text("CIP Details", "Sales & Leasing Start", "sales_and_leasing_start"),
    text("CIP Details", "Construction Start", "construction_start"),
    text("CIP Details", "Construction Finish", "construction_finish"),
    text("CIP Details", "Estimated Finish", "estimated_finish"),
    text("CIP Details", "Handover", "handover"),
];

const CIP_PROFILE: &[&str] = &[
    "special_co", "category", "title_by_document", "project", "cip_no",
    "des_m", "dev_m", "tc_m", "riba_stage", "project_code",
    "feasibility", "preconcept", "detailed_feasibility", "final_concept",
    "urban_planning_justification", "detailed_design", "technical_design",
    "construction_permit", "sales_and_leasing_start", "construction_start",
    "construction_finish", "estimated_finish", "handover",
];

const TOP_FOTON_PROFILE: &[&str] = &[
    "title", "country", "address", "property_type", "special_co", "owner", "category", "subcategory",
    "title_by_document", "project", "region", "city", "street", "valuation_category",
    "book_value", "use_type", "lease_status", "nolease_reason", "ownership_right", "status_x",
    "property_use_type", "rent_opera", "legal_property_ownership_type", "legal_land_ownership_type",
    "property_ownership_type", "land_ownership_type", "total_area", "lease_area", "land_area",
    "property_registry_no", "registration_no", "serial_no", "technical_pasport_registry_no",
    "registration_date", "property_use_classification", "land_lease_start_date", "land_lease_end_date",
    "lease_duration", "monthly_rent", "lessor_party",
    "attachment_title_deed", "attachment_technical_pasport", "attachemnt_other",
    "coordinate_technical_pasport",
];

const INVESTMENT_EXTRA: &[&str] = &[
    "prior_year_valuation_results_2023", "current_year_valuation_resluts_2024",
    "variance", "valuation_method", "notes", "actual_land_area", "tenant_business_area",
    "date_added_portfel", "strategic_recomendation", "recomended_use", "perspective_stage", "phase",
    "status_y", "year", "quarter", "note",
];

/// Look up a column definition by attribute key.
pub fn column(key: &str) -> Option<&'static ColumnDef> {
    COLUMNS.iter().find(|col| col.key == key)
}

/// Choose the visible columns for a set of rows.
///
/// Picks the CIP, Top/Foton or investment-property profile from the rows'
/// categories, drops columns that are blank in every row, and never shows the
/// raw geometry columns. Empty input shows the whole catalog.
pub fn visible_columns_for(rows: &[&Property]) -> Vec<&'static str> {
    if rows.is_empty() {
        return COLUMNS.iter().map(|col| col.key).collect();
    }

    let tagged = |tags: &[&str]| rows.iter().all(|row| {
        let cat = row.text("category").unwrap_or_default().to_lowercase();
        let sub = row.text("subcategory").unwrap_or_default().to_lowercase();
        tags.iter().any(|tag| cat == *tag || sub == *tag)
    });

    let profile: Vec<&str> = if tagged(&["cip"]) {
        CIP_PROFILE.to_vec()
    } else if tagged(&["top", "foton"]) {
        TOP_FOTON_PROFILE.to_vec()
    } else {
        TOP_FOTON_PROFILE.iter().chain(INVESTMENT_EXTRA).copied().collect()
    };

    profile.into_iter()
        .filter_map(|key| column(key).map(|col| col.key))
        .filter(|key| rows.iter().any(|row| !row.is_blank(key)))
        .filter(|key| *key != "coord_point" && *key != "geometry_coordinates")
        .collect()
}
