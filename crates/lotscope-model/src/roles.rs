//! Semantic column roles and schema resolution.
//!
//! Listing exports rarely agree on column names ("price" vs "sellingprice",
//! "odometer" vs "mileage"), so each role is resolved by case-insensitive
//! substring match against a fixed keyword set. Resolution happens exactly
//! once after ingestion; every downstream stage consumes the resulting
//! [`ResolvedSchema`] instead of re-scanning header names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic column category resolved by name matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Price,
    Color,
    Brand,
    Model,
    Interior,
    Odometer,
    Year,
    Condition,
    State,
}

/// Every role, in resolution order.
pub const ALL_ROLES: [Role; 9] = [
    Role::Price,
    Role::Color,
    Role::Brand,
    Role::Model,
    Role::Interior,
    Role::Odometer,
    Role::Year,
    Role::Condition,
    Role::State,
];

impl Role {
    /// Keywords matched (case-insensitively, as substrings) against column names.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Price => &["price", "selling"],
            Role::Color => &["color"],
            Role::Brand => &["make", "brand"],
            Role::Model => &["model"],
            Role::Interior => &["interior"],
            Role::Odometer => &["odometer", "mileage"],
            Role::Year => &["year"],
            Role::Condition => &["condition"],
            Role::State => &["state"],
        }
    }

    /// Short machine-friendly name used in diagnostics and logs.
    pub fn name(self) -> &'static str {
        match self {
            Role::Price => "price",
            Role::Color => "color",
            Role::Brand => "brand",
            Role::Model => "model",
            Role::Interior => "interior",
            Role::Odometer => "odometer",
            Role::Year => "year",
            Role::Condition => "condition",
            Role::State => "state",
        }
    }

    fn matches(self, column: &str) -> bool {
        let lowered = column.to_lowercase();
        // "modelyear"-style columns belong to the year role, not the model role.
        if self == Role::Model && lowered.contains("year") {
            return false;
        }
        self.keywords().iter().any(|kw| lowered.contains(kw))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The mapping from roles to concrete column names, built once per run.
///
/// An absent role is an explicit `None`; operations that need it are skipped
/// with a diagnostic rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    price: Option<String>,
    color: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    interior: Option<String>,
    odometer: Option<String>,
    year: Option<String>,
    condition: Option<String>,
    state: Option<String>,
}

impl ResolvedSchema {
    /// Resolve every role against the table's column names.
    ///
    /// Takes the first matching column in table order per role; a role with
    /// zero matches stays unresolved.
    pub fn resolve(columns: &[String]) -> Self {
        let mut schema = Self::default();
        for role in ALL_ROLES {
            let found = columns.iter().find(|column| role.matches(column));
            *schema.slot_mut(role) = found.cloned();
        }
        schema
    }

    /// The column name resolved for `role`, if any.
    pub fn column(&self, role: Role) -> Option<&str> {
        match role {
            Role::Price => self.price.as_deref(),
            Role::Color => self.color.as_deref(),
            Role::Brand => self.brand.as_deref(),
            Role::Model => self.model.as_deref(),
            Role::Interior => self.interior.as_deref(),
            Role::Odometer => self.odometer.as_deref(),
            Role::Year => self.year.as_deref(),
            Role::Condition => self.condition.as_deref(),
            Role::State => self.state.as_deref(),
        }
    }

    /// Roles from `required` that did not resolve to a column.
    pub fn missing(&self, required: &[Role]) -> Vec<Role> {
        required
            .iter()
            .copied()
            .filter(|role| self.column(*role).is_none())
            .collect()
    }

    /// All roles that resolved, with their column names.
    pub fn resolved(&self) -> Vec<(Role, &str)> {
        ALL_ROLES
            .iter()
            .filter_map(|role| self.column(*role).map(|column| (*role, column)))
            .collect()
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Price => &mut self.price,
            Role::Color => &mut self.color,
            Role::Brand => &mut self.brand,
            Role::Model => &mut self.model,
            Role::Interior => &mut self.interior,
            Role::Odometer => &mut self.odometer,
            Role::Year => &mut self.year,
            Role::Condition => &mut self.condition,
            Role::State => &mut self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn resolves_conventional_listing_headers() {
        let schema = ResolvedSchema::resolve(&columns(&[
            "year",
            "make",
            "model",
            "trim",
            "condition",
            "odometer",
            "color",
            "interior",
            "state",
            "sellingprice",
        ]));
        assert_eq!(schema.column(Role::Price), Some("sellingprice"));
        assert_eq!(schema.column(Role::Brand), Some("make"));
        assert_eq!(schema.column(Role::Odometer), Some("odometer"));
        assert_eq!(schema.column(Role::Year), Some("year"));
        assert!(schema.missing(&ALL_ROLES).is_empty());
    }

    #[test]
    fn first_matching_column_wins() {
        let schema = ResolvedSchema::resolve(&columns(&["listprice", "sellingprice"]));
        assert_eq!(schema.column(Role::Price), Some("listprice"));
    }

    #[test]
    fn match_is_case_insensitive() {
        let schema = ResolvedSchema::resolve(&columns(&["SellingPrice", "Mileage"]));
        assert_eq!(schema.column(Role::Price), Some("SellingPrice"));
        assert_eq!(schema.column(Role::Odometer), Some("Mileage"));
    }

    #[test]
    fn model_role_skips_model_year_columns() {
        let schema = ResolvedSchema::resolve(&columns(&["modelyear", "model"]));
        assert_eq!(schema.column(Role::Model), Some("model"));
        assert_eq!(schema.column(Role::Year), Some("modelyear"));
    }

    #[test]
    fn unmatched_roles_stay_absent() {
        let schema = ResolvedSchema::resolve(&columns(&["vin", "seller"]));
        assert_eq!(schema.column(Role::Price), None);
        assert_eq!(schema.missing(&ALL_ROLES).len(), ALL_ROLES.len());
    }
}
