// 🏛️ Tax Rules - Rules as Data
// Jurisdiction tax tables and the resolver that picks the rules applicable
// to a booking context. Rules are kept in definition order per jurisdiction
// so breakdown lines always display in a stable, deterministic order.

use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::booking::DateRange;
use crate::error::BookingError;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    /// Rate is a percentage of the subtotal.
    Percentage,
    /// Rate is a fixed amount in currency units.
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// Applied once per stay.
    PerStay,
    /// Flat amount multiplied by the number of nights.
    PerNight,
}

impl Default for TaxBasis {
    fn default() -> Self {
        TaxBasis::PerStay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestType {
    Leisure,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Accommodation,
    Transport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRule {
    /// Rule ID for tracking
    pub id: String,

    /// Display name, e.g. "VAT" or "Service Charge"
    pub name: String,

    pub tax_type: TaxType,

    /// Percentage (e.g. 15.0 for 15%) or flat amount in currency units.
    pub rate: f64,

    /// Computation basis for flat rules; percentage rules are always per stay.
    #[serde(default)]
    pub basis: TaxBasis,

    /// Restrict the rule to one service category. None applies to all.
    #[serde(default)]
    pub applies_to: Option<ServiceCategory>,

    /// Restrict the rule to certain guest types. Empty applies to all.
    #[serde(default)]
    pub guest_types: Vec<GuestType>,

    /// Description shown next to the breakdown line.
    #[serde(default)]
    pub description: Option<String>,
}

impl TaxRule {
    /// Check whether this rule applies to the given booking context.
    pub fn applies(&self, ctx: &TaxContext) -> bool {
        if let Some(category) = self.applies_to {
            if category != ctx.service_category {
                return false;
            }
        }

        if !self.guest_types.is_empty() && !self.guest_types.contains(&ctx.guest_type) {
            return false;
        }

        true
    }
}

// ============================================================================
// TAX CONTEXT
// ============================================================================

/// Everything the resolver needs to know about a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxContext {
    pub location: String,
    pub guest_type: GuestType,
    pub service_category: ServiceCategory,
    pub date_range: Option<DateRange>,
}

impl TaxContext {
    pub fn new(location: impl Into<String>) -> Self {
        TaxContext {
            location: location.into(),
            guest_type: GuestType::Leisure,
            service_category: ServiceCategory::Accommodation,
            date_range: None,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }
}

// ============================================================================
// TAX RATE SOURCE
// ============================================================================

/// Source of applicable tax rules for a booking context.
///
/// This is the async I/O boundary: the in-memory registry below answers
/// immediately, a production implementation may hit a rates service.
/// Resolution must be side-effect free and deterministic for equal inputs.
#[async_trait]
pub trait TaxRateSource: Send + Sync {
    async fn resolve(&self, ctx: &TaxContext) -> Result<Vec<TaxRule>, BookingError>;
}

// ============================================================================
// TAX REGISTRY
// ============================================================================

/// One jurisdiction's tax table. Rule order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub location: String,
    pub rules: Vec<TaxRule>,
}

/// In-memory registry of jurisdiction tax tables.
pub struct TaxRegistry {
    jurisdictions: Vec<Jurisdiction>,
}

impl TaxRegistry {
    /// Create an empty registry (resolves nothing).
    pub fn empty() -> Self {
        TaxRegistry {
            jurisdictions: Vec::new(),
        }
    }

    /// Registry with the built-in Bangladesh jurisdictions.
    pub fn new() -> Self {
        let mut registry = TaxRegistry::empty();
        registry.register_default_jurisdictions();
        registry
    }

    /// Load jurisdiction tables from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read tax rules file: {:?}", path.as_ref()))?;

        let jurisdictions: Vec<Jurisdiction> =
            serde_json::from_str(&content).context("Failed to parse tax rules JSON")?;

        Ok(TaxRegistry { jurisdictions })
    }

    fn register_default_jurisdictions(&mut self) {
        self.add_jurisdiction(Jurisdiction {
            location: "Dhaka".to_string(),
            rules: vec![
                TaxRule {
                    id: "bd-vat".to_string(),
                    name: "VAT".to_string(),
                    tax_type: TaxType::Percentage,
                    rate: 15.0,
                    basis: TaxBasis::PerStay,
                    applies_to: None,
                    guest_types: Vec::new(),
                    description: Some("Value Added Tax".to_string()),
                },
                TaxRule {
                    id: "bd-service-charge".to_string(),
                    name: "Service Charge".to_string(),
                    tax_type: TaxType::Percentage,
                    rate: 10.0,
                    basis: TaxBasis::PerStay,
                    applies_to: Some(ServiceCategory::Accommodation),
                    guest_types: Vec::new(),
                    description: Some("Hotel service charge".to_string()),
                },
                TaxRule {
                    id: "dhaka-city-levy".to_string(),
                    name: "City Levy".to_string(),
                    tax_type: TaxType::Flat,
                    rate: 100.0,
                    basis: TaxBasis::PerNight,
                    applies_to: Some(ServiceCategory::Accommodation),
                    guest_types: Vec::new(),
                    description: Some("Dhaka city development levy".to_string()),
                },
            ],
        });

        self.add_jurisdiction(Jurisdiction {
            location: "Cox's Bazar".to_string(),
            rules: vec![
                TaxRule {
                    id: "bd-vat".to_string(),
                    name: "VAT".to_string(),
                    tax_type: TaxType::Percentage,
                    rate: 15.0,
                    basis: TaxBasis::PerStay,
                    applies_to: None,
                    guest_types: Vec::new(),
                    description: Some("Value Added Tax".to_string()),
                },
                TaxRule {
                    id: "cxb-tourism-levy".to_string(),
                    name: "Tourism Levy".to_string(),
                    tax_type: TaxType::Flat,
                    rate: 50.0,
                    basis: TaxBasis::PerNight,
                    applies_to: Some(ServiceCategory::Accommodation),
                    guest_types: vec![GuestType::Leisure],
                    description: Some("Beach tourism development levy".to_string()),
                },
            ],
        });
    }

    /// Add or replace a jurisdiction table (matched by location).
    pub fn add_jurisdiction(&mut self, jurisdiction: Jurisdiction) {
        self.jurisdictions
            .retain(|j| !j.location.eq_ignore_ascii_case(&jurisdiction.location));
        self.jurisdictions.push(jurisdiction);
    }

    pub fn jurisdiction_count(&self) -> usize {
        self.jurisdictions.len()
    }

    fn find(&self, location: &str) -> Option<&Jurisdiction> {
        self.jurisdictions
            .iter()
            .find(|j| j.location.eq_ignore_ascii_case(location))
    }
}

impl Default for TaxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaxRateSource for TaxRegistry {
    /// Resolve the rules applicable to a context.
    ///
    /// Unknown location is a `ResolutionFailure`; a known location where no
    /// rule applies resolves to an empty set. Rules come back in the order
    /// they are defined for the jurisdiction.
    async fn resolve(&self, ctx: &TaxContext) -> Result<Vec<TaxRule>, BookingError> {
        let jurisdiction = self
            .find(&ctx.location)
            .ok_or_else(|| BookingError::resolution_failure(&ctx.location))?;

        Ok(jurisdiction
            .rules
            .iter()
            .filter(|rule| rule.applies(ctx))
            .cloned()
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn leisure_ctx(location: &str) -> TaxContext {
        TaxContext::new(location)
    }

    #[tokio::test]
    async fn test_resolve_known_location() {
        let registry = TaxRegistry::new();
        let rules = registry.resolve(&leisure_ctx("Dhaka")).await.unwrap();

        assert_eq!(rules.len(), 3);
        // Definition order is preserved
        assert_eq!(rules[0].name, "VAT");
        assert_eq!(rules[1].name, "Service Charge");
        assert_eq!(rules[2].name, "City Levy");
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let registry = TaxRegistry::new();
        let rules = registry.resolve(&leisure_ctx("dhaka")).await.unwrap();
        assert_eq!(rules.len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_unknown_location_fails() {
        let registry = TaxRegistry::new();
        let err = registry
            .resolve(&leisure_ctx("Atlantis"))
            .await
            .unwrap_err();

        assert_eq!(err, BookingError::resolution_failure("Atlantis"));
    }

    #[tokio::test]
    async fn test_resolve_filters_by_service_category() {
        let registry = TaxRegistry::new();

        let mut ctx = leisure_ctx("Dhaka");
        ctx.service_category = ServiceCategory::Transport;
        let rules = registry.resolve(&ctx).await.unwrap();

        // Service charge and city levy are accommodation-only
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "VAT");
    }

    #[tokio::test]
    async fn test_resolve_filters_by_guest_type() {
        let registry = TaxRegistry::new();

        let mut ctx = leisure_ctx("Cox's Bazar");
        ctx.guest_type = GuestType::Business;
        let rules = registry.resolve(&ctx).await.unwrap();

        // Tourism levy applies to leisure guests only
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "VAT");
    }

    #[tokio::test]
    async fn test_resolve_can_be_empty_without_failing() {
        let mut registry = TaxRegistry::empty();
        registry.add_jurisdiction(Jurisdiction {
            location: "Freeport".to_string(),
            rules: vec![TaxRule {
                id: "biz-only".to_string(),
                name: "Business Levy".to_string(),
                tax_type: TaxType::Percentage,
                rate: 2.0,
                basis: TaxBasis::PerStay,
                applies_to: None,
                guest_types: vec![GuestType::Business],
                description: None,
            }],
        });

        // Leisure guest in a jurisdiction with only business rules: empty, not an error
        let rules = registry.resolve(&leisure_ctx("Freeport")).await.unwrap();
        assert!(rules.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_is_deterministic() {
        let registry = TaxRegistry::new();
        let ctx = leisure_ctx("Dhaka");

        let first = registry.resolve(&ctx).await.unwrap();
        let second = registry.resolve(&ctx).await.unwrap();

        let ids = |rules: &[TaxRule]| rules.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_add_jurisdiction_replaces_by_location() {
        let mut registry = TaxRegistry::new();
        let before = registry.jurisdiction_count();

        registry.add_jurisdiction(Jurisdiction {
            location: "DHAKA".to_string(),
            rules: Vec::new(),
        });

        assert_eq!(registry.jurisdiction_count(), before);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "location": "Sylhet",
                "rules": [{{
                    "id": "bd-vat",
                    "name": "VAT",
                    "tax_type": "percentage",
                    "rate": 15.0
                }}]
            }}]"#
        )
        .unwrap();

        let registry = TaxRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.jurisdiction_count(), 1);

        let jurisdiction = registry.find("Sylhet").unwrap();
        assert_eq!(jurisdiction.rules.len(), 1);
        // Defaults for omitted fields
        assert_eq!(jurisdiction.rules[0].basis, TaxBasis::PerStay);
        assert!(jurisdiction.rules[0].guest_types.is_empty());
    }
}
