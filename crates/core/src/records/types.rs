//! Financial record types: costs and budget line items.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use buildcost_shared::types::{
    BudgetId, BudgetItemId, CostId, DepartmentId, ProjectId, UserId, VendorId,
};

use crate::workflow::PaymentStatus;

/// Cost type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// Wages and allowances.
    Labor,
    /// Construction materials.
    Material,
    /// Equipment rental and operation.
    Equipment,
    /// Subcontracted work.
    Subcontract,
    /// Site overhead.
    Indirect,
    /// Anything else.
    Other,
}

impl CostType {
    /// All cost types in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Labor,
        Self::Material,
        Self::Equipment,
        Self::Subcontract,
        Self::Indirect,
        Self::Other,
    ];

    /// Returns the string representation of the cost type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Labor => "labor",
            Self::Material => "material",
            Self::Equipment => "equipment",
            Self::Subcontract => "subcontract",
            Self::Indirect => "indirect",
            Self::Other => "other",
        }
    }

    /// Parses a cost type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Categories nested under this type.
    pub fn categories(self) -> impl Iterator<Item = CostCategory> {
        CostCategory::ALL
            .into_iter()
            .filter(move |c| c.cost_type() == self)
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained cost category. Each category belongs to exactly one [`CostType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum CostCategory {
    // Labor
    Wages,
    Overtime,
    SafetyAllowance,
    MealAllowance,
    Accommodation,
    Insurance,
    // Material
    Cement,
    Rebar,
    Aggregate,
    Concrete,
    Steel,
    Timber,
    Consumables,
    MaterialTransport,
    // Equipment
    Crane,
    Excavator,
    Truck,
    Generator,
    EquipmentMaintenance,
    Fuel,
    // Subcontract
    Construction,
    Mechanical,
    Electrical,
    Plumbing,
    Consulting,
    // Indirect
    SiteManagement,
    SafetyManagement,
    QualityManagement,
    EnvironmentalManagement,
    Utilities,
    Communication,
    OfficeSupplies,
    Travel,
    // Other
    Other,
}

impl CostCategory {
    /// All categories, grouped by cost type.
    pub const ALL: [Self; 34] = [
        Self::Wages,
        Self::Overtime,
        Self::SafetyAllowance,
        Self::MealAllowance,
        Self::Accommodation,
        Self::Insurance,
        Self::Cement,
        Self::Rebar,
        Self::Aggregate,
        Self::Concrete,
        Self::Steel,
        Self::Timber,
        Self::Consumables,
        Self::MaterialTransport,
        Self::Crane,
        Self::Excavator,
        Self::Truck,
        Self::Generator,
        Self::EquipmentMaintenance,
        Self::Fuel,
        Self::Construction,
        Self::Mechanical,
        Self::Electrical,
        Self::Plumbing,
        Self::Consulting,
        Self::SiteManagement,
        Self::SafetyManagement,
        Self::QualityManagement,
        Self::EnvironmentalManagement,
        Self::Utilities,
        Self::Communication,
        Self::OfficeSupplies,
        Self::Travel,
        Self::Other,
    ];

    /// The cost type this category is nested under.
    #[must_use]
    pub const fn cost_type(self) -> CostType {
        match self {
            Self::Wages
            | Self::Overtime
            | Self::SafetyAllowance
            | Self::MealAllowance
            | Self::Accommodation
            | Self::Insurance => CostType::Labor,
            Self::Cement
            | Self::Rebar
            | Self::Aggregate
            | Self::Concrete
            | Self::Steel
            | Self::Timber
            | Self::Consumables
            | Self::MaterialTransport => CostType::Material,
            Self::Crane
            | Self::Excavator
            | Self::Truck
            | Self::Generator
            | Self::EquipmentMaintenance
            | Self::Fuel => CostType::Equipment,
            Self::Construction
            | Self::Mechanical
            | Self::Electrical
            | Self::Plumbing
            | Self::Consulting => CostType::Subcontract,
            Self::SiteManagement
            | Self::SafetyManagement
            | Self::QualityManagement
            | Self::EnvironmentalManagement
            | Self::Utilities
            | Self::Communication
            | Self::OfficeSupplies
            | Self::Travel => CostType::Indirect,
            Self::Other => CostType::Other,
        }
    }

    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wages => "wages",
            Self::Overtime => "overtime",
            Self::SafetyAllowance => "safety_allowance",
            Self::MealAllowance => "meal_allowance",
            Self::Accommodation => "accommodation",
            Self::Insurance => "insurance",
            Self::Cement => "cement",
            Self::Rebar => "rebar",
            Self::Aggregate => "aggregate",
            Self::Concrete => "concrete",
            Self::Steel => "steel",
            Self::Timber => "timber",
            Self::Consumables => "consumables",
            Self::MaterialTransport => "material_transport",
            Self::Crane => "crane",
            Self::Excavator => "excavator",
            Self::Truck => "truck",
            Self::Generator => "generator",
            Self::EquipmentMaintenance => "equipment_maintenance",
            Self::Fuel => "fuel",
            Self::Construction => "construction",
            Self::Mechanical => "mechanical",
            Self::Electrical => "electrical",
            Self::Plumbing => "plumbing",
            Self::Consulting => "consulting",
            Self::SiteManagement => "site_management",
            Self::SafetyManagement => "safety_management",
            Self::QualityManagement => "quality_management",
            Self::EnvironmentalManagement => "environmental_management",
            Self::Utilities => "utilities",
            Self::Communication => "communication",
            Self::OfficeSupplies => "office_supplies",
            Self::Travel => "travel",
            Self::Other => "other",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view over costs and budget items used by the aggregator.
pub trait FinancialRecord {
    /// Raw identifier, used in error reports.
    fn record_id(&self) -> Uuid;
    /// Owning project.
    fn project_id(&self) -> ProjectId;
    /// Monetary amount; `None` when the source row carried no amount.
    fn amount(&self) -> Option<Decimal>;
    /// Cost type the amount is booked under.
    fn cost_type(&self) -> CostType;
}

/// A financial record with a date used for period bucketing.
pub trait DatedRecord: FinancialRecord {
    /// When the amount was incurred or paid.
    fn occurred_at(&self) -> Option<NaiveDateTime>;
}

/// A single recorded expenditure against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Cost ID.
    pub id: CostId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Cost type.
    pub cost_type: CostType,
    /// Category within the cost type.
    pub category: CostCategory,
    /// Amount, if recorded.
    pub amount: Option<Decimal>,
    /// Payment date, used for period bucketing.
    pub payment_date: Option<NaiveDateTime>,
    /// Payment status.
    pub status: PaymentStatus,
    /// Vendor paid, if any.
    pub vendor_id: Option<VendorId>,
    /// Department charged, if any.
    pub department_id: Option<DepartmentId>,
    /// User who approved the cost.
    pub approved_by: Option<UserId>,
    /// Soft-deleted records are kept for audit but never aggregated.
    pub is_deleted: bool,
}

impl FinancialRecord for CostRecord {
    fn record_id(&self) -> Uuid {
        self.id.into_inner()
    }

    fn project_id(&self) -> ProjectId {
        self.project_id
    }

    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn cost_type(&self) -> CostType {
        self.cost_type
    }
}

impl DatedRecord for CostRecord {
    fn occurred_at(&self) -> Option<NaiveDateTime> {
        self.payment_date
    }
}

/// A planned allocation line inside a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItemRecord {
    /// Budget item ID.
    pub id: BudgetItemId,
    /// Parent budget version.
    pub budget_id: BudgetId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Cost type the allocation is for.
    pub cost_type: CostType,
    /// Free-text line label (e.g., "Tower crane, 3 months").
    pub subcategory: String,
    /// Allocated amount, if recorded.
    pub amount: Option<Decimal>,
}

impl FinancialRecord for BudgetItemRecord {
    fn record_id(&self) -> Uuid {
        self.id.into_inner()
    }

    fn project_id(&self) -> ProjectId {
        self.project_id
    }

    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn cost_type(&self) -> CostType {
        self.cost_type
    }
}

/// Input for recording a new cost.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCostInput {
    /// Cost type.
    pub cost_type: CostType,
    /// Category within the cost type.
    pub category: CostCategory,
    /// Amount (must not be negative).
    pub amount: Decimal,
    /// Payment date. Required; `None` is rejected by `validate_new_cost`.
    pub payment_date: Option<NaiveDateTime>,
    /// Optional description.
    pub description: Option<String>,
    /// Vendor paid, if any.
    pub vendor_id: Option<VendorId>,
    /// Department charged, if any.
    pub department_id: Option<DepartmentId>,
    /// Invoice number, if any.
    pub invoice_number: Option<String>,
}

/// Input for correcting the amount of a pending cost.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateCostAmountInput {
    /// New amount (must not be negative).
    pub amount: Decimal,
}
