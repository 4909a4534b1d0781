use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense columns of the shared ledger. Every expense lands in exactly one
/// of these; anything unlabelled or unrecognised is `Miscellaneous`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ExpenseCategory {
    #[serde(rename = "Wages")]
    Wages,

    #[serde(rename = "Village Expenses")]
    VillageExpenses,

    #[serde(rename = "Bank Charges")]
    BankCharges,

    #[serde(rename = "Computer Office")]
    ComputerOffice,

    #[serde(rename = "Electric Water")]
    ElectricWater,

    #[serde(rename = "Repairs Maintain")]
    RepairsMaintain,

    #[serde(rename = "Garden Expenses")]
    GardenExpenses,

    #[serde(rename = "Misc Expenses")]
    Miscellaneous,
}

impl ExpenseCategory {
    /// Named categories, in ledger column order. `Miscellaneous` is not a
    /// member: it is what a label falls back to.
    pub const KNOWN: [ExpenseCategory; 7] = [
        ExpenseCategory::Wages,
        ExpenseCategory::VillageExpenses,
        ExpenseCategory::BankCharges,
        ExpenseCategory::ComputerOffice,
        ExpenseCategory::ElectricWater,
        ExpenseCategory::RepairsMaintain,
        ExpenseCategory::GardenExpenses,
    ];

    /// Every bucket, in column order, ending with `Miscellaneous`.
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Wages,
        ExpenseCategory::VillageExpenses,
        ExpenseCategory::BankCharges,
        ExpenseCategory::ComputerOffice,
        ExpenseCategory::ElectricWater,
        ExpenseCategory::RepairsMaintain,
        ExpenseCategory::GardenExpenses,
        ExpenseCategory::Miscellaneous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Wages => "Wages",
            ExpenseCategory::VillageExpenses => "Village Expenses",
            ExpenseCategory::BankCharges => "Bank Charges",
            ExpenseCategory::ComputerOffice => "Computer Office",
            ExpenseCategory::ElectricWater => "Electric Water",
            ExpenseCategory::RepairsMaintain => "Repairs Maintain",
            ExpenseCategory::GardenExpenses => "Garden Expenses",
            ExpenseCategory::Miscellaneous => "Misc Expenses",
        }
    }

    /// Looks up a named category by its exact label.
    pub fn from_known_label(label: &str) -> Option<Self> {
        Self::KNOWN.into_iter().find(|category| category.label() == label)
    }

    /// Assigns a record's category label to its bucket. Depends on the label only.
    pub fn classify(label: Option<&str>) -> Self {
        label
            .and_then(Self::from_known_label)
            .unwrap_or(ExpenseCategory::Miscellaneous)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
