use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownChoice;

/// A closed set of answers a step can offer.
pub trait Choice: Copy + fmt::Display + 'static {
    fn all() -> &'static [Self];
    fn id(self) -> &'static str;
    fn label(self) -> &'static str;
}

/// Declares a closed set of answers whose wire ids match the questionnaire's
/// option values.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($id:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Choice for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn id(self) -> &'static str {
                $name::id(self)
            }

            fn label(self) -> &'static str {
                $name::label(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.id() == value)
                    .ok_or_else(|| UnknownChoice::new(stringify!($name), value))
            }
        }
    };
}

choice_enum!(
    /// What the applicant wants credit for. Drives which later steps are asked.
    Purpose {
        Small => ("small", "Daily Expenses"),
        Medium => ("medium", "Medium Purchase"),
        Large => ("large", "Large Loan"),
        Upgrade => ("upgrade", "Credit Upgrade"),
    }
);

impl Purpose {
    pub fn description(self) -> &'static str {
        match self {
            Purpose::Small => "Small loans for immediate needs",
            Purpose::Medium => "Equipment, appliances, or emergency repairs",
            Purpose::Large => "Housing, business expansion, or education",
            Purpose::Upgrade => "Improve interest rates or credit limits",
        }
    }

    /// Daily-expense credit skips the financial capacity questions.
    pub fn asks_financial_capacity(self) -> bool {
        self != Purpose::Small
    }

    pub fn asks_asset_support(self) -> bool {
        matches!(self, Purpose::Large | Purpose::Upgrade)
    }
}

choice_enum!(SimDuration {
    UnderSixMonths => ("<6m", "Less than 6 months"),
    SixMonthsToYear => ("6m-1y", "6 months - 1 year"),
    OneToThreeYears => ("1y-3y", "1 - 3 years"),
    OverThreeYears => ("3y+", "3+ years"),
});

choice_enum!(RechargeRegularity {
    Monthly => ("monthly", "Every month"),
    Quarterly => ("quarterly", "Quarterly"),
    Irregular => ("irregular", "Irregular"),
});

choice_enum!(UsageConsistency {
    Stable => ("stable", "Stable pattern"),
    Fluctuating => ("fluctuating", "Fluctuating"),
});

choice_enum!(OnTimePayment {
    Always => ("always", "Always on time"),
    Mostly => ("mostly", "Mostly on time"),
    Late => ("late", "Often late"),
});

choice_enum!(DelayFrequency {
    Rare => ("rare", "Rarely"),
    Occasional => ("occasional", "Occasionally"),
    Frequent => ("frequent", "Frequently"),
});

choice_enum!(BillPredictability {
    Consistent => ("consistent", "Consistent amounts"),
    Variable => ("variable", "Highly variable"),
});

choice_enum!(GroupParticipation {
    Active => ("active", "Active member"),
    Passive => ("passive", "Passive"),
    NoGroup => ("none", "None"),
});

choice_enum!(SharedResponsibility {
    High => ("high", "Handles group funds"),
    Medium => ("medium", "Helps occasionally"),
    Low => ("low", "No responsibility"),
});

choice_enum!(DisputeHistory {
    Clear => ("clear", "Clear record"),
    Minor => ("minor", "Minor disputes"),
});

choice_enum!(LoanExperience {
    Never => ("never", "No, never"),
    Current => ("current", "Yes, currently repaying"),
    Repaid => ("repaid", "Yes, repaid fully"),
    Difficulties => ("difficulties", "Yes, but had difficulties"),
});

choice_enum!(EmploymentType {
    Salaried => ("salaried", "Salaried / Formal"),
    SelfEmployed => ("self", "Self-Employed / Gig Work"),
    Seasonal => ("seasonal", "Seasonal / Project-based"),
    Other => ("other", "Other"),
});

choice_enum!(IncomeRange {
    Under20k => ("<20k", "Under $250 / ₹20,000"),
    From20kTo50k => ("20k-50k", "$250 - $600 / ₹20k-50k"),
    Over50k => ("50k+", "$600+ / ₹50k+"),
});

choice_enum!(IncomeStability {
    Very => ("very", "Very Stable"),
    Moderate => ("moderate", "Moderate"),
    Variable => ("variable", "Variable"),
});

choice_enum!(
    /// Which signal section an uploaded document backs up.
    EvidenceCategory {
        Mobile => ("mobile", "Mobile records"),
        Utility => ("utility", "Utility bills"),
        Community => ("community", "Community group records"),
        Generic => ("generic", "Other documents"),
    }
);

/// Position in the questionnaire. Codes are stable; `6` is reserved and has no
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Landing,
    PurposeSelect,
    CoreTrustForm,
    LoanExperience,
    FinancialCapacity,
    AssetSupport,
    Processing,
    Report,
}

impl StepId {
    pub const ALL: [StepId; 8] = [
        StepId::Landing,
        StepId::PurposeSelect,
        StepId::CoreTrustForm,
        StepId::LoanExperience,
        StepId::FinancialCapacity,
        StepId::AssetSupport,
        StepId::Processing,
        StepId::Report,
    ];

    pub fn code(self) -> u8 {
        match self {
            StepId::Landing => 0,
            StepId::PurposeSelect => 1,
            StepId::CoreTrustForm => 2,
            StepId::LoanExperience => 3,
            StepId::FinancialCapacity => 4,
            StepId::AssetSupport => 5,
            StepId::Processing => 7,
            StepId::Report => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.code() == code)
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Landing => "Welcome",
            StepId::PurposeSelect => "Credit Purpose",
            StepId::CoreTrustForm => "Core Trust Signals",
            StepId::LoanExperience => "Loan Experience",
            StepId::FinancialCapacity => "Financial Capacity",
            StepId::AssetSupport => "Asset Support",
            StepId::Processing => "Processing",
            StepId::Report => "Trust Profile",
        }
    }

    /// Steps that collect answers, numbered the way the header shows them.
    pub fn questionnaire_position(self) -> Option<u8> {
        match self {
            StepId::PurposeSelect
            | StepId::CoreTrustForm
            | StepId::LoanExperience
            | StepId::FinancialCapacity
            | StepId::AssetSupport => Some(self.code()),
            _ => None,
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title(), self.code())
    }
}

/// Ordinal creditworthiness-by-behaviour classification, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrustBand {
    T1,
    T2,
    T3,
    T4,
    T5,
}

impl TrustBand {
    pub const ALL: [TrustBand; 5] = [
        TrustBand::T1,
        TrustBand::T2,
        TrustBand::T3,
        TrustBand::T4,
        TrustBand::T5,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TrustBand::T1 => "T1",
            TrustBand::T2 => "T2",
            TrustBand::T3 => "T3",
            TrustBand::T4 => "T4",
            TrustBand::T5 => "T5",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TrustBand::T1 => "Limited Trust",
            TrustBand::T2 => "Emerging Trust",
            TrustBand::T3 => "Developing Trust",
            TrustBand::T4 => "Strong Trust",
            TrustBand::T5 => "Exceptional Trust",
        }
    }

    pub fn label(self) -> String {
        format!("{} - {}", self.code(), self.title())
    }
}

impl fmt::Display for TrustBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.title())
    }
}

impl FromStr for TrustBand {
    type Err = UnknownChoice;

    /// Accepts the full label (`"T4 - Strong Trust"`) or the bare code (`"T4"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let code = trimmed
            .split(|c: char| c.is_whitespace() || c == '-')
            .next()
            .unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|band| band.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownChoice::new("TrustBand", trimmed))
    }
}

impl Serialize for TrustBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TrustBand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
