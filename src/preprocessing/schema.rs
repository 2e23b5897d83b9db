//! Static schema catalog for the housing dataset family
//!
//! Field lists grouped by imputation strategy and the ordinal rank scales.
//! Everything here is declarative data; the stages look fields up instead of
//! branching on names.

use serde::{Deserialize, Serialize};

/// A categorical value with absence modelled explicitly.
///
/// `Absent` stands for "the feature does not exist on the property" (no pool,
/// no garage). It is materialized as [`Category::ABSENT_LABEL`] inside string
/// columns and ranks 0 on every scale that knows about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category<'a> {
    Absent,
    Label(&'a str),
}

impl<'a> Category<'a> {
    /// String form of [`Category::Absent`] inside a categorical column.
    pub const ABSENT_LABEL: &'static str = "None";

    /// Interpret a raw cell value.
    pub fn parse(raw: &'a str) -> Self {
        if raw == Self::ABSENT_LABEL {
            Category::Absent
        } else {
            Category::Label(raw)
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            Category::Absent => Self::ABSENT_LABEL,
            Category::Label(label) => label,
        }
    }
}

/// A total order over category labels; rank = position in `levels`.
#[derive(Debug)]
pub struct OrdinalScale {
    pub name: &'static str,
    levels: &'static [Category<'static>],
}

impl OrdinalScale {
    /// Rank of a category, `None` when the scale does not know it.
    pub fn rank(&self, category: Category<'_>) -> Option<u32> {
        self.levels
            .iter()
            .position(|level| *level == category)
            .map(|pos| pos as u32)
    }

    /// Rank of a raw cell value.
    pub fn rank_of(&self, raw: &str) -> Option<u32> {
        self.rank(Category::parse(raw))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

use Category::{Absent, Label};

pub static QUALITY: OrdinalScale = OrdinalScale {
    name: "quality",
    levels: &[Absent, Label("Po"), Label("Fa"), Label("TA"), Label("Gd"), Label("Ex")],
};

pub static BASEMENT_EXPOSURE: OrdinalScale = OrdinalScale {
    name: "basement_exposure",
    levels: &[Absent, Label("No"), Label("Mn"), Label("Av"), Label("Gd")],
};

pub static LOT_SHAPE: OrdinalScale = OrdinalScale {
    name: "lot_shape",
    levels: &[Label("IR3"), Label("IR2"), Label("IR1"), Label("Reg")],
};

pub static LAND_SLOPE: OrdinalScale = OrdinalScale {
    name: "land_slope",
    levels: &[Label("Sev"), Label("Mod"), Label("Gtl")],
};

pub static GARAGE_FINISH: OrdinalScale = OrdinalScale {
    name: "garage_finish",
    levels: &[Absent, Label("Unf"), Label("RFn"), Label("Fin")],
};

pub static PAVED_DRIVE: OrdinalScale = OrdinalScale {
    name: "paved_drive",
    levels: &[Label("N"), Label("P"), Label("Y")],
};

pub static BASEMENT_FINISH_TYPE: OrdinalScale = OrdinalScale {
    name: "basement_finish_type",
    levels: &[
        Absent,
        Label("Unf"),
        Label("LwQ"),
        Label("Rec"),
        Label("BLQ"),
        Label("ALQ"),
        Label("GLQ"),
    ],
};

/// Ordinal fields and the scale each one is ranked on.
pub static ORDINAL_FIELDS: &[(&str, &OrdinalScale)] = &[
    ("ExterQual", &QUALITY),
    ("ExterCond", &QUALITY),
    ("BsmtQual", &QUALITY),
    ("BsmtCond", &QUALITY),
    ("HeatingQC", &QUALITY),
    ("KitchenQual", &QUALITY),
    ("FireplaceQu", &QUALITY),
    ("GarageQual", &QUALITY),
    ("GarageCond", &QUALITY),
    ("PoolQC", &QUALITY),
    ("BsmtExposure", &BASEMENT_EXPOSURE),
    ("LotShape", &LOT_SHAPE),
    ("LandSlope", &LAND_SLOPE),
    ("GarageFinish", &GARAGE_FINISH),
    ("PavedDrive", &PAVED_DRIVE),
    ("BsmtFinType1", &BASEMENT_FINISH_TYPE),
    ("BsmtFinType2", &BASEMENT_FINISH_TYPE),
];

/// Missing means the feature is absent from the property.
pub static ABSENT_CATEGORY_FIELDS: &[&str] = &[
    "PoolQC",
    "MiscFeature",
    "Alley",
    "Fence",
    "FireplaceQu",
    "GarageType",
    "GarageFinish",
    "GarageQual",
    "GarageCond",
    "BsmtQual",
    "BsmtCond",
    "BsmtExposure",
    "BsmtFinType1",
    "BsmtFinType2",
    "MasVnrType",
];

/// Missing means zero of the measured quantity.
pub static ZERO_FILL_FIELDS: &[&str] = &[
    "GarageYrBlt",
    "GarageArea",
    "GarageCars",
    "BsmtFinSF1",
    "BsmtFinSF2",
    "BsmtUnfSF",
    "TotalBsmtSF",
    "BsmtFullBath",
    "BsmtHalfBath",
    "MasVnrArea",
];

/// Filled with the median of the field within each group.
pub static GROUP_MEDIAN_FIELDS: &[(&str, &str)] = &[("LotFrontage", "Neighborhood")];

/// Categorical fields with only incidental missingness.
pub static MODE_FILL_FIELDS: &[&str] = &[
    "MSZoning",
    "Electrical",
    "KitchenQual",
    "Exterior1st",
    "Exterior2nd",
    "SaleType",
    "Utilities",
    "Functional",
];

/// Integer-looking codes that must be treated as categories.
pub static FORCED_CATEGORICAL_FIELDS: &[&str] = &["MSSubClass"];

/// How a field is filled when a value is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Missing → [`Category::Absent`]
    AbsentCategory,
    /// Missing → 0
    Zero,
    /// Missing → median of the field among rows sharing `group_by`
    GroupMedian { group_by: String },
    /// Missing → most frequent observed value
    MostFrequent,
}

/// Strategies in the order they are applied, each with its field list.
///
/// A field listed under more than one strategy is handled by the first.
pub fn imputation_plan() -> Vec<(ImputeStrategy, Vec<&'static str>)> {
    let mut plan = vec![
        (ImputeStrategy::AbsentCategory, ABSENT_CATEGORY_FIELDS.to_vec()),
        (ImputeStrategy::Zero, ZERO_FILL_FIELDS.to_vec()),
    ];
    for (field, group_by) in GROUP_MEDIAN_FIELDS {
        plan.push((
            ImputeStrategy::GroupMedian {
                group_by: group_by.to_string(),
            },
            vec![*field],
        ));
    }
    plan.push((ImputeStrategy::MostFrequent, MODE_FILL_FIELDS.to_vec()));
    plan
}

/// Encoding role of a column.
#[derive(Debug, Clone, Copy)]
pub enum FieldRole {
    Numeric,
    Ordinal(&'static OrdinalScale),
    Nominal,
}

/// Static metadata for one column.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub role: FieldRole,
}

impl FieldDescriptor {
    /// Classify a column by catalog membership and storage type.
    ///
    /// Ordinal fields are looked up first; any other string column is nominal.
    pub fn classify(name: &str, is_string: bool) -> Self {
        let role = match ordinal_scale(name) {
            Some(scale) if is_string => FieldRole::Ordinal(scale),
            _ if is_string => FieldRole::Nominal,
            _ => FieldRole::Numeric,
        };
        Self {
            name: name.to_string(),
            role,
        }
    }
}

pub fn ordinal_scale(field: &str) -> Option<&'static OrdinalScale> {
    ORDINAL_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, scale)| *scale)
}

pub fn is_forced_categorical(field: &str) -> bool {
    FORCED_CATEGORICAL_FIELDS.contains(&field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_scale_ranks() {
        assert_eq!(QUALITY.rank_of("None"), Some(0));
        assert_eq!(QUALITY.rank_of("Po"), Some(1));
        assert_eq!(QUALITY.rank_of("Ex"), Some(5));
        assert_eq!(QUALITY.rank_of("Excellent"), None);
    }

    #[test]
    fn test_bespoke_scales() {
        assert_eq!(BASEMENT_EXPOSURE.rank_of("Gd"), Some(4));
        assert_eq!(LOT_SHAPE.rank_of("IR3"), Some(0));
        assert_eq!(LOT_SHAPE.rank_of("Reg"), Some(3));
        assert_eq!(LAND_SLOPE.rank_of("Gtl"), Some(2));
        assert_eq!(GARAGE_FINISH.rank_of("Fin"), Some(3));
        assert_eq!(PAVED_DRIVE.rank_of("Y"), Some(2));
        assert_eq!(BASEMENT_FINISH_TYPE.rank_of("GLQ"), Some(6));
        assert_eq!(BASEMENT_FINISH_TYPE.len(), 7);
    }

    #[test]
    fn test_absent_only_ranks_where_scale_knows_it() {
        assert_eq!(GARAGE_FINISH.rank(Category::Absent), Some(0));
        assert_eq!(LOT_SHAPE.rank(Category::Absent), None);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("None"), Category::Absent);
        assert_eq!(Category::parse("Gd"), Category::Label("Gd"));
        assert_eq!(Category::Absent.as_str(), "None");
    }

    #[test]
    fn test_ordinal_lookup() {
        assert_eq!(ordinal_scale("KitchenQual").map(|s| s.name), Some("quality"));
        assert_eq!(ordinal_scale("PavedDrive").map(|s| s.name), Some("paved_drive"));
        assert!(ordinal_scale("Neighborhood").is_none());
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            FieldDescriptor::classify("ExterQual", true).role,
            FieldRole::Ordinal(_)
        ));
        assert!(matches!(
            FieldDescriptor::classify("MSZoning", true).role,
            FieldRole::Nominal
        ));
        assert!(matches!(
            FieldDescriptor::classify("GrLivArea", false).role,
            FieldRole::Numeric
        ));
    }

    #[test]
    fn test_plan_order() {
        let plan = imputation_plan();
        assert_eq!(plan[0].0, ImputeStrategy::AbsentCategory);
        assert_eq!(plan[1].0, ImputeStrategy::Zero);
        assert!(matches!(plan[2].0, ImputeStrategy::GroupMedian { .. }));
        assert_eq!(plan[3].0, ImputeStrategy::MostFrequent);
    }
}
