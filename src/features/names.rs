//! Feature names as they appear in trained model columns.
//!
//! Continuous inputs keep their plain names. Boolean options were one-hot encoded
//! at training time, so the column a model declares is the base name plus `_Y`.

pub const BORE: &str = "Bore";
pub const STROKE: &str = "Stroke";
pub const RPC: &str = "RPC";
pub const ROD: &str = "Rod";

/// Continuous raw feature names, in form order.
pub const CONTINUOUS_FEATURES: [&str; 4] = [BORE, STROKE, RPC, ROD];

/// Boolean configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanFeature {
    RBearing,
    BBearing,
    Block,
    ValA,
    ValB,
}

impl BooleanFeature {
    pub const ALL: [BooleanFeature; 5] = [
        BooleanFeature::RBearing,
        BooleanFeature::BBearing,
        BooleanFeature::Block,
        BooleanFeature::ValA,
        BooleanFeature::ValB,
    ];

    /// Name used on the input form and in the un-renamed feature set.
    pub fn base_name(self) -> &'static str {
        match self {
            BooleanFeature::RBearing => "R bearing",
            BooleanFeature::BBearing => "B bearing",
            BooleanFeature::Block => "Block",
            BooleanFeature::ValA => "Val A",
            BooleanFeature::ValB => "Val B",
        }
    }

    /// Column name the models were trained with.
    pub fn trained_column(self) -> &'static str {
        match self {
            BooleanFeature::RBearing => "R bearing_Y",
            BooleanFeature::BBearing => "B bearing_Y",
            BooleanFeature::Block => "Block_Y",
            BooleanFeature::ValA => "Val A_Y",
            BooleanFeature::ValB => "Val B_Y",
        }
    }

    pub fn from_base_name(name: &str) -> Option<BooleanFeature> {
        Self::ALL.into_iter().find(|f| f.base_name() == name)
    }

    pub fn from_trained_column(name: &str) -> Option<BooleanFeature> {
        Self::ALL.into_iter().find(|f| f.trained_column() == name)
    }
}

/// Map a feature name to its trained column name.
///
/// Boolean base names are renamed; every other name is returned unchanged.
pub fn trained_column_name(name: &'static str) -> &'static str {
    BooleanFeature::from_base_name(name)
        .map(BooleanFeature::trained_column)
        .unwrap_or(name)
}
