//! Per-product-line feature derivation.
//!
//! Each product line's model was trained on the raw inputs plus a handful of
//! interaction terms (squares and pairwise products of the continuous inputs).
//! The terms differ per line, so they live in one static table keyed by code.
//!
//! A derived term only ever reads raw inputs, never another derived term, so the
//! evaluation order inside a rule does not matter.

use std::collections::BTreeMap;

use crate::domain::{ProductLineCode, RawInputs};
use crate::features::names::{BORE, BooleanFeature, CONTINUOUS_FEATURES, ROD, RPC, STROKE, trained_column_name};

/// One of the four continuous raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTerm {
    Bore,
    Stroke,
    Rpc,
    Rod,
}

impl RawTerm {
    pub fn name(self) -> &'static str {
        match self {
            RawTerm::Bore => BORE,
            RawTerm::Stroke => STROKE,
            RawTerm::Rpc => RPC,
            RawTerm::Rod => ROD,
        }
    }

    pub fn value(self, raw: &RawInputs) -> f64 {
        match self {
            RawTerm::Bore => raw.bore,
            RawTerm::Stroke => raw.stroke,
            RawTerm::Rpc => raw.rpc,
            RawTerm::Rod => raw.rod,
        }
    }
}

/// How a derived column is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermValue {
    Square(RawTerm),
    Product(RawTerm, RawTerm),
}

/// A derived column: its trained name and the formula feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTerm {
    pub column: &'static str,
    pub value: TermValue,
}

impl DerivedTerm {
    const fn square(column: &'static str, term: RawTerm) -> Self {
        Self {
            column,
            value: TermValue::Square(term),
        }
    }

    const fn product(column: &'static str, a: RawTerm, b: RawTerm) -> Self {
        Self {
            column,
            value: TermValue::Product(a, b),
        }
    }

    pub fn evaluate(&self, raw: &RawInputs) -> f64 {
        match self.value {
            TermValue::Square(t) => {
                let v = t.value(raw);
                v * v
            }
            TermValue::Product(a, b) => a.value(raw) * b.value(raw),
        }
    }

    /// Human-readable formula, e.g. `Bore²` or `RPC×Stroke`.
    pub fn formula(&self) -> String {
        match self.value {
            TermValue::Square(t) => format!("{}²", t.name()),
            TermValue::Product(a, b) => format!("{}×{}", a.name(), b.name()),
        }
    }
}

use RawTerm::{Bore, Rod, Rpc, Stroke};

static HD_TERMS: [DerivedTerm; 3] = [
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
    DerivedTerm::product("RPC_Bore", Rpc, Bore),
];

static HDI_TERMS: [DerivedTerm; 4] = [
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
    DerivedTerm::product("RPC_Bore", Rpc, Bore),
    DerivedTerm::product("Bore_stroke", Bore, Stroke),
];

static LDH_TERMS: [DerivedTerm; 4] = [
    DerivedTerm::product("Bore_stroke", Bore, Stroke),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
    DerivedTerm::product("RPC_Bore", Rpc, Bore),
    DerivedTerm::product("Stroke_Rod", Stroke, Rod),
];

// The MD model's `Bore_Stroke` column was trained on RPC × Stroke.
static MD_TERMS: [DerivedTerm; 4] = [
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("Bore_RPC", Bore, Rpc),
    DerivedTerm::product("Bore_Stroke", Rpc, Stroke),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
];

static NR_TERMS: [DerivedTerm; 5] = [
    DerivedTerm::square("RPC2", Rpc),
    DerivedTerm::product("Bore_RPC", Bore, Rpc),
    DerivedTerm::product("RPC_Stroke", Rpc, Stroke),
    DerivedTerm::square("Stroke2", Stroke),
    DerivedTerm::product("RPC_Rod", Rpc, Rod),
];

static H_TERMS: [DerivedTerm; 5] = [
    DerivedTerm::square("RPC2", Rpc),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
    DerivedTerm::product("RPC_Bore", Rpc, Bore),
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("RPC_Rod", Rpc, Rod),
];

static L_TERMS: [DerivedTerm; 4] = [
    DerivedTerm::product("Bore_RPC", Bore, Rpc),
    DerivedTerm::product("Bore_Stroke", Bore, Stroke),
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("Stroke_Rod", Stroke, Rod),
];

static M_TERMS: [DerivedTerm; 5] = [
    DerivedTerm::product("Bore_Stroke", Bore, Stroke),
    DerivedTerm::product("Bore_Rod", Bore, Rod),
    DerivedTerm::product("RPC_Bore", Rpc, Bore),
    DerivedTerm::square("Bore2", Bore),
    DerivedTerm::product("RPC_Rod", Rpc, Rod),
];

/// Derived columns the given product line's model was trained with.
///
/// `LD` and `N` use raw features only and return an empty slice.
pub fn derived_terms(code: ProductLineCode) -> &'static [DerivedTerm] {
    match code {
        ProductLineCode::Hd | ProductLineCode::Hde => &HD_TERMS,
        ProductLineCode::Hdi => &HDI_TERMS,
        ProductLineCode::Ldh => &LDH_TERMS,
        ProductLineCode::Md => &MD_TERMS,
        ProductLineCode::Nr => &NR_TERMS,
        ProductLineCode::H => &H_TERMS,
        ProductLineCode::L => &L_TERMS,
        ProductLineCode::M => &M_TERMS,
        ProductLineCode::Ld | ProductLineCode::N => &[],
    }
}

static FULL_FORM: [&str; 8] = [BORE, STROKE, RPC, ROD, "R bearing", "B bearing", "Block", "Val A"];
static LDH_FORM: [&str; 6] = [BORE, STROKE, RPC, ROD, "Block", "Val A"];
static NR_FORM: [&str; 5] = [BORE, STROKE, RPC, ROD, "R bearing"];
static L_FORM: [&str; 5] = [BORE, STROKE, RPC, ROD, "Block"];

/// Raw inputs the product line's input form asks for.
///
/// Informational only: the feature set always carries every supplied input and
/// alignment drops whatever the model does not declare.
pub fn form_features(code: ProductLineCode) -> &'static [&'static str] {
    match code {
        ProductLineCode::Ldh => &LDH_FORM,
        ProductLineCode::Nr => &NR_FORM,
        ProductLineCode::L => &L_FORM,
        _ => &FULL_FORM,
    }
}

/// Where a declared model column gets its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    /// A continuous input, passed through unchanged.
    Raw,
    /// A renamed boolean option.
    Boolean(BooleanFeature),
    /// A derived term of this product line.
    Derived(DerivedTerm),
    /// Nothing produces this column; it will be zero-filled.
    Unproduced,
}

/// Classify a declared column against the given product line's rule set.
pub fn column_origin(code: ProductLineCode, column: &str) -> ColumnOrigin {
    if CONTINUOUS_FEATURES.contains(&column) {
        return ColumnOrigin::Raw;
    }
    if let Some(feature) = BooleanFeature::from_trained_column(column) {
        return ColumnOrigin::Boolean(feature);
    }
    derived_terms(code)
        .iter()
        .find(|t| t.column == column)
        .map(|t| ColumnOrigin::Derived(*t))
        .unwrap_or(ColumnOrigin::Unproduced)
}

/// Named feature values for one request.
///
/// Order is irrelevant; a `BTreeMap` keeps debug output deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    values: BTreeMap<&'static str, f64>,
}

impl FeatureSet {
    /// Raw inputs only, booleans coerced to `0.0` / `1.0`.
    ///
    /// `Val B` is included only when it was supplied.
    pub fn from_raw(raw: &RawInputs) -> Self {
        let mut values = BTreeMap::new();
        for term in [RawTerm::Bore, RawTerm::Stroke, RawTerm::Rpc, RawTerm::Rod] {
            values.insert(term.name(), term.value(raw));
        }

        let flags = [
            (BooleanFeature::RBearing, Some(raw.r_bearing)),
            (BooleanFeature::BBearing, Some(raw.b_bearing)),
            (BooleanFeature::ValA, Some(raw.val_a)),
            (BooleanFeature::Block, Some(raw.block)),
            (BooleanFeature::ValB, raw.val_b),
        ];
        for (feature, flag) in flags {
            if let Some(present) = flag {
                values.insert(feature.base_name(), if present { 1.0 } else { 0.0 });
            }
        }

        Self { values }
    }

    /// Raw inputs plus the product line's derived terms.
    pub fn derive(code: ProductLineCode, raw: &RawInputs) -> Self {
        let mut set = Self::from_raw(raw);
        for term in derived_terms(code) {
            set.values.insert(term.column, term.evaluate(raw));
        }
        set
    }

    /// Rename boolean base names to their trained column names.
    pub fn renamed(self) -> Self {
        let values = self
            .values
            .into_iter()
            .map(|(name, value)| (trained_column_name(name), value))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bore: f64, stroke: f64, rpc: f64, rod: f64) -> RawInputs {
        RawInputs {
            bore,
            stroke,
            rpc,
            rod,
            r_bearing: true,
            b_bearing: false,
            val_a: true,
            block: false,
            val_b: None,
        }
    }

    fn derived_only(set: &FeatureSet) -> Vec<(&'static str, f64)> {
        let base = FeatureSet::from_raw(&raw(0.0, 0.0, 0.0, 0.0)).renamed();
        set.iter().filter(|(name, _)| base.get(name).is_none()).collect()
    }

    #[test]
    fn hdi_derives_exactly_four_terms() {
        let set = FeatureSet::derive(ProductLineCode::Hdi, &raw(3.0, 10.0, 5.0, 1.0)).renamed();
        let mut derived = derived_only(&set);
        derived.sort_by(|a, b| a.0.cmp(b.0));

        assert_eq!(
            derived,
            vec![
                ("Bore2", 9.0),
                ("Bore_Rod", 3.0),
                ("Bore_stroke", 30.0),
                ("RPC_Bore", 15.0),
            ]
        );
    }

    #[test]
    fn raw_only_codes_keep_eight_renamed_features() {
        for code in [ProductLineCode::Ld, ProductLineCode::N] {
            let set = FeatureSet::derive(code, &raw(100.0, 50.0, 20.0, 30.0)).renamed();
            let mut names: Vec<_> = set.iter().map(|(name, _)| name).collect();
            names.sort_unstable();
            assert_eq!(
                names,
                vec!["B bearing_Y", "Block_Y", "Bore", "R bearing_Y", "RPC", "Rod", "Stroke", "Val A_Y"]
            );
        }
    }

    #[test]
    fn booleans_coerce_to_zero_one() {
        let set = FeatureSet::from_raw(&raw(1.0, 1.0, 1.0, 1.0));
        assert_eq!(set.get("R bearing"), Some(1.0));
        assert_eq!(set.get("B bearing"), Some(0.0));
        assert_eq!(set.get("Val B"), None);

        let with_val_b = RawInputs {
            val_b: Some(true),
            ..raw(1.0, 1.0, 1.0, 1.0)
        };
        assert_eq!(FeatureSet::from_raw(&with_val_b).renamed().get("Val B_Y"), Some(1.0));
    }

    #[test]
    fn md_bore_stroke_column_uses_rpc_times_stroke() {
        let set = FeatureSet::derive(ProductLineCode::Md, &raw(3.0, 10.0, 5.0, 1.0));
        assert_eq!(set.get("Bore_Stroke"), Some(50.0));
        assert_eq!(set.get("Bore_RPC"), Some(15.0));
    }

    #[test]
    fn derived_columns_never_shadow_raw_names() {
        for code in ProductLineCode::ALL {
            for term in derived_terms(code) {
                assert!(!CONTINUOUS_FEATURES.contains(&term.column), "{code}: {}", term.column);
                assert!(BooleanFeature::from_base_name(term.column).is_none());
            }
        }
    }

    #[test]
    fn column_origin_classifies_declared_columns() {
        let code = ProductLineCode::Hd;
        assert_eq!(column_origin(code, "Bore"), ColumnOrigin::Raw);
        assert_eq!(
            column_origin(code, "Block_Y"),
            ColumnOrigin::Boolean(BooleanFeature::Block)
        );
        assert!(matches!(column_origin(code, "Bore2"), ColumnOrigin::Derived(_)));
        assert_eq!(column_origin(code, "Block"), ColumnOrigin::Unproduced);
        assert_eq!(column_origin(code, "Stroke2"), ColumnOrigin::Unproduced);
    }

    #[test]
    fn formulas_render_squares_and_products() {
        assert_eq!(HD_TERMS[0].formula(), "Bore²");
        assert_eq!(MD_TERMS[2].formula(), "RPC×Stroke");
    }
}
