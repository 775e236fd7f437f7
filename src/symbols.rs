//! Genealogical symbol tables
//!
//! Immutable constant tables of the Unicode symbols genealogical
//! front-ends decorate rows and reports with, each with an HTML entity
//! and a plain-text substitution for fonts that lack the glyph. Consumers
//! take the tables by reference; there is no mutable global state here.

/// One genealogical symbol with its display fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub name: &'static str,
    /// The Unicode glyph
    pub glyph: &'static str,
    /// HTML entity form
    pub html: &'static str,
    /// Plain-text substitution when the glyph is unavailable
    pub fallback: &'static str,
}

/// The general genealogical symbols, indexable by `SymbolName`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolName {
    Lesbian,
    MaleHomosexual,
    Heterosexual,
    Transgender,
    Asexual,
    Marriage,
    Divorce,
    UnmarriedPartnership,
    Buried,
    Cremated,
}

pub const SYMBOLS: &[Symbol] = &[
    Symbol { name: "Lesbianism", glyph: "\u{26a2}", html: "&#9890;", fallback: "" },
    Symbol { name: "Male homosexuality", glyph: "\u{26a3}", html: "&#9891;", fallback: "" },
    Symbol { name: "Heterosexuality", glyph: "\u{26a4}", html: "&#9892;", fallback: "" },
    Symbol { name: "Transgender", glyph: "\u{26a6}", html: "&#9894;", fallback: "" },
    Symbol { name: "Asexuality, sexless, genderless", glyph: "\u{26aa}", html: "&#9898;", fallback: "" },
    Symbol { name: "Marriage", glyph: "\u{26ad}", html: "&#9901;", fallback: "oo" },
    Symbol { name: "Divorce", glyph: "\u{26ae}", html: "&#9902;", fallback: "o|o" },
    Symbol { name: "Unmarried partnership", glyph: "\u{26af}", html: "&#9903;", fallback: "o-o" },
    Symbol { name: "Buried", glyph: "\u{26b0}", html: "&#9904;", fallback: "d" },
    Symbol { name: "Cremated", glyph: "\u{26b1}", html: "&#9905;", fallback: "d" },
];

/// Look up one general symbol
pub fn symbol(name: SymbolName) -> &'static Symbol {
    &SYMBOLS[name as usize]
}

/// The death symbols users can choose from, indexable by `DeathSymbol`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathSymbol {
    None,
    X,
    SkullAndCrossbones,
    Ankh,
    OrthodoxCross,
    ChiRho,
    CrossOfLorraine,
    CrossOfJerusalem,
    StarAndCrescent,
    WestSyriacCross,
    EastSyriacCross,
    HeavyGreekCross,
    LatinCross,
    MalteseCross,
    StarOfDavid,
    Dead,
}

pub const DEATH_SYMBOLS: &[Symbol] = &[
    Symbol { name: "Nothing", glyph: "", html: "", fallback: "" },
    Symbol { name: "x", glyph: "x", html: "x", fallback: "x" },
    Symbol { name: "Skull and crossbones", glyph: "\u{2620}", html: "&#9760;", fallback: "+" },
    Symbol { name: "Ankh", glyph: "\u{2625}", html: "&#9765;", fallback: "+" },
    Symbol { name: "Orthodox cross", glyph: "\u{2626}", html: "&#9766;", fallback: "+" },
    Symbol { name: "Chi rho", glyph: "\u{2627}", html: "&#9767;", fallback: "+" },
    Symbol { name: "Cross of Lorraine", glyph: "\u{2628}", html: "&#9768;", fallback: "+" },
    Symbol { name: "Cross of Jerusalem", glyph: "\u{2629}", html: "&#9769;", fallback: "+" },
    Symbol { name: "Star and crescent", glyph: "\u{262a}", html: "&#9770;", fallback: "+" },
    Symbol { name: "West Syriac cross", glyph: "\u{2670}", html: "&#9840;", fallback: "+" },
    Symbol { name: "East Syriac cross", glyph: "\u{2671}", html: "&#9841;", fallback: "+" },
    Symbol { name: "Heavy Greek cross", glyph: "\u{271a}", html: "&#10010;", fallback: "+" },
    Symbol { name: "Latin cross", glyph: "\u{271e}", html: "&#10014;", fallback: "+" },
    Symbol { name: "Maltese cross", glyph: "\u{2720}", html: "&#10016;", fallback: "+" },
    Symbol { name: "Star of David", glyph: "\u{2721}", html: "&#10017;", fallback: "+" },
    Symbol { name: "Dead", glyph: "Dead", html: "Dead", fallback: "Dead" },
];

/// Look up one death symbol
pub fn death_symbol(name: DeathSymbol) -> &'static Symbol {
    &DEATH_SYMBOLS[name as usize]
}
