use serde::{Serialize, Serializer};

/// Comparison operator attached to a cmc constraint.
///
/// Numeric fields use comparison operators in the target syntax,
/// never the `:` assignment used for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmcOp {
    Eq,
    Ge,
    Le,
}

impl CmcOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmcOp::Eq => "=",
            CmcOp::Ge => ">=",
            CmcOp::Le => "<=",
        }
    }
}

impl Serialize for CmcOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CmcFilter {
    pub op: CmcOp,
    pub value: u32,
}

/// Type words we recognize. Declaration order is the canonical
/// precedence used when compiling multiple type clauses: supertypes
/// first, then the seven base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKeyword {
    Legendary,
    Tribal,
    Artifact,
    Creature,
    Enchantment,
    Instant,
    Sorcery,
    Planeswalker,
    Land,
}

/// How a type word behaves once an effect modifier enters the picture.
/// Spell types describe what the card *is*, target types what it
/// *affects*; artifact/enchantment can be read either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    PureSpell,
    PureTarget,
    Ambiguous,
    Other,
}

impl TypeKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Legendary => "legendary",
            TypeKeyword::Tribal => "tribal",
            TypeKeyword::Artifact => "artifact",
            TypeKeyword::Creature => "creature",
            TypeKeyword::Enchantment => "enchantment",
            TypeKeyword::Instant => "instant",
            TypeKeyword::Sorcery => "sorcery",
            TypeKeyword::Planeswalker => "planeswalker",
            TypeKeyword::Land => "land",
        }
    }

    /// Match a token against the seven base type words, accepting a
    /// simple trailing-s plural. Supertypes are only produced by the
    /// compound-phrase table, never by bare-token detection.
    pub fn base_from_word(word: &str) -> Option<TypeKeyword> {
        let singular = word.strip_suffix('s').filter(|s| !s.is_empty()).unwrap_or(word);
        for candidate in [word, singular] {
            let found = match candidate {
                "artifact" => Some(TypeKeyword::Artifact),
                "creature" => Some(TypeKeyword::Creature),
                "enchantment" => Some(TypeKeyword::Enchantment),
                "instant" => Some(TypeKeyword::Instant),
                "sorcery" => Some(TypeKeyword::Sorcery),
                "planeswalker" => Some(TypeKeyword::Planeswalker),
                "land" => Some(TypeKeyword::Land),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    pub fn class(&self) -> TypeClass {
        match self {
            TypeKeyword::Instant | TypeKeyword::Sorcery => TypeClass::PureSpell,
            TypeKeyword::Creature | TypeKeyword::Planeswalker => TypeClass::PureTarget,
            TypeKeyword::Artifact | TypeKeyword::Enchantment => TypeClass::Ambiguous,
            _ => TypeClass::Other,
        }
    }

    /// Whether removal templates targeting this type commonly fall back
    /// to the word "permanent" ("destroy target permanent").
    pub fn has_permanent_alternative(&self) -> bool {
        matches!(
            self,
            TypeKeyword::Artifact
                | TypeKeyword::Creature
                | TypeKeyword::Enchantment
                | TypeKeyword::Planeswalker
        )
    }
}

const COLOR_ORDER: [(char, u8); 5] = [('W', 1), ('U', 2), ('B', 4), ('R', 8), ('G', 16)];

/// Set of color letters, rendered in canonical WUBRG order no matter
/// the insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn new() -> Self {
        ColorSet(0)
    }

    pub fn from_letters(letters: &str) -> Self {
        let mut set = ColorSet(0);
        for ch in letters.chars() {
            set.insert(ch);
        }
        set
    }

    pub fn insert(&mut self, letter: char) {
        let upper = letter.to_ascii_uppercase();
        for (ch, bit) in COLOR_ORDER {
            if ch == upper {
                self.0 |= bit;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn letters(&self) -> String {
        COLOR_ORDER
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(ch, _)| ch)
            .collect()
    }
}

impl Serialize for ColorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.letters())
    }
}

/// One extraction step that fired, for diagnostics and tests only.
/// Never part of the compiled query.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub rule: String,
    pub matched: String,
}

/// Mutable accumulator threaded through the pipeline. Created empty for
/// each phrase, discarded after compilation; never shared across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmc: Option<CmcFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeKeyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_identity: Option<ColorSet>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub commander_context: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oracle_predicates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Pre-built query fragment from the special-form table or the
    /// pump transform; bypasses the structured fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEvent>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, rule: &str, matched: impl Into<String>) {
        self.trace.push(TraceEvent {
            rule: rule.to_string(),
            matched: matched.into(),
        });
    }

    /// Deduplicate and canonically order the type field. Runs before
    /// compilation and before the effect stage classifies types.
    pub fn canonicalize_types(&mut self) {
        self.types.sort();
        self.types.dedup();
    }

    /// True if any clause beyond the scope anchor would be emitted.
    pub fn has_discriminating_clause(&self) -> bool {
        self.cmc.is_some()
            || self.power.is_some()
            || !self.types.is_empty()
            || self.colors.is_some()
            || self.color_identity.is_some()
            || !self.oracle_predicates.is_empty()
            || self.format.is_some()
            || self.oracle.is_some()
    }
}
