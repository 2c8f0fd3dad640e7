//! Keyword classifiers for routing.
//!
//! Matching is case-insensitive substring containment against fixed vocabularies: the
//! input is lowercased and any vocabulary term appearing anywhere in it is a hit. There is
//! no tokenization, so "new" also matches "renew". The vocabularies overlap on purpose
//! (e.g. "pain" is both a handoff term and a prior-knowledge term); concern routing resolves
//! the overlap only through the fixed priority in [`classify_concern`].

/// A fixed vocabulary matched by lowercase substring containment.
#[derive(Clone, Copy, Debug)]
pub struct KeywordSet {
    name: &'static str,
    terms: &'static [&'static str],
}

impl KeywordSet {
    pub const fn new(name: &'static str, terms: &'static [&'static str]) -> Self {
        Self { name, terms }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn terms(&self) -> &'static [&'static str] {
        self.terms
    }

    /// Returns true when any term occurs in the lowercased text.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.terms.iter().any(|t| lower.contains(t))
    }

    /// Terms that occur in the lowercased text, in vocabulary order.
    pub fn matched_terms(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        self.terms
            .iter()
            .copied()
            .filter(|t| lower.contains(t))
            .collect()
    }
}

/// Terms that move an identified patient from intake to concern routing.
///
/// "medication" is absent: "What medications am I taking?" stays with intake.
pub const HANDOFF: KeywordSet = KeywordSet::new(
    "handoff",
    &[
        // symptoms
        "pain",
        "swelling",
        "urine",
        "bp",
        "blood pressure",
        "breath",
        "breathing",
        "fever",
        "nausea",
        "dizzy",
        "tired",
        "chest",
        "leg",
        "stomach",
        "headache",
        "side effect",
        "symptom",
        "feeling",
        "hurt",
        "worse",
        "emergency",
        "severe",
        // information requests answered by retrieval
        "latest",
        "recent",
        "new",
        "current",
        "trend",
        "research",
        "treatment",
        "drug",
        "therapy",
        "study",
        "guideline",
        "medical",
        "science",
        "recommendation",
        "update",
    ],
);

/// Terms asking for recent / current information.
pub const LIVE_SEARCH: KeywordSet = KeywordSet::new(
    "live_search",
    &[
        "latest",
        "recent",
        "new",
        "current",
        "update",
        "research",
        "study",
        "guideline",
        "recommendation",
    ],
);

/// General medical-topic terms answered from the static knowledge corpus.
pub const PRIOR_KNOWLEDGE: KeywordSet = KeywordSet::new(
    "prior_knowledge",
    &[
        "medication",
        "drug",
        "side effect",
        "treatment",
        "procedure",
        "diagnosis",
        "condition",
        "disease",
        "surgery",
        "therapy",
        "pain",
        "swelling",
        "fever",
        "nausea",
        "vomiting",
        "diarrhea",
        "breathing",
        "shortness of breath",
        "chest pain",
        "headache",
        "dizzy",
        "fatigue",
        "tired",
        "symptom",
        "bleeding",
        "infection",
        "rash",
        "cough",
        "constipation",
        "wound",
        "incision",
    ],
);

/// Retrieval strategy chosen for one turn. Exactly one variant, so the two strategies
/// cannot both be selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetrievalChoice {
    LiveSearch,
    PriorKnowledge,
    None,
}

impl RetrievalChoice {
    pub fn needs_live_search(self) -> bool {
        matches!(self, Self::LiveSearch)
    }

    pub fn needs_prior_knowledge(self) -> bool {
        matches!(self, Self::PriorKnowledge)
    }
}

/// Returns true when the text should be handed off to concern routing.
pub fn needs_handoff(text: &str) -> bool {
    HANDOFF.matches(text)
}

/// Chooses the retrieval strategy; live-search terms outrank prior-knowledge terms.
pub fn classify_concern(text: &str) -> RetrievalChoice {
    if LIVE_SEARCH.matches(text) {
        RetrievalChoice::LiveSearch
    } else if PRIOR_KNOWLEDGE.matches(text) {
        RetrievalChoice::PriorKnowledge
    } else {
        RetrievalChoice::None
    }
}
