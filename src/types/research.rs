use serde::{Deserialize, Serialize};

// ============= Research Dossier Types =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStudyKind {
    Winner,
    Loser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CaseStudyKind,
    pub background: String,
    pub strategy: String,
    pub outcome: String,
    pub revenue: String,
}

/// Whether the affiliate program pays people who join the scheme or people
/// who write about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateKind {
    Participant,
    Writer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateOpportunity {
    pub program: String,
    pub potential: String,
    #[serde(rename = "type")]
    pub kind: AffiliateKind,
    pub commission: String,
    pub notes: String,
}

/// Synthesized result of an investigation.
///
/// Every list field is required on the wire; an empty list is valid, a
/// missing or `null` one is rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchData {
    pub summary: String,
    /// 1 (predatory) to 10 (benign).
    pub ethical_rating: u8,
    pub profit_potential: String,
    pub market_stats: Vec<Stat>,
    pub hidden_costs: Vec<Stat>,
    pub case_studies: Vec<CaseStudy>,
    pub affiliates: Vec<AffiliateOpportunity>,
}

impl ResearchData {
    pub fn winners(&self) -> impl Iterator<Item = &CaseStudy> {
        self.case_studies
            .iter()
            .filter(|c| c.kind == CaseStudyKind::Winner)
    }

    pub fn losers(&self) -> impl Iterator<Item = &CaseStudy> {
        self.case_studies
            .iter()
            .filter(|c| c.kind == CaseStudyKind::Loser)
    }
}
