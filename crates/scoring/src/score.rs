use serde::{Deserialize, Serialize};

use raisepath_onboarding::CompanyProfile;

/// Points awarded per category.
const KYC_POINTS: f64 = 30.0;
const FINANCIALS_POINTS: f64 = 20.0;
const DOCUMENTS_POINTS: f64 = 25.0;
const REVENUE_POINTS_MAX: f64 = 25.0;

/// Documents needed for full documentation credit. No partial credit below.
const DOCUMENT_THRESHOLD: usize = 3;

/// Revenue at (or above) which the revenue component saturates.
const REVENUE_CEILING: f64 = 1_000_000.0;

/// Per-category sub-scores as displayed to the caller.
///
/// `revenue` is rounded independently of the total, so the breakdown may not
/// sum exactly to `ScoreView::score`. That drift is deliberate and kept; see
/// the rounding note on [`compute_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub kyc: u32,
    pub financials: u32,
    pub documents: u32,
    pub revenue: u32,
}

/// Qualitative recommendation band. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Score ≥ 80.
    HighlyInvestable,
    /// Score 60–79.
    GoodProgress,
    /// Score 40–59.
    GettingThere,
    /// Score < 40.
    EarlyStage,
}

impl Recommendation {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            Recommendation::HighlyInvestable
        } else if score >= 60 {
            Recommendation::GoodProgress
        } else if score >= 40 {
            Recommendation::GettingThere
        } else {
            Recommendation::EarlyStage
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Recommendation::HighlyInvestable => "Excellent! Your company is highly investable.",
            Recommendation::GoodProgress => {
                "Good progress! Focus on the remaining areas to improve your score."
            }
            Recommendation::GettingThere => {
                "Getting there! Complete more requirements to boost your investability."
            }
            Recommendation::EarlyStage => {
                "Early stage. Complete the onboarding steps to improve your score."
            }
        }
    }
}

/// Derived score view. Never stored; recomputed from the profile on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    /// Total score, 0–100.
    pub score: u32,
    /// One reason per category, in category order.
    pub reasons: Vec<String>,
    pub recommendation: String,
    pub breakdown: ScoreBreakdown,
}

impl ScoreView {
    pub fn band(&self) -> Recommendation {
        Recommendation::for_score(self.score)
    }
}

/// Compute the investability score for a profile.
///
/// Pure and total: same profile in, same view out, no error cases. Callers
/// are responsible for resolving the profile first (a missing profile is a
/// not-found failure upstream, not something scoring detects).
///
/// Components:
/// - KYC verified: 30 or 0
/// - financials linked: 20 or 0
/// - documents: 25 iff at least 3 documents, else 0
/// - revenue: `min(25, revenue / 1,000,000 * 25)` — linear up to $1M
///
/// The four components are summed unrounded and only the total is rounded.
/// The breakdown's revenue cell is rounded separately for display, so the
/// breakdown sum can drift from the total by ±1. Kept as-is on purpose.
pub fn compute_score(profile: &CompanyProfile) -> ScoreView {
    let mut reasons = Vec::with_capacity(4);

    let kyc = if profile.kyc_verified() { KYC_POINTS } else { 0.0 };
    if profile.kyc_verified() {
        reasons.push("KYC verification completed".to_string());
    } else {
        reasons.push("Complete KYC verification to gain 30 points".to_string());
    }

    let financials = if profile.financials_linked() {
        FINANCIALS_POINTS
    } else {
        0.0
    };
    if profile.financials_linked() {
        reasons.push("Financial data linked".to_string());
    } else {
        reasons.push("Link financial data to gain 20 points".to_string());
    }

    let document_count = profile.document_count();
    let documents = if document_count >= DOCUMENT_THRESHOLD {
        DOCUMENTS_POINTS
    } else {
        0.0
    };
    if document_count >= DOCUMENT_THRESHOLD {
        reasons.push(format!("Documentation complete ({document_count} files)"));
    } else {
        reasons.push(format!(
            "Upload more documents to gain 25 points (currently {document_count}/{DOCUMENT_THRESHOLD})"
        ));
    }

    let revenue =
        f64::min(REVENUE_POINTS_MAX, profile.revenue().get() / REVENUE_CEILING * REVENUE_POINTS_MAX);
    if revenue > 0.0 {
        reasons.push(format!("Revenue contribution: {revenue:.1} points"));
    } else {
        reasons.push("Increase revenue to gain up to 25 points".to_string());
    }

    let total = (kyc + financials + documents + revenue).round() as u32;
    let recommendation = Recommendation::for_score(total);

    ScoreView {
        score: total,
        reasons,
        recommendation: recommendation.message().to_string(),
        breakdown: ScoreBreakdown {
            kyc: kyc as u32,
            financials: financials as u32,
            documents: documents as u32,
            revenue: revenue.round() as u32,
        },
    }
}
