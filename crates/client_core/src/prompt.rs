use serde::Serialize;
use shared::assessment::AssessmentDraft;
use tracing::warn;

fn slice_json<T: Serialize>(slice: &T) -> String {
    serde_json::to_string(slice).unwrap_or_else(|err| {
        warn!(error = %err, "failed to serialize draft slice for prompt");
        "{}".to_string()
    })
}

/// Natural-language request embedding every answered slice of the draft.
pub fn build_prompt(draft: &AssessmentDraft) -> String {
    let purpose = draft.purpose.map(|purpose| purpose.id()).unwrap_or("null");
    let loan_experience = draft
        .loan_experience
        .map(|value| value.id())
        .unwrap_or_default();

    format!(
        "Act as a TrustWeave Credit Reasoning Agent. Analyze the following behavioral data to determine a Trust Band (T1-T5).\n\
         \n\
         PURPOSE: {purpose}\n\
         MOBILE STABILITY: {mobile}\n\
         UTILITY DISCIPLINE: {utility}\n\
         COMMUNITY RELIABILITY: {community}\n\
         EVIDENCE: {files} files covering {months} months.\n\
         LOAN EXPERIENCE: {loan_experience}\n\
         FINANCIAL CAPACITY: {financial}\n\
         ASSETS: {assets}\n\
         \n\
         Analyze consistency, responsibility, and recovery patterns.\n\
         Provide a Trust Band, a 1-line interpretation, a traditional credit score alignment (e.g. 750-799), and 3-4 bullet points of reasoning.\n\
         Be fair and look for patterns of responsibility rather than wealth.\n",
        mobile = slice_json(&draft.mobile),
        utility = slice_json(&draft.utility),
        community = slice_json(&draft.community),
        files = draft.evidence.len(),
        months = draft.evidence_months(),
        financial = slice_json(&draft.financial),
        assets = slice_json(&draft.assets),
    )
}
