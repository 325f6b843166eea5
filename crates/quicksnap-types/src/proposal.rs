use serde::{Deserialize, Serialize};

/// The snapshot space a proposal belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSummary {
    /// Space id, usually an ENS name.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// The subset of a snapshot proposal shown next to its incentives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    /// Proposal id.
    pub id: String,
    /// Proposal title.
    #[serde(default)]
    pub title: String,
    /// The space the proposal was created in.
    pub space: Option<SpaceSummary>,
    /// Choices in display order, option `n` is `choices[n - 1]`.
    #[serde(default)]
    pub choices: Vec<String>,
    /// `pending`, `active` or `closed`.
    #[serde(default)]
    pub state: String,
    /// Voting start, unix seconds.
    #[serde(default)]
    pub start: u64,
    /// Voting end, unix seconds.
    #[serde(default)]
    pub end: u64,
}

/// `choices[option - 1]`; option `0` and options past the end have no choice.
#[must_use]
pub fn choice_at(choices: &[String], option: u32) -> Option<&str> {
    let index = usize::try_from(option).ok()?.checked_sub(1)?;
    choices.get(index).map(String::as_str)
}

impl ProposalSummary {
    /// The choice string of a 1-based option, if it exists.
    #[must_use]
    pub fn choice(&self, option: u32) -> Option<&str> {
        choice_at(&self.choices, option)
    }
}
