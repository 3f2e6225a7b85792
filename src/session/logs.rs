//! Per-agent append-only log sequences

use crate::types::identifiers::AgentId;

/// Chronological log lines for each agent
///
/// Lines are only ever appended; the whole set is cleared at the start of a
/// submission and on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentLogs {
    manager: Vec<String>,
    agent_a: Vec<String>,
    agent_b: Vec<String>,
}

impl AgentLogs {
    /// Lines logged by one agent
    #[must_use]
    pub fn get(&self, agent: AgentId) -> &[String] {
        match agent {
            AgentId::Manager => &self.manager,
            AgentId::AgentA => &self.agent_a,
            AgentId::AgentB => &self.agent_b,
        }
    }

    /// Append a line to one agent's log
    pub fn push(&mut self, agent: AgentId, line: impl Into<String>) {
        let log = match agent {
            AgentId::Manager => &mut self.manager,
            AgentId::AgentA => &mut self.agent_a,
            AgentId::AgentB => &mut self.agent_b,
        };
        log.push(line.into());
    }

    /// Empty every agent's log
    pub fn clear(&mut self) {
        self.manager.clear();
        self.agent_a.clear();
        self.agent_b.clear();
    }

    /// Whether no agent has logged anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        AgentId::ALL.into_iter().all(|agent| self.get(agent).is_empty())
    }

    /// Total number of lines across all agents
    #[must_use]
    pub fn total_len(&self) -> usize {
        AgentId::ALL.into_iter().map(|agent| self.get(agent).len()).sum()
    }

    /// Iterate agents in display order with their lines
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &[String])> {
        AgentId::ALL.into_iter().map(|agent| (agent, self.get(agent)))
    }
}
