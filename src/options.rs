//! Agent options parsing.
//!
//! The options string is everything after `=` in
//! `-agentlib:setjniftab002=<options>`. The only recognized value is
//! `-verbose`, matched exactly.

use std::convert::Infallible;
use std::str::FromStr;

pub const VERBOSE_FLAG: &str = "-verbose";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentOptions {
    /// Print progress and pass lines, not just failures.
    pub verbose: bool,
}

impl AgentOptions {
    pub fn parse(options: &str) -> Self {
        AgentOptions {
            verbose: options == VERBOSE_FLAG,
        }
    }
}

impl FromStr for AgentOptions {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AgentOptions::parse(s))
    }
}
