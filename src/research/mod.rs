//! Multi-Agent Research Coordination
//!
//! A topic is handed to every research agent at once. Their free-text
//! reports are collected whether or not some agents fail, stitched into a
//! labeled dossier and condensed by one structured synthesis call into a
//! validated [`crate::types::ResearchData`].
//!
//! # Usage
//!
//! ```ignore
//! use yit::research::ResearchCoordinator;
//!
//! let coordinator = ResearchCoordinator::with_default_agents(client);
//! let progress = |states: &[AgentState]| {
//!     for s in states {
//!         println!("{}: {:?}", s.agent_name, s.status);
//!     }
//! };
//!
//! let research = coordinator
//!     .perform_research("Dropshipping", 7, Some(&progress))
//!     .await?;
//! println!("Ethical rating: {}/10", research.ethical_rating);
//! ```
//!
//! # Research Workflow
//!
//! 1. **Fan-out** - Every agent runs concurrently; none can cancel another
//! 2. **Partition** - Successful reports are kept, failures are logged
//! 3. **Dossier** - Reports are labeled and joined in agent order
//! 4. **Synthesis** - One schema-constrained call produces the record
//! 5. **Validation** - The record is checked before it is returned

/// Research task coordination and dossier synthesis.
pub mod coordinator;

pub use coordinator::{
    compile_dossier, AgentState, AgentStatus, ProgressObserver, ResearchCoordinator,
};
