//! Project Workflow Module
//!
//! The [`Studio`] runs the full pipeline for a front end: investigate a topic
//! into a project with its first branch, draft further branches from the
//! same research, and fill or edit image slots. Each call returns a fresh
//! [`crate::types::Project`] value.
//!
//! # Usage
//!
//! ```ignore
//! let studio = Studio::from_config(&config, client);
//! let project = studio.investigate("Dropshipping", GenSettings::default(), None).await?;
//!
//! let shorter = GenSettings { length_level: 1, ..GenSettings::default() };
//! let project = studio.create_branch(&project, shorter, None).await?;
//! println!("{} branches", project.branches.len());
//! ```

pub mod studio;

pub use studio::Studio;
