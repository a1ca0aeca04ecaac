//! CLI module for yit-forge
//!
//! Provides command-line interface parsing for the yit-forge binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// yit-forge - forensic research dossiers and nano-books
///
/// Four research agents investigate a topic in parallel, their reports are
/// condensed into structured research, and an author model drafts an
/// illustrated nano-book from it.
#[derive(Parser, Debug)]
#[command(
    name = "yit-forge",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Forensic research dossiers and illustrated nano-books",
    long_about = "Runs four research agents against a topic, synthesizes their reports into\n\
                  structured research and drafts an 8-chapter nano-book from it. Drafts can be\n\
                  branched with different settings and illustrated through a chain of image models.",
    after_help = "EXAMPLES:\n    \
                  yit-forge init                                      # Write yit.toml and templates\n    \
                  yit-forge investigate \"Dropshipping\" -o ds.json     # Research + first draft\n    \
                  yit-forge branch --project ds.json --settings s.json # Redraft with other settings\n    \
                  yit-forge fill --project ds.json --target front      # Illustrate the front cover"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "yit.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the commands that draft a book
#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// JSON file with generation settings (see `init`)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Number of case studies to research (overrides the settings file)
    #[arg(long)]
    pub case_studies: Option<u32>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic and draft the first book
    ///
    /// Writes a project export containing the research and an
    /// "Original Draft" branch.
    Investigate {
        /// Topic to investigate
        topic: String,

        #[command(flatten)]
        draft: DraftArgs,

        /// Where to write the project export
        #[arg(short, long, default_value = "project.json")]
        output: PathBuf,
    },

    /// Run the research agents only and write the structured research
    Research {
        /// Topic to investigate
        topic: String,

        /// Number of case studies to research
        #[arg(long)]
        case_studies: Option<u32>,

        /// Where to write the research JSON
        #[arg(short, long, default_value = "research.json")]
        output: PathBuf,
    },

    /// Draft a book from previously saved research
    Draft {
        /// Topic the research was gathered for
        topic: String,

        /// Research JSON written by `research`
        #[arg(short, long)]
        research: PathBuf,

        #[command(flatten)]
        draft: DraftArgs,

        /// Where to write the book JSON
        #[arg(short, long, default_value = "book.json")]
        output: PathBuf,
    },

    /// Draft a new branch of an existing project with different settings
    Branch {
        /// Project export to branch
        #[arg(short, long)]
        project: PathBuf,

        #[command(flatten)]
        draft: DraftArgs,

        /// Branch name (defaults to "Draft N")
        #[arg(short, long)]
        name: Option<String>,

        /// Where to write the updated project (defaults to --project)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the branches of a project and their open image slots
    Show {
        /// Project export to inspect
        #[arg(short, long)]
        project: PathBuf,
    },

    /// Generate a standalone image
    Image {
        /// What the image should show
        description: String,

        /// Visual style (defaults to images.default_style)
        #[arg(long)]
        style: Option<String>,

        /// Request a high resolution image where the model supports it
        #[arg(long)]
        high_res: bool,

        /// Comma-separated image model order
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,

        /// Output file; the extension is chosen from the returned image
        #[arg(short, long, default_value = "image")]
        output: PathBuf,
    },

    /// Edit an existing image file
    Edit {
        /// What to change
        instruction: String,

        /// Image file to edit
        #[arg(short, long)]
        image: PathBuf,

        /// Comma-separated image model order
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,

        /// Output file; the extension is chosen from the returned image
        #[arg(short, long, default_value = "edited")]
        output: PathBuf,
    },

    /// Generate or edit one image slot of a project branch
    Fill {
        /// Project export to update
        #[arg(short, long)]
        project: PathBuf,

        /// Branch id (defaults to the latest branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Slot to fill: front, back or visual:<chapter>:<index>
        #[arg(short, long)]
        target: String,

        /// Replaces the slot's own image prompt
        #[arg(long)]
        prompt: Option<String>,

        /// Edit the slot's current image with this instruction instead
        #[arg(long, conflicts_with = "prompt")]
        edit: Option<String>,

        /// Request a high resolution image where the model supports it
        #[arg(long)]
        high_res: bool,

        /// Where to write the updated project (defaults to --project)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a workspace with configuration files
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Skip writing the settings.json template
        #[arg(long)]
        no_settings: bool,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_investigate() {
        let cli = Cli::try_parse_from([
            "yit-forge",
            "investigate",
            "Dropshipping",
            "--case-studies",
            "7",
            "-o",
            "ds.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Investigate {
                topic,
                draft,
                output,
            } => {
                assert_eq!(topic, "Dropshipping");
                assert_eq!(draft.case_studies, Some(7));
                assert_eq!(output, PathBuf::from("ds.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("yit.toml"));
    }

    #[test]
    fn test_parse_image_models_list() {
        let cli = Cli::try_parse_from([
            "yit-forge",
            "image",
            "an empty warehouse",
            "--models",
            "a,b,c",
        ])
        .unwrap();

        match cli.command {
            Commands::Image { models, .. } => assert_eq!(models, vec!["a", "b", "c"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fill_prompt_conflicts_with_edit() {
        let result = Cli::try_parse_from([
            "yit-forge",
            "fill",
            "-p",
            "p.json",
            "-t",
            "front",
            "--prompt",
            "x",
            "--edit",
            "y",
        ]);
        assert!(result.is_err());
    }
}
