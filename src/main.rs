use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yit::cli::init::{self, InitConfig, InitResult};
use yit::cli::output::Output;
use yit::cli::{Cli, Commands, DraftArgs};
use yit::media::image::{decode_data_uri, encode_data_uri, extension_for_mime, mime_for_extension};
use yit::types::settings::MAX_TOPIC_CHARS;
use yit::utils::toml_config::LoggingConfig;
use yit::{
    AgentState, GeminiTransport, GenSettings, ImageTarget, ModelClient, Project, ProjectExport,
    ProgressObserver, ResearchData, Studio, YitConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let Cli {
        config: config_path,
        verbose,
        command,
        ..
    } = cli;

    match command {
        Commands::Init {
            path,
            force,
            no_settings,
        } => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    no_settings,
                },
                output,
            );
            match result {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => bail!(e),
            }
        }

        Commands::Config { full, validate } => show_config(&config_path, full, validate, output),

        Commands::Show { project } => {
            output.project(&load_project(&project)?);
            Ok(())
        }

        command => {
            let config = YitConfig::load_or_default(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            init_tracing(&config.logging, verbose);
            let studio = build_studio(&config)?;
            run_pipeline(command, &config, &studio, output).await
        }
    }
}

async fn run_pipeline(
    command: Commands,
    config: &YitConfig,
    studio: &Studio,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Investigate {
            topic,
            draft,
            output: out,
        } => {
            let topic = checked_topic(&topic)?;
            let settings = load_settings(&draft, output)?;
            output.section(&format!("Investigating: {}", topic));

            let printer = progress_printer(output);
            let project = studio
                .investigate(&topic, settings, Some(&printer as &dyn ProgressObserver))
                .await?;

            write_json(&out, &ProjectExport::new(project.clone()))?;
            output.project(&project);
            output.done(&format!("Project written to {}", out.display()));
        }

        Commands::Research {
            topic,
            case_studies,
            output: out,
        } => {
            let topic = checked_topic(&topic)?;
            let settings = GenSettings {
                case_study_count: case_studies,
                ..GenSettings::default()
            };
            output.section(&format!("Researching: {}", topic));

            let printer = progress_printer(output);
            let research = studio
                .research(&topic, &settings, Some(&printer as &dyn ProgressObserver))
                .await?;

            write_json(&out, &research)?;
            output.dossier(&research);
            output.done(&format!("Research written to {}", out.display()));
        }

        Commands::Draft {
            topic,
            research,
            draft,
            output: out,
        } => {
            let topic = checked_topic(&topic)?;
            let research: ResearchData = read_json(&research)?;
            let settings = load_settings(&draft, output)?;
            output.section(&format!("Drafting: {}", topic));

            let book = studio.draft(&topic, &research, &settings).await?;
            write_json(&out, &book)?;
            output.book(&book);
            output.done(&format!("Book written to {}", out.display()));
        }

        Commands::Branch {
            project: path,
            draft,
            name,
            output: out,
        } => {
            let project = load_project(&path)?;
            let settings = load_settings(&draft, output)?;
            output.section(&format!("Branching: {}", project.topic));

            let project = studio.create_branch(&project, settings, name).await?;
            let out = out.unwrap_or(path);
            write_json(&out, &ProjectExport::new(project.clone()))?;
            output.project(&project);
            output.done(&format!("Project written to {}", out.display()));
        }

        Commands::Image {
            description,
            style,
            high_res,
            models,
            output: out,
        } => {
            let catalog = studio.images().catalog();
            let hierarchy = catalog.hierarchy_or_default(non_empty(&models));
            let style = style.unwrap_or_else(|| config.images.default_style.clone());
            output.section("Generating image");

            let uri = studio
                .images()
                .generate_image(&description, Some(&style), high_res, &hierarchy)
                .await?;
            let written = write_image(&out, &uri)?;
            output.done(&format!("Image written to {}", written.display()));
        }

        Commands::Edit {
            instruction,
            image,
            models,
            output: out,
        } => {
            let source = read_image(&image)?;
            let catalog = studio.images().catalog();
            let hierarchy = catalog.hierarchy_or_default(non_empty(&models));
            output.section("Editing image");

            let uri = studio
                .images()
                .edit_image(&source, &instruction, &hierarchy)
                .await?;
            let written = write_image(&out, &uri)?;
            output.done(&format!("Image written to {}", written.display()));
        }

        Commands::Fill {
            project: path,
            branch,
            target,
            prompt,
            edit,
            high_res,
            output: out,
        } => {
            let project = load_project(&path)?;
            let target: ImageTarget = target.parse()?;
            let branch_id = match branch {
                Some(id) => id,
                None => project
                    .latest_branch()
                    .map(|b| b.id.clone())
                    .context("Project has no branches")?,
            };
            output.section(&format!("Filling {} on branch {}", target, branch_id));

            let project = match edit {
                Some(instruction) => {
                    studio
                        .edit_image(&project, &branch_id, target, &instruction)
                        .await?
                }
                None => {
                    studio
                        .render_image(&project, &branch_id, target, prompt.as_deref(), high_res)
                        .await?
                }
            };

            output.placeholders(project.require_branch(&branch_id)?);
            let out = out.unwrap_or(path);
            write_json(&out, &ProjectExport::new(project))?;
            output.done(&format!("Project written to {}", out.display()));
        }

        Commands::Init { .. } | Commands::Config { .. } | Commands::Show { .. } => {}
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default_filter = if verbose {
        format!("{},yit=debug", logging.level)
    } else {
        logging.level.clone()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build_studio(config: &YitConfig) -> Result<Studio> {
    let api_key = config.api_key().context("Gemini API key is not configured")?;
    let transport = GeminiTransport::new(Some(api_key), &config.api.base_url);
    let client = ModelClient::new(Arc::new(transport), config.retry.to_policy());
    info!(base_url = %config.api.base_url, "Model client ready");
    Ok(Studio::from_config(config, client))
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> Result<()> {
    let config = if validate {
        let config = YitConfig::load(path)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        output.success(&format!("{} is valid", path.display()));
        config
    } else {
        YitConfig::load_or_default(path)?
    };

    if full {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    output.section("Configuration");
    output.field("File", &path.display().to_string());
    output.field("API key variable", &config.api.api_key_env);
    output.field(
        "API key",
        if config.api_key().is_ok() {
            "set"
        } else {
            "missing"
        },
    );
    output.field("Research model", &config.models.research);
    output.field("Synthesis model", &config.models.synthesis);
    output.field("Author model", &config.models.author);
    output.field("Max retries", &config.retry.max_retries.to_string());

    output.image_models(&config.images.catalog().default_hierarchy());
    Ok(())
}

fn checked_topic(topic: &str) -> Result<String> {
    let topic = topic.trim();
    if topic.is_empty() {
        bail!("Topic must not be empty");
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        bail!("Topic must be at most {} characters", MAX_TOPIC_CHARS);
    }
    Ok(topic.to_string())
}

fn load_settings(args: &DraftArgs, output: &Output) -> Result<GenSettings> {
    let mut settings = match &args.settings {
        Some(path) => read_json(path)?,
        None => GenSettings::default(),
    };
    if args.case_studies.is_some() {
        settings.case_study_count = args.case_studies;
    }
    for warning in settings.check() {
        output.warning(&warning.to_string());
    }
    Ok(settings)
}

fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let export = ProjectExport::from_json(&json)
        .with_context(|| format!("Failed to load project from {}", path.display()))?;
    Ok(export.project)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn read_image(path: &Path) -> Result<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mime = mime_for_extension(ext)
        .with_context(|| format!("Unsupported image type: {}", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(encode_data_uri(mime, &bytes))
}

/// Writes the decoded image next to `path`, with the extension of its mime type.
fn write_image(path: &Path, uri: &str) -> Result<PathBuf> {
    let (mime, bytes) = decode_data_uri(uri)?;
    let path = path.with_extension(extension_for_mime(&mime));
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn non_empty(models: &[String]) -> Option<&[String]> {
    if models.is_empty() {
        None
    } else {
        Some(models)
    }
}

/// Prints agents whose status changed since the last update.
fn progress_printer(output: &Output) -> impl Fn(&[AgentState]) + Send + Sync + '_ {
    let seen = Mutex::new(Vec::<AgentState>::new());
    move |states: &[AgentState]| {
        let mut seen = seen.lock();
        let changed: Vec<AgentState> = states
            .iter()
            .filter(|s| !seen.contains(s))
            .cloned()
            .collect();
        if !changed.is_empty() {
            output.agent_board(&changed);
        }
        *seen = states.to_vec();
    }
}
