//! Project workflow
//!
//! Ties the research coordinator, the author and the image service into the
//! operations a front end needs. Every operation takes a [`Project`] by
//! reference and returns a new one; nothing is updated in place.

use crate::agents::{AuthorAgent, Investigator};
use crate::llm::ModelClient;
use crate::media::ImageService;
use crate::research::{ProgressObserver, ResearchCoordinator};
use crate::types::{
    AppError, Book, Branch, GenSettings, ImageTarget, Project, ResearchData, Result,
    ORIGINAL_BRANCH_NAME,
};
use crate::utils::toml_config::YitConfig;
use tracing::info;

pub struct Studio {
    coordinator: ResearchCoordinator,
    author: AuthorAgent,
    images: ImageService,
    default_case_study_count: u32,
}

impl Studio {
    pub fn new(
        coordinator: ResearchCoordinator,
        author: AuthorAgent,
        images: ImageService,
        default_case_study_count: u32,
    ) -> Self {
        Self {
            coordinator,
            author,
            images,
            default_case_study_count,
        }
    }

    /// Wires every component to one shared client as `config` describes.
    pub fn from_config(config: &YitConfig, client: ModelClient) -> Self {
        let agents = Investigator::full_team(
            &client,
            &config.models.research,
            config.research.min_report_chars,
        );
        let coordinator = ResearchCoordinator::new(client.clone(), agents)
            .with_synthesis_model(&config.models.synthesis);
        let author = AuthorAgent::new(client.clone())
            .with_model(&config.models.author)
            .with_thinking_budget(config.drafting.thinking_budget());
        let images = ImageService::new(client, config.images.catalog());

        Self::new(
            coordinator,
            author,
            images,
            config.research.default_case_study_count,
        )
    }

    pub fn coordinator(&self) -> &ResearchCoordinator {
        &self.coordinator
    }

    pub fn author(&self) -> &AuthorAgent {
        &self.author
    }

    pub fn images(&self) -> &ImageService {
        &self.images
    }

    fn case_study_count(&self, settings: &GenSettings) -> u32 {
        settings
            .case_study_count
            .unwrap_or(self.default_case_study_count)
    }

    pub async fn research(
        &self,
        topic: &str,
        settings: &GenSettings,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<ResearchData> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::InvalidInput("topic must not be empty".to_string()));
        }
        self.coordinator
            .perform_research(topic, self.case_study_count(settings), observer)
            .await
    }

    pub async fn draft(
        &self,
        topic: &str,
        research: &ResearchData,
        settings: &GenSettings,
    ) -> Result<Book> {
        // The author sees the same count the research was asked for
        let resolved = GenSettings {
            case_study_count: Some(self.case_study_count(settings)),
            ..settings.clone()
        };
        self.author.generate_draft(topic, research, &resolved).await
    }

    /// Research followed by the first draft, as a new project.
    pub async fn investigate(
        &self,
        topic: &str,
        settings: GenSettings,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<Project> {
        let research = self.research(topic, &settings, observer).await?;
        let book = self.draft(topic.trim(), &research, &settings).await?;
        info!(topic, title = %book.title, "Investigation complete");

        let branch = Branch::new(ORIGINAL_BRANCH_NAME, settings, book);
        Ok(Project::new(topic.trim(), research, branch))
    }

    /// Drafts another book from the project's research with new settings.
    pub async fn create_branch(
        &self,
        project: &Project,
        settings: GenSettings,
        name: Option<String>,
    ) -> Result<Project> {
        let book = self
            .draft(&project.topic, &project.research, &settings)
            .await?;
        let name = name.unwrap_or_else(|| project.next_branch_name());
        info!(branch = %name, "Branch drafted");
        Ok(project.with_branch(Branch::new(name, settings, book)))
    }

    /// Generates the image for one slot of a branch's book.
    ///
    /// `prompt` overrides the slot's own description. The branch's visual
    /// style and image model order are used.
    pub async fn render_image(
        &self,
        project: &Project,
        branch_id: &str,
        target: ImageTarget,
        prompt: Option<&str>,
        high_res: bool,
    ) -> Result<Project> {
        let branch = project.require_branch(branch_id)?;
        let description = match prompt {
            Some(p) if !p.trim().is_empty() => p.to_string(),
            _ => branch
                .book
                .image_prompt(target)
                .map(str::to_string)
                .ok_or_else(|| AppError::NotFound(format!("image slot {}", target)))?,
        };

        let hierarchy = self
            .images
            .catalog()
            .hierarchy_or_default(branch.settings.image_model_hierarchy.as_deref());
        let uri = self
            .images
            .generate_image(
                &description,
                Some(branch.settings.visual_style.as_str()),
                high_res,
                &hierarchy,
            )
            .await?;

        let book = branch.book.with_image(target, uri)?;
        project.replace_branch(branch.with_book(book))
    }

    /// Edits the image already stored in a slot.
    pub async fn edit_image(
        &self,
        project: &Project,
        branch_id: &str,
        target: ImageTarget,
        instruction: &str,
    ) -> Result<Project> {
        let branch = project.require_branch(branch_id)?;
        let current = branch.book.image_url(target).ok_or_else(|| {
            AppError::InvalidInput(format!("image slot {} has no image to edit", target))
        })?;

        let hierarchy = self
            .images
            .catalog()
            .hierarchy_or_default(branch.settings.image_model_hierarchy.as_deref());
        let uri = self
            .images
            .edit_image(current, instruction, &hierarchy)
            .await?;

        let book = branch.book.with_image(target, uri)?;
        project.replace_branch(branch.with_book(book))
    }
}
