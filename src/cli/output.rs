//! Terminal rendering for the yit-forge CLI
//!
//! Everything the binary prints goes through [`Output`]: status lines, the
//! live research board, project branch tables and open image slots. Plain
//! mode (`--no-color`) uses bracketed tags instead of symbols and colors.

use crate::llm::{ImageApi, ImageModel};
use crate::research::{AgentState, AgentStatus};
use crate::types::{Book, Branch, Project, ResearchData};
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading mark of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Ok,
    Warn,
    Fail,
    Done,
    Tip,
    Wrote,
    Kept,
}

impl Mark {
    fn tag(self) -> &'static str {
        match self {
            Mark::Ok => "[OK]",
            Mark::Warn => "[WARN]",
            Mark::Fail => "[ERROR]",
            Mark::Done => "[DONE]",
            Mark::Tip => "[TIP]",
            Mark::Wrote => "[WROTE]",
            Mark::Kept => "[KEPT]",
        }
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn mark(&self, mark: Mark) -> String {
        if !self.colored {
            return mark.tag().to_string();
        }
        match mark {
            Mark::Ok | Mark::Wrote => "✓".green().bold().to_string(),
            Mark::Warn => "⚠".yellow().bold().to_string(),
            Mark::Fail => "✗".red().bold().to_string(),
            Mark::Done => "■".bright_green().bold().to_string(),
            Mark::Tip => "›".dimmed().to_string(),
            Mark::Kept => "○".yellow().to_string(),
        }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let tagline = "Forensic research dossiers and nano-books";
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "YIT//FORGE".black().on_yellow().bold(),
                version.dimmed(),
                tagline.bright_white()
            );
        } else {
            println!("\n   YIT//FORGE {}\n   {}\n", version, tagline);
        }
    }

    // ============= Status Lines =============

    pub fn success(&self, message: &str) {
        println!("  {} {}", self.mark(Mark::Ok), message);
    }

    pub fn warning(&self, message: &str) {
        println!("  {} {}", self.mark(Mark::Warn), message);
    }

    /// Goes to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("  {} {}", self.mark(Mark::Fail), message);
    }

    pub fn done(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", self.mark(Mark::Done), message.bright_green().bold());
        } else {
            println!("\n  {} {}", self.mark(Mark::Done), message);
        }
    }

    pub fn tip(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", self.mark(Mark::Tip), message.dimmed().italic());
        } else {
            println!("\n  {} {}", self.mark(Mark::Tip), message);
        }
    }

    /// A file or directory written to disk, e.g. `wrote("config", "yit.toml")`.
    pub fn wrote(&self, kind: &str, path: &str) {
        if self.colored {
            println!("  {} {:<9} {}", self.mark(Mark::Wrote), kind.dimmed(), path.bright_white());
        } else {
            println!("  {} {:<9} {}", self.mark(Mark::Wrote), kind, path);
        }
    }

    /// A path left untouched.
    pub fn kept(&self, path: &str, reason: &str) {
        println!("  {} {} ({})", self.mark(Mark::Kept), path, reason);
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  == {} ==", title);
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {:<18} {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {:<18} {}", key, value);
        }
    }

    /// A numbered instruction followed by shell commands to run.
    pub fn next_step(&self, number: usize, label: &str, commands: &[&str]) {
        println!("\n  {}. {}", number, label);
        for cmd in commands {
            if self.colored {
                println!("     {}", format!("$ {}", cmd).bright_cyan());
            } else {
                println!("     $ {}", cmd);
            }
        }
    }

    // ============= Research =============

    /// One line per agent, in the order given.
    pub fn agent_board(&self, states: &[AgentState]) {
        for state in states {
            println!("{}", self.agent_line(state));
        }
    }

    fn agent_line(&self, state: &AgentState) -> String {
        let label = status_label(state.status);
        let detail = state.message.as_deref().unwrap_or("");
        if !self.colored {
            return format!("    {:<20} {:<11} {}", state.agent_name, format!("[{}]", label), detail)
                .trim_end()
                .to_string();
        }
        let label = match state.status {
            AgentStatus::Completed => label.green().bold().to_string(),
            AgentStatus::Failed => label.red().bold().to_string(),
            AgentStatus::Running => label.yellow().to_string(),
            AgentStatus::Pending => label.dimmed().to_string(),
        };
        format!("    {:<20} {} {}", state.agent_name, label, detail.dimmed())
    }

    pub fn dossier(&self, research: &ResearchData) {
        self.field("Ethical rating", &format!("{}/10", research.ethical_rating));
        self.field("Case studies", &research.case_studies.len().to_string());
        self.field("Hidden costs", &research.hidden_costs.len().to_string());
    }

    // ============= Books and Projects =============

    pub fn book(&self, book: &Book) {
        self.field("Title", &book.title);
        self.field("Chapters", &book.chapters.len().to_string());
        self.field("Words", &book.total_words().to_string());
        self.field("Open image slots", &book.placeholders().len().to_string());
    }

    /// Dossier figures, the branch table and the latest branch's open slots.
    pub fn project(&self, project: &Project) {
        self.section(&project.topic);
        self.dossier(&project.research);

        self.section("Branches");
        for line in self.branch_table(&project.branches) {
            println!("{}", line);
        }

        if let Some(latest) = project.latest_branch() {
            self.placeholders(latest);
            self.tip(&format!(
                "Fill a slot with: yit-forge fill -p <project> -b {} -t <slot>",
                latest.id
            ));
        }
    }

    fn branch_table(&self, branches: &[Branch]) -> Vec<String> {
        let rows: Vec<Vec<String>> = branches
            .iter()
            .map(|b| {
                vec![
                    b.id.clone(),
                    b.name.clone(),
                    b.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    b.book.chapters.len().to_string(),
                    b.book.total_words().to_string(),
                    b.book.placeholders().len().to_string(),
                ]
            })
            .collect();
        self.table(&["Id", "Name", "Created", "Chapters", "Words", "Open"], &rows)
    }

    /// Open image slots of one branch with the prompt each would use.
    pub fn placeholders(&self, branch: &Branch) {
        let open = branch.book.placeholders();
        self.section(&format!("Open image slots on {}", branch.name));
        if open.is_empty() {
            self.success("Every slot has an image");
            return;
        }
        for target in open {
            let prompt = branch.book.image_prompt(target).unwrap_or("");
            if self.colored {
                println!("    {:<12} {}", target.to_string().cyan(), prompt.dimmed());
            } else {
                println!("    {:<12} {}", target.to_string(), prompt);
            }
        }
    }

    // ============= Configuration =============

    /// Image models in waterfall order.
    pub fn image_models(&self, models: &[ImageModel]) {
        self.section("Image models");
        for (i, model) in models.iter().enumerate() {
            println!("    {}. {}", i + 1, model_line(model));
        }
    }

    /// Left-aligned columns sized to the widest cell.
    fn table(&self, columns: &[&str], rows: &[Vec<String>]) -> Vec<String> {
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rows.iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = pad_row(columns.iter().copied(), &widths);
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut lines = if self.colored {
            vec![
                header.bright_white().bold().to_string(),
                format!("    {}", "─".repeat(rule_len).dimmed()),
            ]
        } else {
            vec![header, format!("    {}", "-".repeat(rule_len))]
        };
        for row in rows {
            lines.push(pad_row(row.iter().map(String::as_str), &widths));
        }
        lines
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    format!("    {}", cells.join("  ").trim_end())
}

fn status_label(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Pending => "PENDING",
        AgentStatus::Running => "RUNNING",
        AgentStatus::Completed => "COMPLETED",
        AgentStatus::Failed => "FAILED",
    }
}

fn model_line(model: &ImageModel) -> String {
    let mut traits = vec![match model.api {
        ImageApi::GenerateContent => "generateContent",
        ImageApi::Predict => "predict",
    }];
    if model.supports_high_res {
        traits.push("high-res");
    }
    if model.supports_edit {
        traits.push("edit");
    }
    format!("{} ({})", model.id, traits.join(", "))
}
