//! Output formatting utilities

use comfy_table::Table;
use mpm_types::Catalog;
use mpm_utils::format_path_display;
use std::io::Write;
use std::path::Path;

/// Output format enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Projects grouped by category
    Text,
    /// Human-readable table format
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Project names only, one per line
    Names,
}

/// Output formatter
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_projects_to_writer<W: Write>(
        &self,
        catalog: &Catalog,
        home: &Path,
        writer: &mut W,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => self.format_projects_text(catalog, writer),
            OutputFormat::Table => self.format_projects_table(catalog, home, writer),
            OutputFormat::Json => self.format_projects_json(catalog, writer),
            OutputFormat::Yaml => self.format_projects_yaml(catalog, writer),
            OutputFormat::Names => self.format_project_names(catalog, writer),
        }
    }
}

impl OutputFormatter {
    fn format_projects_text<W: Write>(&self, catalog: &Catalog, writer: &mut W) -> anyhow::Result<()> {
        if catalog.is_empty() {
            writeln!(writer, "No projects found")?;
            return Ok(());
        }

        for (category, projects) in catalog.grouped() {
            writeln!(writer, "\n[{}]", category)?;
            for project in projects {
                writeln!(writer, "  - {}: {}", project.name, project.path.display())?;
            }
        }
        Ok(())
    }

    fn format_projects_table<W: Write>(
        &self,
        catalog: &Catalog,
        home: &Path,
        writer: &mut W,
    ) -> anyhow::Result<()> {
        if catalog.is_empty() {
            writeln!(writer, "No projects found")?;
            return Ok(());
        }

        let mut table = Table::new();
        table.set_header(vec!["Name", "Category", "Path"]);

        for (category, projects) in catalog.grouped() {
            for project in projects {
                table.add_row(vec![
                    project.name.clone(),
                    category.clone(),
                    format_path_display(&project.path, home),
                ]);
            }
        }

        writeln!(writer, "{}", table)?;
        Ok(())
    }

    fn format_projects_json<W: Write>(&self, catalog: &Catalog, writer: &mut W) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&catalog.projects)?;
        writeln!(writer, "{}", json)?;
        Ok(())
    }

    fn format_projects_yaml<W: Write>(&self, catalog: &Catalog, writer: &mut W) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&catalog.projects)?;
        write!(writer, "{}", yaml)?;
        Ok(())
    }

    fn format_project_names<W: Write>(&self, catalog: &Catalog, writer: &mut W) -> anyhow::Result<()> {
        for project in &catalog.projects {
            writeln!(writer, "{}", project.name)?;
        }
        Ok(())
    }
}
