use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use mpm_types::{CategorySummary, Project};
use std::path::Path;

/// A row of the list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Project(Project),
    Category(CategorySummary),
}

impl Entry {
    pub fn title(&self) -> &str {
        match self {
            Entry::Project(project) => &project.name,
            Entry::Category(category) => &category.name,
        }
    }

    pub fn description(&self, home: &Path) -> String {
        match self {
            Entry::Project(project) => format!(
                "[{}] {}",
                project.display_category(),
                mpm_utils::format_path_display(&project.path, home)
            ),
            Entry::Category(category) => format!("{} projects", category.count),
        }
    }

    /// Text the filter query is matched against
    pub fn filter_value(&self) -> String {
        match self {
            Entry::Project(project) => format!(
                "{} {} {}",
                project.name,
                project.display_category(),
                project.path.display()
            ),
            Entry::Category(category) => category.name.clone(),
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Entry::Project(project) => Some(project),
            Entry::Category(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "[A→Z]",
            SortOrder::Descending => "[Z→A]",
        }
    }
}

/// Stable sort by name, byte-wise and case-sensitive
pub fn sort_projects(projects: &mut [Project], order: SortOrder) {
    match order {
        SortOrder::Ascending => projects.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Descending => projects.sort_by(|a, b| b.name.cmp(&a.name)),
    }
}

/// Keep entries whose filter value fuzzily matches `query`
pub fn filter_entries(entries: Vec<Entry>, query: &str) -> Vec<Entry> {
    if query.is_empty() {
        return entries;
    }
    let matcher = SkimMatcherV2::default();
    entries
        .into_iter()
        .filter(|entry| matcher.fuzzy_match(&entry.filter_value(), query).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, category: &str) -> Project {
        Project::new(name, format!("/home/dev/{}", name), category)
    }

    #[test]
    fn test_project_entry_rendering() {
        let entry = Entry::Project(project("api", ""));
        assert_eq!(entry.title(), "api");
        assert_eq!(entry.description(Path::new("/home/dev")), "[Uncategorized] ~/api");
        assert_eq!(entry.filter_value(), "api Uncategorized /home/dev/api");
        assert!(entry.as_project().is_some());
    }

    #[test]
    fn test_category_entry_rendering() {
        let entry = Entry::Category(CategorySummary {
            name: "work".to_string(),
            count: 3,
        });
        assert_eq!(entry.title(), "work");
        assert_eq!(entry.description(Path::new("/")), "3 projects");
        assert!(entry.as_project().is_none());
    }

    #[test]
    fn test_sort_toggle_twice_restores_order() {
        let original = vec![project("b", ""), project("a", ""), project("C", ""), project("d", "")];
        let mut projects = original.clone();
        sort_projects(&mut projects, SortOrder::Ascending);
        let ascending = projects.clone();

        let mut order = SortOrder::Ascending;
        order = order.toggle();
        sort_projects(&mut projects, order);
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "a", "C"]);

        order = order.toggle();
        sort_projects(&mut projects, order);
        assert_eq!(projects, ascending);
        assert_eq!(ascending[0].name, "C");
    }

    #[test]
    fn test_filter_entries() {
        let entries = vec![
            Entry::Project(project("frontend", "work")),
            Entry::Project(project("blog", "personal")),
        ];

        let matched = filter_entries(entries.clone(), "work");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title(), "frontend");

        assert_eq!(filter_entries(entries.clone(), "").len(), 2);
        assert!(filter_entries(entries, "zzzz").is_empty());
    }

    #[test]
    fn test_filter_matches_display_category() {
        let entries = vec![
            Entry::Project(Project::new("blog", "/srv/blog", "")),
            Entry::Project(Project::new("api", "/srv/api", "work")),
        ];

        let matched = filter_entries(entries, "Uncategorized");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title(), "blog");
    }

    #[test]
    fn test_sort_order_labels() {
        assert_eq!(SortOrder::default().label(), "[A→Z]");
        assert_eq!(SortOrder::Descending.label(), "[Z→A]");
    }
}
