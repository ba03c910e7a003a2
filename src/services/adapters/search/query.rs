use crate::services::ports::{
    ConfigurationProvider, ExcludeSpec, FolderQuery, GlobPattern, PatternInfo, QueryType,
    SearchQuery, TextSearchOptions, WorkspaceFolder,
};
use std::path::Path;
use std::sync::Arc;

/// Options merged across every folder of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderOptions {
    pub use_ripgrep: bool,
    pub ignore_symlinks: bool,
}

pub struct FileQueryParams<'a> {
    pub include_pattern: Option<&'a str>,
    pub exclude: &'a ExcludeSpec,
    pub max_results: Option<usize>,
}

pub struct QueryBuilder {
    config: Arc<dyn ConfigurationProvider>,
}

impl QueryBuilder {
    pub fn new(config: Arc<dyn ConfigurationProvider>) -> Self {
        Self { config }
    }

    /// Unanimous AND-reduction: a behavior is only enabled when every folder
    /// agrees. An empty folder list yields `true` for both flags.
    pub fn folder_options(&self, folder_queries: &[FolderQuery]) -> FolderOptions {
        let mut merged = FolderOptions {
            use_ripgrep: true,
            ignore_symlinks: true,
        };
        for fq in folder_queries {
            let settings = self.config.search_settings(&fq.folder);
            merged.use_ripgrep &= settings.use_ripgrep;
            merged.ignore_symlinks &= !settings.follow_symlinks;
        }
        merged
    }

    /// `None` when there is nothing to search: no folders, or an include
    /// folder that is not an absolute path.
    pub fn folder_queries(
        workspace: &[WorkspaceFolder],
        include_folder: Option<&Path>,
    ) -> Option<Vec<FolderQuery>> {
        if workspace.is_empty() {
            return None;
        }
        match include_folder {
            Some(folder) if folder.is_absolute() => Some(vec![FolderQuery {
                folder: folder.to_path_buf(),
            }]),
            Some(_) => None,
            None => Some(
                workspace
                    .iter()
                    .map(|f| FolderQuery {
                        folder: f.uri.clone(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn file(
        &self,
        folder_queries: Vec<FolderQuery>,
        params: FileQueryParams<'_>,
    ) -> SearchQuery {
        let options = self.folder_options(&folder_queries);
        let mut query = SearchQuery::new(QueryType::File, folder_queries);
        query.max_results = params.max_results;
        query.include_pattern = params.include_pattern.map(glob);
        apply_exclude(&mut query, params.exclude);
        query.use_ripgrep = options.use_ripgrep;
        query.ignore_symlinks = options.ignore_symlinks;
        query
    }

    pub fn text(
        &self,
        pattern: PatternInfo,
        workspace: &[WorkspaceFolder],
        options: &TextSearchOptions,
    ) -> SearchQuery {
        let folder_queries: Vec<FolderQuery> = workspace
            .iter()
            .map(|f| FolderQuery {
                folder: f.uri.clone(),
            })
            .collect();
        let merged = self.folder_options(&folder_queries);

        let mut query = SearchQuery::new(QueryType::Text, folder_queries);
        query.content_pattern = Some(pattern);
        query.max_results = options.max_results;
        query.max_file_size = options.max_file_size;
        query.disregard_ignore_files = options.disregard_ignore_files;
        query.include_pattern = options.include_pattern.as_deref().map(glob);
        apply_exclude(&mut query, &options.exclude_pattern);
        query.use_ripgrep = merged.use_ripgrep;
        query.ignore_symlinks = merged.ignore_symlinks;
        query
    }
}

fn glob(pattern: &str) -> GlobPattern {
    GlobPattern::from([(pattern.to_string(), true)])
}

// Disregard and Pattern are mutually exclusive encodings.
fn apply_exclude(query: &mut SearchQuery, exclude: &ExcludeSpec) {
    query.disregard_exclude_settings = exclude.disregards_excludes();
    query.exclude_pattern = exclude.pattern().map(glob);
}

#[cfg(test)]
#[path = "../../../../tests/unit/services/adapters/search/query.rs"]
mod tests;
