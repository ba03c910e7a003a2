use super::*;
use crate::services::testing::StaticConfig;
use std::path::PathBuf;

fn builder(config: StaticConfig) -> QueryBuilder {
    QueryBuilder::new(Arc::new(config))
}

fn folders(paths: &[&str]) -> Vec<WorkspaceFolder> {
    paths.iter().map(|p| WorkspaceFolder::new(*p)).collect()
}

fn file_query(builder: &QueryBuilder, exclude: &ExcludeSpec) -> SearchQuery {
    let fqs = QueryBuilder::folder_queries(&folders(&["/w/a"]), None).unwrap();
    builder.file(
        fqs,
        FileQueryParams {
            include_pattern: None,
            exclude,
            max_results: None,
        },
    )
}

#[test]
fn test_disregard_excludes_encoding() {
    let q = file_query(&builder(StaticConfig::default()), &ExcludeSpec::Disregard);
    assert!(q.disregard_exclude_settings);
    assert!(q.exclude_pattern.is_none());
}

#[test]
fn test_exclude_pattern_encoding() {
    let exclude = ExcludeSpec::Pattern("*.log".to_string());
    let q = file_query(&builder(StaticConfig::default()), &exclude);
    assert!(!q.disregard_exclude_settings);
    assert_eq!(
        q.exclude_pattern,
        Some(GlobPattern::from([("*.log".to_string(), true)]))
    );
}

#[test]
fn test_no_exclude_sets_neither() {
    let q = file_query(&builder(StaticConfig::default()), &ExcludeSpec::None);
    assert!(!q.disregard_exclude_settings);
    assert!(q.exclude_pattern.is_none());
}

#[test]
fn test_symlinks_need_unanimous_agreement() {
    let b = builder(
        StaticConfig::default()
            .with("/w/a", false, true)
            .with("/w/b", true, true),
    );
    let fqs = QueryBuilder::folder_queries(&folders(&["/w/a", "/w/b"]), None).unwrap();
    assert!(!b.folder_options(&fqs).ignore_symlinks);

    let b = builder(
        StaticConfig::default()
            .with("/w/a", false, true)
            .with("/w/b", false, true),
    );
    assert!(b.folder_options(&fqs).ignore_symlinks);
}

#[test]
fn test_ripgrep_needs_unanimous_agreement() {
    let b = builder(
        StaticConfig::default()
            .with("/w/a", true, true)
            .with("/w/b", true, false),
    );
    let fqs = QueryBuilder::folder_queries(&folders(&["/w/a", "/w/b"]), None).unwrap();
    let options = b.folder_options(&fqs);
    assert!(!options.use_ripgrep);
    assert!(!options.ignore_symlinks);
}

#[test]
fn test_include_folder_scopes_to_single_folder() {
    let fqs = QueryBuilder::folder_queries(
        &folders(&["/w/a", "/w/b"]),
        Some(std::path::Path::new("/elsewhere")),
    )
    .unwrap();
    assert_eq!(
        fqs,
        vec![FolderQuery {
            folder: PathBuf::from("/elsewhere")
        }]
    );
}

#[test]
fn test_include_folder_uses_only_its_own_settings() {
    let b = builder(
        StaticConfig::default()
            .with("/w/a", true, true)
            .with("/w/b", false, false),
    );
    let fqs =
        QueryBuilder::folder_queries(&folders(&["/w/a", "/w/b"]), Some(std::path::Path::new("/w/b")))
            .unwrap();
    let q = b.file(
        fqs,
        FileQueryParams {
            include_pattern: Some("**/*.rs"),
            exclude: &ExcludeSpec::None,
            max_results: Some(20),
        },
    );
    assert!(q.ignore_symlinks);
    assert!(!q.use_ripgrep);
    assert_eq!(q.max_results, Some(20));
    assert_eq!(
        q.include_pattern,
        Some(GlobPattern::from([("**/*.rs".to_string(), true)]))
    );
}

#[test]
fn test_no_folder_queries_for_empty_workspace() {
    assert!(QueryBuilder::folder_queries(&[], None).is_none());
    assert!(QueryBuilder::folder_queries(&[], Some(std::path::Path::new("/w/a"))).is_none());
}

#[test]
fn test_relative_include_folder_is_rejected() {
    let result = QueryBuilder::folder_queries(&folders(&["/w/a"]), Some(std::path::Path::new("a")));
    assert!(result.is_none());
}

#[test]
fn test_text_query_covers_every_root() {
    let b = builder(StaticConfig::default());
    let options = TextSearchOptions {
        include_pattern: Some("src/**".to_string()),
        exclude_pattern: ExcludeSpec::Disregard,
        max_results: Some(5),
        disregard_ignore_files: true,
        max_file_size: Some(1024),
    };
    let pattern = PatternInfo {
        pattern: "todo".to_string(),
        is_case_sensitive: true,
        ..Default::default()
    };
    let q = b.text(pattern.clone(), &folders(&["/w/a", "/w/b"]), &options);

    assert_eq!(q.kind, QueryType::Text);
    assert_eq!(q.folder_queries.len(), 2);
    assert_eq!(q.content_pattern, Some(pattern));
    assert!(q.disregard_exclude_settings);
    assert!(q.disregard_ignore_files);
    assert_eq!(q.max_file_size, Some(1024));
    assert!(q.use_ripgrep);
    assert!(!q.ignore_symlinks);
}
