//! Reads every post under an article directory.

use std::{
    cmp::Ordering,
    collections::VecDeque,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    entry::ContentEntry,
    error::{FailureCause, LoadError},
    parser::parse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure, remember it, keep going.
    Skip,
    /// Stop at the first post that fails to load.
    Abort,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub include_drafts: bool,
    pub on_error: ErrorPolicy,
    /// File extensions treated as posts, without the dot.
    pub extensions: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_drafts: false,
            on_error: ErrorPolicy::Skip,
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedEntry {
    /// Relative to the article directory.
    pub path: PathBuf,
    pub entry: ContentEntry,
}

#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: FailureCause,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Newest first.
    pub entries: Vec<LoadedEntry>,
    pub failures: Vec<LoadFailure>,
    pub skipped_drafts: usize,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_owned(),
        source,
    }
}

fn read_post(path: &Path) -> Result<ContentEntry, FailureCause> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse(&content)?)
}

pub fn load_file(path: &Path) -> Result<ContentEntry, LoadError> {
    read_post(path).map_err(|cause| cause.at(path.to_owned()))
}

// ordering by date(descending). same date: by title.
pub fn sort_entries(a: &LoadedEntry, b: &LoadedEntry) -> Ordering {
    b.entry
        .date()
        .cmp(&a.entry.date())
        .then_with(|| a.entry.title().cmp(b.entry.title()))
}

/// Symlinked files are followed, symlinked directories are not.
pub fn load_dir(article_dir: &Path, options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();

    // traversing `article_dir`
    let mut q = VecDeque::new();
    q.push_back(PathBuf::new());
    while let Some(path) = q.pop_front() {
        let current_searching_directory_path = article_dir.join(&path);
        debug!("Reading {current_searching_directory_path:?}");

        let mut dir_entries = std::fs::read_dir(&current_searching_directory_path)
            .map_err(io_error(&current_searching_directory_path))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error(&current_searching_directory_path))?;
        dir_entries.sort_by_key(|e| e.file_name());

        for entry in dir_entries {
            let relative_path = path.join(entry.file_name());
            let file_type = entry.file_type().map_err(io_error(&entry.path()))?;

            if file_type.is_dir() {
                q.push_back(relative_path);
                continue;
            }
            if !has_post_extension(&relative_path, &options.extensions) {
                continue;
            }

            let loaded = if file_type.is_symlink() {
                // dangling link: reported like an unreadable post
                std::fs::metadata(entry.path())
                    .map_err(FailureCause::from)
                    .and_then(|meta| {
                        if meta.is_file() {
                            read_post(&entry.path()).map(Some)
                        } else {
                            Ok(None)
                        }
                    })
            } else if file_type.is_file() {
                read_post(&entry.path()).map(Some)
            } else {
                Ok(None)
            };

            match loaded {
                Ok(None) => {}
                Ok(Some(content)) => {
                    if content.is_draft() && !options.include_drafts {
                        debug!("Skipping draft {relative_path:?}");
                        report.skipped_drafts += 1;
                        continue;
                    }
                    report.entries.push(LoadedEntry {
                        path: relative_path,
                        entry: content,
                    });
                }
                Err(cause) => match options.on_error {
                    ErrorPolicy::Abort => return Err(cause.at(relative_path)),
                    ErrorPolicy::Skip => {
                        warn!("Skipping {relative_path:?}: {cause}");
                        report.failures.push(LoadFailure {
                            path: relative_path,
                            error: cause,
                        });
                    }
                },
            }
        }
    }

    report.entries.sort_by(sort_entries);
    info!(
        "Loaded {} posts from {article_dir:?} ({} failed, {} drafts skipped)",
        report.entries.len(),
        report.failures.len(),
        report.skipped_drafts
    );
    Ok(report)
}

fn has_post_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}
