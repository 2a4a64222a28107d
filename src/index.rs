//! JSON listing of loaded posts, for whatever renders the site.

use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{entry::Summary, loader::LoadedEntry};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub path: PathBuf,
    pub title: String,
    pub date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub draft: bool,
    /// `None` when the post asks to be shown in full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub blog_name: String,
    pub entries: Vec<IndexRecord>,
    /// tag -> positions in `entries`
    pub tags: BTreeMap<String, Vec<usize>>,
}

impl Index {
    pub fn build(blog_name: &str, entries: &[LoadedEntry], summary_words: usize) -> Self {
        let mut tags: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let records = entries
            .iter()
            .enumerate()
            .map(|(i, loaded)| {
                let entry = &loaded.entry;
                for tag in entry.tags() {
                    let tag_entries = tags.entry(tag.to_string()).or_default();
                    // duplicated tag in one post
                    if tag_entries.last() != Some(&i) {
                        tag_entries.push(i);
                    }
                }

                let (summary, truncated) = if entry.show_full_content() {
                    (None, false)
                } else {
                    let Summary { text, truncated } = entry.summary(summary_words);
                    (Some(text), truncated)
                };

                IndexRecord {
                    path: loaded.path.clone(),
                    title: entry.title().to_string(),
                    date: entry.date(),
                    author: entry.author().map(str::to_string),
                    cover: entry.cover().map(str::to_string),
                    tags: entry.tags().to_vec(),
                    keywords: entry.keywords().to_vec(),
                    draft: entry.is_draft(),
                    summary,
                    truncated,
                }
            })
            .collect();

        Self {
            blog_name: blog_name.to_string(),
            entries: records,
            tags,
        }
    }
}

pub fn save_index(index_file_path: &Path, index: &Index) -> anyhow::Result<()> {
    let index_file_fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(index_file_path)
        .with_context(|| format!("while opening {index_file_path:?}"))?;
    let writer = BufWriter::new(index_file_fd);
    serde_json::to_writer_pretty(writer, index)?;
    info!(
        "Wrote {} entries to {index_file_path:?}",
        index.entries.len()
    );

    Ok(())
}

pub fn load_index(index_file_path: &Path) -> anyhow::Result<Index> {
    let fd = File::open(index_file_path)
        .with_context(|| format!("while opening {index_file_path:?}"))?;
    let reader = BufReader::new(fd);
    serde_json::from_reader(reader).context("invalid index file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn loaded(path: &str, blob: &str) -> LoadedEntry {
        LoadedEntry {
            path: PathBuf::from(path),
            entry: parse(blob).unwrap(),
        }
    }

    #[test]
    fn tags_point_at_record_positions() {
        let entries = vec![
            loaded(
                "b.md",
                "+++\ntitle = \"B\"\ndate = 2023-01-01T00:00:00Z\ntags = [\"swift\", \"swift\", \"ui\"]\n+++\nbody b",
            ),
            loaded(
                "a.md",
                "+++\ntitle = \"A\"\ndate = 2022-01-01T00:00:00Z\ntags = [\"fsharp\", \"ui\"]\nshowFullContent = true\n+++\nbody a",
            ),
        ];
        let index = Index::build("blog", &entries, 70);

        assert_eq!(index.tags["swift"], [0]);
        assert_eq!(index.tags["ui"], [0, 1]);
        assert_eq!(index.tags["fsharp"], [1]);
        assert_eq!(index.entries[0].summary.as_deref(), Some("body b"));
        assert_eq!(index.entries[1].summary, None);
    }

    #[test]
    fn saved_index_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let entries = vec![loaded(
            "post.md",
            "---\ntitle: X\ndate: 2022-06-21T22:42:09+02:00\nauthor: me\n---\nHello",
        )];
        let index = Index::build("blog", &entries, 70);

        // existing longer content must not survive
        std::fs::write(&path, "x".repeat(10_000)).unwrap();
        save_index(&path, &index).unwrap();
        assert_eq!(load_index(&path).unwrap(), index);
    }
}
