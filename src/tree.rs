//! Directory → file → symbol outline of the loaded graph.

use std::collections::{BTreeMap, HashSet};

use crate::graph::{FileRecord, GraphDataStore, Node, NodeKind};

const UNKNOWN_FILE: &str = "(unknown file)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub line: Option<u32>,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    /// Exactly as the symbols' `file_path`, so it can be used to highlight
    /// the file.
    pub path: String,
    pub language: Option<String>,
    pub line_count: Option<u32>,
    pub summary: Option<String>,
    pub symbols: Vec<SymbolEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub summary: Option<String>,
    pub dirs: Vec<DirEntry>,
    pub files: Vec<FileEntry>,
    /// Symbols anywhere below this directory.
    pub symbol_count: usize,
}

impl DirEntry {
    pub fn find_file(&self, path: &str) -> Option<&FileEntry> {
        let mut dir = self;
        let mut parts = split(path).peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                return dir.files.iter().find(|file| file.name == part);
            }
            dir = dir.dirs.iter().find(|child| child.name == part)?;
        }
        None
    }

    /// Paths of the directories and files holding at least one symbol for
    /// which `keep` is true.
    pub fn paths_containing(&self, keep: impl Fn(&str) -> bool) -> HashSet<String> {
        let mut paths = HashSet::new();
        self.collect_paths(&keep, &mut paths);
        paths
    }

    fn collect_paths(&self, keep: &impl Fn(&str) -> bool, paths: &mut HashSet<String>) -> bool {
        let mut any = false;
        for dir in &self.dirs {
            any |= dir.collect_paths(keep, paths);
        }
        for file in &self.files {
            if file.symbols.iter().any(|symbol| keep(&symbol.id)) {
                paths.insert(file.path.clone());
                any = true;
            }
        }
        if any && !self.path.is_empty() {
            paths.insert(self.path.clone());
        }
        any
    }
}

#[derive(Default)]
struct FileBuilder {
    /// As the data source spells it.
    path: String,
    record: Option<FileRecord>,
    symbols: Vec<SymbolEntry>,
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, FileBuilder>,
}

impl DirBuilder {
    fn file(&mut self, parts: &[&str], file_path: &str) -> Option<&mut FileBuilder> {
        match parts {
            [] => None,
            [file] => Some(self.files.entry((*file).to_owned()).or_insert_with(|| FileBuilder {
                path: file_path.to_owned(),
                ..FileBuilder::default()
            })),
            [dir, rest @ ..] => self.dirs.entry((*dir).to_owned()).or_default().file(rest, file_path),
        }
    }

    fn finish(self, name: String, path: String, store: &GraphDataStore) -> DirEntry {
        let dirs = self
            .dirs
            .into_iter()
            .map(|(child, builder)| {
                let child_path = join(&path, &child);
                builder.finish(child, child_path, store)
            })
            .collect::<Vec<_>>();

        let files = self
            .files
            .into_iter()
            .map(|(file, mut builder)| {
                builder.symbols.sort_by(|a, b| {
                    a.line
                        .unwrap_or(u32::MAX)
                        .cmp(&b.line.unwrap_or(u32::MAX))
                        .then_with(|| a.name.cmp(&b.name))
                });
                let record = builder.record.unwrap_or_default();
                FileEntry {
                    path: builder.path,
                    name: file,
                    language: record.language,
                    line_count: record.line_count,
                    summary: record.summary,
                    symbols: builder.symbols,
                }
            })
            .collect::<Vec<_>>();

        let symbol_count = dirs.iter().map(|dir| dir.symbol_count).sum::<usize>()
            + files.iter().map(|file| file.symbols.len()).sum::<usize>();

        DirEntry {
            summary: store.directory_summary(&path).map(str::to_owned),
            name,
            path,
            dirs,
            files,
            symbol_count,
        }
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|part| !part.is_empty() && *part != ".")
}

fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_owned()
    } else {
        format!("{parent}/{child}")
    }
}

/// Files listed in the store's file records appear even when they hold no
/// symbols.
pub fn build_tree(store: &GraphDataStore) -> DirEntry {
    let mut root = DirBuilder::default();
    for node in store.nodes() {
        let mut parts = split(&node.file_path).collect::<Vec<_>>();
        if parts.is_empty() {
            parts.push(UNKNOWN_FILE);
        }
        if let Some(file) = root.file(&parts, &node.file_path) {
            file.symbols.push(symbol_entry(node));
        }
    }
    for record in store.files() {
        let parts = split(&record.path).collect::<Vec<_>>();
        if let Some(file) = root.file(&parts, &record.path) {
            file.record = Some(record.clone());
        }
    }
    root.finish(String::new(), String::new(), store)
}

fn symbol_entry(node: &Node) -> SymbolEntry {
    SymbolEntry {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: node.kind,
        line: node.line,
        summary: node.summary.clone(),
    }
}

/// Directory paths from the top down to the one holding `file_path`, as
/// used for expanding the tree to reveal a file.
pub fn ancestor_dirs(file_path: &str) -> Vec<String> {
    let parts = split(file_path).collect::<Vec<_>>();
    let mut current = String::new();
    let mut dirs = Vec::new();
    for part in parts.iter().take(parts.len().saturating_sub(1)) {
        current = join(&current, part);
        dirs.push(current.clone());
    }
    dirs
}
