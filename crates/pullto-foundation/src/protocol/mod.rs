//! Host capability contracts
//!
//! The pull pipeline never touches an editor or the filesystem directly. It
//! consumes a [`WorkspaceHost`] for file lookup, read/write and user messaging,
//! and receives the editor state as an immutable [`EditorState`] snapshot.

use crate::error::PullResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Line terminator used by a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// Detect the line ending of a text: CRLF if any `\r\n` occurs
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

/// Opaque handle to a file known to the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension (`IMyClass` for `src/IMyClass.cs`)
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Frozen snapshot of a document split into lines
///
/// Lines never contain their terminator. The detected [`LineEnding`] is kept
/// so text reassembled from lines matches the original byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl SourceDocument {
    /// Build a snapshot, detecting the line ending from the text
    pub fn new(text: &str) -> Self {
        Self::with_line_ending(text, LineEnding::detect(text))
    }

    /// Build a snapshot with an explicit line ending (editor setting)
    pub fn with_line_ending(text: &str, line_ending: LineEnding) -> Self {
        let lines = text.lines().map(str::to_string).collect();
        Self {
            lines,
            line_ending,
            trailing_newline: text.ends_with('\n'),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a line, `None` past the end of the document
    pub fn line_at(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Reassemble the full text using the document's line ending
    pub fn text(&self) -> String {
        let mut text = self.lines.join(self.line_ending.as_str());
        if self.trailing_newline {
            text.push_str(self.line_ending.as_str());
        }
        text
    }
}

/// Editor state captured at the start of one command invocation
#[derive(Debug, Clone)]
pub struct EditorState {
    /// File the cursor is in
    pub file: FileHandle,
    /// Snapshot of that file's text
    pub document: SourceDocument,
    /// Zero-based cursor line
    pub cursor_line: usize,
}

impl EditorState {
    pub fn new(file: FileHandle, document: SourceDocument, cursor_line: usize) -> Self {
        Self {
            file,
            document,
            cursor_line,
        }
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn line_text(&self, index: usize) -> Option<&str> {
        self.document.line_at(index)
    }

    pub fn line_ending(&self) -> LineEnding {
        self.document.line_ending()
    }
}

/// Capabilities the pull pipeline needs from its editor or workspace host
#[async_trait]
pub trait WorkspaceHost: Send + Sync {
    /// Find files whose name equals `file_name` anywhere in the workspace
    async fn find_files_by_name(&self, file_name: &str) -> Vec<FileHandle>;

    /// Read the full text of a file
    async fn read_text(&self, file: &FileHandle) -> PullResult<String>;

    /// Replace the full text of a file, returning whether it was persisted
    async fn write_text(&self, file: &FileHandle, text: &str) -> bool;

    /// Show a message to the user
    fn notify(&self, level: NotifyLevel, message: &str);
}
