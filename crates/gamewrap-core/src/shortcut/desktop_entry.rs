//! Desktop entry (.desktop file) generation.
//!
//! Implements the parts of the XDG Desktop Entry Specification needed for a
//! launcher shortcut, including `Exec` argument quoting.

use std::fmt::{self, Write as FmtWrite};
use std::fs;
use std::path::Path;

use crate::error::{LauncherError, Result};
use tracing::debug;

/// A desktop entry representation.
#[derive(Debug, Clone)]
pub struct DesktopEntry {
    /// Entry name (shown on the desktop).
    pub name: String,
    pub comment: Option<String>,
    /// Program and arguments, unquoted. Quoted on output.
    pub exec: Vec<String>,
    /// Working directory (`Path=` key).
    pub working_dir: Option<String>,
    pub icon: Option<String>,
    pub terminal: bool,
    pub categories: Vec<String>,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            comment: None,
            exec: Vec::new(),
            working_dir: None,
            icon: None,
            terminal: false,
            categories: vec!["Game".to_string()],
        }
    }
}

impl DesktopEntry {
    /// Create a new desktop entry builder.
    pub fn builder() -> DesktopEntryBuilder {
        DesktopEntryBuilder::new()
    }

    /// The `Exec=` value with each argument quoted per the XDG rules.
    pub fn exec_line(&self) -> String {
        self.exec
            .iter()
            .map(|arg| quote_exec_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the entry and mark it executable so desktops treat it as trusted.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io_with_path(e, parent))?;
        }

        fs::write(path, self.to_string()).map_err(|e| LauncherError::io_with_path(e, path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut permissions = fs::metadata(path)
                .map_err(|e| LauncherError::io_with_path(e, path))?
                .permissions();
            permissions.set_mode(0o755);
            fs::set_permissions(path, permissions)
                .map_err(|e| LauncherError::io_with_path(e, path))?;
        }

        debug!("Wrote desktop entry to {:?}", path);
        Ok(())
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut content = String::new();

        writeln!(content, "[Desktop Entry]")?;
        writeln!(content, "Type=Application")?;
        writeln!(content, "Name={}", escape_value(&self.name))?;

        if let Some(ref comment) = self.comment {
            writeln!(content, "Comment={}", escape_value(comment))?;
        }

        writeln!(content, "Exec={}", escape_value(&self.exec_line()))?;

        if let Some(ref dir) = self.working_dir {
            writeln!(content, "Path={}", escape_value(dir))?;
        }

        if let Some(ref icon) = self.icon {
            writeln!(content, "Icon={}", escape_value(icon))?;
        }

        writeln!(content, "Terminal={}", self.terminal)?;

        if !self.categories.is_empty() {
            writeln!(content, "Categories={};", self.categories.join(";"))?;
        }

        f.write_str(&content)
    }
}

/// Quote one `Exec` argument.
///
/// Arguments with reserved characters are double-quoted with `"`, `` ` ``,
/// `$` and `\` backslash-escaped. `%` is doubled in every case since it
/// introduces field codes.
fn quote_exec_arg(arg: &str) -> String {
    const RESERVED: &[char] = &[
        ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(',
        ')', '`',
    ];

    let arg = arg.replace('%', "%%");
    if !arg.is_empty() && !arg.contains(RESERVED) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Escape a string value for the key file format.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builder for desktop entries.
pub struct DesktopEntryBuilder {
    entry: DesktopEntry,
}

impl DesktopEntryBuilder {
    pub fn new() -> Self {
        Self {
            entry: DesktopEntry::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.comment = Some(comment.into());
        self
    }

    /// Set the program and its arguments.
    pub fn exec<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry.exec = argv.into_iter().map(Into::into).collect();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.entry.working_dir = Some(dir.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.entry.icon = Some(icon.into());
        self
    }

    pub fn build(self) -> DesktopEntry {
        self.entry
    }
}

impl Default for DesktopEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
