//! Both panes and the glue between them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use twinpane_core::config::session::Session;
use twinpane_core::event::Command;
use twinpane_core::fs::icons::{ExtensionIconResolver, IconResolver};
use twinpane_core::fs::ops::{DirectoryEnumerator, FsEnumerator};
use twinpane_core::nav::list::VirtualList;
use twinpane_core::tree::{NodeId, Tree};
use twinpane_core::CoreResult;

use crate::input::{Input, HELP};
use crate::render::{format_list, format_tree};

/// What to print after handling one input.
#[derive(Debug, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

/// The folder tree on the left, the directory list on the right.
///
/// The tree follows the list: whenever the list shows a new directory, the
/// tree expands down to it and selects it.
pub struct App {
    list: VirtualList,
    tree: Tree,
    enumerator: Arc<dyn DirectoryEnumerator>,
}

impl App {
    /// Opens `start_dir` on the real file system.
    pub fn new(start_dir: &Path, session: Session) -> anyhow::Result<Self> {
        let resolver: Arc<dyn IconResolver> = Arc::new(ExtensionIconResolver);
        Self::with_backends(start_dir, session, Arc::new(FsEnumerator), resolver)
    }

    pub fn with_backends(
        start_dir: &Path,
        session: Session,
        enumerator: Arc<dyn DirectoryEnumerator>,
        resolver: Arc<dyn IconResolver>,
    ) -> anyhow::Result<Self> {
        let root = start_dir
            .ancestors()
            .last()
            .unwrap_or(start_dir)
            .to_path_buf();
        let tree =
            Tree::new(root).with_resolver(Arc::clone(&resolver), session.resolve_timeout);
        let list = VirtualList::new(session, Arc::clone(&enumerator), resolver)?;

        let mut app = Self {
            list,
            tree,
            enumerator,
        };
        app.list.view_path(start_dir);
        app.reveal_in_tree(start_dir)?;
        Ok(app)
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.list.current_path()
    }

    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Handles one parsed input line.
    ///
    /// # Errors
    ///
    /// Only tree bookkeeping failures are returned; user mistakes become
    /// printed lines.
    pub fn handle(&mut self, input: Input) -> anyhow::Result<Reply> {
        let reply = match input {
            Input::Nothing => Reply::default(),
            Input::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
            Input::Help => Reply::lines(HELP.lines().map(str::to_owned).collect()),
            Input::Ls => Reply::lines(self.list_lines()),
            Input::Tree => Reply::lines(format_tree(&self.tree)),
            Input::Expand(path) => {
                let path = self.absolute(&path);
                match self.reveal_in_tree(&path)? {
                    Some(id) if self.tree.get(id)?.path() == path => {
                        self.ensure_expanded(id)?;
                        Reply::lines(format_tree(&self.tree))
                    }
                    _ => Reply::line(format!("not a folder in the tree: {}", path.display())),
                }
            }
            Input::Collapse(path) => {
                let path = self.absolute(&path);
                match self.tree.find_by_path(&path) {
                    Some(id) => {
                        self.tree.collapse(id)?;
                        Reply::lines(format_tree(&self.tree))
                    }
                    None => Reply::line(format!("not a folder in the tree: {}", path.display())),
                }
            }
            Input::List(command) => self.run_list_command(command)?,
        };
        Ok(reply)
    }

    fn run_list_command(&mut self, command: Command) -> anyhow::Result<Reply> {
        let command = match command {
            Command::ViewPath(path) => Command::ViewPath(self.absolute(&path)),
            other => other,
        };
        let refreshes_tree = matches!(command, Command::Refresh | Command::ToggleHidden);
        let steps_history = matches!(command, Command::GoBack | Command::GoForward);
        let before = self.current_dir().map(Path::to_path_buf);

        let outcome = match self.list.execute(command) {
            Ok(outcome) => outcome,
            Err(e) => return Ok(Reply::line(format!("error: {e}"))),
        };

        if refreshes_tree {
            self.refresh_tree()?;
        }
        let after = self.current_dir().map(Path::to_path_buf);
        if after != before {
            if let Some(dir) = &after {
                self.reveal_in_tree(dir)?;
            }
        }

        if let Some(file) = outcome.opened_file {
            return Ok(Reply::line(format!("file: {}", file.display())));
        }
        if outcome.changed_view {
            Ok(Reply::lines(self.list_lines()))
        } else if steps_history {
            Ok(Reply::line("no history"))
        } else {
            Ok(Reply::line(format!(
                "selected: {}",
                self.list.selected_names().join(", ")
            )))
        }
    }

    /// Re-reads the list and every expanded tree folder after a disk change.
    pub fn on_fs_change(&mut self) -> CoreResult<()> {
        self.list.refresh();
        self.refresh_tree()
    }

    /// Drains icon notifications for the current rows; returns how many arrived.
    pub fn drain_icon_updates(&self) -> usize {
        let updates = self.list.poll_updates();
        if !updates.is_empty() {
            tracing::trace!("{} icon updates", updates.len());
        }
        updates.len()
    }

    fn list_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(dir) = self.current_dir() {
            lines.push(format!("{}:", dir.display()));
        }
        lines.extend(format_list(
            &self.list.entries(),
            &self.list.selected_indices(),
        ));
        lines
    }

    fn refresh_tree(&mut self) -> CoreResult<()> {
        let show_hidden = self.list.session().show_hidden;
        self.tree
            .refresh(self.tree.root(), self.enumerator.as_ref(), show_hidden)?;
        Ok(())
    }

    fn ensure_expanded(&mut self, id: NodeId) -> CoreResult<()> {
        if !self.tree.get(id)?.is_expanded() {
            let show_hidden = self.list.session().show_hidden;
            self.tree.expand(id, self.enumerator.as_ref(), show_hidden)?;
        }
        Ok(())
    }

    /// Expands the tree down to `path` and selects the deepest folder reached.
    ///
    /// Hidden folders are only found while hidden entries are shown.
    fn reveal_in_tree(&mut self, path: &Path) -> CoreResult<Option<NodeId>> {
        let mut current = self.tree.root();
        let mut current_path = self.tree.get(current)?.path().to_path_buf();
        let Ok(rest) = path.strip_prefix(&current_path) else {
            return Ok(None);
        };
        let rest = rest.to_path_buf();

        for component in rest.components() {
            self.ensure_expanded(current)?;
            current_path.push(component);
            match self.tree.find_by_path(&current_path) {
                Some(next) => current = next,
                None => break,
            }
        }
        self.ensure_expanded(current)?;
        self.tree.select(current)?;
        Ok(Some(current))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.current_dir() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_line;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    // The default `.tmp` prefix would make the fixture a hidden folder.
    fn fixture() -> TempDir {
        let tmp = tempfile::Builder::new()
            .prefix("twinpane-")
            .tempdir()
            .unwrap();
        fs::create_dir_all(tmp.path().join("src/nested")).unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("Cargo.toml"), "[package]").unwrap();
        fs::write(tmp.path().join("README.md"), "# hi").unwrap();
        fs::write(tmp.path().join("src/main.rs"), "fn main() {}").unwrap();
        tmp
    }

    fn app_at(dir: &Path) -> App {
        App::new(dir, Session::default()).unwrap()
    }

    fn run(app: &mut App, line: &str) -> Reply {
        app.handle(parse_line(line).unwrap()).unwrap()
    }

    #[test]
    fn starts_with_list_and_revealed_tree() {
        let tmp = fixture();
        let app = app_at(tmp.path());

        assert_eq!(app.current_dir(), Some(tmp.path()));
        let selected = app.tree().selected().unwrap();
        assert_eq!(app.tree().get(selected).unwrap().path(), tmp.path());
        assert!(app.tree().get(selected).unwrap().is_expanded());
    }

    #[test]
    fn cd_relative_moves_both_panes() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        let reply = run(&mut app, "cd src");

        assert_eq!(app.current_dir(), Some(tmp.path().join("src").as_path()));
        assert!(reply.lines.iter().any(|l| l.contains("main.rs")));
        let selected = app.tree().selected().unwrap();
        assert_eq!(
            app.tree().get(selected).unwrap().path(),
            tmp.path().join("src")
        );
    }

    #[test]
    fn open_file_reports_path() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        let rows = app.list().entries();
        let index = rows
            .iter()
            .position(|e| e.raw_name() == "README.md")
            .unwrap();
        let reply = run(&mut app, &format!("open {index}"));

        assert_eq!(reply.lines.len(), 1);
        assert!(reply.lines[0].starts_with("file: "));
        assert!(reply.lines[0].ends_with("README.md"));
    }

    #[test]
    fn select_and_filter() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        let reply = run(&mut app, "select README.md");
        assert_eq!(reply.lines, vec!["selected: README.md".to_owned()]);

        run(&mut app, "filter *.toml");
        let names: Vec<String> = app
            .list()
            .entries()
            .iter()
            .map(|e| e.raw_name().to_owned())
            .collect();
        assert!(names.contains(&"Cargo.toml".to_owned()));
        assert!(!names.contains(&"README.md".to_owned()));
        assert!(names.contains(&"src".to_owned()));
        assert!(app.list().selected_names().is_empty());
    }

    #[test]
    fn expand_and_collapse_tree_folders() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        let reply = run(&mut app, "expand src");
        assert!(reply.lines.iter().any(|l| l.contains("nested")));

        let src = app.tree().find_by_path(&tmp.path().join("src")).unwrap();
        run(&mut app, "collapse src");
        assert!(!app.tree().get(src).unwrap().is_expanded());

        let reply = run(&mut app, "expand README.md");
        assert!(reply.lines[0].starts_with("not a folder"));
    }

    #[test]
    fn disk_changes_reach_both_panes() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        fs::create_dir(tmp.path().join("added")).unwrap();
        app.on_fs_change().unwrap();

        assert!(app
            .list()
            .entries()
            .iter()
            .any(|e| e.raw_name() == "added"));
        assert!(app.tree().find_by_path(&tmp.path().join("added")).is_some());
    }

    #[test]
    fn bad_input_is_reported_not_fatal() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        let reply = run(&mut app, "cd missing-dir");
        assert!(reply.lines[0].ends_with("missing-dir:"));
        let reply = run(&mut app, "quit");
        assert!(reply.quit);
    }

    #[test]
    fn history_boundaries_say_so() {
        let tmp = fixture();
        let mut app = app_at(tmp.path());

        assert_eq!(run(&mut app, "back").lines, vec!["no history".to_owned()]);
        assert_eq!(run(&mut app, "forward").lines, vec!["no history".to_owned()]);

        run(&mut app, "cd docs");
        let reply = run(&mut app, "back");
        assert_eq!(app.current_dir(), Some(tmp.path()));
        assert!(reply.lines[0].ends_with(':'));
        assert_eq!(run(&mut app, "back").lines, vec!["no history".to_owned()]);
    }

    #[test]
    fn icons_arrive_in_background() {
        let tmp = fixture();
        let app = app_at(tmp.path());

        let updates = app.list().wait_idle(Duration::from_secs(10));

        assert!(!updates.is_empty());
        assert!(app.list().entries().iter().all(|e| e.is_resolved()));
    }
}
