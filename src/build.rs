//! `mdsite build`: turn a content tree of Markdown files into a static site.
//!
//! The static directory is mirrored into the output directory first, then
//! every `*.md` file under the content directory becomes an `.html` page at
//! the same relative path, rendered through the page template.

use anyhow::{Context, Result};
use colored::Colorize;
use mdsite_parse::Template;
use notify::{EventKind, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::config::SiteConfig;

/// Options passed from CLI to the build pipeline.
pub struct BuildOpts {
    /// Remove the output directory before building.
    pub clean: bool,
    pub quiet: bool,
}

/// Aggregate report from one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: usize,
    pub copied: usize,
    pub unchanged: usize,
}

impl BuildReport {
    pub fn print_summary(&self, out_dir: &Path) {
        let mut parts = vec![format!("{} pages", self.pages)];
        if self.copied > 0 {
            parts.push(format!("{} static copied", self.copied));
        }
        if self.unchanged > 0 {
            parts.push(format!("{} static unchanged", self.unchanged));
        }
        println!(
            "{} {} ({})",
            "Built".green().bold(),
            out_dir.display(),
            parts.join(", ")
        );
    }
}

/// Run the full build: static copy, then page generation.
pub fn run_build(config: &SiteConfig, opts: &BuildOpts) -> Result<BuildReport> {
    let mut report = BuildReport::default();

    if opts.clean && config.out_dir.exists() {
        log::info!("removing {}", config.out_dir.display());
        fs::remove_dir_all(&config.out_dir)
            .with_context(|| format!("Failed to remove {}", config.out_dir.display()))?;
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create {}", config.out_dir.display()))?;

    copy_static(&config.static_dir, &config.out_dir, opts, &mut report)?;

    let raw = fs::read_to_string(&config.template)
        .with_context(|| format!("Failed to read template {}", config.template.display()))?;
    let template = Template::new(raw).with_basepath(config.basepath.clone());

    generate_pages_recursive(&config.content_dir, &template, &config.out_dir, opts, &mut report)?;

    Ok(report)
}

// ------------------------------------------------------------------
// Static files
// ------------------------------------------------------------------

/// Mirror `src` into `dst`, skipping files whose contents already match.
pub fn copy_static(src: &Path, dst: &Path, opts: &BuildOpts, report: &mut BuildReport) -> Result<()> {
    if !src.exists() {
        log::warn!("static directory {} does not exist, skipping", src.display());
        return Ok(());
    }

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let dest_path = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create {}", dest_path.display()))?;
            continue;
        }

        if dest_path.exists() && file_hash(entry.path())? == file_hash(&dest_path)? {
            log::debug!("unchanged {}", rel.display());
            report.unchanged += 1;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest_path)
            .with_context(|| format!("Failed to copy {} to {}", entry.path().display(), dest_path.display()))?;
        report.copied += 1;

        if !opts.quiet {
            println!("  {} {}", "static".dimmed(), dest_path.display());
        }
    }

    Ok(())
}

/// Compute SHA-256 hash of file contents.
fn file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

// ------------------------------------------------------------------
// Pages
// ------------------------------------------------------------------

/// Render one Markdown file into one HTML page.
pub fn generate_page(from: &Path, template: &Template, dest: &Path) -> Result<()> {
    log::debug!("generating {} -> {}", from.display(), dest.display());

    let markdown = fs::read_to_string(from)
        .with_context(|| format!("Failed to read {}", from.display()))?;

    let title = mdsite_parse::extract_title(&markdown)
        .with_context(|| format!("Failed to convert {}", from.display()))?;
    let content = mdsite_parse::markdown_to_html(&markdown)
        .with_context(|| format!("Failed to convert {}", from.display()))?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(dest, template.render(&title, &content))
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    Ok(())
}

/// Generate a page for every `*.md` file under `content_dir`.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template: &Template,
    out_dir: &Path,
    opts: &BuildOpts,
    report: &mut BuildReport,
) -> Result<()> {
    for entry in WalkDir::new(content_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path().extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let dest = page_path(content_dir, entry.path(), out_dir)?;
        generate_page(entry.path(), template, &dest)?;
        report.pages += 1;

        if !opts.quiet {
            println!("  {} {} → {}", "page".dimmed(), entry.path().display(), dest.display());
        }
    }

    Ok(())
}

/// Mirror a content path into the output tree with an `.html` extension.
pub fn page_path(content_dir: &Path, source: &Path, out_dir: &Path) -> Result<PathBuf> {
    let rel = source
        .strip_prefix(content_dir)
        .with_context(|| format!("{} is outside {}", source.display(), content_dir.display()))?;
    Ok(out_dir.join(rel).with_extension("html"))
}

// ------------------------------------------------------------------
// Watch mode
// ------------------------------------------------------------------

/// Canonical paths whose changes trigger a rebuild.
struct WatchedPaths {
    template: PathBuf,
    dirs: Vec<PathBuf>,
    out_dir: PathBuf,
}

impl WatchedPaths {
    fn resolve(config: &SiteConfig) -> Result<Self> {
        let canonical = |p: &Path| {
            fs::canonicalize(p).with_context(|| format!("Cannot resolve path {}", p.display()))
        };

        let mut dirs = vec![canonical(&config.content_dir)?];
        if config.static_dir.exists() {
            dirs.push(canonical(&config.static_dir)?);
        }

        Ok(Self {
            template: canonical(&config.template)?,
            dirs,
            out_dir: canonical(&config.out_dir)?,
        })
    }

    /// The template itself, or anything under a source directory that is
    /// not also under the output directory.
    fn contains(&self, path: &Path) -> bool {
        if path == self.template {
            return true;
        }
        !path.starts_with(&self.out_dir) && self.dirs.iter().any(|dir| path.starts_with(dir))
    }

    fn any_relevant(&self, paths: &[PathBuf]) -> bool {
        paths.iter().any(|p| {
            // Removed files no longer canonicalize.
            let p = p.canonicalize().unwrap_or_else(|_| p.clone());
            self.contains(&p)
        })
    }
}

/// Watch the content, static, and template paths and rebuild on change.
///
/// The template is watched through its parent directory so editors that save
/// by rename keep triggering rebuilds; sibling files are filtered out.
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Ctrl+C exits cleanly.
pub fn watch_and_rebuild(config: &SiteConfig, opts: &BuildOpts) -> Result<()> {
    let watched = WatchedPaths::resolve(config)?;
    let template_dir = watched
        .template
        .parent()
        .context("Template has no parent directory")?
        .to_path_buf();

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        config.content_dir.display()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in &watched.dirs {
        watcher.watch(dir, RecursiveMode::Recursive)?;
    }
    if !watched.dirs.iter().any(|dir| template_dir.starts_with(dir)) {
        watcher.watch(&template_dir, RecursiveMode::NonRecursive)?;
    }

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);
    // Watching never wipes the output directory under the browser.
    let rebuild_opts = BuildOpts {
        clean: false,
        quiet: opts.quiet,
    };

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                // Writes into the output tree must not retrigger a build.
                if relevant && watched.any_relevant(&event.paths) && last_rebuild.elapsed() > debounce {
                    // Small delay to let the editor finish writing
                    std::thread::sleep(Duration::from_millis(50));

                    match run_build(config, &rebuild_opts) {
                        Ok(report) => {
                            if !opts.quiet {
                                report.print_summary(&config.out_dir);
                            }
                            last_rebuild = Instant::now();
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Keep looping
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quiet() -> BuildOpts {
        BuildOpts {
            clean: false,
            quiet: true,
        }
    }

    #[test]
    fn page_path_mirrors_tree() {
        let path = page_path(
            Path::new("content"),
            Path::new("content/blog/glorfindel/index.md"),
            Path::new("public"),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("public/blog/glorfindel/index.html"));
    }

    #[test]
    fn page_path_rejects_foreign_source() {
        assert!(page_path(Path::new("content"), Path::new("other/a.md"), Path::new("public")).is_err());
    }

    #[test]
    fn copy_static_skips_unchanged_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("images")).unwrap();
        fs::write(src.path().join("index.css"), "body {}").unwrap();
        fs::write(src.path().join("images/a.png"), [0u8, 1, 2]).unwrap();

        let mut first = BuildReport::default();
        copy_static(src.path(), dst.path(), &quiet(), &mut first).unwrap();
        assert_eq!(first.copied, 2);
        assert_eq!(fs::read(dst.path().join("images/a.png")).unwrap(), vec![0u8, 1, 2]);

        fs::write(src.path().join("index.css"), "body { margin: 0 }").unwrap();
        let mut second = BuildReport::default();
        copy_static(src.path(), dst.path(), &quiet(), &mut second).unwrap();
        assert_eq!(second.copied, 1);
        assert_eq!(second.unchanged, 1);
    }

    #[test]
    fn generate_page_fills_template() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("index.md");
        let dest = dir.path().join("out/index.html");
        fs::write(&from, "# Home\n\nWelcome _friend_").unwrap();

        let template = Template::new("<title>{{ Title }}</title>{{ Content }}");
        generate_page(&from, &template, &dest).unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "<title>Home</title><div><h1>Home</h1><p>Welcome <i>friend</i></p></div>"
        );
    }

    #[test]
    fn watched_paths_filter_events() {
        let watched = WatchedPaths {
            template: PathBuf::from("/site/template.html"),
            dirs: vec![PathBuf::from("/site/content"), PathBuf::from("/site/static")],
            out_dir: PathBuf::from("/site/public"),
        };

        assert!(watched.contains(Path::new("/site/template.html")));
        assert!(watched.contains(Path::new("/site/content/blog/a.md")));
        assert!(watched.contains(Path::new("/site/static/index.css")));
        assert!(!watched.contains(Path::new("/site/README.md")));
        assert!(!watched.contains(Path::new("/site/.template.html.swp")));
        assert!(!watched.contains(Path::new("/site/public/index.html")));
    }

    #[test]
    fn watched_paths_skip_output_nested_in_content() {
        let watched = WatchedPaths {
            template: PathBuf::from("/site/template.html"),
            dirs: vec![PathBuf::from("/site")],
            out_dir: PathBuf::from("/site/public"),
        };

        assert!(watched.contains(Path::new("/site/index.md")));
        assert!(!watched.contains(Path::new("/site/public/index.html")));
        assert!(!watched.any_relevant(&[PathBuf::from("/site/public/a.html")]));
        assert!(watched.any_relevant(&[
            PathBuf::from("/site/public/a.html"),
            PathBuf::from("/site/template.html"),
        ]));
    }

    #[test]
    fn watched_paths_resolve_template_in_site_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = &fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("content")).unwrap();
        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("template.html"), "{{ Content }}").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let config = SiteConfig::default().resolve(root, Default::default());
        let watched = WatchedPaths::resolve(&config).unwrap();

        assert_eq!(watched.dirs.len(), 1, "missing static dir is not watched");
        assert!(watched.any_relevant(&[root.join("template.html")]));
        assert!(!watched.any_relevant(&[root.join("notes.txt")]));
        assert!(watched.any_relevant(&[root.join("content/new.md")]));
    }

    #[test]
    fn generate_page_reports_source_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("broken.md");
        fs::write(&from, "# Title\n\nunclosed **bold").unwrap();

        let err = generate_page(&from, &Template::new("{{ Content }}"), &dir.path().join("b.html"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
        assert!(!dir.path().join("b.html").exists());
    }
}
